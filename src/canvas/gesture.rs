//! Single versus double click, told apart with a deferred confirmation.

/// Seconds a first click waits for a second one.
pub const DOUBLE_CLICK_WINDOW: f64 = 0.5;

/// Pixels the pointer may travel between the two presses of a double click.
pub const DOUBLE_CLICK_DISTANCE: f32 = 6.0;

/// Where the pointer is, in plot units and screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub plot: [f64; 2],
    pub screen: [f32; 2],
    /// Plot units covered by one screen pixel, per axis.
    pub units_per_pixel: [f64; 2],
    /// Input time in seconds.
    pub time: f64,
}

impl PointerSample {
    /// Plot-unit tolerance box for `pixels` on screen.
    pub fn tolerance(&self, pixels: f64) -> [f64; 2] {
        [
            self.units_per_pixel[0] * pixels,
            self.units_per_pixel[1] * pixels,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Press {
    /// First press, a single click unless a second one follows in time.
    First,
    Double(PointerSample),
}

#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    pending: Option<PointerSample>,
}

impl ClickTracker {
    pub fn press(&mut self, sample: PointerSample) -> Press {
        match self.pending.take() {
            Some(first) if is_second_click(&first, &sample) => Press::Double(sample),
            _ => {
                self.pending = Some(sample);
                Press::First
            }
        }
    }

    /// Returns the pending click once the window has passed without a second
    /// press.
    pub fn confirm_single(&mut self, now: f64) -> Option<PointerSample> {
        let pending = self.pending?;
        if now - pending.time >= DOUBLE_CLICK_WINDOW {
            self.pending = None;
            Some(pending)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

fn is_second_click(first: &PointerSample, second: &PointerSample) -> bool {
    let dt = second.time - first.time;
    let dx = second.screen[0] - first.screen[0];
    let dy = second.screen[1] - first.screen[1];
    (0.0..DOUBLE_CLICK_WINDOW).contains(&dt)
        && dx.hypot(dy) <= DOUBLE_CLICK_DISTANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, screen_x: f32) -> PointerSample {
        PointerSample {
            plot: [0.0, 0.0],
            screen: [screen_x, 10.0],
            units_per_pixel: [0.5, 0.25],
            time,
        }
    }

    #[test]
    fn second_press_in_window_is_a_double_click() {
        let mut tracker = ClickTracker::default();
        assert_eq!(tracker.press(sample(1.0, 10.0)), Press::First);
        assert!(tracker.is_pending());
        assert!(matches!(tracker.press(sample(1.3, 12.0)), Press::Double(_)));
        assert!(!tracker.is_pending());
        assert_eq!(tracker.confirm_single(5.0), None);
    }

    #[test]
    fn lone_press_is_confirmed_after_the_window() {
        let mut tracker = ClickTracker::default();
        tracker.press(sample(1.0, 10.0));
        assert_eq!(tracker.confirm_single(1.2), None);
        let single = tracker.confirm_single(1.5).unwrap();
        assert_eq!(single.time, 1.0);
        assert!(!tracker.is_pending());
    }

    #[test]
    fn late_or_distant_press_starts_over() {
        let mut tracker = ClickTracker::default();
        tracker.press(sample(1.0, 10.0));
        assert_eq!(tracker.press(sample(1.6, 10.0)), Press::First);

        tracker.clear();
        tracker.press(sample(2.0, 10.0));
        assert_eq!(tracker.press(sample(2.1, 40.0)), Press::First);
    }

    #[test]
    fn tolerance_scales_with_zoom() {
        assert_eq!(sample(0.0, 0.0).tolerance(4.0), [2.0, 1.0]);
    }
}
