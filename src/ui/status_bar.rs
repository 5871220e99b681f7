use std::time::Duration;

/// Seconds a message stays visible.
pub const STATUS_DURATION: f64 = 4.0;

/// One line of feedback at the bottom of the window. The timer starts the
/// first frame a message is drawn.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    message: String,
    shown_at: Option<f64>,
}

impl StatusBar {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            shown_at: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.shown_at = None;
    }

    /// The message, if it has not expired at `now`.
    pub fn current(&mut self, now: f64) -> Option<&str> {
        if self.message.is_empty() {
            return None;
        }
        let shown_at = *self.shown_at.get_or_insert(now);
        if now - shown_at < STATUS_DURATION {
            Some(&self.message)
        } else {
            None
        }
    }

    fn remaining(&self, now: f64) -> f64 {
        self.shown_at
            .map_or(STATUS_DURATION, |shown_at| STATUS_DURATION - (now - shown_at))
            .max(0.0)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let now = ui.input(|i| i.time);
        let remaining = self.remaining(now);

        match self.current(now) {
            Some(message) => {
                ui.label(message);
                ui.ctx()
                    .request_repaint_after(Duration::from_secs_f64(remaining));
            }
            None => {
                ui.label("");
            }
        }
    }
}
