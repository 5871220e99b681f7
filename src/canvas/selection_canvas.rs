//! Pointer handling for one channel plot, kept free of egui so it can be
//! driven from tests. [`super::channel_plot::ChannelPlot`] feeds it a
//! [`PointerSample`] per frame.
//!
//! - double click on a curve, then drag right: select samples of the
//!   tracking curve, dragging back left drops them again
//! - double click off the curves, then drag: pan inside the default view
//! - single click on a selection: delete it
//! - scroll: zoom about the pointer

use log::{debug, info};

use super::gesture::{ClickTracker, PointerSample, Press};
use super::selection::{Segments, near_polyline};
use super::view_bounds::{ViewBounds, ZOOM_SPEED};
use crate::reader::Harmonic;

/// Screen pixels the pointer may be from a line and still hit it.
pub const HOVER_TOLERANCE_PIXELS: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Curve {
    pub harmonic: Harmonic,
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

impl Curve {
    /// Index of the point whose x is closest to `x`, first one on ties.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p[0].is_finite())
            .min_by(|(_, a), (_, b)| (a[0] - x).abs().total_cmp(&(b[0] - x).abs()))
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Select,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    HoveringCurve,
    Dragging(DragKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    SegmentCommitted(usize),
    SegmentDiscarded,
    SegmentDeleted(usize),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionCanvas {
    curves: Vec<Curve>,
    segments: Segments,
    state: PointerState,
    clicks: ClickTracker,

    view: ViewBounds,
    default_view: ViewBounds,

    /// Sample of the tracking curve the selection drag started on.
    anchor: Option<usize>,
    /// Samples picked so far, always `anchor..=last` in order.
    picked: Vec<usize>,
    last_screen: [f32; 2],
}

impl SelectionCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// The first plotted curve. Selections snap to its samples.
    pub fn tracking_curve(&self) -> Option<&Curve> {
        self.curves.first()
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn view(&self) -> ViewBounds {
        self.view
    }

    pub fn default_view(&self) -> ViewBounds {
        self.default_view
    }

    pub fn is_click_pending(&self) -> bool {
        self.clicks.is_pending()
    }

    /// Replaces the plotted curves, keeping selections. The view is reset
    /// when nothing was plotted before, otherwise clamped to the new data.
    pub fn set_curves(&mut self, curves: Vec<Curve>) {
        let was_empty = self.curves.is_empty();
        self.curves = curves;
        self.default_view = ViewBounds::around(
            self.curves
                .iter()
                .flat_map(|curve| curve.points.iter().copied()),
        );
        self.view = if was_empty {
            self.default_view
        } else {
            self.view.clamped(&self.default_view)
        };
        self.cancel_drag();
    }

    /// Drops curves and selections, for a newly loaded file.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reset_view(&mut self) {
        self.view = self.default_view;
    }

    pub fn clear_segments(&mut self) {
        self.segments.clear();
        self.cancel_drag();
    }

    /// Points of the selection being dragged, empty when there is none.
    pub fn active_selection(&self) -> Vec<[f64; 2]> {
        match self.tracking_curve() {
            Some(curve) => self
                .picked
                .iter()
                .filter_map(|&index| curve.points.get(index).copied())
                .collect(),
            None => vec![],
        }
    }

    pub fn pointer_pressed(&mut self, sample: PointerSample) {
        if let Press::Double(sample) = self.clicks.press(sample) {
            self.begin_drag(sample);
        }
    }

    pub fn pointer_moved(&mut self, sample: PointerSample) {
        match self.state {
            PointerState::Dragging(DragKind::Select) => self.extend_selection(sample.plot[0]),
            PointerState::Dragging(DragKind::Pan) => self.pan(sample),
            PointerState::Idle | PointerState::HoveringCurve => {
                self.state = if self.is_over_curve(&sample) {
                    PointerState::HoveringCurve
                } else {
                    PointerState::Idle
                };
            }
        }
    }

    pub fn pointer_released(&mut self, sample: PointerSample) -> Option<CanvasEvent> {
        let event = match self.state {
            PointerState::Dragging(DragKind::Select) => Some(self.finish_selection()),
            PointerState::Dragging(DragKind::Pan) | PointerState::Idle | PointerState::HoveringCurve => None,
        };

        self.cancel_drag();
        self.pointer_moved(sample);
        event
    }

    /// The pointer went off the plot. A drag in progress carries on until
    /// the button is released.
    pub fn pointer_left(&mut self) {
        if self.state == PointerState::HoveringCurve {
            self.state = PointerState::Idle;
        }
    }

    /// `delta` is in scroll points, positive away from the user.
    pub fn scrolled(&mut self, sample: PointerSample, delta: f32) {
        if delta == 0.0 || !self.view.contains(sample.plot) {
            return;
        }
        let factor = (-f64::from(delta) * ZOOM_SPEED / 15.0).exp();
        self.view = self.view.zoomed(factor, sample.plot, &self.default_view);
    }

    /// Confirms a pending single click once the double click window has
    /// passed. A confirmed click on a selection deletes it.
    pub fn tick(&mut self, now: f64) -> Option<CanvasEvent> {
        if matches!(self.state, PointerState::Dragging(_)) {
            return None;
        }
        let click = self.clicks.confirm_single(now)?;
        let id = self
            .segments
            .hit_test(click.plot, click.tolerance(HOVER_TOLERANCE_PIXELS))?;

        self.segments.remove(id)?;
        info!("Deleted selection {id}, {} left", self.segments.len());
        Some(CanvasEvent::SegmentDeleted(id))
    }

    fn is_over_curve(&self, sample: &PointerSample) -> bool {
        let tolerance = sample.tolerance(HOVER_TOLERANCE_PIXELS);
        self.curves
            .iter()
            .any(|curve| near_polyline(&curve.points, sample.plot, tolerance))
    }

    fn begin_drag(&mut self, sample: PointerSample) {
        self.cancel_drag();

        if self.is_over_curve(&sample) {
            let Some(anchor) = self
                .tracking_curve()
                .and_then(|curve| curve.nearest_index(sample.plot[0]))
            else {
                return;
            };
            debug!("Selection drag started at sample {anchor}");
            self.anchor = Some(anchor);
            self.state = PointerState::Dragging(DragKind::Select);
        } else {
            self.last_screen = sample.screen;
            self.state = PointerState::Dragging(DragKind::Pan);
        }
    }

    fn extend_selection(&mut self, x: f64) {
        let (Some(anchor), Some(target)) = (
            self.anchor,
            self.tracking_curve().and_then(|curve| curve.nearest_index(x)),
        ) else {
            return;
        };

        if target < anchor {
            self.picked.clear();
            return;
        }

        match self.picked.last().copied() {
            None => self.picked.extend(anchor..=target),
            Some(last) if target > last => self.picked.extend(last + 1..=target),
            Some(_) => {
                while self.picked.last().is_some_and(|&last| last > target) {
                    self.picked.pop();
                }
            }
        }
    }

    fn pan(&mut self, sample: PointerSample) {
        let dx = f64::from(sample.screen[0] - self.last_screen[0]);
        let dy = f64::from(sample.screen[1] - self.last_screen[1]);
        self.last_screen = sample.screen;

        // screen y grows downwards
        let moved = self.view.translated(
            -dx * sample.units_per_pixel[0],
            dy * sample.units_per_pixel[1],
        );
        if moved.fits_pan_limits(&self.default_view) {
            self.view = moved;
        }
    }

    fn finish_selection(&mut self) -> CanvasEvent {
        let points = self.active_selection();
        let start = self.picked.first().copied().unwrap_or_default();
        let end = self.picked.last().copied().unwrap_or_default();

        match self.segments.commit(points, start, end) {
            Some(id) => {
                info!("Committed selection {id} over samples {start}..={end}");
                CanvasEvent::SegmentCommitted(id)
            }
            None => CanvasEvent::SegmentDiscarded,
        }
    }

    fn cancel_drag(&mut self) {
        self.anchor = None;
        self.picked.clear();
        if matches!(self.state, PointerState::Dragging(_)) {
            self.state = PointerState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One plot unit per pixel on x, y flipped, origin at (0, 0).
    fn at(x: f64, y: f64, time: f64) -> PointerSample {
        PointerSample {
            plot: [x, y],
            screen: [x as f32, -y as f32],
            units_per_pixel: [1.0, 1.0],
            time,
        }
    }

    /// y = x for x in 0..=100, plus a flat curve at y = -40.
    fn canvas() -> SelectionCanvas {
        let mut canvas = SelectionCanvas::new();
        canvas.set_curves(vec![
            Curve {
                harmonic: Harmonic::F3,
                label: "F3".to_owned(),
                points: (0..=100).map(|i| [f64::from(i), f64::from(i)]).collect(),
            },
            Curve {
                harmonic: Harmonic::F5,
                label: "F5".to_owned(),
                points: (0..=100).map(|i| [f64::from(i), -40.0]).collect(),
            },
        ]);
        canvas
    }

    fn double_click(canvas: &mut SelectionCanvas, x: f64, y: f64, time: f64) {
        canvas.pointer_pressed(at(x, y, time));
        canvas.pointer_released(at(x, y, time + 0.05));
        canvas.pointer_pressed(at(x, y, time + 0.2));
    }

    fn select(canvas: &mut SelectionCanvas, from: f64, to: f64, time: f64) -> Option<CanvasEvent> {
        double_click(canvas, from, from, time);
        let mut x = from;
        while x < to {
            x += 1.0;
            canvas.pointer_moved(at(x, x, time + 0.3));
        }
        canvas.pointer_released(at(to, to, time + 0.4))
    }

    #[test]
    fn hovering_tracks_curves() {
        let mut canvas = canvas();
        canvas.pointer_moved(at(10.0, 12.0, 0.0));
        assert_eq!(canvas.state(), PointerState::HoveringCurve);
        canvas.pointer_moved(at(10.0, -38.0, 0.0));
        assert_eq!(canvas.state(), PointerState::HoveringCurve);
        canvas.pointer_moved(at(10.0, 30.0, 0.0));
        assert_eq!(canvas.state(), PointerState::Idle);
    }

    #[test]
    fn leaving_the_plot_stops_hovering_but_not_dragging() {
        let mut canvas = canvas();
        canvas.pointer_moved(at(10.0, 10.0, 0.0));
        assert_eq!(canvas.state(), PointerState::HoveringCurve);
        canvas.pointer_left();
        assert_eq!(canvas.state(), PointerState::Idle);

        double_click(&mut canvas, 10.0, 10.0, 1.0);
        canvas.pointer_left();
        assert_eq!(canvas.state(), PointerState::Dragging(DragKind::Select));
    }

    #[test]
    fn dragging_past_both_ends_stays_inside_the_curve() {
        let mut canvas = canvas();
        double_click(&mut canvas, 0.0, 0.0, 0.0);
        canvas.pointer_moved(at(-30.0, -30.0, 0.3));
        canvas.pointer_moved(at(250.0, 250.0, 0.3));
        assert_eq!(
            canvas.pointer_released(at(250.0, 250.0, 0.4)),
            Some(CanvasEvent::SegmentCommitted(1))
        );

        let segment = &canvas.segments().as_slice()[0];
        assert_eq!((segment.start_index, segment.end_index), (0, 100));
        assert_eq!(segment.x_range(), Some((0.0, 100.0)));
    }

    #[test]
    fn double_click_drag_on_curve_commits_a_segment() {
        let mut canvas = canvas();
        let event = select(&mut canvas, 10.0, 20.0, 0.0);
        assert_eq!(event, Some(CanvasEvent::SegmentCommitted(1)));

        let segment = &canvas.segments().as_slice()[0];
        assert_eq!(segment.start_index, 10);
        assert_eq!(segment.end_index, 20);
        assert_eq!(segment.points.len(), 11);
        assert_eq!(segment.points[0], [10.0, 10.0]);
        assert_eq!(canvas.state(), PointerState::HoveringCurve);
    }

    #[test]
    fn selection_snaps_to_tracking_curve() {
        let mut canvas = canvas();
        // start on the flat curve, points still come from the first curve
        double_click(&mut canvas, 30.0, -40.0, 0.0);
        assert_eq!(canvas.state(), PointerState::Dragging(DragKind::Select));
        canvas.pointer_moved(at(33.0, -40.0, 0.3));
        assert_eq!(
            canvas.active_selection(),
            vec![[30.0, 30.0], [31.0, 31.0], [32.0, 32.0], [33.0, 33.0]]
        );
    }

    #[test]
    fn moving_back_pops_points_but_not_past_the_start() {
        let mut canvas = canvas();
        double_click(&mut canvas, 10.0, 10.0, 0.0);
        canvas.pointer_moved(at(18.0, 18.0, 0.3));
        assert_eq!(canvas.active_selection().len(), 9);

        canvas.pointer_moved(at(14.0, 14.0, 0.3));
        let points = canvas.active_selection();
        assert_eq!(points.len(), 5);
        assert_eq!(points.last(), Some(&[14.0, 14.0]));

        canvas.pointer_moved(at(5.0, 5.0, 0.3));
        assert!(canvas.active_selection().is_empty());

        assert_eq!(
            canvas.pointer_released(at(5.0, 5.0, 0.4)),
            Some(CanvasEvent::SegmentDiscarded)
        );
        assert!(canvas.segments().is_empty());
    }

    #[test]
    fn single_click_on_segment_deletes_and_renumbers() {
        let mut canvas = canvas();
        select(&mut canvas, 10.0, 20.0, 0.0);
        select(&mut canvas, 30.0, 40.0, 2.0);
        select(&mut canvas, 50.0, 60.0, 4.0);
        assert_eq!(canvas.segments().len(), 3);

        canvas.pointer_pressed(at(35.0, 35.0, 6.0));
        canvas.pointer_released(at(35.0, 35.0, 6.05));
        assert!(canvas.is_click_pending());
        assert_eq!(canvas.tick(6.2), None);
        assert_eq!(canvas.tick(6.6), Some(CanvasEvent::SegmentDeleted(2)));

        let ids: Vec<(usize, usize)> = canvas
            .segments()
            .iter()
            .map(|segment| (segment.id, segment.start_index))
            .collect();
        assert_eq!(ids, vec![(1, 10), (2, 50)]);
    }

    #[test]
    fn single_click_away_from_segments_does_nothing() {
        let mut canvas = canvas();
        select(&mut canvas, 10.0, 20.0, 0.0);

        canvas.pointer_pressed(at(80.0, 80.0, 3.0));
        assert_eq!(canvas.tick(4.0), None);
        assert_eq!(canvas.segments().len(), 1);
    }

    #[test]
    fn double_click_off_curve_pans_within_limits() {
        let mut canvas = canvas();
        let start = canvas.view();
        canvas.view = start.zoomed(0.5, [50.0, 0.0], &canvas.default_view());
        let zoomed = canvas.view();

        double_click(&mut canvas, 50.0, 20.0, 0.0);
        assert_eq!(canvas.state(), PointerState::Dragging(DragKind::Pan));

        // drag 10 px left and 5 px up: view moves right and down
        canvas.pointer_moved(at(40.0, 25.0, 0.3));
        let panned = canvas.view();
        assert!((panned.x[0] - (zoomed.x[0] + 10.0)).abs() < 1e-9);
        assert!((panned.y[0] - (zoomed.y[0] - 5.0)).abs() < 1e-9);

        // far past the right edge is rejected
        canvas.pointer_moved(at(-200.0, 25.0, 0.4));
        assert_eq!(canvas.view(), panned);

        assert_eq!(canvas.pointer_released(at(-200.0, 25.0, 0.5)), None);
        assert!(canvas.segments().is_empty());
    }

    #[test]
    fn scroll_zooms_and_reset_restores_default() {
        let mut canvas = canvas();
        let default_view = canvas.default_view();

        canvas.scrolled(at(50.0, 0.0, 0.0), 50.0);
        assert!(canvas.view().width() < default_view.width());

        canvas.scrolled(at(50.0, 0.0, 0.0), -500.0);
        assert_eq!(canvas.view(), default_view);

        canvas.scrolled(at(50.0, 0.0, 0.0), 50.0);
        canvas.reset_view();
        assert_eq!(canvas.view(), default_view);
    }

    #[test]
    fn changing_curves_keeps_segments() {
        let mut canvas = canvas();
        select(&mut canvas, 10.0, 20.0, 0.0);

        let curves = canvas.curves()[..1].to_vec();
        canvas.set_curves(curves);
        assert_eq!(canvas.segments().len(), 1);

        canvas.clear_segments();
        assert!(canvas.segments().is_empty());

        canvas.reset();
        assert!(canvas.curves().is_empty());
    }
}
