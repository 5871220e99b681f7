use egui_plot::PlotUi;

use crate::egui_plot_stuff::colors::SEGMENT_COLOR;
use crate::egui_plot_stuff::egui_line::EguiLine;

/// A run of curve samples picked with one drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSegment {
    /// Display number, always `1..=n` in list order.
    pub id: usize,
    pub points: Vec<[f64; 2]>,
    /// Sample indices of the first and last point.
    pub start_index: usize,
    pub end_index: usize,
}

impl SelectionSegment {
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first[0], last[0]))
    }

    pub fn contains(&self, point: [f64; 2], tolerance: [f64; 2]) -> bool {
        near_polyline(&self.points, point, tolerance)
    }

    pub fn line(&self) -> EguiLine {
        let mut line = EguiLine::new_with_points(
            &format!("Selection {}", self.id),
            SEGMENT_COLOR,
            self.points.clone(),
        );
        line.width = 6.0;
        line.alpha = 0.7;
        line
    }

    pub fn draw(&self, plot_ui: &mut PlotUi<'_>) {
        self.line().draw(plot_ui);

        if let Some(&[x, y]) = self.points.first() {
            let label = egui_plot::Text::new(
                format!("selection_label_{}", self.id),
                egui_plot::PlotPoint::new(x, y),
                self.id.to_string(),
            )
            .anchor(egui::Align2::RIGHT_BOTTOM);
            plot_ui.text(label);
        }
    }
}

/// True when `point` is within `tolerance` (plot units per axis) of one of
/// `points` or of the straight line between two neighbours.
pub fn near_polyline(points: &[[f64; 2]], point: [f64; 2], tolerance: [f64; 2]) -> bool {
    let near = |p: &[f64; 2]| {
        (p[0] - point[0]).abs() <= tolerance[0] && (p[1] - point[1]).abs() <= tolerance[1]
    };

    if points.iter().any(near) {
        return true;
    }

    points.windows(2).any(|pair| {
        let ([x0, y0], [x1, y1]) = (pair[0], pair[1]);
        if point[0] < x0.min(x1) || point[0] > x0.max(x1) || x1 == x0 {
            return false;
        }
        let y = y0 + (y1 - y0) * (point[0] - x0) / (x1 - x0);
        (y - point[1]).abs() <= tolerance[1]
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segments {
    segments: Vec<SelectionSegment>,
}

impl Segments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectionSegment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[SelectionSegment] {
        &self.segments
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Adds a segment and returns its display id. Empty point lists are
    /// discarded.
    pub fn commit(
        &mut self,
        points: Vec<[f64; 2]>,
        start_index: usize,
        end_index: usize,
    ) -> Option<usize> {
        if points.is_empty() {
            return None;
        }
        let id = self.segments.len() + 1;
        self.segments.push(SelectionSegment {
            id,
            points,
            start_index,
            end_index,
        });
        Some(id)
    }

    /// Removes the segment with display id `id`, renumbering the rest.
    pub fn remove(&mut self, id: usize) -> Option<SelectionSegment> {
        let index = self.segments.iter().position(|segment| segment.id == id)?;
        let removed = self.segments.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Id of the most recently drawn segment under `point`.
    pub fn hit_test(&self, point: [f64; 2], tolerance: [f64; 2]) -> Option<usize> {
        self.segments
            .iter()
            .rev()
            .find(|segment| segment.contains(point, tolerance))
            .map(|segment| segment.id)
    }

    fn renumber(&mut self) {
        for (index, segment) in self.segments.iter_mut().enumerate() {
            segment.id = index + 1;
        }
    }

    pub fn draw(&self, plot_ui: &mut PlotUi<'_>) {
        for segment in &self.segments {
            segment.draw(plot_ui);
        }
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a SelectionSegment;
    type IntoIter = std::slice::Iter<'a, SelectionSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_segments() -> Segments {
        let mut segments = Segments::new();
        segments.commit(vec![[0.0, 0.0], [1.0, 1.0]], 0, 1);
        segments.commit(vec![[2.0, 2.0], [3.0, 3.0]], 2, 3);
        segments.commit(vec![[4.0, 4.0], [5.0, 5.0]], 4, 5);
        segments
    }

    #[test]
    fn commit_assigns_sequential_ids() {
        let mut segments = three_segments();
        assert_eq!(segments.len(), 3);
        let ids: Vec<usize> = segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(segments.commit(vec![], 0, 0), None);
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn remove_renumbers_remaining_segments() {
        let mut segments = three_segments();
        let removed = segments.remove(2).unwrap();
        assert_eq!(removed.start_index, 2);

        let ids: Vec<usize> = segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(segments.as_slice()[1].start_index, 4);

        assert!(segments.remove(7).is_none());
        assert_eq!(segments.commit(vec![[9.0, 9.0]], 9, 9), Some(3));
    }

    #[test]
    fn hit_test_checks_points_and_spans() {
        let segments = three_segments();
        let tolerance = [0.1, 0.1];

        assert_eq!(segments.hit_test([2.0, 2.05], tolerance), Some(2));
        // between the two points of the third segment
        assert_eq!(segments.hit_test([4.5, 4.52], tolerance), Some(3));
        assert_eq!(segments.hit_test([1.5, 1.5], tolerance), None);
        assert_eq!(segments.hit_test([4.5, 3.0], tolerance), None);
    }

    #[test]
    fn x_range_spans_first_to_last_point() {
        let segments = three_segments();
        assert_eq!(segments.as_slice()[0].x_range(), Some((0.0, 1.0)));
    }
}
