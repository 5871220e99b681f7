use egui_plot::PlotBounds;

/// Extra y room a pan may reach beyond the default view, in plot units.
pub const PAN_Y_MARGIN: f64 = 10.0;

/// Fraction of the data span added around the curves for the default view.
pub const DEFAULT_MARGIN: f64 = 0.05;

/// Zoom per scroll point, used as `exp(-delta * ZOOM_SPEED / 15)`.
pub const ZOOM_SPEED: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            x: [0.0, 1.0],
            y: [0.0, 1.0],
        }
    }
}

impl ViewBounds {
    /// Bounds covering every point with a small margin. Flat or empty data
    /// gets a unit span so the plot never collapses.
    pub fn around(points: impl IntoIterator<Item = [f64; 2]>) -> Self {
        let mut x = [f64::INFINITY, f64::NEG_INFINITY];
        let mut y = [f64::INFINITY, f64::NEG_INFINITY];

        for [px, py] in points {
            if !px.is_finite() || !py.is_finite() {
                continue;
            }
            x = [x[0].min(px), x[1].max(px)];
            y = [y[0].min(py), y[1].max(py)];
        }

        Self {
            x: padded(x),
            y: padded(y),
        }
    }

    pub fn width(&self) -> f64 {
        self.x[1] - self.x[0]
    }

    pub fn height(&self) -> f64 {
        self.y[1] - self.y[0]
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: [self.x[0] + dx, self.x[1] + dx],
            y: [self.y[0] + dy, self.y[1] + dy],
        }
    }

    /// Whether a panned view stays inside `limits`, with the y margin.
    pub fn fits_pan_limits(&self, limits: &Self) -> bool {
        self.x[0] >= limits.x[0]
            && self.x[1] <= limits.x[1]
            && self.y[0] >= limits.y[0] - PAN_Y_MARGIN
            && self.y[1] <= limits.y[1] + PAN_Y_MARGIN
    }

    /// Scales both axes by `factor` around `center`, then clamps to `limits`.
    /// A factor below 1 zooms in.
    pub fn zoomed(&self, factor: f64, center: [f64; 2], limits: &Self) -> Self {
        let scale = |range: [f64; 2], c: f64| [c + (range[0] - c) * factor, c + (range[1] - c) * factor];
        Self {
            x: scale(self.x, center[0]),
            y: scale(self.y, center[1]),
        }
        .clamped(limits)
    }

    /// Keeps each axis inside `limits`. A range wider than the limit is
    /// replaced by the limit.
    pub fn clamped(&self, limits: &Self) -> Self {
        Self {
            x: clamp_range(self.x, limits.x),
            y: clamp_range(self.y, limits.y),
        }
    }

    pub fn contains(&self, point: [f64; 2]) -> bool {
        (self.x[0]..=self.x[1]).contains(&point[0]) && (self.y[0]..=self.y[1]).contains(&point[1])
    }

    pub fn to_plot_bounds(self) -> PlotBounds {
        PlotBounds::from_min_max([self.x[0], self.y[0]], [self.x[1], self.y[1]])
    }
}

fn padded(range: [f64; 2]) -> [f64; 2] {
    if !range[0].is_finite() || !range[1].is_finite() {
        return [0.0, 1.0];
    }
    let span = range[1] - range[0];
    if span <= 0.0 {
        return [range[0] - 0.5, range[1] + 0.5];
    }
    [range[0] - span * DEFAULT_MARGIN, range[1] + span * DEFAULT_MARGIN]
}

fn clamp_range(range: [f64; 2], limit: [f64; 2]) -> [f64; 2] {
    let span = range[1] - range[0];
    if span >= limit[1] - limit[0] {
        return limit;
    }
    if range[0] < limit[0] {
        [limit[0], limit[0] + span]
    } else if range[1] > limit[1] {
        [limit[1] - span, limit[1]]
    } else {
        range
    }
}
