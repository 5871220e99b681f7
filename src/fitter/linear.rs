use egui_plot::PlotUi;
use log::debug;

use super::stats::{LinearRegression, NormalTest, linregress, normaltest};
use crate::egui_plot_stuff::colors::FIT_LINE_COLOR;
use crate::egui_plot_stuff::egui_line::EguiLine;

#[derive(Debug, Clone)]
pub struct LinearFitter {
    x_data: Vec<f64>,
    y_data: Vec<f64>,
    pub fit_params: Option<LinearRegression>,
    pub normality: Option<NormalTest>,
    pub fit_line: EguiLine,
}

impl LinearFitter {
    /// Creates a new LinearFitter with the given data.
    pub fn new(name: &str, x_data: Vec<f64>, y_data: Vec<f64>) -> Self {
        let mut fit_line = EguiLine::new(FIT_LINE_COLOR);
        fit_line.name = format!("{name} Fit");
        fit_line.width = 1.5;
        fit_line.style = Some(egui_plot::LineStyle::Dashed { length: 8.0 });

        LinearFitter {
            x_data,
            y_data,
            fit_params: None,
            normality: None,
            fit_line,
        }
    }

    /// Performs simple linear regression and returns the slope and intercept.
    pub fn simple_linear_regression(x_data: &[f64], y_data: &[f64]) -> Option<(f64, f64)> {
        linregress(x_data, y_data).map(|fit| (fit.slope, fit.intercept))
    }

    /// Fits a line and tests the residuals for normality. Returns false when
    /// the data cannot be fitted.
    pub fn perform_linear_fit(&mut self) -> bool {
        let Some(params) = linregress(&self.x_data, &self.y_data) else {
            self.fit_params = None;
            self.normality = None;
            self.fit_line.clear_points();
            return false;
        };

        self.fit_params = Some(params);
        self.normality = normaltest(&self.residuals());
        self.compute_fit_line();

        debug!(
            "{}: slope {}, intercept {}, r {}",
            self.fit_line.name, params.slope, params.intercept, params.r_value
        );
        true
    }

    pub fn residuals(&self) -> Vec<f64> {
        match &self.fit_params {
            Some(params) => self
                .x_data
                .iter()
                .zip(&self.y_data)
                .map(|(&x, &y)| y - params.evaluate(x))
                .collect(),
            None => vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.x_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_data.is_empty()
    }

    /// Computes the fit line based on the fit parameters.
    fn compute_fit_line(&mut self) {
        self.fit_line.clear_points();
        if let Some(params) = &self.fit_params {
            let (x_min, x_max) = self
                .x_data
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
                    (min.min(x), max.max(x))
                });

            self.fit_line.add_point(x_min, params.evaluate(x_min));
            self.fit_line.add_point(x_max, params.evaluate(x_max));
        }
    }

    /// Draws the fit line on the given plot UI.
    pub fn draw(&self, plot_ui: &mut PlotUi<'_>) {
        self.fit_line.draw(plot_ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_linear_regression() {
        let x_data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y_data = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let (slope, intercept) = LinearFitter::simple_linear_regression(&x_data, &y_data).unwrap();
        assert!((slope - 0.6).abs() < 1e-6);
        assert!((intercept - 2.2).abs() < 1e-6);
    }

    #[test]
    fn test_perform_linear_fit() {
        let x_data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y_data = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let mut fitter = LinearFitter::new("F3 1", x_data, y_data);
        assert!(fitter.perform_linear_fit());

        let params = fitter.fit_params.unwrap();
        assert!((params.slope - 0.6).abs() < 1e-6);
        assert!((params.intercept - 2.2).abs() < 1e-6);

        // five points is too few for the normality test
        assert!(fitter.normality.is_none());

        assert_eq!(fitter.fit_line.points.len(), 2);
        assert!((fitter.fit_line.points[0][1] - 2.8).abs() < 1e-9);
        assert!((fitter.fit_line.points[1][1] - 5.2).abs() < 1e-9);
    }

    #[test]
    fn residuals_sum_to_zero() {
        let x_data: Vec<f64> = (0..12).map(f64::from).collect();
        let y_data: Vec<f64> = x_data
            .iter()
            .map(|x| 0.5 * x + if (*x as i32) % 3 == 0 { 0.4 } else { -0.2 })
            .collect();
        let mut fitter = LinearFitter::new("D5 2", x_data, y_data);
        assert!(fitter.perform_linear_fit());

        let residuals = fitter.residuals();
        assert_eq!(residuals.len(), 12);
        assert!(residuals.iter().sum::<f64>().abs() < 1e-9);
        assert!(fitter.normality.is_some());
    }

    #[test]
    fn unfittable_data_clears_previous_results() {
        let mut fitter = LinearFitter::new("F3 1", vec![1.0, 1.0, 1.0], vec![0.0, 1.0, 2.0]);
        assert!(!fitter.perform_linear_fit());
        assert!(fitter.fit_params.is_none());
        assert!(fitter.fit_line.points.is_empty());
    }
}
