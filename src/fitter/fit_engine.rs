use egui_extras::{Column, TableBuilder};
use egui_plot::PlotUi;
use log::{info, warn};

use super::linear::LinearFitter;
use super::stats::round_to;
use crate::canvas::selection::SelectionSegment;
use crate::reader::{Channel, Harmonic, SensorReading};

pub const FIT_TABLE_HEADER: [&str; 7] = [
    "ID",
    "Slope",
    "Intercept",
    "R value",
    "P value",
    "K2",
    "P val Error",
];

/// One row of the fit table, rounded to three decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// e.g. `F5 2`: harmonic label then segment id.
    pub label: String,
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    pub k2: Option<f64>,
    pub p_normal: Option<f64>,
}

impl FitResult {
    pub fn row(&self) -> Vec<String> {
        let optional = |value: Option<f64>| value.map_or_else(|| "-".to_owned(), |v| v.to_string());

        vec![
            self.label.clone(),
            self.slope.to_string(),
            self.intercept.to_string(),
            self.r_value.to_string(),
            self.p_value.to_string(),
            optional(self.k2),
            optional(self.p_normal),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct SegmentFit {
    pub result: FitResult,
    pub fitter: LinearFitter,
}

/// Sample range of `reading` covered by `segment`, inclusive.
fn segment_range(reading: &SensorReading, segment: &SelectionSegment) -> Option<(usize, usize)> {
    let (x_start, x_end) = segment.x_range()?;
    let a = reading.nearest_index(x_start)?;
    let b = reading.nearest_index(x_end)?;
    Some((a.min(b), a.max(b)))
}

/// Fits every (segment, harmonic) pair on `channel`. Rows come out in
/// segment id order, harmonics F3..F13 within each segment.
pub fn fit_segments(
    reading: &SensorReading,
    channel: Channel,
    segments: &[SelectionSegment],
    harmonics: &[Harmonic],
) -> Vec<SegmentFit> {
    let mut ordered: Vec<&SelectionSegment> = segments.iter().collect();
    ordered.sort_by_key(|segment| segment.id);

    let enabled: Vec<Harmonic> = Harmonic::ALL
        .into_iter()
        .filter(|harmonic| harmonics.contains(harmonic))
        .collect();

    let mut fits = Vec::new();
    for segment in ordered {
        let Some((start, end)) = segment_range(reading, segment) else {
            warn!("Selection {} has no samples, skipping", segment.id);
            continue;
        };
        let x = &reading.time[start..=end];

        for &harmonic in &enabled {
            let label = format!("{} {}", harmonic.label(channel), segment.id);
            let y = &reading.harmonic(channel, harmonic)[start..=end];

            let mut fitter = LinearFitter::new(&label, x.to_vec(), y.to_vec());
            if !fitter.perform_linear_fit() {
                warn!(
                    "{label}: {} samples cannot be fitted, skipping",
                    fitter.len()
                );
                continue;
            }
            let Some(params) = fitter.fit_params else {
                continue;
            };

            let result = FitResult {
                label,
                slope: round_to(params.slope, 3),
                intercept: round_to(params.intercept, 3),
                r_value: round_to(params.r_value, 3),
                p_value: round_to(params.p_value, 3),
                k2: fitter.normality.map(|test| round_to(test.statistic, 3)),
                p_normal: fitter.normality.map(|test| round_to(test.p_value, 3)),
            };
            fits.push(SegmentFit { result, fitter });
        }
    }

    fits
}

/// Fit results shown under one channel's plot.
#[derive(Debug, Clone)]
pub struct FitTable {
    pub channel: Channel,
    pub fits: Vec<SegmentFit>,
}

impl FitTable {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            fits: Vec::new(),
        }
    }

    /// Replaces any previous results.
    pub fn fit(
        &mut self,
        reading: &SensorReading,
        segments: &[SelectionSegment],
        harmonics: &[Harmonic],
    ) {
        self.fits = fit_segments(reading, self.channel, segments, harmonics);
        info!(
            "{} fit: {} results from {} selections",
            self.channel.name(),
            self.fits.len(),
            segments.len()
        );
    }

    pub fn clear(&mut self) {
        self.fits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }

    pub fn results(&self) -> impl Iterator<Item = &FitResult> {
        self.fits.iter().map(|fit| &fit.result)
    }

    pub fn draw(&self, plot_ui: &mut PlotUi<'_>) {
        for fit in &self.fits {
            fit.fitter.draw(plot_ui);
        }
    }

    pub fn table_ui(&self, ui: &mut egui::Ui) {
        if self.fits.is_empty() {
            ui.label("No fits yet. Select data on the plot and press Fit Selected Data.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt(format!("{}_fit_scroll", self.channel.name()))
            .show(ui, |ui| {
                TableBuilder::new(ui)
                    .id_salt(format!("{}_fit_table", self.channel.name()))
                    .columns(Column::auto().at_least(60.0), FIT_TABLE_HEADER.len() - 1)
                    .column(Column::remainder())
                    .striped(true)
                    .vscroll(false)
                    .header(20.0, |mut header| {
                        for title in FIT_TABLE_HEADER {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|mut body| {
                        for fit in &self.fits {
                            body.row(18.0, |mut row| {
                                for cell in fit.result.row() {
                                    row.col(|ui| {
                                        ui.label(cell);
                                    });
                                }
                            });
                        }
                    });
            });
    }
}
