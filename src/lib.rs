#![warn(clippy::all, rust_2018_idioms)]
//! QCM-D Analyser: plot frequency and dissipation curves from QCM-D sensor
//! exports, select segments with the mouse, fit straight lines to them and
//! export the fit statistics as CSV.

pub mod canvas;
pub mod egui_plot_stuff;
pub mod error;
pub mod fitter;
pub mod reader;
pub mod ui;

pub use ui::QcmdAnalyser;
