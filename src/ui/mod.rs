mod app;
mod harmonic_selection;
mod keybinds;
mod status_bar;

pub use app::{Preferences, QcmdAnalyser};
