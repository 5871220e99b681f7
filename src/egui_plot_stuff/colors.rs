use egui::Color32;

use crate::reader::Harmonic;

pub const COLOR_OPTIONS: &[(Color32, &str)] = &[
    (Color32::BLACK, "Black"),
    (Color32::DARK_GRAY, "Dark Gray"),
    (Color32::GRAY, "Gray"),
    (Color32::BROWN, "Brown"),
    (Color32::DARK_RED, "Dark Red"),
    (Color32::RED, "Red"),
    (Color32::LIGHT_RED, "Light Red"),
    (Color32::YELLOW, "Yellow"),
    (Color32::KHAKI, "Khaki"),
    (Color32::DARK_GREEN, "Dark Green"),
    (Color32::GREEN, "Green"),
    (Color32::LIGHT_GREEN, "Light Green"),
    (Color32::DARK_BLUE, "Dark Blue"),
    (Color32::BLUE, "Blue"),
    (Color32::LIGHT_BLUE, "Light Blue"),
];

/// matplotlib's default cycle, so F3..F13 keep the colours users know.
const HARMONIC_COLORS: [Color32; 6] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
];

pub const SEGMENT_COLOR: Color32 = Color32::RED;
pub const FIT_LINE_COLOR: Color32 = Color32::BLACK;

pub fn harmonic_color(harmonic: Harmonic) -> Color32 {
    HARMONIC_COLORS[harmonic.index()]
}
