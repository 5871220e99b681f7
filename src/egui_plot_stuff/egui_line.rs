use egui::{Color32, Slider, Ui};
use egui_plot::{Line, LineStyle, PlotPoint, PlotPoints, PlotUi};

use crate::egui_plot_stuff::colors::COLOR_OPTIONS;

#[derive(Debug, Clone)]
pub struct EguiLine {
    pub draw: bool,
    pub name_in_legend: bool,
    pub name: String,
    pub highlighted: bool,
    pub width: f32,
    pub color: Color32,
    /// Fraction of full opacity, the selection overlay is drawn translucent.
    pub alpha: f32,
    pub style: Option<LineStyle>,

    pub style_length: f32,
    pub points: Vec<[f64; 2]>,
}

impl Default for EguiLine {
    fn default() -> Self {
        EguiLine {
            draw: true,
            name_in_legend: false,
            name: "Line".to_owned(),
            highlighted: false,
            width: 2.0,
            color: Color32::LIGHT_BLUE,
            alpha: 1.0,
            style: Some(LineStyle::Solid),
            style_length: 15.0,
            points: vec![],
        }
    }
}

impl EguiLine {
    pub fn new(color: Color32) -> Self {
        let line = EguiLine::default();
        EguiLine {
            color,
            ..line
        }
    }

    pub fn new_with_points(name: &str, color: Color32, points: Vec<[f64; 2]>) -> Self {
        EguiLine {
            name: name.to_owned(),
            points,
            ..EguiLine::new(color)
        }
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points.push([x, y]);
    }

    fn display_color(&self) -> Color32 {
        if self.alpha >= 1.0 {
            self.color
        } else {
            let alpha = (255.0 * self.alpha.clamp(0.0, 1.0)) as u8;
            Color32::from_rgba_unmultiplied(self.color.r(), self.color.g(), self.color.b(), alpha)
        }
    }

    pub fn draw(&self, plot_ui: &mut PlotUi<'_>) {
        if !self.draw || self.points.is_empty() {
            return;
        }

        let plot_points: Vec<PlotPoint> = self
            .points
            .iter()
            .map(|&[x, y]| PlotPoint::new(x, y))
            .collect();

        let name = if self.name_in_legend {
            self.name.clone()
        } else {
            String::new()
        };

        let mut line = Line::new(name, PlotPoints::Owned(plot_points))
            .highlight(self.highlighted)
            .width(self.width)
            .color(self.display_color());

        if let Some(style) = self.style {
            line = line.style(style);
        }

        plot_ui.line(line);
    }

    /// Context menu entry for one curve of a channel plot.
    pub fn menu_button(&mut self, ui: &mut Ui) {
        ui.menu_button(self.name.clone(), |ui| {
            ui.checkbox(&mut self.draw, "Draw");
            ui.checkbox(&mut self.name_in_legend, "Show in Legend");
            ui.add(Slider::new(&mut self.width, 0.5..=8.0).text("Width"));
            ui.add(Slider::new(&mut self.alpha, 0.1..=1.0).text("Opacity"));

            let mut dashed = matches!(self.style, Some(LineStyle::Dashed { .. }));
            if ui.checkbox(&mut dashed, "Dashed").changed() {
                self.style = Some(if dashed {
                    LineStyle::Dashed {
                        length: self.style_length,
                    }
                } else {
                    LineStyle::Solid
                });
            }

            ui.separator();
            self.color_selection_buttons(ui);

            ui.separator();
            if ui.button("Copy Points").clicked() {
                let text = self
                    .points
                    .iter()
                    .map(|[x, y]| format!("{x}\t{y}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                ui.ctx().copy_text(text);
            }
        });
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    fn color_selection_buttons(&mut self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            for &(color, name) in COLOR_OPTIONS {
                let selected = self.color == color;
                let button = egui::Button::new(if selected { "•" } else { " " }).fill(color);
                if ui.add(button).on_hover_text(name).clicked() {
                    self.set_color(color);
                }
            }
        });
    }
}
