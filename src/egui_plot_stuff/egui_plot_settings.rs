/// Display options for a channel plot. Pointer handling (selection, pan and
/// zoom) is done by the selection canvas, so egui_plot's own navigation is
/// switched off in [`EguiPlotSettings::apply_to_plot`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EguiPlotSettings {
    pub legend: bool,
    pub show_x_value: bool,
    pub show_y_value: bool,
    pub show_grid: bool,
    pub show_background: bool,
    pub show_fit_lines: bool,
    pub x_label: String,
    pub y_label: String,
}

impl Default for EguiPlotSettings {
    fn default() -> Self {
        Self {
            legend: true,
            show_x_value: true,
            show_y_value: true,
            show_grid: true,
            show_background: true,
            show_fit_lines: true,
            x_label: "Time".to_owned(),
            y_label: String::new(),
        }
    }
}

impl EguiPlotSettings {
    pub fn with_y_label(y_label: &str) -> Self {
        Self {
            y_label: y_label.to_owned(),
            ..Default::default()
        }
    }

    pub fn menu_button(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Plot Settings", |ui| {
            ui.vertical(|ui| {
                ui.checkbox(&mut self.legend, "Legend");
                ui.checkbox(&mut self.show_x_value, "Show X Value");
                ui.checkbox(&mut self.show_y_value, "Show Y Value");
                ui.checkbox(&mut self.show_grid, "Show Grid");
                ui.checkbox(&mut self.show_background, "Show Background");
                ui.checkbox(&mut self.show_fit_lines, "Show Fit Lines");
                ui.horizontal(|ui| {
                    ui.label("X Label");
                    ui.text_edit_singleline(&mut self.x_label);
                });
                ui.horizontal(|ui| {
                    ui.label("Y Label");
                    ui.text_edit_singleline(&mut self.y_label);
                });

                ui.separator();

                if ui.button("Reset").clicked() {
                    let y_label = std::mem::take(&mut self.y_label);
                    *self = Self::with_y_label(&y_label);
                }
            });
        });
    }

    pub fn apply_to_plot<'a>(&self, plot: egui_plot::Plot<'a>) -> egui_plot::Plot<'a> {
        let plot = plot
            .show_x(self.show_x_value)
            .show_y(self.show_y_value)
            .show_grid(self.show_grid)
            .show_background(self.show_background)
            .allow_zoom(false)
            .allow_boxed_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_double_click_reset(false)
            .auto_bounds(egui::Vec2b::new(false, false))
            .x_axis_label(self.x_label.clone())
            .y_axis_label(self.y_label.clone())
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("{:.3}, {:.3}", value.x, value.y)
                } else {
                    format!("{name}: {:.3}, {:.3}", value.x, value.y)
                }
            });

        if self.legend {
            plot.legend(egui_plot::Legend::default())
        } else {
            plot
        }
    }
}
