use super::app::QcmdAnalyser;

impl QcmdAnalyser {
    pub fn keybinds(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            self.clear_selections();
        }

        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.reset_zoom();
        }

        if ctx.input(|i| i.key_pressed(egui::Key::F)) {
            self.fit_selected_data();
        }
    }

    pub fn keybinds_ui(ui: &mut egui::Ui) {
        ui.menu_button("Keybind Help", |ui| {
            ui.heading("Keybinds");
            ui.separator();
            ui.label("Selections");
            ui.label("Double click on a curve and drag right: Select data")
                .on_hover_text("Drag back to the left to shorten the selection");
            ui.label("Click on a selection: Delete it");
            ui.label("Delete: Clear all selections");
            ui.separator();
            ui.label("Fitting");
            ui.label("F: Fit Selected Data");
            ui.separator();
            ui.label("Plot");
            ui.label("Double click off the curves and drag: Pan");
            ui.label("Scroll: Zoom");
            ui.label("R: Reset Zoom");
            ui.label("Right click: Plot and line settings");
        });
    }
}
