use std::path::{Path, PathBuf};

use crate::canvas::{CanvasEvent, ChannelPlot};
use crate::egui_plot_stuff::egui_plot_settings::EguiPlotSettings;
use crate::error::QcmdError;
use crate::fitter::{FitTable, export_fit_tables};
use crate::reader::{Channel, FileFormat, QcmdData, SensorReading, read_file};

use super::harmonic_selection::HarmonicSelection;
use super::status_bar::StatusBar;

/// What survives a restart. Loaded data and selections do not.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Preferences {
    pub plot_harmonics: HarmonicSelection,
    pub fit_harmonics: HarmonicSelection,
    pub plot_settings: [EguiPlotSettings; 2],
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            plot_harmonics: HarmonicSelection::new("Plot Harmonic"),
            fit_harmonics: HarmonicSelection::new("Fit Harmonics"),
            plot_settings: Channel::ALL
                .map(|channel| EguiPlotSettings::with_y_label(channel.axis_label())),
        }
    }
}

pub struct QcmdAnalyser {
    data: Option<QcmdData>,
    file_path: Option<PathBuf>,
    sensor: usize,
    active_tab: Channel,
    plots: [ChannelPlot; 2],
    fits: [FitTable; 2],
    plot_harmonics: HarmonicSelection,
    fit_harmonics: HarmonicSelection,
    status: StatusBar,
    show_about: bool,
}

impl Default for QcmdAnalyser {
    fn default() -> Self {
        let mut app = Self {
            data: None,
            file_path: None,
            sensor: 0,
            active_tab: Channel::Frequency,
            plots: Channel::ALL.map(ChannelPlot::new),
            fits: Channel::ALL.map(FitTable::new),
            plot_harmonics: HarmonicSelection::new(""),
            fit_harmonics: HarmonicSelection::new(""),
            status: StatusBar::new("Welcome to QCMD Data Analyser"),
            show_about: false,
        };
        app.apply_preferences(Preferences::default());
        app
    }
}

impl QcmdAnalyser {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self::default();
        if let Some(storage) = cc.storage
            && let Some(preferences) = eframe::get_value::<Preferences>(storage, eframe::APP_KEY)
        {
            app.apply_preferences(preferences);
        }
        app
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            plot_harmonics: self.plot_harmonics.clone(),
            fit_harmonics: self.fit_harmonics.clone(),
            plot_settings: [
                self.plots[0].settings.clone(),
                self.plots[1].settings.clone(),
            ],
        }
    }

    pub fn apply_preferences(&mut self, preferences: Preferences) {
        let Preferences {
            plot_harmonics,
            fit_harmonics,
            plot_settings,
        } = preferences;

        self.plot_harmonics = plot_harmonics;
        self.fit_harmonics = fit_harmonics;
        for (plot, settings) in self.plots.iter_mut().zip(plot_settings) {
            plot.settings = settings;
        }
    }

    /// `None` picks the format from the file extension.
    fn open_file_dialog(&mut self, format: Option<FileFormat>) {
        let dialog = rfd::FileDialog::new()
            .add_filter("QCM-D data", &["csv", "txt", "tsv", "dat"])
            .add_filter("All files", &["*"]);

        if let Some(path) = dialog.pick_file() {
            let format = format.unwrap_or_else(|| FileFormat::from_path(&path));
            self.load_file(&path, format);
        }
    }

    pub fn load_file(&mut self, path: &Path, format: FileFormat) {
        match read_file(path, format) {
            Ok(data) => {
                let message = format!(
                    "Loaded {}: {} sensor(s), {} samples",
                    path.display(),
                    data.num_sensors,
                    data.sensor(0).map_or(0, SensorReading::len)
                );
                log::info!("{message}");
                self.status.show(message);

                self.data = Some(data);
                self.file_path = Some(path.to_path_buf());
                self.select_sensor(0);
            }
            Err(err) => {
                log::error!("Failed to read {}: {err}", path.display());
                if err.is_not_found() {
                    self.status.show("File not found");
                } else {
                    self.status.show(format!("Failed to open file: {err}"));
                }
            }
        }
    }

    /// Shows another sensor of the loaded file. Selections and fits belong
    /// to the previous sensor's curves, so they are dropped.
    fn select_sensor(&mut self, sensor: usize) {
        self.sensor = sensor;
        for fits in &mut self.fits {
            fits.clear();
        }

        let harmonics = self.plot_harmonics.enabled();
        if let Some(reading) = self.data.as_ref().and_then(|data| data.sensor(sensor)) {
            for plot in &mut self.plots {
                plot.load_reading(reading, &harmonics);
            }
        }
    }

    fn replot_harmonics(&mut self) {
        let harmonics = self.plot_harmonics.enabled();
        if let Some(reading) = self.data.as_ref().and_then(|data| data.sensor(self.sensor)) {
            for plot in &mut self.plots {
                plot.set_reading(reading, &harmonics);
            }
        }
    }

    pub fn fit_selected_data(&mut self) {
        let Some(reading) = self.data.as_ref().and_then(|data| data.sensor(self.sensor)) else {
            self.status.show("Open a file before fitting");
            return;
        };

        let harmonics = self.fit_harmonics.enabled();
        if harmonics.is_empty() {
            self.status.show("Check at least one fit harmonic");
            return;
        }

        for (plot, fits) in self.plots.iter().zip(self.fits.iter_mut()) {
            fits.fit(reading, plot.canvas.segments().as_slice(), &harmonics);
        }

        let count: usize = self.fits.iter().map(|fits| fits.fits.len()).sum();
        if count == 0 {
            self.status.show("No selections to fit");
        } else {
            self.status.show(format!("Fitted {count} selection(s)"));
        }
    }

    pub fn reset_zoom(&mut self) {
        for plot in &mut self.plots {
            plot.canvas.reset_view();
        }
    }

    pub fn clear_selections(&mut self) {
        for plot in &mut self.plots {
            plot.canvas.clear_segments();
        }
        self.status.show("Selections cleared");
    }

    fn export_csv(&mut self) {
        let [frequency, dissipation] = &self.fits;
        if frequency.is_empty() && dissipation.is_empty() {
            self.report_export_error(&QcmdError::NoFitResults);
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name("fit_results.csv")
            .save_file()
        else {
            return;
        };

        match export_fit_tables(&path, frequency, dissipation) {
            Ok(()) => self.status.show("File Saved!"),
            Err(err) => self.report_export_error(&err),
        }
    }

    fn report_export_error(&mut self, err: &QcmdError) {
        log::error!("Export failed: {err}");
        if err.is_not_found() {
            self.status.show("File not found");
        } else {
            self.status.show(err.to_string());
        }
    }

    fn handle_canvas_events(&mut self, channel: Channel, events: Vec<CanvasEvent>) {
        for event in events {
            match event {
                CanvasEvent::SegmentCommitted(id) => {
                    self.status.show(format!("{} selection {id} added", channel.name()));
                }
                CanvasEvent::SegmentDeleted(id) => {
                    self.status.show(format!("{} selection {id} deleted", channel.name()));
                }
                CanvasEvent::SegmentDiscarded => {}
            }
        }
    }

    fn menu_ui(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("File", |ui| {
            if ui.button("Open...").clicked() {
                self.open_file_dialog(None);
            }
            if ui.button("Open Multi-Sensor (tab)...").clicked() {
                self.open_file_dialog(Some(FileFormat::MultiSensorTab));
            }
            if ui.button("Open Single-Sensor (comma)...").clicked() {
                self.open_file_dialog(Some(FileFormat::SingleSensorComma));
            }

            ui.separator();

            if ui.button("Export CSV...").clicked() {
                self.export_csv();
            }

            ui.separator();

            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Help", |ui| {
            Self::keybinds_ui(ui);
            if ui.button("About").clicked() {
                self.show_about = true;
            }
        });
    }

    fn side_panel_ui(&mut self, ui: &mut egui::Ui) {
        if let Some(path) = &self.file_path {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
            ui.label(format!("File: {name}"));
        } else {
            ui.label("No file loaded");
        }

        let num_sensors = self.data.as_ref().map_or(0, |data| data.num_sensors);
        if num_sensors > 1 {
            let mut sensor = self.sensor;
            egui::ComboBox::from_label("Sensor")
                .selected_text(format!("Sensor {}", sensor + 1))
                .show_ui(ui, |ui| {
                    for index in 0..num_sensors {
                        ui.selectable_value(&mut sensor, index, format!("Sensor {}", index + 1));
                    }
                });
            if sensor != self.sensor {
                self.select_sensor(sensor);
            }
        }

        ui.separator();

        if self.plot_harmonics.ui(ui) {
            self.replot_harmonics();
        }

        ui.separator();

        self.fit_harmonics.ui(ui);

        ui.separator();

        ui.vertical_centered_justified(|ui| {
            if ui.button("Fit Selected Data").clicked() {
                self.fit_selected_data();
            }
            if ui.button("Reset Zoom").clicked() {
                self.reset_zoom();
            }
            if ui.button("Clear Selections").clicked() {
                self.clear_selections();
            }
            if ui.button("Export CSV").clicked() {
                self.export_csv();
            }
        });
    }

    fn central_panel_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for channel in Channel::ALL {
                ui.selectable_value(&mut self.active_tab, channel, channel.name());
            }
        });

        ui.separator();

        let index = self.active_tab.index();

        egui::TopBottomPanel::bottom("qcmd_fit_table_panel")
            .resizable(true)
            .default_height(180.0)
            .show_inside(ui, |ui| {
                self.fits[index].table_ui(ui);
            });

        if self.data.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label("Open a QCM-D file from the File menu");
            });
            return;
        }

        let events = self.plots[index].ui(ui, &self.fits[index]);
        self.handle_canvas_events(self.active_tab, events);
    }
}

impl eframe::App for QcmdAnalyser {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.preferences());
    }

    // Required by eframe 0.34; the UI is drawn in `update`, which eframe still calls.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.keybinds(ctx);

        egui::TopBottomPanel::top("qcmd_top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                egui::global_theme_preference_switch(ui);

                ui.heading("QCM-D Analyser");

                ui.separator();

                self.menu_ui(ui);
            });
        });

        egui::TopBottomPanel::bottom("qcmd_status_bar").show(ctx, |ui| {
            self.status.ui(ui);
        });

        egui::SidePanel::left("qcmd_side_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                self.side_panel_ui(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.central_panel_ui(ui);
        });

        egui::Window::new("About")
            .open(&mut self.show_about)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("QCM-D Analyser");
                ui.label("Select segments of frequency and dissipation curves, fit straight lines and export the statistics.");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
            });
    }
}
