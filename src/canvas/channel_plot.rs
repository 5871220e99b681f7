use std::time::Duration;

use egui_plot::PlotResponse;

use super::gesture::PointerSample;
use super::selection_canvas::{CanvasEvent, Curve, DragKind, PointerState, SelectionCanvas};
use crate::egui_plot_stuff::colors::{SEGMENT_COLOR, harmonic_color};
use crate::egui_plot_stuff::egui_line::EguiLine;
use crate::egui_plot_stuff::egui_plot_settings::EguiPlotSettings;
use crate::fitter::FitTable;
use crate::reader::{Channel, Harmonic, SensorReading};

/// One tab of the window: the curves of a channel, the selections drawn on
/// them and the fit lines from the last fit.
#[derive(Debug, Clone)]
pub struct ChannelPlot {
    pub channel: Channel,
    pub canvas: SelectionCanvas,
    pub settings: EguiPlotSettings,
    lines: Vec<EguiLine>,
}

impl ChannelPlot {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            canvas: SelectionCanvas::new(),
            settings: EguiPlotSettings::with_y_label(channel.axis_label()),
            lines: Vec::new(),
        }
    }

    /// Plots `harmonics` of `reading`, keeping existing selections.
    pub fn set_reading(&mut self, reading: &SensorReading, harmonics: &[Harmonic]) {
        let curves: Vec<Curve> = Harmonic::ALL
            .into_iter()
            .filter(|harmonic| harmonics.contains(harmonic))
            .map(|harmonic| Curve {
                harmonic,
                label: harmonic.label(self.channel),
                points: reading
                    .time
                    .iter()
                    .zip(reading.harmonic(self.channel, harmonic))
                    .map(|(&t, &v)| [t, v])
                    .collect(),
            })
            .collect();

        self.lines = curves
            .iter()
            .map(|curve| {
                let mut line =
                    EguiLine::new_with_points(&curve.label, harmonic_color(curve.harmonic), curve.points.clone());
                line.name_in_legend = true;
                line.width = 1.5;
                line
            })
            .collect();

        self.canvas.set_curves(curves);
    }

    /// Starts over with a newly loaded reading.
    pub fn load_reading(&mut self, reading: &SensorReading, harmonics: &[Harmonic]) {
        self.canvas.reset();
        self.set_reading(reading, harmonics);
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, fits: &FitTable) -> Vec<CanvasEvent> {
        let plot = egui_plot::Plot::new(format!("{}_plot", self.channel.name()));
        let plot = self.settings.apply_to_plot(plot);

        let bounds = self.canvas.view().to_plot_bounds();
        let active = self.canvas.active_selection();
        let show_fit_lines = self.settings.show_fit_lines;

        let plot_response = plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(bounds);

            for line in &self.lines {
                line.draw(plot_ui);
            }

            self.canvas.segments().draw(plot_ui);

            if !active.is_empty() {
                let mut line = EguiLine::new_with_points("Selection", SEGMENT_COLOR, active);
                line.width = 6.0;
                line.alpha = 0.7;
                line.draw(plot_ui);
            }

            if show_fit_lines {
                fits.draw(plot_ui);
            }
        });

        let events = self.interactive(ui, &plot_response);

        plot_response.response.context_menu(|ui| {
            self.settings.menu_button(ui);
            ui.separator();
            for line in &mut self.lines {
                line.menu_button(ui);
            }
        });

        events
    }

    /// Feeds this frame's pointer input to the canvas.
    fn interactive(&mut self, ui: &egui::Ui, plot_response: &PlotResponse<()>) -> Vec<CanvasEvent> {
        let mut events = Vec::new();

        let pointer_state = plot_response.response.ctx.input(|i| i.pointer.clone());
        let (time, scroll) = ui.input(|i| {
            let scroll = i.events.iter().find_map(|e| match e {
                egui::Event::MouseWheel { delta, .. } => Some(delta.y),
                _ => None,
            });
            (i.time, scroll)
        });

        let hovered = plot_response.response.hovered();
        let dragging = matches!(self.canvas.state(), PointerState::Dragging(_));

        if let Some(pointer_pos) = pointer_state.hover_pos()
            && (hovered || dragging)
        {
            let transform = &plot_response.transform;
            let value = transform.value_from_position(pointer_pos);
            let frame = transform.frame();
            let bounds = transform.bounds();

            let sample = PointerSample {
                plot: [value.x, value.y],
                screen: [pointer_pos.x, pointer_pos.y],
                units_per_pixel: [
                    bounds.width() / f64::from(frame.width()),
                    bounds.height() / f64::from(frame.height()),
                ],
                time,
            };

            if hovered && pointer_state.button_pressed(egui::PointerButton::Primary) {
                self.canvas.pointer_pressed(sample);
            }

            self.canvas.pointer_moved(sample);

            if pointer_state.button_released(egui::PointerButton::Primary) {
                events.extend(self.canvas.pointer_released(sample));
            }

            if hovered && let Some(delta) = scroll {
                self.canvas.scrolled(sample, delta);
            }
        } else if dragging && pointer_state.button_released(egui::PointerButton::Primary) {
            // released outside the window, keep whatever was selected so far
            if let Some(pos) = pointer_state.latest_pos() {
                let value = plot_response.transform.value_from_position(pos);
                let sample = PointerSample {
                    plot: [value.x, value.y],
                    screen: [pos.x, pos.y],
                    units_per_pixel: [0.0, 0.0],
                    time,
                };
                events.extend(self.canvas.pointer_released(sample));
            }
        }

        if !hovered {
            self.canvas.pointer_left();
        }

        events.extend(self.canvas.tick(time));

        if self.canvas.is_click_pending() {
            ui.ctx().request_repaint_after(Duration::from_millis(100));
        }

        match self.canvas.state() {
            PointerState::HoveringCurve | PointerState::Dragging(DragKind::Select) => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Text);
            }
            PointerState::Dragging(DragKind::Pan) => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            }
            PointerState::Idle => {}
        }

        events
    }
}
