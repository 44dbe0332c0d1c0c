// ui.rs - Window with the control panel on the left and the grid on the right

use std::sync::Arc;

use conway::{Controls, Frame, Grid, Simulation, Speed};
use eframe::egui;
use egui::{Color32, Rect, Vec2};
use tokio::runtime::Runtime;
use tracing::error;

pub struct LifeApp {
    // Dropped before the runtime so the task is told to stop first
    simulation: Option<Simulation>,
    controls: Arc<Controls>,
    _runtime: Runtime,
    live_color: Color32,
    dead_color: Color32,
}

impl LifeApp {
    pub fn new(runtime: Runtime, simulation: Simulation, controls: Arc<Controls>) -> Self {
        Self {
            simulation: Some(simulation),
            controls,
            _runtime: runtime,
            live_color: Color32::BLUE,
            dead_color: Color32::from_gray(240),
        }
    }

    fn reset(&mut self) {
        let Some(simulation) = self.simulation.take() else { return };
        match simulation.reset() {
            Ok(fresh) => self.simulation = Some(fresh),
            Err(err) => error!(%err, "reset failed"),
        }
    }

    fn draw_grid(&self, ui: &mut egui::Ui, grid: &Grid) {
        let side = ui.available_size().min_elem();
        let square = side / grid.size() as f32;

        let (response, painter) = ui.allocate_painter(Vec2::splat(side), egui::Sense::hover());
        let origin = response.rect.min;
        painter.rect_filled(response.rect, 0.0, self.dead_color);

        for (row, cells) in grid.rows().enumerate() {
            for (col, &alive) in cells.iter().enumerate() {
                if !alive {
                    continue;
                }
                let rect = Rect::from_min_size(
                    origin + Vec2::new(col as f32 * square + 1.0, row as f32 * square + 1.0),
                    Vec2::splat((square - 1.0).max(1.0)),
                );
                painter.rect_filled(rect, square * 0.25, self.live_color);
            }
        }
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame: Option<Frame> = self.simulation.as_ref().and_then(|simulation| {
            simulation
                .frame()
                .map_err(|err| error!(%err, "cannot read the population"))
                .ok()
        });
        let (generation, alive) = frame.as_ref().map_or((0, 0), |f| (f.generation, f.alive));

        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(140.0)
            .show(ctx, |ui| {
                let paused = self.controls.is_paused();
                let label = if paused { "Resume" } else { "Pause" };
                if ui.selectable_label(paused, label).clicked() {
                    self.controls.toggle_pause();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.label(format!("Generation #{generation}"));
                ui.label(format!("Alive: {alive}"));

                ui.separator();

                ui.label("Speed mode:");
                let mut speed = self.controls.speed().get();
                if ui.add(egui::Slider::new(&mut speed, Speed::MIN..=Speed::MAX)).changed() {
                    self.controls.set_speed(Speed::new(speed));
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(frame) = &frame {
                self.draw_grid(ui, &frame.cells);
            }
        });
    }
}
