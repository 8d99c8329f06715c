mod gesture;
mod settings;
mod shape;
mod state;
mod tool;
mod tools;
mod view;

use crate::settings::Settings;
use crate::state::SavedState;
use crate::tool::Tool;
use crate::view::BoxDrawingView;
use eframe::egui::{self, Context, Visuals};
use egui::color_picker::Alpha;
use egui::{Color32, Sense};
use tools::box_tool::BoxTool;

/// main application state
pub struct DragAndDraw {
    // the boxes and the gesture state machine driving them
    pub view: BoxDrawingView,

    // colors etc, saved together with the boxes
    pub settings: Settings,

    // kept in an Option so it can be taken out while it mutates the app
    box_tool: Option<Box<dyn Tool>>,
}

impl Default for DragAndDraw {
    fn default() -> Self {
        DragAndDraw {
            view: BoxDrawingView::new(),
            settings: Settings::default(),
            box_tool: Some(Box::new(BoxTool::new())),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let native_options = eframe::NativeOptions::default();
    if let Err(e) = eframe::run_native(
        "Drag and Draw",
        native_options,
        Box::new(|cc| Ok(Box::new(DragAndDraw::new(cc)))),
    ) {
        log::error!("Failed to start: {}", e);
    }
}

impl DragAndDraw {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self::default();
        app.restore(SavedState::restore_or_default(cc.storage));
        app
    }

    fn restore(&mut self, state: SavedState) {
        self.view.restore(state.shapes);
        self.settings = state.settings;
    }

    fn saved_state(&self) -> SavedState {
        SavedState::new(self.view.shapes(), self.settings.clone())
    }
}

impl eframe::App for DragAndDraw {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(Visuals {
            window_fill: Color32::WHITE,
            ..egui::Visuals::light() // base style
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), Sense::click_and_drag());

            // 1) take() the tool out of the Option<Box<dyn Tool>>
            // 2) call handle_input, giving it mutable access to both tool and app
            // 3) put it back
            if let Some(mut tool) = self.box_tool.take() {
                tool.handle_input(ctx, &response, self);
                self.box_tool = Some(tool);
            }

            self.view.render(&painter, response.rect, &self.settings);

            // touch indicators go on top of the boxes
            if let Some(mut tool) = self.box_tool.take() {
                tool.paint(&painter, self);
                self.box_tool = Some(tool);
            }

            self.show_settings_window(ctx);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.saved_state().save(storage) {
            Ok(()) => log::debug!("Saved {} boxes", self.view.boxes().len()),
            Err(e) => log::error!("Failed to save canvas: {:#}", e),
        }
    }
}

impl DragAndDraw {
    // settings window
    fn show_settings_window(&mut self, ctx: &Context) {
        egui::Window::new("Settings")
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.label(self.view.content_description());

                ui.horizontal(|ui| {
                    egui::widgets::color_picker::color_edit_button_srgba(
                        ui,
                        &mut self.settings.box_color,
                        Alpha::BlendOrAdditive,
                    );
                    ui.label("Box color");
                });
                ui.horizontal(|ui| {
                    egui::widgets::color_picker::color_edit_button_srgba(
                        ui,
                        &mut self.settings.background_color,
                        Alpha::Opaque,
                    );
                    ui.label("Background");
                });
                ui.checkbox(&mut self.settings.show_touches, "Show touches");

                ui.horizontal(|ui| {
                    if ui.button("Undo").clicked() {
                        self.view.undo_last();
                    }
                    if ui.button("Clear").clicked() {
                        self.view.clear();
                    }
                    if ui.button("Reset colors").clicked() {
                        let show_touches = self.settings.show_touches;
                        self.settings = Settings {
                            show_touches,
                            ..Settings::default()
                        };
                    }
                });
            });
    }
}
