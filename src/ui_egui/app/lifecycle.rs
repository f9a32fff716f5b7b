use std::time::Instant;

use super::Application;
use crate::events::input::EguiInput;
use crate::ui_egui::geometry::{Point, Size};
use crate::ui_egui::view::WindowState;

/// eframe entry point: feeds egui input to the [`Application`], applies the
/// window commands it returns and paints the view tree.
pub struct PlannerApp {
    app: Application,
    input: EguiInput,
}

impl PlannerApp {
    pub fn new(app: Application) -> Self {
        Self {
            app,
            input: EguiInput::new(),
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.input(|input| self.input.collect(input));
        let window = ctx.input(|input| window_state(input.viewport()));

        let output = self.app.frame(&mut self.input, window, Instant::now());
        for command in output.commands {
            log::debug!("Window command {:?}", command);
            ctx.send_viewport_cmd(command.to_viewport_command());
        }
        if let Some(cursor) = output.cursor {
            ctx.set_cursor_icon(cursor);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let mut painter = ui.painter().clone();
                self.app.render(&mut painter);
            });

        if self.app.is_running() {
            // Repeating events (caret blink, animations) need steady ticks.
            ctx.request_repaint_after(self.app.frame_interval());
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Shutting down");
    }
}

fn window_state(viewport: &egui::ViewportInfo) -> WindowState {
    let position = viewport
        .outer_rect
        .map_or(Point::ZERO, |rect| Point::from_pos2(rect.min));
    let size = viewport
        .inner_rect
        .map_or(Size::default(), |rect| Size::from_vec2(rect.size()));
    WindowState {
        position,
        size,
        maximized: viewport.maximized.unwrap_or(false),
    }
}
