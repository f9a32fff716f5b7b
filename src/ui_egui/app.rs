mod context;
mod controllers;
mod lifecycle;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use chrono_tz::Tz;

use self::context::ControllerContext;
use self::controllers::{default_controllers, run_controllers, Controller};
use crate::events::{Event, EventKind, EventLoop, InputSource, RepeatingKind};
use crate::models::settings::Config;
use crate::services::account::AccountManager;
use crate::services::calendar_sync::{CalendarProvider, CalendarSyncManager};
use crate::services::settings::SettingsStore;
use crate::services::Models;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Size};
use crate::ui_egui::view::{FrameContext, View, WindowState};
use crate::ui_egui::view_manager::ViewManager;
use crate::ui_egui::views::{AppbarView, CalendarView, TaskbarView};
use crate::ui_egui::window_manager::WindowManager;
use crate::utils::date::today_in;

pub use self::lifecycle::PlannerApp;

const CURSOR_BLINK: Duration = Duration::from_millis(400);
const BACKSPACE_REPEAT: Duration = Duration::from_millis(50);

/// Request for the OS window, applied by the shell after the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Resize(Size),
    Move(Point),
    Minimize,
    SetMaximized(bool),
    Close,
}

impl WindowCommand {
    pub fn to_viewport_command(self) -> egui::ViewportCommand {
        match self {
            Self::Resize(size) => egui::ViewportCommand::InnerSize(size.to_vec2()),
            Self::Move(origin) => egui::ViewportCommand::OuterPosition(origin.to_pos2()),
            Self::Minimize => egui::ViewportCommand::Minimized(true),
            Self::SetMaximized(maximized) => egui::ViewportCommand::Maximized(maximized),
            Self::Close => egui::ViewportCommand::Close,
        }
    }
}

/// What one frame produced for the shell.
#[derive(Debug, Default)]
pub struct FrameOutput {
    pub commands: Vec<WindowCommand>,
    pub cursor: Option<egui::CursorIcon>,
    pub repaint: bool,
}

/// The whole application minus the OS window: event loop, composition,
/// window-edge resizing, controllers and the models they act on.
pub struct Application {
    events: EventLoop,
    view_manager: ViewManager,
    window_manager: WindowManager,
    controllers: Vec<Box<dyn Controller>>,
    models: Models,
    accounts: AccountManager,
    sync: CalendarSyncManager,
    settings: SettingsStore,
    window: WindowState,
    /// Size the OS last reported, to tell OS-side changes from our own.
    reported_size: Option<Size>,
    view_cursor: Option<egui::CursorIcon>,
    frame_interval: Duration,
    tz: Tz,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("events", &self.events)
            .field("window", &self.window)
            .field("accounts", &self.accounts)
            .finish_non_exhaustive()
    }
}

impl Application {
    pub fn new(config: &Config, models: Models, provider: Arc<dyn CalendarProvider>) -> Self {
        let tz = config.tz();
        let today = today_in(tz);
        let size = Size::new(config.window_width, config.window_height);

        let top_bar = AppbarView::new(config.window_title.clone(), size.width, config.appbar_height);
        let side_bar = TaskbarView::new(config.taskbar_width, size.height - config.appbar_height);
        let main_view = CalendarView::new(today, &models).with_preferences(&config.preferences);
        let mut view_manager = ViewManager::new(
            Box::new(top_bar),
            Box::new(side_bar),
            Box::new(main_view),
            size,
        )
        .with_panel_reserve(config.panel_reserve_width);
        let (size, _) = view_manager.clamp_window_size(size);
        view_manager.resize(size);

        let mut events = EventLoop::new();
        events.add_repeating_event(RepeatingKind::RenderCursor, CURSOR_BLINK);
        events.add_repeating_event(RepeatingKind::DeleteCharacter, BACKSPACE_REPEAT);

        log::info!("Application started at {}x{}, today is {}", size.width, size.height, today);
        Self {
            events,
            view_manager,
            window_manager: WindowManager::new(config.resize_border),
            controllers: default_controllers(),
            models,
            accounts: AccountManager::new(Arc::clone(&provider)),
            sync: CalendarSyncManager::new(provider),
            settings: SettingsStore::in_memory(config.clone()),
            window: WindowState {
                position: Point::ZERO,
                size,
                maximized: false,
            },
            reported_size: None,
            view_cursor: None,
            frame_interval: config.frame_interval(),
            tz,
        }
    }

    /// Save preference edits to `path` from now on.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.settings = SettingsStore::new(self.settings.config().clone(), path);
        self
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn view_manager(&self) -> &ViewManager {
        &self.view_manager
    }

    pub fn events(&self) -> &EventLoop {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLoop {
        &mut self.events
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn accounts(&self) -> &AccountManager {
        &self.accounts
    }

    pub fn window(&self) -> WindowState {
        self.window
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn is_running(&self) -> bool {
        self.events.is_running()
    }

    /// Run one frame: poll `input`, drain the queue through the window
    /// manager, the controllers and the view manager, and report what the
    /// OS window should do.
    pub fn frame(&mut self, input: &mut dyn InputSource, window: WindowState, now: Instant) -> FrameOutput {
        self.sync_window(window);
        let today = today_in(self.tz);

        self.events.tick_at(now, input);
        self.view_manager.reset_views();

        let mut output = FrameOutput::default();
        while self.events.has_events() {
            match self.events.next() {
                Ok(event) => self.process(event, now, today, &mut output),
                Err(err) => {
                    log::error!("Event queue: {}", err);
                    break;
                }
            }
        }

        output.cursor = self.window_manager.cursor().or(self.view_cursor);
        output.repaint = self.view_manager.needs_repaint() || !output.commands.is_empty();
        output
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.view_manager.render(canvas);
    }

    /// Adopt what the OS reports. A size only counts when it changed since
    /// the last report, so our own pending resize isn't undone.
    fn sync_window(&mut self, window: WindowState) {
        self.window.position = window.position;
        self.window.maximized = window.maximized;
        if window.size.width <= 0 || window.size.height <= 0 {
            return;
        }
        if self.reported_size != Some(window.size) {
            self.reported_size = Some(window.size);
            if window.size != self.view_manager.window_size() {
                log::debug!("OS resized window to {}x{}", window.size.width, window.size.height);
                self.view_manager.resize(window.size);
                self.window.size = window.size;
            }
        }
    }

    fn process(&mut self, event: Event, now: Instant, today: NaiveDate, output: &mut FrameOutput) {
        if event.is_input() {
            let min = self.view_manager.get_min_size();
            if self
                .window_manager
                .register_event(&event, &self.window, min, &mut self.events)
            {
                return;
            }
        }

        match &event.kind {
            EventKind::CloseWindow => {
                log::info!("Closing window");
                self.events.stop();
                output.commands.push(WindowCommand::Close);
                return;
            }
            EventKind::WindowResize(requested) => {
                let (size, clamped) = self.view_manager.clamp_window_size(*requested);
                if clamped.any() {
                    log::debug!("Window resize clamped to {}x{}", size.width, size.height);
                }
                if size != self.view_manager.window_size() {
                    self.view_manager.resize(size);
                    output.commands.push(WindowCommand::Resize(size));
                }
                self.window.size = size;
                return;
            }
            EventKind::WindowMove(origin) => {
                self.window.position = *origin;
                output.commands.push(WindowCommand::Move(*origin));
                return;
            }
            EventKind::MinimizeWindow => {
                output.commands.push(WindowCommand::Minimize);
                return;
            }
            EventKind::ToggleMaximize => {
                output.commands.push(WindowCommand::SetMaximized(!self.window.maximized));
                return;
            }
            EventKind::MouseMotion(_) => self.view_cursor = None,
            _ => {}
        }

        if !event.is_input() {
            let side_panel = self
                .view_manager
                .side_view()
                .map(|view| view.id())
                .zip(self.view_manager.side_panel_kind());
            let mut ctx = ControllerContext {
                events: &mut self.events,
                models: &self.models,
                accounts: &mut self.accounts,
                sync: &self.sync,
                settings: &mut self.settings,
                today,
                side_panel,
            };
            run_controllers(&mut self.controllers, &event, &mut ctx);
        }

        let relayout = matches!(
            event.kind,
            EventKind::OpenView(_) | EventKind::CloseView(_) | EventKind::ResizeView { .. }
        );
        let mut ctx = FrameContext {
            now,
            today,
            frame_interval: self.frame_interval,
            events: &mut self.events,
            window: self.window,
            models: &self.models,
            accounts: &self.accounts,
            cursor: None,
        };
        self.view_manager.register_event(event, &mut ctx);
        if ctx.cursor.is_some() {
            self.view_cursor = ctx.cursor;
        }
        if relayout {
            self.grow_to_min_size(output);
        }
    }

    /// A panel can raise the minimum above the current window; grow the
    /// window so the main view keeps its minimum width.
    fn grow_to_min_size(&mut self, output: &mut FrameOutput) {
        let (size, clamped) = self.view_manager.clamp_window_size(self.view_manager.window_size());
        if !clamped.any() {
            return;
        }
        log::debug!("Growing window to {}x{} for the new layout", size.width, size.height);
        self.view_manager.resize(size);
        output.commands.push(WindowCommand::Resize(size));
        self.window.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RawInput;
    use crate::services::calendar_sync::DisconnectedProvider;
    use crate::ui_egui::geometry::Rect;
    use crate::ui_egui::view::{PanelKind, ViewRole};

    #[derive(Default)]
    struct Script {
        pending: Vec<RawInput>,
    }

    impl Script {
        fn press(&mut self, x: i32, y: i32) {
            self.pending.push(RawInput::MouseDown {
                pos: Point::new(x, y),
                button: 1,
            });
            self.pending.push(RawInput::MouseUp {
                pos: Point::new(x, y),
                button: 1,
            });
        }
    }

    impl InputSource for Script {
        fn poll(&mut self) -> Vec<RawInput> {
            std::mem::take(&mut self.pending)
        }

        fn mouse_focused(&self) -> bool {
            true
        }
    }

    fn app(width: i32) -> Application {
        let config = Config {
            window_width: width,
            ..Config::default()
        };
        Application::new(&config, Models::in_memory().unwrap(), Arc::new(DisconnectedProvider))
    }

    fn step(app: &mut Application, script: &mut Script) -> FrameOutput {
        let window = app.window();
        app.frame(script, window, Instant::now())
    }

    #[test]
    fn test_startup_registers_caret_and_backspace_timers() {
        let app = app(1200);
        assert!(app.events().has_repeating_event(RepeatingKind::RenderCursor));
        assert!(app.events().has_repeating_event(RepeatingKind::DeleteCharacter));
    }

    #[test]
    fn test_close_button_stops_loop_and_closes_window() {
        let mut app = app(540);
        let mut script = Script::default();
        script.press(500, 20);
        let output = step(&mut app, &mut script);
        assert!(!app.is_running());
        assert!(output.commands.contains(&WindowCommand::Close));
    }

    #[test]
    fn test_taskbar_toggle_opens_and_closes_todo_panel() {
        let mut app = app(1200);
        let mut script = Script::default();
        script.press(20, 50);
        step(&mut app, &mut script);
        assert_eq!(app.view_manager().side_panel_kind(), Some(PanelKind::Todo));
        assert_eq!(app.view_manager().main_view().rect().x, 60 + 300);

        script.press(20, 50);
        step(&mut app, &mut script);
        assert_eq!(app.view_manager().side_panel_kind(), None);
        assert_eq!(app.view_manager().main_view().rect().x, 60);
    }

    #[test]
    fn test_opening_panel_in_narrow_window_grows_window() {
        let mut app = app(540);
        assert_eq!(app.window().size.width, 540);
        let mut script = Script::default();
        script.press(20, 50);
        let output = step(&mut app, &mut script);

        assert_eq!(app.view_manager().side_panel_kind(), Some(PanelKind::Todo));
        let min = app.view_manager().get_min_size();
        assert_eq!(min.width, 60 + 250 + 350);
        assert_eq!(app.window().size, Size::new(min.width, 830));
        assert!(output.commands.contains(&WindowCommand::Resize(Size::new(min.width, 830))));

        let main = app.view_manager().main_view();
        assert!(main.rect().width >= main.min_size().width);
        assert_eq!(main.rect().right(), min.width);
    }

    #[test]
    fn test_add_task_round_trip_through_dialog() {
        let mut app = app(1200);
        let mut script = Script::default();
        script.press(20, 50);
        step(&mut app, &mut script);

        // "+ Add" in the to-do panel header.
        script.press(60 + 300 - 5 - 80, 50);
        step(&mut app, &mut script);
        assert_eq!(app.view_manager().top_view().map(|v| v.role()), Some(ViewRole::Modal));

        script.pending.extend("water plants".chars().map(|c| RawInput::KeyDown {
            key: None,
            character: Some(c),
        }));
        script.pending.push(RawInput::KeyDown {
            key: Some(egui::Key::Enter),
            character: None,
        });
        step(&mut app, &mut script);

        let tasks = app.models().tasks().list_all().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "water plants");
        assert!(app.view_manager().top_view().is_none());
    }

    #[test]
    fn test_settings_toggle_swaps_calendar_and_back() {
        let mut app = app(1200);
        let mut script = Script::default();
        let calendar_id = app.view_manager().main_view().id();

        // Settings sits at the bottom of the taskbar.
        script.press(30, 830 - 20);
        step(&mut app, &mut script);
        let main = app.view_manager().main_view();
        let settings_id = main.id();
        assert_ne!(settings_id, calendar_id);
        assert!(format!("{:?}", main).starts_with("SettingsView"));
        assert_eq!(main.rect(), Rect::new(60, 30, 1140, 800));

        // "Show Catholic holidays" in the settings body.
        script.press(60 + 35, 30 + 175);
        step(&mut app, &mut script);
        assert!(app.settings().preferences().show_catholic_events);

        script.press(30, 830 - 20);
        step(&mut app, &mut script);
        let main = app.view_manager().main_view();
        assert_ne!(main.id(), settings_id);
        assert!(format!("{:?}", main).starts_with("CalendarView"));
    }

    #[test]
    fn test_resize_request_is_clamped_to_minimum() {
        let mut app = app(1200);
        let min = app.view_manager().get_min_size();
        let mut output = FrameOutput::default();
        let today = today_in(app.tz);
        let request = Event::now(EventKind::WindowResize(Size::new(200, 200)));
        app.process(request, Instant::now(), today, &mut output);

        assert_eq!(output.commands, vec![WindowCommand::Resize(min)]);
        assert_eq!(app.window().size, min);
        assert_eq!(app.view_manager().window_size(), min);
    }
}
