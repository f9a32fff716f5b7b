// Domain controllers
// Turn domain events into store calls and follow-up events. They run before
// the view manager sees the same event, so views that react to it observe
// the already-updated models.

use anyhow::{Context, Result};

use super::context::ControllerContext;
use crate::events::{CalendarEventDraft, Event, EventKind, TaskDraft};
use crate::models::calendar_event::CalendarEvent;
use crate::models::task::Task;
use crate::ui_egui::view::{PanelKind, View};
use crate::ui_egui::views::{
    AddEventView, AddTaskView, CalendarView, EventListView, ProfileView, SearchView, SettingsView,
    TodoListView,
};

/// A handler for a fixed set of domain event kinds.
pub trait Controller: std::fmt::Debug {
    /// Returns whether the event was one of this controller's kinds.
    fn handle(&mut self, event: &Event, ctx: &mut ControllerContext<'_>) -> Result<bool>;
}

/// Every controller, in the order they see events.
pub fn default_controllers() -> Vec<Box<dyn Controller>> {
    vec![
        Box::new(TaskController),
        Box::new(CalendarController),
        Box::new(PanelController),
        Box::new(SettingsController::default()),
        Box::new(AccountController),
    ]
}

/// Offer `event` to each controller. Failures are logged and never reach
/// the views.
pub fn run_controllers(
    controllers: &mut [Box<dyn Controller>],
    event: &Event,
    ctx: &mut ControllerContext<'_>,
) {
    for controller in controllers.iter_mut() {
        match controller.handle(event, ctx) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                log::error!("{} failed: {:#}", event.name(), err);
                break;
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TaskController;

impl TaskController {
    fn apply(task: &mut Task, draft: &TaskDraft) {
        task.description = draft.description.clone();
        task.importance = draft.importance;
    }
}

impl Controller for TaskController {
    fn handle(&mut self, event: &Event, ctx: &mut ControllerContext<'_>) -> Result<bool> {
        let store = ctx.models.tasks();
        match &event.kind {
            EventKind::AddTask { draft, .. } => {
                let task = Task::new(draft.description.clone(), draft.importance)?;
                let created = store.create(task)?;
                log::debug!("Created task {:?}", created.id);
            }
            EventKind::EditTask { id, draft, .. } => {
                let mut task = store
                    .get_by_id(*id)?
                    .with_context(|| format!("Task {} not found", id))?;
                Self::apply(&mut task, draft);
                store.update(&task)?;
            }
            EventKind::DeleteTask(id) => store.delete(*id)?,
            EventKind::OpenEditTask(id) => {
                let task = store
                    .get_by_id(*id)?
                    .with_context(|| format!("Task {} not found", id))?;
                ctx.events
                    .enqueue(EventKind::OpenView(Box::new(AddTaskView::edit(&task))));
                return Ok(true);
            }
            _ => return Ok(false),
        }
        ctx.events.enqueue(EventKind::UpdateTasks);
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct CalendarController;

impl CalendarController {
    fn apply(event: &mut CalendarEvent, draft: &CalendarEventDraft) {
        event.date = draft.date;
        event.time = draft.time;
        event.description = draft.description.clone();
        event.color = draft.color;
        event.recurrence = draft.recurrence;
    }
}

impl Controller for CalendarController {
    fn handle(&mut self, event: &Event, ctx: &mut ControllerContext<'_>) -> Result<bool> {
        let store = ctx.models.calendar();
        match &event.kind {
            EventKind::AddCalendarEvent { draft, .. } => {
                let new_event = CalendarEvent::new(draft.date, draft.time, draft.description.clone())?
                    .with_color(draft.color)
                    .with_recurrence(draft.recurrence);
                store.create(new_event)?;
            }
            EventKind::EditCalendarEvent { id, draft, .. } => {
                let mut existing = store
                    .get_by_id(*id)?
                    .with_context(|| format!("Calendar event {} not found", id))?;
                Self::apply(&mut existing, draft);
                store.update(&existing)?;
            }
            EventKind::DeleteCalendarEvent(id) => store.delete(*id)?,
            EventKind::OpenEditCalendarEvent(id) => {
                let existing = store
                    .get_by_id(*id)?
                    .with_context(|| format!("Calendar event {} not found", id))?;
                ctx.events
                    .enqueue(EventKind::OpenView(Box::new(AddEventView::edit(&existing))));
                return Ok(true);
            }
            EventKind::CalendarSynced(summary) => {
                for imported in &summary.imported {
                    store.create(imported.clone())?;
                }
            }
            _ => return Ok(false),
        }
        ctx.events.enqueue(EventKind::UpdateCalendar);
        Ok(true)
    }
}

/// Opens and closes the side panels.
#[derive(Debug, Default)]
pub struct PanelController;

impl PanelController {
    fn build(kind: PanelKind, ctx: &ControllerContext<'_>) -> Box<dyn View> {
        match kind {
            PanelKind::Todo => Box::new(TodoListView::new(ctx.models)),
            PanelKind::Search => Box::new(SearchView::new()),
            PanelKind::Profile => Box::new(ProfileView::new(&*ctx.accounts)),
            PanelKind::EventList => Box::new(EventListView::new(ctx.today, ctx.models)),
        }
    }
}

impl Controller for PanelController {
    fn handle(&mut self, event: &Event, ctx: &mut ControllerContext<'_>) -> Result<bool> {
        match &event.kind {
            EventKind::TogglePanel(kind) => {
                match ctx.side_panel {
                    Some((id, open)) if open == *kind => ctx.events.enqueue(EventKind::CloseView(id)),
                    _ => {
                        let panel = Self::build(*kind, ctx);
                        ctx.events.enqueue(EventKind::OpenView(panel));
                    }
                }
                Ok(true)
            }
            EventKind::OpenEventList(date) => {
                let panel = EventListView::new(*date, ctx.models);
                ctx.events.enqueue(EventKind::OpenView(Box::new(panel)));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Swaps the settings page and the calendar in the main slot, and applies
/// preference edits.
#[derive(Debug, Default)]
pub struct SettingsController {
    showing: bool,
}

impl Controller for SettingsController {
    fn handle(&mut self, event: &Event, ctx: &mut ControllerContext<'_>) -> Result<bool> {
        match &event.kind {
            EventKind::ToggleSettings => {
                let preferences = ctx.settings.preferences();
                let main: Box<dyn View> = if self.showing {
                    Box::new(CalendarView::new(ctx.today, ctx.models).with_preferences(preferences))
                } else {
                    Box::new(SettingsView::new(preferences))
                };
                self.showing = !self.showing;
                ctx.events.enqueue(EventKind::OpenView(main));
            }
            EventKind::ChangeSetting(change) => {
                ctx.settings
                    .apply(change)
                    .context("Failed to save settings")?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct AccountController;

impl Controller for AccountController {
    fn handle(&mut self, event: &Event, ctx: &mut ControllerContext<'_>) -> Result<bool> {
        match &event.kind {
            EventKind::SignIn { email } => {
                // Detached; the result comes back as UserSignIn.
                let _ = ctx
                    .accounts
                    .sign_in_in_background(email.clone(), ctx.events.threaded_sender());
            }
            EventKind::SignOut => ctx.accounts.sign_out(),
            EventKind::SignOutAll => ctx.accounts.sign_out_all(),
            EventKind::UserSignIn(user) => {
                ctx.accounts.on_user_signed_in(user.clone());
                if ctx.settings.preferences().auto_sync {
                    ctx.events.enqueue(EventKind::SyncCalendar);
                }
            }
            EventKind::SyncCalendar => {
                let Some(user) = ctx.accounts.current().cloned() else {
                    log::debug!("Sync requested without a signed-in account");
                    return Ok(true);
                };
                let local = ctx.models.calendar().list_all()?;
                let _ = ctx
                    .sync
                    .sync_in_background(user, local, ctx.events.threaded_sender());
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLoop;
    use crate::models::task::TaskImportance;
    use crate::models::user::User;
    use crate::services::account::AccountManager;
    use crate::models::settings::{Config, SettingChange};
    use crate::services::calendar_sync::{CalendarSyncManager, DisconnectedProvider, SyncSummary};
    use crate::services::settings::SettingsStore;
    use crate::services::Models;
    use crate::ui_egui::view::{ViewId, ViewRole};
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct Harness {
        events: EventLoop,
        models: Models,
        accounts: AccountManager,
        sync: CalendarSyncManager,
        settings: SettingsStore,
        side_panel: Option<(ViewId, PanelKind)>,
        controllers: Vec<Box<dyn Controller>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                events: EventLoop::new(),
                models: Models::in_memory().unwrap(),
                accounts: AccountManager::new(Arc::new(DisconnectedProvider)),
                sync: CalendarSyncManager::new(Arc::new(DisconnectedProvider)),
                settings: SettingsStore::in_memory(Config::default()),
                side_panel: None,
                controllers: default_controllers(),
            }
        }

        fn run(&mut self, kind: EventKind) -> Vec<Event> {
            let event = Event::now(kind);
            let mut ctx = ControllerContext {
                events: &mut self.events,
                models: &self.models,
                accounts: &mut self.accounts,
                sync: &self.sync,
                settings: &mut self.settings,
                today: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                side_panel: self.side_panel,
            };
            run_controllers(&mut self.controllers, &event, &mut ctx);
            let mut out = Vec::new();
            while self.events.has_events() {
                out.push(self.events.next().unwrap());
            }
            out
        }
    }

    fn names(events: &[Event]) -> Vec<&'static str> {
        events.iter().map(Event::name).collect()
    }

    #[test]
    fn test_add_then_edit_task() {
        let mut harness = Harness::new();
        let draft = TaskDraft {
            description: "call bank".into(),
            importance: TaskImportance::Low,
        };
        let out = harness.run(EventKind::AddTask {
            draft,
            origin: ViewId::next(),
        });
        assert_eq!(names(&out), vec!["UpdateTasks"]);

        let id = harness.models.tasks().list_all().unwrap()[0].id.unwrap();
        harness.run(EventKind::EditTask {
            id,
            draft: TaskDraft {
                description: "call bank today".into(),
                importance: TaskImportance::High,
            },
            origin: ViewId::next(),
        });
        let task = harness.models.tasks().get_by_id(id).unwrap().unwrap();
        assert_eq!(task.description, "call bank today");
        assert_eq!(task.importance, TaskImportance::High);
    }

    #[test]
    fn test_editing_missing_task_is_logged_not_propagated() {
        let mut harness = Harness::new();
        let out = harness.run(EventKind::EditTask {
            id: 404,
            draft: TaskDraft {
                description: "ghost".into(),
                importance: TaskImportance::Low,
            },
            origin: ViewId::next(),
        });
        assert!(out.is_empty());
    }

    #[test]
    fn test_open_edit_calendar_event_opens_modal() {
        let mut harness = Harness::new();
        let created = harness
            .models
            .calendar()
            .create(
                CalendarEvent::new(
                    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                    NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                    "dentist",
                )
                .unwrap(),
            )
            .unwrap();
        let out = harness.run(EventKind::OpenEditCalendarEvent(created.id.unwrap()));
        assert!(matches!(&out[0].kind, EventKind::OpenView(v) if v.role() == ViewRole::Modal));
    }

    #[test]
    fn test_toggle_panel_opens_then_closes() {
        let mut harness = Harness::new();
        let out = harness.run(EventKind::TogglePanel(PanelKind::Todo));
        let EventKind::OpenView(panel) = &out[0].kind else {
            panic!("expected OpenView");
        };
        assert_eq!(panel.role(), ViewRole::Panel(PanelKind::Todo));

        let id = panel.id();
        harness.side_panel = Some((id, PanelKind::Todo));
        let out = harness.run(EventKind::TogglePanel(PanelKind::Todo));
        assert!(matches!(out[0].kind, EventKind::CloseView(closed) if closed == id));

        let out = harness.run(EventKind::TogglePanel(PanelKind::Search));
        assert!(matches!(&out[0].kind, EventKind::OpenView(v) if v.role() == ViewRole::Panel(PanelKind::Search)));
    }

    #[test]
    fn test_user_sign_in_records_account_and_requests_sync() {
        let mut harness = Harness::new();
        let out = harness.run(EventKind::UserSignIn(User::new("ana@example.com", "Ana")));
        assert_eq!(names(&out), vec!["SyncCalendar"]);
        assert_eq!(
            harness.accounts.current().map(|u| u.email.as_str()),
            Some("ana@example.com")
        );
    }

    #[test]
    fn test_calendar_synced_stores_imports() {
        let mut harness = Harness::new();
        let imported = CalendarEvent::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            "remote meeting",
        )
        .unwrap();
        let out = harness.run(EventKind::CalendarSynced(SyncSummary {
            imported: vec![imported],
            pushed: 0,
        }));
        assert_eq!(names(&out), vec!["UpdateCalendar"]);
        assert_eq!(harness.models.calendar().list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_sync_without_account_does_nothing() {
        let mut harness = Harness::new();
        assert!(harness.run(EventKind::SyncCalendar).is_empty());
    }

    #[test]
    fn test_toggle_settings_swaps_main_view_both_ways() {
        let mut harness = Harness::new();
        let out = harness.run(EventKind::ToggleSettings);
        let EventKind::OpenView(settings) = &out[0].kind else {
            panic!("expected OpenView");
        };
        assert_eq!(settings.role(), ViewRole::Main);
        assert!(format!("{:?}", settings).starts_with("SettingsView"));

        let out = harness.run(EventKind::ToggleSettings);
        assert!(matches!(&out[0].kind, EventKind::OpenView(v) if format!("{:?}", v).starts_with("CalendarView")));
    }

    #[test]
    fn test_change_setting_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut harness = Harness::new();
        harness.settings = SettingsStore::new(Config::default(), Some(path.clone()));

        harness.run(EventKind::ChangeSetting(SettingChange::ShowCatholicEvents(true)));
        assert!(harness.settings.preferences().show_catholic_events);
        let saved = crate::services::settings::load_config(&path).unwrap();
        assert!(saved.preferences.show_catholic_events);
    }

    #[test]
    fn test_sign_in_skips_sync_when_auto_sync_is_off() {
        let mut harness = Harness::new();
        harness.run(EventKind::ChangeSetting(SettingChange::AutoSync(false)));
        let out = harness.run(EventKind::UserSignIn(User::new("ana@example.com", "Ana")));
        assert!(out.is_empty());
        assert!(harness.accounts.current().is_some());
    }

    #[test]
    fn test_sign_out_all_forgets_accounts() {
        let mut harness = Harness::new();
        harness.run(EventKind::UserSignIn(User::new("ana@example.com", "Ana")));
        harness.run(EventKind::SignOutAll);
        assert!(harness.accounts.accounts().is_empty());
    }
}
