use chrono::NaiveDate;

use crate::events::EventLoop;
use crate::services::account::AccountManager;
use crate::services::calendar_sync::CalendarSyncManager;
use crate::services::settings::SettingsStore;
use crate::services::Models;
use crate::ui_egui::view::{PanelKind, ViewId};

/// What the controllers may touch while handling one domain event.
pub struct ControllerContext<'a> {
    pub events: &'a mut EventLoop,
    pub models: &'a Models,
    pub accounts: &'a mut AccountManager,
    pub sync: &'a CalendarSyncManager,
    pub settings: &'a mut SettingsStore,
    pub today: NaiveDate,
    /// The open side panel, if any.
    pub side_panel: Option<(ViewId, PanelKind)>,
}

impl std::fmt::Debug for ControllerContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerContext")
            .field("today", &self.today)
            .field("side_panel", &self.side_panel)
            .finish_non_exhaustive()
    }
}
