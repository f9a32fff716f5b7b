// Concrete views
// Bars, the month grid, the settings page, side panels, dialogs and the
// context menus

pub mod add_event;
pub mod add_task;
pub mod appbar;
pub mod calendar;
pub mod choose_month;
pub mod event_list;
pub mod options;
pub(crate) mod palette;
pub mod panel;
pub mod profile;
pub mod search;
pub mod settings;
pub mod switch_accounts;
pub mod taskbar;
pub mod todo_list;
pub mod tooltip;

pub use add_event::AddEventView;
pub use add_task::AddTaskView;
pub use appbar::AppbarView;
pub use calendar::CalendarView;
pub use choose_month::ChooseMonthView;
pub use event_list::EventListView;
pub use options::{OptionsTarget, OptionsView};
pub use profile::ProfileView;
pub use search::SearchView;
pub use settings::SettingsView;
pub use switch_accounts::SwitchAccountsView;
pub use taskbar::TaskbarView;
pub use todo_list::TodoListView;
pub use tooltip::IndependentLabel;
