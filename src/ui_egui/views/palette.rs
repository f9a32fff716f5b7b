use egui::Color32;

use crate::models::calendar_event::EventColor;
use crate::models::task::TaskImportance;

pub(crate) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(crate) const BACKGROUND: Color32 = Color32::from_rgb(245, 246, 250);
pub(crate) const SURFACE: Color32 = Color32::from_rgb(255, 255, 255);
pub(crate) const APPBAR: Color32 = Color32::from_rgb(32, 36, 48);
pub(crate) const TASKBAR: Color32 = Color32::from_rgb(44, 49, 64);
pub(crate) const BORDER: Color32 = Color32::from_rgb(214, 218, 228);
pub(crate) const TEXT: Color32 = Color32::from_rgb(34, 38, 49);
pub(crate) const TEXT_MUTED: Color32 = Color32::from_rgb(120, 126, 140);
pub(crate) const TEXT_ON_DARK: Color32 = Color32::from_rgb(236, 238, 244);
pub(crate) const ACCENT: Color32 = Color32::from_rgb(66, 133, 244);
pub(crate) const HOVER: Color32 = Color32::from_rgb(228, 233, 245);
pub(crate) const HOVER_ON_DARK: Color32 = Color32::from_rgb(70, 76, 96);
pub(crate) const DANGER: Color32 = Color32::from_rgb(220, 68, 68);
pub(crate) const TODAY: Color32 = Color32::from_rgb(232, 240, 254);
pub(crate) const HOLIDAY: Color32 = Color32::from_rgb(84, 74, 204);

pub(crate) fn event_color(color: EventColor) -> Color32 {
    match color {
        EventColor::Blue => Color32::from_rgb(66, 133, 244),
        EventColor::Pink => Color32::from_rgb(233, 30, 99),
        EventColor::Green => Color32::from_rgb(52, 168, 83),
        EventColor::Purple => Color32::from_rgb(142, 36, 170),
        EventColor::Red => Color32::from_rgb(219, 68, 55),
        EventColor::Yellow => Color32::from_rgb(244, 180, 0),
        EventColor::Orange => Color32::from_rgb(255, 112, 67),
    }
}

pub(crate) fn importance_color(importance: TaskImportance) -> Color32 {
    match importance {
        TaskImportance::Low => Color32::from_rgb(52, 168, 83),
        TaskImportance::Medium => Color32::from_rgb(244, 180, 0),
        TaskImportance::High => Color32::from_rgb(219, 68, 55),
    }
}
