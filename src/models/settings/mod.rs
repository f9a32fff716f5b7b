// Settings module
// Startup configuration and user preferences, both stored in config.toml

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Application configuration. Every field has a default so a partial (or
/// missing) config file still yields a usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,
    /// Frames per second of the dispatch loop (also the animation rate).
    pub fps: u32,
    /// Width in pixels of the window-edge band that starts a resize drag.
    pub resize_border: i32,
    pub appbar_height: i32,
    pub taskbar_width: i32,
    /// Width a closed side panel is assumed to need when computing the
    /// window minimum.
    pub panel_reserve_width: i32,
    pub time_zone: String,
    /// SQLite file; `None` places it in the platform data directory.
    pub database_path: Option<PathBuf>,
    /// What the settings view edits. Saved back on every change.
    pub preferences: Preferences,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "Event Planner".to_string(),
            window_width: 1200,
            window_height: 830,
            fps: 60,
            resize_border: 5,
            appbar_height: 30,
            taskbar_width: 60,
            panel_reserve_width: 130,
            time_zone: "Europe/Belgrade".to_string(),
            database_path: None,
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    /// Configured zone, falling back to UTC when the name is unknown.
    pub fn tz(&self) -> Tz {
        self.time_zone.parse().unwrap_or_else(|_| {
            log::warn!("Unknown time zone '{}', using UTC", self.time_zone);
            Tz::UTC
        })
    }

    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// Interface languages as (code, native name), in the order the settings
/// view lists them.
pub const LANGUAGES: [(&str, &str); 16] = [
    ("afr", "Afrikaans"),
    ("czs", "Čeština"),
    ("dan", "Dansk"),
    ("deu", "Deutsch"),
    ("eng", "English"),
    ("esp", "Español"),
    ("flp", "Filipino"),
    ("fra", "Français"),
    ("hrv", "Hrvatski"),
    ("hun", "Magyar"),
    ("ita", "Italiano"),
    ("nrw", "Norsk"),
    ("pol", "Polski"),
    ("por", "Português"),
    ("slo", "Slovenčina"),
    ("tur", "Türkçe"),
];

pub const DEFAULT_LANGUAGE: &str = "eng";

pub fn language_index(code: &str) -> Option<usize> {
    LANGUAGES.iter().position(|(known, _)| *known == code)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Code from [`LANGUAGES`].
    pub language: String,
    /// Mark the fixed and Easter-based Catholic holidays in the month grid.
    pub show_catholic_events: bool,
    /// Draw calendar events as solid blocks instead of tinted ones.
    pub render_filled_events: bool,
    pub high_quality_graphics: bool,
    /// Sync calendars right after a sign-in.
    pub auto_sync: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            show_catholic_events: false,
            render_filled_events: false,
            high_quality_graphics: true,
            auto_sync: true,
        }
    }
}

/// One edit made in the settings view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    Language(String),
    ShowCatholicEvents(bool),
    RenderFilledEvents(bool),
    HighQualityGraphics(bool),
    AutoSync(bool),
}

impl Preferences {
    /// Returns whether anything changed. Unknown language codes are refused.
    pub fn apply(&mut self, change: &SettingChange) -> bool {
        match change {
            SettingChange::Language(code) => {
                if language_index(code).is_none() {
                    log::warn!("Ignoring unknown language '{}'", code);
                    return false;
                }
                replace(&mut self.language, code.clone())
            }
            SettingChange::ShowCatholicEvents(on) => replace(&mut self.show_catholic_events, *on),
            SettingChange::RenderFilledEvents(on) => replace(&mut self.render_filled_events, *on),
            SettingChange::HighQualityGraphics(on) => replace(&mut self.high_quality_graphics, *on),
            SettingChange::AutoSync(on) => replace(&mut self.auto_sync, *on),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
