mod app;
pub mod animation;
pub mod canvas;
pub mod geometry;
pub mod panel_resize;
pub mod view;
pub mod view_manager;
pub mod views;
pub mod widgets;
pub mod window_manager;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{Application, FrameOutput, PlannerApp, WindowCommand};
