//! Composition root of the view tree.
//!
//! The view manager owns the fixed bars, the main view, at most one side
//! panel and the overlay (a modal dialog, a context menu, or a menu over a
//! modal), plus an optional tooltip. Every event of the frame goes through
//! [`ViewManager::register_event`]:
//!
//! 1. `OpenView`, `CloseView`, `ResizeView` and the tooltip events change the
//!    slots and stop there.
//! 2. The screen fog advances on its own animation events.
//! 3. Commit events and anything that is not pointer or keyboard input reach
//!    every view.
//! 4. With a context menu open, the appbar still sees the event, a click
//!    outside the menu dismisses it (appbar clicks included), and otherwise
//!    the menu consumes it while the other views lose hover.
//! 5. With a modal open, the modal gets the event first, then the appbar. A
//!    click outside both dismisses the modal unless it was opened this frame.
//!    Input never reaches the views behind a modal.
//! 6. Otherwise the appbar, taskbar, main view and side panel each get it.
//!
//! Whenever a panel opens, closes or is resized the main view is laid out
//! again to fill the rest of the window.

use std::time::Duration;

use egui::Color32;

use crate::events::{Event, EventKind};
use crate::ui_egui::animation::ValueAnimation;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{centered, dispatch, FrameContext, PanelKind, View, ViewId, ViewRole};
use crate::ui_egui::views::tooltip::IndependentLabel;

/// Width assumed for the side panel when none is open.
pub const DEFAULT_PANEL_RESERVE: i32 = 130;
const FOG_ALPHA: f32 = 150.0;
const FOG_DURATION: Duration = Duration::from_millis(400);

/// Which axes `clamp_window_size` had to raise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clamped {
    pub width: bool,
    pub height: bool,
}

impl Clamped {
    pub fn any(&self) -> bool {
        self.width || self.height
    }
}

/// What floats above the bars and panels. A context menu may sit on top of
/// a modal; nothing else stacks.
#[derive(Debug, Default)]
enum Overlay {
    #[default]
    None,
    Modal(Box<dyn View>),
    Menu {
        menu: Box<dyn View>,
        modal: Option<Box<dyn View>>,
    },
}

impl Overlay {
    fn modal(&self) -> Option<&dyn View> {
        match self {
            Overlay::Modal(modal) => Some(modal.as_ref()),
            Overlay::Menu { modal, .. } => modal.as_deref(),
            Overlay::None => None,
        }
    }

    fn modal_mut(&mut self) -> Option<&mut Box<dyn View>> {
        match self {
            Overlay::Modal(modal) => Some(modal),
            Overlay::Menu { modal, .. } => modal.as_mut(),
            Overlay::None => None,
        }
    }

    fn menu(&self) -> Option<&dyn View> {
        match self {
            Overlay::Menu { menu, .. } => Some(menu.as_ref()),
            _ => None,
        }
    }

    fn menu_mut(&mut self) -> Option<&mut Box<dyn View>> {
        match self {
            Overlay::Menu { menu, .. } => Some(menu),
            _ => None,
        }
    }

    /// Install `view` as the modal, returning the one it replaces.
    fn set_modal(&mut self, view: Box<dyn View>) -> Option<Box<dyn View>> {
        match std::mem::take(self) {
            Overlay::None => {
                *self = Overlay::Modal(view);
                None
            }
            Overlay::Modal(old) => {
                *self = Overlay::Modal(view);
                Some(old)
            }
            Overlay::Menu { menu, modal } => {
                *self = Overlay::Menu {
                    menu,
                    modal: Some(view),
                };
                modal
            }
        }
    }

    /// Install `view` as the context menu, returning the one it replaces.
    fn set_menu(&mut self, view: Box<dyn View>) -> Option<Box<dyn View>> {
        match std::mem::take(self) {
            Overlay::None => {
                *self = Overlay::Menu {
                    menu: view,
                    modal: None,
                };
                None
            }
            Overlay::Modal(modal) => {
                *self = Overlay::Menu {
                    menu: view,
                    modal: Some(modal),
                };
                None
            }
            Overlay::Menu { menu, modal } => {
                *self = Overlay::Menu { menu: view, modal };
                Some(menu)
            }
        }
    }

    fn take_modal(&mut self) -> Option<Box<dyn View>> {
        match std::mem::take(self) {
            Overlay::Modal(modal) => Some(modal),
            Overlay::Menu { menu, modal } => {
                *self = Overlay::Menu { menu, modal: None };
                modal
            }
            Overlay::None => None,
        }
    }

    fn take_menu(&mut self) -> Option<Box<dyn View>> {
        match std::mem::take(self) {
            Overlay::Menu { menu, modal } => {
                *self = modal.map_or(Overlay::None, Overlay::Modal);
                Some(menu)
            }
            other => {
                *self = other;
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct ViewManager {
    top_bar: Box<dyn View>,
    side_bar: Box<dyn View>,
    main_view: Box<dyn View>,
    side_view: Option<Box<dyn View>>,
    overlay: Overlay,
    /// Panels replaced by a newer one, kept until their CloseView arrives.
    closing: Vec<Box<dyn View>>,
    independent_label: Option<IndependentLabel>,
    fog: ValueAnimation,
    opened_top_view_last_frame: bool,
    window_size: Size,
    panel_reserve: i32,
    redraw_all: bool,
}

impl ViewManager {
    pub fn new(
        top_bar: Box<dyn View>,
        side_bar: Box<dyn View>,
        main_view: Box<dyn View>,
        window_size: Size,
    ) -> Self {
        let mut manager = Self {
            top_bar,
            side_bar,
            main_view,
            side_view: None,
            overlay: Overlay::None,
            closing: Vec::new(),
            independent_label: None,
            fog: ValueAnimation::new(vec![0.0], FOG_DURATION),
            opened_top_view_last_frame: false,
            window_size,
            panel_reserve: DEFAULT_PANEL_RESERVE,
            redraw_all: true,
        };
        manager.resize(window_size);
        manager
    }

    pub fn with_panel_reserve(mut self, reserve: i32) -> Self {
        self.panel_reserve = reserve;
        self
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    pub fn top_bar(&self) -> &dyn View {
        self.top_bar.as_ref()
    }

    pub fn side_bar(&self) -> &dyn View {
        self.side_bar.as_ref()
    }

    pub fn main_view(&self) -> &dyn View {
        self.main_view.as_ref()
    }

    pub fn side_view(&self) -> Option<&dyn View> {
        self.side_view.as_deref()
    }

    pub fn top_view(&self) -> Option<&dyn View> {
        self.overlay.modal()
    }

    pub fn options_view(&self) -> Option<&dyn View> {
        self.overlay.menu()
    }

    pub fn independent_label(&self) -> Option<&IndependentLabel> {
        self.independent_label.as_ref()
    }

    /// Kind of the open side panel, if any.
    pub fn side_panel_kind(&self) -> Option<PanelKind> {
        match self.side_view.as_ref()?.role() {
            ViewRole::Panel(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn opened_top_view_last_frame(&self) -> bool {
        self.opened_top_view_last_frame
    }

    pub fn fog_alpha(&self) -> u8 {
        self.fog.value(0).clamp(0.0, 255.0).round() as u8
    }

    pub fn is_fog_running(&self) -> bool {
        self.fog.is_running()
    }

    /// Whether anything asked to be drawn again this frame.
    pub fn needs_repaint(&self) -> bool {
        self.redraw_all
            || self.fog.is_running()
            || self.top_bar.is_rendering()
            || self.side_bar.is_rendering()
            || self.main_view.is_rendering()
            || self.side_view.as_ref().is_some_and(|v| v.is_rendering())
            || self.overlay.modal().is_some_and(|v| v.is_rendering())
            || self.overlay.menu().is_some_and(|v| v.is_rendering())
    }

    /// Start of a frame: clear dirty flags and the opened-this-frame latch.
    pub fn reset_views(&mut self) {
        self.redraw_all = false;
        self.opened_top_view_last_frame = false;
        self.top_bar.set_rendering(false);
        self.side_bar.set_rendering(false);
        self.main_view.set_rendering(false);
        if let Some(view) = self.side_view.as_mut() {
            view.set_rendering(false);
        }
        if let Some(view) = self.overlay.modal_mut() {
            view.set_rendering(false);
        }
        if let Some(view) = self.overlay.menu_mut() {
            view.set_rendering(false);
        }
    }

    pub fn register_event(&mut self, event: Event, ctx: &mut FrameContext<'_>) -> bool {
        let Event { time, kind } = event;
        let kind = match kind {
            EventKind::OpenView(view) => {
                self.open_view(view, ctx);
                return true;
            }
            EventKind::CloseView(id) => {
                self.close_view(id, ctx);
                return true;
            }
            EventKind::ResizeView { view, width } => {
                self.resize_view(view, width);
                return true;
            }
            EventKind::ShowTooltip { text, anchor } => {
                self.independent_label = Some(IndependentLabel::new(text, anchor));
                self.redraw_all = true;
                return true;
            }
            EventKind::HideTooltip => {
                self.redraw_all |= self.independent_label.take().is_some();
                return true;
            }
            other => other,
        };
        let event = Event::new(time, kind);
        log::trace!("dispatch {}", event.name());

        if self.fog.register_event(&event, ctx.events) {
            self.redraw_all = true;
            return true;
        }

        if event.is_commit() || !event.is_input() {
            return self.broadcast(&event, ctx);
        }

        if self.overlay.menu().is_some() {
            return self.dispatch_with_menu(&event, ctx);
        }

        if self.overlay.modal().is_some() {
            return self.dispatch_with_modal(&event, ctx);
        }

        let mut handled = dispatch(self.top_bar.as_mut(), &event, ctx);
        handled |= dispatch(self.side_bar.as_mut(), &event, ctx);
        handled |= dispatch(self.main_view.as_mut(), &event, ctx);
        if let Some(view) = self.side_view.as_mut() {
            handled |= dispatch(view.as_mut(), &event, ctx);
        }
        handled
    }

    fn dispatch_with_menu(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        let mut handled = dispatch(self.top_bar.as_mut(), event, ctx);

        let outside =
            event.is_click() && self.overlay.menu().is_some_and(|menu| !menu.is_focused(event));
        if outside {
            self.dismiss_menu();
            return true;
        }

        if let Some(menu) = self.overlay.menu_mut() {
            handled |= dispatch(menu.as_mut(), event, ctx);
        }
        handled | self.cancel_hover(ctx, true)
    }

    fn dispatch_with_modal(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        let mut handled = false;
        if let Some(modal) = self.overlay.modal_mut() {
            handled |= dispatch(modal.as_mut(), event, ctx);
        }
        handled |= dispatch(self.top_bar.as_mut(), event, ctx);

        let outside = event.is_click()
            && !self.opened_top_view_last_frame
            && self.overlay.modal().is_some_and(|modal| !modal.is_focused(event))
            && !self.top_bar.is_focused(event);
        if outside {
            self.dismiss_modal(ctx);
            return true;
        }
        handled
    }

    /// Offer `event` to every view, overlays first.
    fn broadcast(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        let mut handled = false;
        if let Some(menu) = self.overlay.menu_mut() {
            handled |= dispatch(menu.as_mut(), event, ctx);
        }
        if let Some(modal) = self.overlay.modal_mut() {
            handled |= dispatch(modal.as_mut(), event, ctx);
        }
        handled |= dispatch(self.top_bar.as_mut(), event, ctx);
        handled |= dispatch(self.side_bar.as_mut(), event, ctx);
        handled |= dispatch(self.main_view.as_mut(), event, ctx);
        if let Some(view) = self.side_view.as_mut() {
            handled |= dispatch(view.as_mut(), event, ctx);
        }
        handled
    }

    /// Send `MouseFocusChanged(false)` to the views under the overlay.
    fn cancel_hover(&mut self, ctx: &mut FrameContext<'_>, include_modal: bool) -> bool {
        let lost = Event::mouse_focus_changed(ctx.now, false);
        let mut redraw = false;
        if include_modal {
            if let Some(modal) = self.overlay.modal_mut() {
                redraw |= dispatch(modal.as_mut(), &lost, ctx);
            }
        }
        redraw |= dispatch(self.top_bar.as_mut(), &lost, ctx);
        redraw |= dispatch(self.side_bar.as_mut(), &lost, ctx);
        redraw |= dispatch(self.main_view.as_mut(), &lost, ctx);
        if let Some(view) = self.side_view.as_mut() {
            redraw |= dispatch(view.as_mut(), &lost, ctx);
        }
        redraw
    }

    fn open_view(&mut self, mut view: Box<dyn View>, ctx: &mut FrameContext<'_>) {
        log::debug!("OpenView {} as {:?}", view.id(), view.role());
        self.redraw_all = true;
        match view.role() {
            ViewRole::Modal => {
                view.set_position(centered(self.window_size, view.rect().size()));
                if let Some(mut replaced) = self.overlay.set_modal(view) {
                    replaced.on_delete();
                }
                self.fog
                    .animate_to(vec![FOG_ALPHA], ctx.now, ctx.frame_interval, ctx.events);
                self.opened_top_view_last_frame = true;
                self.cancel_hover(ctx, false);
            }
            ViewRole::ContextMenu => {
                let rect = view.rect();
                let x = rect.x.min(self.window_size.width - rect.width).max(0);
                let y = rect.y.min(self.window_size.height - rect.height).max(0);
                view.set_position(Point::new(x, y));
                if let Some(mut replaced) = self.overlay.set_menu(view) {
                    replaced.on_delete();
                }
            }
            ViewRole::Panel(_) => self.open_panel(view, ctx),
            ViewRole::Main => {
                let rect = self.main_view.rect();
                view.set_position(rect.origin());
                view.resize(Some(rect.width), Some(rect.height));
                let mut replaced = std::mem::replace(&mut self.main_view, view);
                replaced.on_delete();
            }
            ViewRole::Bar => log::warn!("Bars are fixed, ignoring OpenView for {}", view.id()),
        }
    }

    fn open_panel(&mut self, mut panel: Box<dyn View>, ctx: &mut FrameContext<'_>) {
        let side_bar_width = self.side_bar.rect().width;
        let top = self.content_top();

        let mut width = panel.rect().width;
        if let Some(previous) = self.side_view.take() {
            ctx.events.enqueue(EventKind::CloseView(previous.id()));
            width = previous.rect().width;
            self.closing.push(previous);
        }
        width = width.max(panel.min_size().width);

        let available = self.window_size.width - side_bar_width - self.main_view.min_size().width;
        if width > available {
            width = panel.min_size().width;
        }

        panel.set_position(Point::new(side_bar_width, top));
        panel.resize(Some(width), Some(self.window_size.height - top));
        self.side_view = Some(panel);
        self.layout_main();
    }

    fn close_view(&mut self, id: ViewId, ctx: &mut FrameContext<'_>) {
        if self.side_view.as_ref().is_some_and(|v| v.id() == id) {
            if let Some(mut panel) = self.side_view.take() {
                log::debug!("Closing panel {}", id);
                panel.on_delete();
            }
            self.layout_main();
            self.redraw_all = true;
        } else if self.overlay.modal().is_some_and(|v| v.id() == id) {
            self.dismiss_modal(ctx);
        } else if self.overlay.menu().is_some_and(|v| v.id() == id) {
            self.dismiss_menu();
        } else if let Some(index) = self.closing.iter().position(|v| v.id() == id) {
            let mut panel = self.closing.remove(index);
            panel.on_delete();
        } else {
            log::debug!("CloseView for untracked {}", id);
        }
    }

    fn dismiss_modal(&mut self, ctx: &mut FrameContext<'_>) {
        if let Some(mut modal) = self.overlay.take_modal() {
            log::debug!("Closing modal {}", modal.id());
            modal.on_delete();
            self.fog
                .animate_to(vec![0.0], ctx.now, ctx.frame_interval, ctx.events);
            self.redraw_all = true;
        }
    }

    fn dismiss_menu(&mut self) {
        if let Some(mut menu) = self.overlay.take_menu() {
            log::debug!("Closing menu {}", menu.id());
            menu.on_delete();
            self.redraw_all = true;
        }
    }

    /// Drag of a panel's edge. The main view never goes under its minimum.
    fn resize_view(&mut self, id: ViewId, width: i32) {
        let side_bar_width = self.side_bar.rect().width;
        let main_min = self.main_view.min_size().width;
        let window_width = self.window_size.width;
        let Some(panel) = self.side_view.as_mut().filter(|v| v.id() == id) else {
            return;
        };

        let main_width = main_min.max(window_width - side_bar_width - width);
        panel.resize(Some(window_width - side_bar_width - main_width), None);
        self.layout_main();
    }

    fn content_top(&self) -> i32 {
        self.top_bar.rect().height
    }

    /// Main view fills what the taskbar and panel leave.
    fn layout_main(&mut self) {
        let side_bar_width = self.side_bar.rect().width;
        let panel_width = self.side_view.as_ref().map_or(0, |v| v.rect().width);
        let top = self.content_top();
        self.main_view
            .set_position(Point::new(side_bar_width + panel_width, top));
        self.main_view.resize(
            Some(self.window_size.width - side_bar_width - panel_width),
            Some(self.window_size.height - top),
        );
    }

    /// Lay every slot out for a new window size.
    pub fn resize(&mut self, window_size: Size) {
        self.window_size = window_size;
        let top = self.content_top();

        self.top_bar.set_position(Point::ZERO);
        self.top_bar.resize(Some(window_size.width), None);

        self.side_bar.set_position(Point::new(0, top));
        self.side_bar.resize(None, Some(window_size.height - top));

        let side_bar_width = self.side_bar.rect().width;
        if let Some(panel) = self.side_view.as_mut() {
            panel.set_position(Point::new(side_bar_width, top));
            panel.resize(None, Some(window_size.height - top));
        }
        self.layout_main();

        if let Some(modal) = self.overlay.modal_mut() {
            let origin = centered(window_size, modal.rect().size());
            modal.set_position(origin);
        }
        self.redraw_all = true;
    }

    /// Smallest window the current composition can be drawn in.
    pub fn get_min_size(&self) -> Size {
        let side_bar = self.side_bar.min_size();
        let main = self.main_view.min_size();
        let panel_width = self
            .side_view
            .as_ref()
            .map_or(self.panel_reserve, |v| v.rect().width);
        let panel_height = self.side_view.as_ref().map_or(0, |v| v.min_size().height);

        Size::new(
            side_bar.width + panel_width + main.width,
            self.top_bar.min_size().height + main.height.max(panel_height),
        )
    }

    /// Raise each axis of `requested` to the minimum and report which ones
    /// were raised.
    pub fn clamp_window_size(&self, requested: Size) -> (Size, Clamped) {
        let min = self.get_min_size();
        let clamped = Clamped {
            width: requested.width < min.width,
            height: requested.height < min.height,
        };
        (
            Size::new(requested.width.max(min.width), requested.height.max(min.height)),
            clamped,
        )
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.main_view.render(canvas);
        if let Some(panel) = self.side_view.as_ref() {
            panel.render(canvas);
        }
        self.side_bar.render(canvas);

        let alpha = self.fog_alpha();
        if alpha > 0 {
            let top = self.content_top();
            canvas.fill_rect(
                Rect::new(0, top, self.window_size.width, self.window_size.height - top),
                Color32::from_black_alpha(alpha),
            );
        }

        self.top_bar.render(canvas);
        if let Some(modal) = self.overlay.modal() {
            modal.render(canvas);
        }
        if let Some(menu) = self.overlay.menu() {
            menu.render(canvas);
        }
        if let Some(label) = self.independent_label.as_ref() {
            label.render(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_egui::test_support::{click, TestEnv};
    use crate::ui_egui::view::ViewBase;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Stub {
        base: ViewBase,
        role: ViewRole,
        min: Size,
        received: Rc<Cell<usize>>,
        deleted: Rc<Cell<usize>>,
    }

    impl Stub {
        fn boxed(role: ViewRole, rect: Rect, min: Size) -> (Box<dyn View>, Rc<Cell<usize>>, Rc<Cell<usize>>) {
            let received = Rc::new(Cell::new(0));
            let deleted = Rc::new(Cell::new(0));
            let stub = Stub {
                base: ViewBase::new(rect),
                role,
                min,
                received: received.clone(),
                deleted: deleted.clone(),
            };
            (Box::new(stub), received, deleted)
        }
    }

    impl View for Stub {
        fn base(&self) -> &ViewBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ViewBase {
            &mut self.base
        }

        fn role(&self) -> ViewRole {
            self.role
        }

        fn register_event(&mut self, event: &Event, _ctx: &mut FrameContext<'_>) -> bool {
            if event.is_input() {
                self.received.set(self.received.get() + 1);
            }
            false
        }

        fn render(&self, _canvas: &mut dyn Canvas) {}

        fn min_size(&self) -> Size {
            self.min
        }

        fn on_delete(&mut self) {
            self.deleted.set(self.deleted.get() + 1);
        }
    }

    fn manager() -> ViewManager {
        let (top, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 0, 30), Size::new(0, 30));
        let (side, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 60, 0), Size::new(60, 530));
        let (main, _, _) = Stub::boxed(ViewRole::Main, Rect::default(), Size::new(350, 530));
        ViewManager::new(top, side, main, Size::new(1200, 830))
    }

    #[test]
    fn test_initial_layout_fills_window() {
        let vm = manager();
        assert_eq!(vm.top_bar().rect(), Rect::new(0, 0, 1200, 30));
        assert_eq!(vm.side_bar().rect(), Rect::new(0, 30, 60, 800));
        assert_eq!(vm.main_view().rect(), Rect::new(60, 30, 1140, 800));
    }

    #[test]
    fn test_min_size_uses_panel_reserve_without_panel() {
        let vm = manager();
        assert_eq!(vm.get_min_size(), Size::new(60 + 130 + 350, 560));
        let vm = manager().with_panel_reserve(0);
        assert_eq!(vm.get_min_size(), Size::new(410, 560));
    }

    #[test]
    fn test_open_panel_shifts_main_view() {
        let mut vm = manager();
        let mut h = TestEnv::new();
        let (panel, _, _) = Stub::boxed(
            ViewRole::Panel(PanelKind::Todo),
            Rect::new(0, 0, 300, 0),
            Size::new(250, 300),
        );
        vm.register_event(Event::now(EventKind::OpenView(panel)), &mut h.ctx());

        assert_eq!(vm.side_view().unwrap().rect(), Rect::new(60, 30, 300, 800));
        assert_eq!(vm.main_view().rect(), Rect::new(360, 30, 840, 800));
        assert_eq!(vm.side_panel_kind(), Some(PanelKind::Todo));
        assert_eq!(vm.get_min_size().width, 60 + 300 + 350);
    }

    #[test]
    fn test_overflowing_panel_shrinks_to_minimum() {
        let (top, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 0, 30), Size::new(0, 30));
        let (side, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 60, 0), Size::new(60, 530));
        let (main, _, _) = Stub::boxed(ViewRole::Main, Rect::default(), Size::new(350, 530));
        let mut vm = ViewManager::new(top, side, main, Size::new(700, 600));
        let mut h = TestEnv::new();
        let (panel, _, _) = Stub::boxed(
            ViewRole::Panel(PanelKind::Search),
            Rect::new(0, 0, 400, 0),
            Size::new(250, 300),
        );
        vm.register_event(Event::now(EventKind::OpenView(panel)), &mut h.ctx());

        assert_eq!(vm.side_view().unwrap().rect().width, 250);
        assert_eq!(vm.main_view().rect().width, 700 - 60 - 250);
    }

    #[test]
    fn test_close_panel_widens_main_and_deletes_once() {
        let mut vm = manager();
        let mut h = TestEnv::new();
        let (panel, _, deleted) = Stub::boxed(
            ViewRole::Panel(PanelKind::Todo),
            Rect::new(0, 0, 300, 0),
            Size::new(250, 300),
        );
        let id = panel.id();
        vm.register_event(Event::now(EventKind::OpenView(panel)), &mut h.ctx());
        vm.register_event(Event::now(EventKind::CloseView(id)), &mut h.ctx());
        vm.register_event(Event::now(EventKind::CloseView(id)), &mut h.ctx());

        assert!(vm.side_view().is_none());
        assert_eq!(vm.main_view().rect(), Rect::new(60, 30, 1140, 800));
        assert_eq!(deleted.get(), 1);
    }

    #[test]
    fn test_resize_view_keeps_main_above_minimum() {
        let mut vm = manager();
        let mut h = TestEnv::new();
        let (panel, _, _) = Stub::boxed(
            ViewRole::Panel(PanelKind::Todo),
            Rect::new(0, 0, 300, 0),
            Size::new(250, 300),
        );
        let id = panel.id();
        vm.register_event(Event::now(EventKind::OpenView(panel)), &mut h.ctx());

        vm.register_event(Event::now(EventKind::ResizeView { view: id, width: 400 }), &mut h.ctx());
        assert_eq!(vm.side_view().unwrap().rect().width, 400);
        assert_eq!(vm.main_view().rect(), Rect::new(460, 30, 740, 800));

        vm.register_event(Event::now(EventKind::ResizeView { view: id, width: 1000 }), &mut h.ctx());
        assert_eq!(vm.main_view().rect().width, 350);
        assert_eq!(vm.side_view().unwrap().rect().width, 1200 - 60 - 350);
    }

    #[test]
    fn test_modal_replaces_modal_and_captures_input() {
        let mut vm = manager();
        let mut h = TestEnv::new();
        let (first, _, first_deleted) =
            Stub::boxed(ViewRole::Modal, Rect::new(0, 0, 400, 300), Size::new(400, 300));
        let (second, second_received, _) =
            Stub::boxed(ViewRole::Modal, Rect::new(0, 0, 400, 300), Size::new(400, 300));
        let second_id = second.id();

        vm.register_event(Event::now(EventKind::OpenView(first)), &mut h.ctx());
        vm.register_event(Event::now(EventKind::OpenView(second)), &mut h.ctx());

        assert_eq!(vm.top_view().map(|v| v.id()), Some(second_id));
        assert_eq!(first_deleted.get(), 1);
        assert_eq!(vm.top_view().unwrap().rect(), Rect::new(400, 265, 400, 300));

        vm.register_event(click(500, 300), &mut h.ctx());
        assert_eq!(second_received.get(), 1);
    }

    #[test]
    fn test_outside_click_dismisses_modal_only_after_opening_frame() {
        let mut vm = manager();
        let mut h = TestEnv::new();
        let (modal, _, deleted) =
            Stub::boxed(ViewRole::Modal, Rect::new(0, 0, 400, 300), Size::new(400, 300));
        vm.register_event(Event::now(EventKind::OpenView(modal)), &mut h.ctx());
        assert!(vm.opened_top_view_last_frame());

        vm.register_event(click(100, 700), &mut h.ctx());
        assert!(vm.top_view().is_some());

        vm.reset_views();
        vm.register_event(click(100, 700), &mut h.ctx());
        assert!(vm.top_view().is_none());
        assert!(vm.is_fog_running());
        assert_eq!(deleted.get(), 1);
    }

    #[test]
    fn test_menu_is_dismissed_before_modal() {
        let mut vm = manager();
        let mut h = TestEnv::new();
        let (modal, _, _) = Stub::boxed(ViewRole::Modal, Rect::new(0, 0, 400, 300), Size::new(400, 300));
        let (menu, _, menu_deleted) =
            Stub::boxed(ViewRole::ContextMenu, Rect::new(10, 40, 120, 60), Size::new(120, 60));
        vm.register_event(Event::now(EventKind::OpenView(modal)), &mut h.ctx());
        vm.register_event(Event::now(EventKind::OpenView(menu)), &mut h.ctx());
        vm.reset_views();

        vm.register_event(click(1100, 700), &mut h.ctx());
        assert!(vm.options_view().is_none());
        assert!(vm.top_view().is_some());
        assert_eq!(menu_deleted.get(), 1);
    }

    #[test]
    fn test_menu_consumes_input_exclusively() {
        let (top, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 0, 30), Size::new(0, 30));
        let (side, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 60, 0), Size::new(60, 530));
        let (main, main_received, _) = Stub::boxed(ViewRole::Main, Rect::default(), Size::new(350, 530));
        let mut vm = ViewManager::new(top, side, main, Size::new(1200, 830));
        let mut h = TestEnv::new();
        let (menu, menu_received, _) =
            Stub::boxed(ViewRole::ContextMenu, Rect::new(500, 400, 120, 60), Size::new(120, 60));
        vm.register_event(Event::now(EventKind::OpenView(menu)), &mut h.ctx());

        vm.register_event(click(510, 410), &mut h.ctx());
        assert_eq!(menu_received.get(), 1);
        assert_eq!(main_received.get(), 0);
        assert!(vm.options_view().is_some());
    }

    #[test]
    fn test_appbar_click_dismisses_menu_and_reaches_appbar() {
        let (top, top_received, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 0, 30), Size::new(0, 30));
        let (side, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 60, 0), Size::new(60, 530));
        let (main, _, _) = Stub::boxed(ViewRole::Main, Rect::default(), Size::new(350, 530));
        let mut vm = ViewManager::new(top, side, main, Size::new(1200, 830));
        let mut h = TestEnv::new();
        let (menu, _, menu_deleted) =
            Stub::boxed(ViewRole::ContextMenu, Rect::new(500, 400, 120, 60), Size::new(120, 60));
        vm.register_event(Event::now(EventKind::OpenView(menu)), &mut h.ctx());

        vm.register_event(click(100, 10), &mut h.ctx());
        assert!(vm.options_view().is_none());
        assert_eq!(menu_deleted.get(), 1);
        assert_eq!(top_received.get(), 1);
    }

    #[test]
    fn test_main_view_replacement_takes_old_rect() {
        let (top, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 0, 30), Size::new(0, 30));
        let (side, _, _) = Stub::boxed(ViewRole::Bar, Rect::new(0, 0, 60, 0), Size::new(60, 530));
        let (main, _, main_deleted) = Stub::boxed(ViewRole::Main, Rect::default(), Size::new(350, 530));
        let mut vm = ViewManager::new(top, side, main, Size::new(1200, 830));
        let mut h = TestEnv::new();
        let (panel, _, _) = Stub::boxed(
            ViewRole::Panel(PanelKind::Todo),
            Rect::new(0, 0, 300, 0),
            Size::new(250, 300),
        );
        vm.register_event(Event::now(EventKind::OpenView(panel)), &mut h.ctx());
        let old_rect = vm.main_view().rect();
        assert_eq!(old_rect, Rect::new(360, 30, 840, 800));

        let (replacement, replacement_received, replacement_deleted) =
            Stub::boxed(ViewRole::Main, Rect::new(0, 0, 10, 10), Size::new(350, 530));
        let replacement_id = replacement.id();
        vm.register_event(Event::now(EventKind::OpenView(replacement)), &mut h.ctx());

        assert_eq!(vm.main_view().id(), replacement_id);
        assert_eq!(vm.main_view().rect(), old_rect);
        assert_eq!(main_deleted.get(), 1);
        assert_eq!(replacement_deleted.get(), 0);
        assert_eq!(vm.side_panel_kind(), Some(PanelKind::Todo));

        vm.register_event(click(700, 400), &mut h.ctx());
        assert_eq!(replacement_received.get(), 1);
    }

    #[test]
    fn test_window_clamp_reports_axes() {
        let vm = manager();
        let (size, clamped) = vm.clamp_window_size(Size::new(300, 900));
        assert_eq!(size, Size::new(540, 900));
        assert_eq!(clamped, Clamped { width: true, height: false });
        assert!(clamped.any());
    }

    #[test]
    fn test_tooltip_slot() {
        let mut vm = manager();
        let mut h = TestEnv::new();
        vm.register_event(
            Event::now(EventKind::ShowTooltip {
                text: "To-do".into(),
                anchor: Point::new(70, 100),
            }),
            &mut h.ctx(),
        );
        assert_eq!(vm.independent_label().map(|l| l.text.as_str()), Some("To-do"));
        vm.register_event(Event::now(EventKind::HideTooltip), &mut h.ctx());
        assert!(vm.independent_label().is_none());
    }
}
