// Window resize manager
//
// The window is undecorated, so edge dragging is implemented here:
// - A left press in the border band (outside the content rect) arms a drag
//   and latches the edges that must stay put.
// - Each motion while armed emits WindowResize, plus WindowMove when the
//   north or west edge is the one being dragged.
// - An axis whose new size would be under the live minimum is skipped for
//   that frame.
// - Release disarms.
// Nothing happens while the window is maximized.

use crate::events::{Event, EventKind, EventLoop, MouseButton};
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::WindowState;

/// Which edge (or corner) of the window is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOrientation {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeOrientation {
    /// Orientation for a window-local point in the band between the window
    /// edge and `content`. `None` inside the content rect.
    pub fn from_point(point: Point, content: Rect) -> Option<Self> {
        if content.contains(point) {
            return None;
        }
        let north = point.y < content.top();
        let south = point.y >= content.bottom();
        let west = point.x < content.left();
        let east = point.x >= content.right();
        Some(match (north, south, west, east) {
            (true, _, true, _) => Self::NW,
            (true, _, _, true) => Self::NE,
            (_, true, true, _) => Self::SW,
            (_, true, _, true) => Self::SE,
            (true, _, _, _) => Self::N,
            (_, true, _, _) => Self::S,
            (_, _, true, _) => Self::W,
            _ => Self::E,
        })
    }

    /// The west edge moves, so the window origin moves with it.
    pub fn moves_left(&self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    pub fn moves_right(&self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    /// The north edge moves, so the window origin moves with it.
    pub fn moves_top(&self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            Self::N => egui::CursorIcon::ResizeNorth,
            Self::S => egui::CursorIcon::ResizeSouth,
            Self::E => egui::CursorIcon::ResizeEast,
            Self::W => egui::CursorIcon::ResizeWest,
            Self::NE => egui::CursorIcon::ResizeNorthEast,
            Self::NW => egui::CursorIcon::ResizeNorthWest,
            Self::SE => egui::CursorIcon::ResizeSouthEast,
            Self::SW => egui::CursorIcon::ResizeSouthWest,
        }
    }
}

/// Window rectangle in screen coordinates at the moment the drag armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FixedEdges {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragState {
    Idle { hover: Option<ResizeOrientation> },
    Armed { orientation: ResizeOrientation, fixed: FixedEdges },
}

#[derive(Debug, Clone)]
pub struct WindowManager {
    border: i32,
    state: DragState,
    mouse_pressed: bool,
}

impl WindowManager {
    pub fn new(border: i32) -> Self {
        Self {
            border,
            state: DragState::Idle { hover: None },
            mouse_pressed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DragState::Armed { .. })
    }

    pub fn orientation(&self) -> Option<ResizeOrientation> {
        match self.state {
            DragState::Idle { hover } => hover,
            DragState::Armed { orientation, .. } => Some(orientation),
        }
    }

    pub fn cursor(&self) -> Option<egui::CursorIcon> {
        self.orientation().map(|o| o.cursor_icon())
    }

    /// `event` is in window-local coordinates. `min_size` is the current
    /// minimum window size. Returns true when the event belongs to a resize
    /// drag and must not reach the views.
    pub fn register_event(
        &mut self,
        event: &Event,
        window: &WindowState,
        min_size: Size,
        events: &mut EventLoop,
    ) -> bool {
        match &event.kind {
            EventKind::MouseClick(_) => self.mouse_pressed = true,
            EventKind::MouseRelease(_) => self.mouse_pressed = false,
            _ => {}
        }

        if window.maximized {
            self.state = DragState::Idle { hover: None };
            return false;
        }

        let content = Rect::from_origin_size(Point::ZERO, window.size).shrink(self.border);

        match (self.state, &event.kind) {
            (DragState::Idle { .. }, EventKind::MouseClick(click)) if click.button == MouseButton::Left => {
                let point = Point::new(click.x, click.y);
                let inside_window = Rect::from_origin_size(Point::ZERO, window.size).contains(point);
                match ResizeOrientation::from_point(point, content) {
                    Some(orientation) if inside_window => {
                        log::debug!("Window resize armed: {:?}", orientation);
                        self.state = DragState::Armed {
                            orientation,
                            fixed: FixedEdges {
                                left: window.position.x,
                                top: window.position.y,
                                right: window.position.x + window.size.width,
                                bottom: window.position.y + window.size.height,
                            },
                        };
                        true
                    }
                    _ => false,
                }
            }
            (DragState::Idle { .. }, EventKind::MouseMotion(motion)) => {
                if !self.mouse_pressed {
                    let hover = ResizeOrientation::from_point(Point::new(motion.x, motion.y), content);
                    self.state = DragState::Idle { hover };
                }
                false
            }
            (DragState::Armed { orientation, fixed }, EventKind::MouseMotion(motion)) => {
                let cursor = Point::new(window.position.x + motion.x, window.position.y + motion.y);
                Self::drag(orientation, fixed, cursor, window, min_size, events);
                true
            }
            (DragState::Armed { .. }, EventKind::MouseRelease(_)) => {
                log::debug!("Window resize released");
                self.state = DragState::Idle { hover: None };
                true
            }
            (DragState::Armed { .. }, EventKind::MouseClick(_)) => true,
            _ => false,
        }
    }

    /// Emit the resize (and move) for an absolute cursor position.
    fn drag(
        orientation: ResizeOrientation,
        fixed: FixedEdges,
        cursor: Point,
        window: &WindowState,
        min_size: Size,
        events: &mut EventLoop,
    ) {
        let width = if orientation.moves_right() {
            Some(cursor.x - fixed.left)
        } else if orientation.moves_left() {
            Some(fixed.right - cursor.x)
        } else {
            None
        }
        .filter(|w| *w >= min_size.width);

        let height = if orientation.moves_bottom() {
            Some(cursor.y - fixed.top)
        } else if orientation.moves_top() {
            Some(fixed.bottom - cursor.y)
        } else {
            None
        }
        .filter(|h| *h >= min_size.height);

        if width.is_none() && height.is_none() {
            return;
        }

        events.enqueue(EventKind::WindowResize(Size::new(
            width.unwrap_or(window.size.width),
            height.unwrap_or(window.size.height),
        )));

        let move_x = orientation.moves_left() && width.is_some();
        let move_y = orientation.moves_top() && height.is_some();
        if move_x || move_y {
            events.enqueue(EventKind::WindowMove(Point::new(
                if move_x { cursor.x } else { window.position.x },
                if move_y { cursor.y } else { window.position.y },
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ButtonEvent, MotionEvent};
    use test_case::test_case;

    fn window() -> WindowState {
        WindowState {
            position: Point::new(100, 100),
            size: Size::new(800, 600),
            maximized: false,
        }
    }

    fn press(x: i32, y: i32) -> Event {
        Event::now(EventKind::MouseClick(ButtonEvent {
            x,
            y,
            button: MouseButton::Left,
        }))
    }

    fn motion(x: i32, y: i32) -> Event {
        Event::now(EventKind::MouseMotion(MotionEvent {
            start_x: x,
            start_y: y,
            x,
            y,
        }))
    }

    fn drain(events: &mut EventLoop) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        while events.has_events() {
            kinds.push(events.next().unwrap().kind);
        }
        kinds
    }

    #[test_case(2, 300, Some(ResizeOrientation::W) ; "west band")]
    #[test_case(798, 300, Some(ResizeOrientation::E) ; "east band")]
    #[test_case(400, 1, Some(ResizeOrientation::N) ; "north band")]
    #[test_case(400, 597, Some(ResizeOrientation::S) ; "south band")]
    #[test_case(1, 1, Some(ResizeOrientation::NW) ; "north west corner")]
    #[test_case(799, 599, Some(ResizeOrientation::SE) ; "south east corner")]
    #[test_case(400, 300, None ; "content")]
    fn test_orientation_from_point(x: i32, y: i32, expected: Option<ResizeOrientation>) {
        let content = Rect::new(0, 0, 800, 600).shrink(5);
        assert_eq!(ResizeOrientation::from_point(Point::new(x, y), content), expected);
    }

    #[test]
    fn test_east_drag_resizes_from_fixed_left_edge() {
        let mut manager = WindowManager::new(5);
        let mut events = EventLoop::new();
        let min = Size::new(400, 300);

        assert!(manager.register_event(&press(798, 300), &window(), min, &mut events));
        assert!(manager.is_armed());

        assert!(manager.register_event(&motion(850, 300), &window(), min, &mut events));
        match drain(&mut events).as_slice() {
            [EventKind::WindowResize(size)] => assert_eq!(*size, Size::new(850, 600)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_west_drag_moves_origin() {
        let mut manager = WindowManager::new(5);
        let mut events = EventLoop::new();
        manager.register_event(&press(2, 300), &window(), Size::new(400, 300), &mut events);

        manager.register_event(&motion(-50, 300), &window(), Size::new(400, 300), &mut events);
        match drain(&mut events).as_slice() {
            [EventKind::WindowResize(size), EventKind::WindowMove(origin)] => {
                assert_eq!(*size, Size::new(850, 600));
                assert_eq!(*origin, Point::new(50, 100));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_drag_under_minimum_is_suppressed() {
        let mut manager = WindowManager::new(5);
        let mut events = EventLoop::new();
        manager.register_event(&press(798, 300), &window(), Size::new(700, 300), &mut events);

        manager.register_event(&motion(500, 300), &window(), Size::new(700, 300), &mut events);
        assert!(drain(&mut events).is_empty());
    }

    #[test]
    fn test_corner_drag_keeps_accepted_axis() {
        let mut manager = WindowManager::new(5);
        let mut events = EventLoop::new();
        let min = Size::new(700, 300);
        manager.register_event(&press(799, 599), &window(), min, &mut events);

        // Width would be 600 (< 700) but height 650 is fine.
        manager.register_event(&motion(600, 650), &window(), min, &mut events);
        match drain(&mut events).as_slice() {
            [EventKind::WindowResize(size)] => assert_eq!(*size, Size::new(800, 650)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_release_disarms() {
        let mut manager = WindowManager::new(5);
        let mut events = EventLoop::new();
        let min = Size::new(400, 300);
        manager.register_event(&press(798, 300), &window(), min, &mut events);
        let release = Event::now(EventKind::MouseRelease(ButtonEvent {
            x: 798,
            y: 300,
            button: MouseButton::Left,
        }));
        assert!(manager.register_event(&release, &window(), min, &mut events));
        assert!(!manager.is_armed());
        assert!(!manager.register_event(&motion(900, 300), &window(), min, &mut events));
    }

    #[test]
    fn test_maximized_window_is_bypassed() {
        let mut manager = WindowManager::new(5);
        let mut events = EventLoop::new();
        let maximized = WindowState {
            maximized: true,
            ..window()
        };
        assert!(!manager.register_event(&press(798, 300), &maximized, Size::new(400, 300), &mut events));
        assert!(!manager.is_armed());
    }

    #[test]
    fn test_idle_motion_updates_hover_cursor() {
        let mut manager = WindowManager::new(5);
        let mut events = EventLoop::new();
        manager.register_event(&motion(1, 300), &window(), Size::new(400, 300), &mut events);
        assert_eq!(manager.cursor(), Some(egui::CursorIcon::ResizeWest));
        manager.register_event(&motion(400, 300), &window(), Size::new(400, 300), &mut events);
        assert_eq!(manager.cursor(), None);
    }
}
