// Property-based tests for coordinate translation, window clamping and
// edge drags

#[path = "../fixtures/mod.rs"]
mod fixtures;

use proptest::prelude::*;

use event_planner::events::{ButtonEvent, Event, EventKind, EventLoop, MotionEvent, MouseButton};
use event_planner::ui_egui::geometry::{Point, Size};
use event_planner::ui_egui::view::WindowState;
use event_planner::ui_egui::window_manager::WindowManager;

use fixtures::{motion, stub_manager, WINDOW};

fn drain(events: &mut EventLoop) -> Vec<Event> {
    let mut out = Vec::new();
    while events.has_events() {
        out.push(events.next().unwrap());
    }
    out
}

proptest! {
    /// Translating into a child frame and back gives the original position.
    #[test]
    fn prop_translation_round_trips(
        x in -5000..5000i32,
        y in -5000..5000i32,
        ox in -2000..2000i32,
        oy in -2000..2000i32,
    ) {
        let event = Event::now(EventKind::MouseClick(ButtonEvent { x, y, button: MouseButton::Right }));
        let local = event.translated(Point::new(ox, oy)).unwrap();
        prop_assert_eq!(local.position(), Some(Point::new(x - ox, y - oy)));
        let is_right_click = matches!(
            local.kind,
            EventKind::MouseClick(ButtonEvent { button: MouseButton::Right, .. })
        );
        prop_assert!(is_right_click);

        let back = local.translated(Point::new(-ox, -oy)).unwrap();
        prop_assert_eq!(back.position(), Some(Point::new(x, y)));
    }

    /// Motion keeps its start point in the same frame as its end point.
    #[test]
    fn prop_motion_vector_is_frame_independent(
        start in (-3000..3000i32, -3000..3000i32),
        end in (-3000..3000i32, -3000..3000i32),
        ox in -1000..1000i32,
        oy in -1000..1000i32,
    ) {
        let event = Event::now(EventKind::MouseMotion(MotionEvent {
            start_x: start.0,
            start_y: start.1,
            x: end.0,
            y: end.1,
        }));
        let local = event.translated(Point::new(ox, oy)).unwrap();
        match (&event.kind, &local.kind) {
            (EventKind::MouseMotion(a), EventKind::MouseMotion(b)) => {
                prop_assert_eq!(a.move_vector(), b.move_vector());
            }
            _ => prop_assert!(false, "motion changed kind"),
        }
    }

    /// Clamping never goes under the minimum and never touches an axis
    /// that was already large enough.
    #[test]
    fn prop_window_clamp_respects_minimum(width in 0..3000i32, height in 0..2000i32) {
        let vm = stub_manager(WINDOW);
        let min = vm.get_min_size();
        let (size, clamped) = vm.clamp_window_size(Size::new(width, height));

        prop_assert_eq!(size.width, width.max(min.width));
        prop_assert_eq!(size.height, height.max(min.height));
        prop_assert_eq!(clamped.width, width < min.width);
        prop_assert_eq!(clamped.height, height < min.height);
    }

    /// Dragging the east edge asks for exactly the cursor's width, and
    /// nothing at all below the minimum.
    #[test]
    fn prop_east_drag_tracks_cursor(target in 0..2500i32) {
        let window = WindowState {
            position: Point::new(100, 100),
            size: Size::new(800, 600),
            maximized: false,
        };
        let min = Size::new(540, 560);
        let mut events = EventLoop::new();
        let mut manager = WindowManager::new(5);

        let press = Event::now(EventKind::MouseClick(ButtonEvent {
            x: 798,
            y: 300,
            button: MouseButton::Left,
        }));
        prop_assert!(manager.register_event(&press, &window, min, &mut events));
        prop_assert!(manager.register_event(&motion(target, 300), &window, min, &mut events));

        let emitted = drain(&mut events);
        if target < min.width {
            prop_assert!(emitted.is_empty());
        } else {
            prop_assert_eq!(emitted.len(), 1);
            prop_assert!(matches!(
                emitted[0].kind,
                EventKind::WindowResize(size) if size == Size::new(target, 600)
            ));
        }
    }
}
