//=========================================================================
// Event Normalizer
//=========================================================================
//
// Maps one native event to exactly one canonical event.
//
// Only read-only lookups happen here: backend window ids and controller
// instance ids resolve to handles, keyboard modifiers and the cursor
// position are copied from device state. Fields that depend on the
// mutation about to happen (freshly allocated device handles, motion
// deltas, shaped analog values) are left as placeholders for the
// enricher.
//
// Anything without a meaningful mapping becomes `EventKind::Nothing`:
// key repeats, touch-synthesized mouse input, unmapped keys and buttons,
// non-standard axes, and events for windows or devices that are not
// open.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::event::ElementState;
use winit::keyboard::PhysicalKey;

//=== Internal Dependencies ===============================================

use super::deadzone::StickCoordinate;
use super::event::{CanonicalEvent, EventKind, Modifiers, Stick, Trigger};
use super::keymap;
use crate::core::objects::Objects;
use crate::core::platform_bridge::{NativeAxis, NativeEvent, NativeKind};
use crate::core::registry::{Handle, ObjectKind};

//=== Normalization =======================================================

/// Converts `native` into its canonical form without touching any state.
pub(crate) fn normalize(native: &NativeEvent, objects: &Objects) -> CanonicalEvent {
    let kind = normalize_kind(&native.kind, objects).unwrap_or_else(|| {
        trace!(target: "input", "Discarded native event {:?}", native.kind);
        EventKind::Nothing
    });
    CanonicalEvent::new(native.timestamp, kind)
}

fn normalize_kind(kind: &NativeKind, objects: &Objects) -> Option<EventKind> {
    match *kind {
        //--- Device Lifecycle ---------------------------------------------
        NativeKind::KeyboardAdded => objects
            .keyboard()
            .is_none()
            .then(|| device_insert(ObjectKind::Keyboard)),
        NativeKind::MouseAdded => objects
            .mouse()
            .is_none()
            .then(|| device_insert(ObjectKind::Mouse)),
        NativeKind::ControllerAdded { instance, .. } => objects
            .controller_by_instance(instance)
            .is_none()
            .then(|| device_insert(ObjectKind::Controller)),
        NativeKind::ControllerRemoved { instance } => objects
            .controller_by_instance(instance)
            .map(|device| EventKind::DeviceRemove { device }),

        //--- Keyboard -----------------------------------------------------
        NativeKind::Key {
            window,
            key,
            state,
            repeat,
        } => {
            if repeat {
                return None;
            }
            let PhysicalKey::Code(code) = key else {
                return None;
            };
            let key = keymap::key_from_winit(code)?;
            let keyboard = objects.keyboard()?;
            let modifiers = objects
                .keyboards()
                .get(keyboard)
                .map_or(Modifiers::NONE, |k| k.modifiers);
            let window = objects.window_by_native(window);

            Some(match state {
                ElementState::Pressed => EventKind::KeyPress {
                    keyboard,
                    window,
                    key,
                    modifiers,
                },
                ElementState::Released => EventKind::KeyRelease {
                    keyboard,
                    window,
                    key,
                    modifiers,
                },
            })
        }
        // Folded into keyboard state by the enricher; never delivered.
        NativeKind::ModifiersChanged(_) => None,

        //--- Mouse --------------------------------------------------------
        NativeKind::CursorMoved { window, x, y, touch } => {
            if touch {
                return None;
            }
            Some(EventKind::MouseMotion {
                mouse: objects.mouse()?,
                window: objects.window_by_native(window),
                x,
                y,
                dx: 0.0,
                dy: 0.0,
            })
        }
        NativeKind::MouseButton {
            window,
            button,
            state,
            touch,
        } => {
            if touch {
                return None;
            }
            let button = keymap::mouse_button_from_winit(button)?;
            let mouse = objects.mouse()?;
            let (x, y) = objects
                .mice()
                .get(mouse)
                .map_or((0.0, 0.0), |m| (m.x, m.y));

            Some(EventKind::MouseButton {
                mouse,
                window: objects.window_by_native(window),
                button,
                pressed: state == ElementState::Pressed,
                x,
                y,
            })
        }
        NativeKind::MouseWheel { window, dx, dy } => Some(EventKind::MouseWheel {
            mouse: objects.mouse()?,
            window: objects.window_by_native(window),
            dx,
            dy,
        }),

        //--- Controller ---------------------------------------------------
        NativeKind::ControllerButton {
            instance,
            button,
            state,
        } => {
            let button = keymap::controller_button_from_gilrs(button)?;
            Some(EventKind::ControllerButton {
                controller: objects.controller_by_instance(instance)?,
                button,
                pressed: state == ElementState::Pressed,
            })
        }
        NativeKind::ControllerAxis { instance, axis, .. } => {
            let controller = objects.controller_by_instance(instance)?;
            match axis {
                NativeAxis::LeftX | NativeAxis::LeftY => Some(EventKind::StickMotion {
                    controller,
                    stick: Stick::Left,
                    coord: StickCoordinate::ZERO,
                }),
                NativeAxis::RightX | NativeAxis::RightY => Some(EventKind::StickMotion {
                    controller,
                    stick: Stick::Right,
                    coord: StickCoordinate::ZERO,
                }),
                NativeAxis::TriggerLeft => Some(EventKind::TriggerMotion {
                    controller,
                    trigger: Trigger::Left,
                    value: 0.0,
                }),
                NativeAxis::TriggerRight => Some(EventKind::TriggerMotion {
                    controller,
                    trigger: Trigger::Right,
                    value: 0.0,
                }),
                NativeAxis::Other(_) => None,
            }
        }

        //--- Window -------------------------------------------------------
        NativeKind::WindowResized {
            window,
            width,
            height,
        } => Some(EventKind::WindowResize {
            window: objects.window_by_native(window)?,
            width,
            height,
        }),
        NativeKind::WindowMoved { window, x, y } => Some(EventKind::WindowMove {
            window: objects.window_by_native(window)?,
            x,
            y,
        }),
        NativeKind::WindowFocused { window, focused } => Some(EventKind::WindowFocus {
            window: objects.window_by_native(window)?,
            focused,
        }),
        NativeKind::WindowCloseRequested { window } => Some(EventKind::WindowClose {
            window: objects.window_by_native(window)?,
        }),

        //--- Application --------------------------------------------------
        NativeKind::Quit => Some(EventKind::Quit),
        NativeKind::Unsupported => None,
    }
}

/// Insert with a placeholder handle; the enricher allocates the device.
fn device_insert(kind: ObjectKind) -> EventKind {
    EventKind::DeviceInsert {
        device: Handle::null(kind),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{Controller, DeadzonePolicy, KeyCode, Keyboard, Mouse, MouseButton};
    use crate::core::objects::Window;
    use crate::core::registry::IdSequence;
    use winit::event::MouseButton as WinitMouseButton;
    use winit::keyboard::{KeyCode as WinitKeyCode, NativeKeyCode};

    struct Fixture {
        objects: Objects,
        keyboard: Handle,
        mouse: Handle,
        window: Handle,
        pad: Handle,
    }

    fn fixture() -> Fixture {
        let mut objects = Objects::new(IdSequence::new(11));
        let keyboard = objects.add_keyboard(Keyboard::new()).unwrap();
        let mouse = objects.add_mouse(Mouse::new()).unwrap();
        let window = objects.add_window(Window::new(7, "main", 320, 240));
        let pad = objects.add_controller(Controller::new(3, "pad", DeadzonePolicy::default()));
        Fixture {
            objects,
            keyboard,
            mouse,
            window,
            pad,
        }
    }

    fn run(objects: &Objects, kind: NativeKind) -> EventKind {
        normalize(&NativeEvent::new(1.5, kind), objects).kind
    }

    fn key(code: WinitKeyCode, state: ElementState, repeat: bool) -> NativeKind {
        NativeKind::Key {
            window: 7,
            key: PhysicalKey::Code(code),
            state,
            repeat,
        }
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn key_press_resolves_handles() {
        let f = fixture();
        let event = normalize(
            &NativeEvent::new(1.5, key(WinitKeyCode::KeyK, ElementState::Pressed, false)),
            &f.objects,
        );

        assert_eq!(event.timestamp, 1.5);
        assert_eq!(
            event.kind,
            EventKind::KeyPress {
                keyboard: f.keyboard,
                window: Some(f.window),
                key: KeyCode::KeyK,
                modifiers: Modifiers::NONE,
            }
        );
    }

    #[test]
    fn key_release_carries_current_modifiers() {
        let mut f = fixture();
        f.objects.keyboards.get_mut(f.keyboard).unwrap().modifiers = Modifiers::SHIFT;

        let kind = run(&f.objects, key(WinitKeyCode::KeyA, ElementState::Released, false));
        assert!(matches!(
            kind,
            EventKind::KeyRelease { key: KeyCode::KeyA, modifiers: Modifiers::SHIFT, .. }
        ));
    }

    #[test]
    fn repeats_and_unmapped_keys_are_discarded() {
        let f = fixture();
        assert_eq!(
            run(&f.objects, key(WinitKeyCode::KeyA, ElementState::Pressed, true)),
            EventKind::Nothing
        );
        assert_eq!(
            run(&f.objects, key(WinitKeyCode::F24, ElementState::Pressed, false)),
            EventKind::Nothing
        );

        let unidentified = NativeKind::Key {
            window: 7,
            key: PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
            state: ElementState::Pressed,
            repeat: false,
        };
        assert_eq!(run(&f.objects, unidentified), EventKind::Nothing);
    }

    #[test]
    fn unknown_window_is_none_for_input() {
        let f = fixture();
        let kind = run(
            &f.objects,
            NativeKind::Key {
                window: 99,
                key: PhysicalKey::Code(WinitKeyCode::Space),
                state: ElementState::Pressed,
                repeat: false,
            },
        );
        assert!(matches!(kind, EventKind::KeyPress { window: None, .. }));
    }

    #[test]
    fn missing_keyboard_discards_keys() {
        let objects = Objects::new(IdSequence::new(1));
        assert_eq!(
            run(&objects, key(WinitKeyCode::KeyA, ElementState::Pressed, false)),
            EventKind::Nothing
        );
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn touch_synthesized_mouse_input_is_discarded() {
        let f = fixture();
        let motion = NativeKind::CursorMoved {
            window: 7,
            x: 1.0,
            y: 2.0,
            touch: true,
        };
        let button = NativeKind::MouseButton {
            window: 7,
            button: WinitMouseButton::Left,
            state: ElementState::Pressed,
            touch: true,
        };
        assert_eq!(run(&f.objects, motion), EventKind::Nothing);
        assert_eq!(run(&f.objects, button), EventKind::Nothing);
    }

    #[test]
    fn mouse_button_uses_last_cursor_position() {
        let mut f = fixture();
        f.objects.mice.get_mut(f.mouse).unwrap().move_to(10.0, 20.0, Some(f.window));

        let kind = run(
            &f.objects,
            NativeKind::MouseButton {
                window: 7,
                button: WinitMouseButton::Right,
                state: ElementState::Pressed,
                touch: false,
            },
        );
        assert_eq!(
            kind,
            EventKind::MouseButton {
                mouse: f.mouse,
                window: Some(f.window),
                button: MouseButton::Right,
                pressed: true,
                x: 10.0,
                y: 20.0,
            }
        );
    }

    #[test]
    fn unmapped_mouse_button_is_discarded() {
        let f = fixture();
        let kind = run(
            &f.objects,
            NativeKind::MouseButton {
                window: 7,
                button: WinitMouseButton::Other(9),
                state: ElementState::Pressed,
                touch: false,
            },
        );
        assert_eq!(kind, EventKind::Nothing);
    }

    //=====================================================================
    // Device Lifecycle Tests
    //=====================================================================

    #[test]
    fn insert_uses_placeholder_handle() {
        let objects = Objects::new(IdSequence::new(1));
        let kind = run(&objects, NativeKind::KeyboardAdded);
        let EventKind::DeviceInsert { device } = kind else {
            panic!("expected DeviceInsert, got {:?}", kind);
        };
        assert!(device.is_null());
        assert_eq!(device.kind(), ObjectKind::Keyboard);
    }

    #[test]
    fn duplicate_inserts_are_discarded() {
        let f = fixture();
        assert_eq!(run(&f.objects, NativeKind::KeyboardAdded), EventKind::Nothing);
        assert_eq!(run(&f.objects, NativeKind::MouseAdded), EventKind::Nothing);
        assert_eq!(
            run(
                &f.objects,
                NativeKind::ControllerAdded {
                    instance: 3,
                    name: "again".into()
                }
            ),
            EventKind::Nothing
        );
    }

    #[test]
    fn remove_resolves_instance() {
        let f = fixture();
        assert_eq!(
            run(&f.objects, NativeKind::ControllerRemoved { instance: 3 }),
            EventKind::DeviceRemove { device: f.pad }
        );
        assert_eq!(
            run(&f.objects, NativeKind::ControllerRemoved { instance: 4 }),
            EventKind::Nothing
        );
    }

    //=====================================================================
    // Controller Tests
    //=====================================================================

    #[test]
    fn axes_map_to_sticks_and_triggers() {
        let f = fixture();
        let axis = |axis| NativeKind::ControllerAxis {
            instance: 3,
            axis,
            value: 1000,
        };

        assert!(matches!(
            run(&f.objects, axis(NativeAxis::RightY)),
            EventKind::StickMotion { stick: Stick::Right, .. }
        ));
        assert!(matches!(
            run(&f.objects, axis(NativeAxis::TriggerLeft)),
            EventKind::TriggerMotion { trigger: Trigger::Left, .. }
        ));
        assert_eq!(run(&f.objects, axis(NativeAxis::Other(6))), EventKind::Nothing);
    }

    #[test]
    fn unknown_controller_is_discarded() {
        let f = fixture();
        let kind = run(
            &f.objects,
            NativeKind::ControllerButton {
                instance: 42,
                button: gilrs::Button::South,
                state: ElementState::Pressed,
            },
        );
        assert_eq!(kind, EventKind::Nothing);
    }

    //=====================================================================
    // Window Tests
    //=====================================================================

    #[test]
    fn window_events_require_open_window() {
        let f = fixture();
        assert_eq!(
            run(&f.objects, NativeKind::WindowCloseRequested { window: 7 }),
            EventKind::WindowClose { window: f.window }
        );
        assert_eq!(
            run(
                &f.objects,
                NativeKind::WindowResized {
                    window: 8,
                    width: 1,
                    height: 1
                }
            ),
            EventKind::Nothing
        );
    }

    #[test]
    fn quit_and_unsupported() {
        let f = fixture();
        assert_eq!(run(&f.objects, NativeKind::Quit), EventKind::Quit);
        assert_eq!(run(&f.objects, NativeKind::Unsupported), EventKind::Nothing);
        assert_eq!(
            run(&f.objects, NativeKind::ModifiersChanged(Default::default())),
            EventKind::Nothing
        );
    }
}
