//=========================================================================
// Event Enricher
//=========================================================================
//
// Applies one native event to device and window state and completes the
// canonical event the normalizer produced for it.
//
// Every mutation caused by input happens here, before the event is
// handed to anyone, so a handler observing an event always sees device
// state that already includes it.
//
//   DeviceInsert   → allocate tracker, fill the placeholder handle
//   DeviceRemove   → close the tracker
//   press/release  → ButtonTracker (timestamps, history on press)
//   motion/wheel   → cursor position, deltas, wheel totals
//   analog axis    → shadow axes → deadzone → coordinate / value
//   window events  → cached window geometry and focus
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};
use winit::event::ElementState;

//=== Internal Dependencies ===============================================

use super::devices::{Controller, DeadzonePolicy, Keyboard, Mouse};
use super::event::{CanonicalEvent, EventKind};
use crate::core::objects::Objects;
use crate::core::platform_bridge::{NativeAxis, NativeEvent, NativeKind};
use crate::core::registry::ObjectKind;

//=== Enrichment ==========================================================

/// Mutates state for `native` and fills in the placeholders of `event`.
///
/// New controllers receive a copy of `policy`. If the mutation turns out
/// to be impossible (a singleton that is already open, a device closed in
/// between), `event` degrades to `Nothing`.
pub(crate) fn enrich(
    native: &NativeEvent,
    event: &mut CanonicalEvent,
    objects: &mut Objects,
    policy: &DeadzonePolicy,
) {
    let timestamp = native.timestamp;

    // Modifier changes never produce an event of their own.
    if let NativeKind::ModifiersChanged(state) = native.kind {
        if let Some(keyboard) = objects
            .keyboard()
            .and_then(|k| objects.keyboards.get_mut(k))
        {
            keyboard.modifiers = state.into();
        }
        return;
    }

    let applied = match (&native.kind, &mut event.kind) {
        (_, EventKind::Nothing) => return,

        //--- Device Lifecycle ---------------------------------------------
        (NativeKind::KeyboardAdded, EventKind::DeviceInsert { device }) => {
            objects.add_keyboard(Keyboard::new()).map(|handle| {
                info!(target: "input", "Keyboard attached as {:?}", handle);
                *device = handle;
            })
        }
        (NativeKind::MouseAdded, EventKind::DeviceInsert { device }) => {
            objects.add_mouse(Mouse::new()).map(|handle| {
                info!(target: "input", "Mouse attached as {:?}", handle);
                *device = handle;
            })
        }
        (NativeKind::ControllerAdded { instance, name }, EventKind::DeviceInsert { device }) => {
            let handle = objects.add_controller(Controller::new(*instance, name.as_str(), *policy));
            info!(
                target: "input",
                "Controller '{}' (instance {}) attached as {:?}",
                name, instance, handle
            );
            *device = handle;
            Some(())
        }
        (_, EventKind::DeviceRemove { device }) => {
            info!(target: "input", "Controller {:?} detached", device);
            objects.close(*device).then_some(())
        }

        //--- Keyboard -----------------------------------------------------
        (NativeKind::Key { state, .. }, EventKind::KeyPress { keyboard, key, .. })
        | (NativeKind::Key { state, .. }, EventKind::KeyRelease { keyboard, key, .. }) => {
            objects.keyboards.get_mut(*keyboard).map(|k| {
                if *state == ElementState::Pressed {
                    k.keys.press(*key, timestamp);
                } else {
                    k.keys.release(*key, timestamp);
                }
            })
        }

        //--- Mouse --------------------------------------------------------
        (
            NativeKind::CursorMoved { .. },
            EventKind::MouseMotion {
                mouse,
                window,
                x,
                y,
                dx,
                dy,
            },
        ) => objects.mice.get_mut(*mouse).map(|m| {
            let (delta_x, delta_y) = m.move_to(*x, *y, *window);
            *dx = delta_x;
            *dy = delta_y;
        }),
        (
            NativeKind::MouseButton { .. },
            EventKind::MouseButton {
                mouse,
                button,
                pressed,
                ..
            },
        ) => objects.mice.get_mut(*mouse).map(|m| {
            if *pressed {
                m.buttons.press(*button, timestamp);
            } else {
                m.buttons.release(*button, timestamp);
            }
        }),
        (NativeKind::MouseWheel { .. }, EventKind::MouseWheel { mouse, dx, dy, .. }) => {
            objects.mice.get_mut(*mouse).map(|m| m.scroll(*dx, *dy))
        }

        //--- Controller ---------------------------------------------------
        (
            NativeKind::ControllerButton { .. },
            EventKind::ControllerButton {
                controller,
                button,
                pressed,
            },
        ) => objects.controllers.get_mut(*controller).map(|c| {
            if *pressed {
                c.buttons.press(*button, timestamp);
            } else {
                c.buttons.release(*button, timestamp);
            }
        }),
        (
            NativeKind::ControllerAxis { axis, value, .. },
            EventKind::StickMotion {
                controller,
                stick,
                coord,
            },
        ) => objects.controllers.get_mut(*controller).map(|c| {
            *coord = match axis {
                NativeAxis::LeftX | NativeAxis::RightX => c.move_stick_x(*stick, *value),
                _ => c.move_stick_y(*stick, *value),
            };
        }),
        (
            NativeKind::ControllerAxis { value, .. },
            EventKind::TriggerMotion {
                controller,
                trigger,
                value: shaped,
            },
        ) => objects
            .controllers
            .get_mut(*controller)
            .map(|c| *shaped = c.pull_trigger(*trigger, *value)),

        //--- Window -------------------------------------------------------
        (
            _,
            EventKind::WindowResize {
                window,
                width,
                height,
            },
        ) => objects.windows.get_mut(*window).map(|w| {
            w.width = *width;
            w.height = *height;
        }),
        (_, EventKind::WindowMove { window, x, y }) => {
            objects.windows.get_mut(*window).map(|w| {
                w.x = *x;
                w.y = *y;
            })
        }
        (_, EventKind::WindowFocus { window, focused }) => {
            objects.windows.get_mut(*window).map(|w| w.focused = *focused)
        }

        // Nothing to record; the application decides what closing means.
        (_, EventKind::WindowClose { .. }) | (_, EventKind::Quit) => Some(()),

        (native, canonical) => {
            debug!(
                target: "input::enrich",
                "No state change for {:?} as {:?}", native, canonical
            );
            Some(())
        }
    };

    if applied.is_none() {
        let kind = event.device().or(event.window()).map(|h| h.kind());
        match kind {
            Some(ObjectKind::Keyboard) | Some(ObjectKind::Mouse) => {
                debug!(target: "input::enrich", "Singleton already present, dropping {:?}", event.kind)
            }
            _ => warn!(target: "input::enrich", "Target of {:?} is not open", event.kind),
        }
        event.kind = EventKind::Nothing;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::normalizer::normalize;
    use crate::core::input::{KeyCode, MouseButton, Stick, StickCoordinate, Trigger};
    use crate::core::objects::Window;
    use crate::core::registry::{Handle, IdSequence};
    use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

    fn objects() -> Objects {
        Objects::new(IdSequence::new(5))
    }

    /// Runs one native event through normalize + enrich, like dispatch does.
    fn feed(objects: &mut Objects, timestamp: f64, kind: NativeKind) -> CanonicalEvent {
        let native = NativeEvent::new(timestamp, kind);
        let mut event = normalize(&native, objects);
        enrich(&native, &mut event, objects, &DeadzonePolicy::default());
        event
    }

    fn with_devices() -> (Objects, Handle, Handle) {
        let mut objects = objects();
        feed(&mut objects, 0.0, NativeKind::KeyboardAdded);
        feed(&mut objects, 0.0, NativeKind::MouseAdded);
        let keyboard = objects.keyboard().unwrap();
        let mouse = objects.mouse().unwrap();
        (objects, keyboard, mouse)
    }

    fn key(code: WinitKeyCode, state: ElementState) -> NativeKind {
        NativeKind::Key {
            window: 1,
            key: PhysicalKey::Code(code),
            state,
            repeat: false,
        }
    }

    //=====================================================================
    // Device Lifecycle Tests
    //=====================================================================

    #[test]
    fn insert_fills_allocated_handle() {
        let mut objects = objects();
        let event = feed(&mut objects, 0.0, NativeKind::KeyboardAdded);

        let EventKind::DeviceInsert { device } = event.kind else {
            panic!("expected DeviceInsert, got {:?}", event.kind);
        };
        assert!(!device.is_null());
        assert_eq!(objects.keyboard(), Some(device));
        assert!(objects.is_open(device));
    }

    #[test]
    fn controller_hotplug_round_trip() {
        let mut objects = objects();
        let inserted = feed(
            &mut objects,
            0.0,
            NativeKind::ControllerAdded {
                instance: 9,
                name: "Pad".into(),
            },
        );
        let pad = inserted.device().unwrap();
        assert_eq!(objects.controller_by_instance(9), Some(pad));
        assert_eq!(objects.controllers().get(pad).unwrap().name(), "Pad");

        let removed = feed(&mut objects, 1.0, NativeKind::ControllerRemoved { instance: 9 });
        assert_eq!(removed.kind, EventKind::DeviceRemove { device: pad });
        assert!(!objects.is_open(pad));
    }

    #[test]
    fn new_controllers_receive_policy() {
        let mut objects = objects();
        let policy = DeadzonePolicy {
            stick_value: 0.5,
            ..DeadzonePolicy::default()
        };
        let native = NativeEvent::new(
            0.0,
            NativeKind::ControllerAdded {
                instance: 1,
                name: "Pad".into(),
            },
        );
        let mut event = normalize(&native, &objects);
        enrich(&native, &mut event, &mut objects, &policy);

        let pad = event.device().unwrap();
        assert_eq!(objects.controllers().get(pad).unwrap().deadzones, policy);
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn press_then_release_records_times_and_history() {
        let (mut objects, keyboard, _) = with_devices();

        feed(&mut objects, 0.0, key(WinitKeyCode::KeyK, ElementState::Pressed));
        feed(&mut objects, 0.2, key(WinitKeyCode::KeyK, ElementState::Released));

        let keys = &objects.keyboards().get(keyboard).unwrap().keys;
        assert_eq!(keys.last_press_time(KeyCode::KeyK), Some(0.0));
        assert_eq!(keys.last_release_time(KeyCode::KeyK), Some(0.2));
        assert_eq!(keys.history().written(), 1);
        assert!(keys.check_history_of(&[&[KeyCode::KeyK]]));
        assert!(!keys.is_down(KeyCode::KeyK));
    }

    #[test]
    fn modifiers_update_keyboard_state() {
        let (mut objects, keyboard, _) = with_devices();

        let event = feed(&mut objects, 0.1, NativeKind::ModifiersChanged(ModifiersState::CONTROL));
        assert!(event.is_nothing());
        assert!(objects.keyboards().get(keyboard).unwrap().modifiers.ctrl);

        let press = feed(&mut objects, 0.2, key(WinitKeyCode::KeyC, ElementState::Pressed));
        assert!(matches!(press.kind, EventKind::KeyPress { modifiers, .. } if modifiers.ctrl));
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn motion_fills_deltas() {
        let (mut objects, _, mouse) = with_devices();
        let window = objects.add_window(Window::new(1, "main", 100, 100));
        let motion = |x, y| NativeKind::CursorMoved {
            window: 1,
            x,
            y,
            touch: false,
        };

        let first = feed(&mut objects, 0.0, motion(10.0, 10.0));
        assert!(matches!(
            first.kind,
            EventKind::MouseMotion { dx, dy, .. } if dx == 0.0 && dy == 0.0
        ));
        let event = feed(&mut objects, 0.1, motion(13.0, 6.0));
        assert_eq!(
            event.kind,
            EventKind::MouseMotion {
                mouse,
                window: Some(window),
                x: 13.0,
                y: 6.0,
                dx: 3.0,
                dy: -4.0,
            }
        );
        assert_eq!(objects.mice().get(mouse).unwrap().window, Some(window));
    }

    #[test]
    fn mouse_buttons_and_wheel() {
        let (mut objects, _, mouse) = with_devices();
        feed(
            &mut objects,
            0.5,
            NativeKind::MouseButton {
                window: 1,
                button: winit::event::MouseButton::Left,
                state: ElementState::Pressed,
                touch: false,
            },
        );
        feed(
            &mut objects,
            0.6,
            NativeKind::MouseWheel {
                window: 1,
                dx: 0.0,
                dy: -2.0,
            },
        );

        let m = objects.mice().get(mouse).unwrap();
        assert!(m.buttons.is_down(MouseButton::Left));
        assert_eq!(m.buttons.last_press_time(MouseButton::Left), Some(0.5));
        assert_eq!(m.wheel_y, -2.0);
    }

    //=====================================================================
    // Controller Tests
    //=====================================================================

    #[test]
    fn stick_axes_are_shaped_with_y_flipped() {
        let mut objects = objects();
        feed(
            &mut objects,
            0.0,
            NativeKind::ControllerAdded {
                instance: 2,
                name: "Pad".into(),
            },
        );

        // Full deflection up: native y is negative.
        let event = feed(
            &mut objects,
            0.1,
            NativeKind::ControllerAxis {
                instance: 2,
                axis: NativeAxis::LeftY,
                value: i16::MIN,
            },
        );
        let EventKind::StickMotion { stick, coord, .. } = event.kind else {
            panic!("expected StickMotion, got {:?}", event.kind);
        };
        assert_eq!(stick, Stick::Left);
        assert!((coord.magnitude - 1.0).abs() < 1e-9);
        assert!(coord.y > 0.99);

        // Inside the default deadzone.
        let small = feed(
            &mut objects,
            0.2,
            NativeKind::ControllerAxis {
                instance: 2,
                axis: NativeAxis::LeftY,
                value: 1000,
            },
        );
        assert!(matches!(
            small.kind,
            EventKind::StickMotion { coord, .. } if coord == StickCoordinate::ZERO
        ));
    }

    #[test]
    fn trigger_axis_is_shaped() {
        let mut objects = objects();
        feed(
            &mut objects,
            0.0,
            NativeKind::ControllerAdded {
                instance: 2,
                name: "Pad".into(),
            },
        );
        let event = feed(
            &mut objects,
            0.1,
            NativeKind::ControllerAxis {
                instance: 2,
                axis: NativeAxis::TriggerRight,
                value: i16::MAX,
            },
        );
        assert!(matches!(
            event.kind,
            EventKind::TriggerMotion { trigger: Trigger::Right, value, .. } if value == 1.0
        ));
    }

    //=====================================================================
    // Window Tests
    //=====================================================================

    #[test]
    fn window_geometry_is_cached() {
        let mut objects = objects();
        let window = objects.add_window(Window::new(4, "main", 100, 100));

        feed(
            &mut objects,
            0.0,
            NativeKind::WindowResized {
                window: 4,
                width: 800,
                height: 600,
            },
        );
        feed(&mut objects, 0.0, NativeKind::WindowMoved { window: 4, x: 5, y: 6 });
        feed(
            &mut objects,
            0.0,
            NativeKind::WindowFocused {
                window: 4,
                focused: true,
            },
        );

        let w = objects.windows().get(window).unwrap();
        assert_eq!((w.width, w.height, w.x, w.y, w.focused), (800, 600, 5, 6, true));
    }
}
