//=========================================================================
// Gamepad Pump
//=========================================================================
//
// Polls gilrs and converts controller activity into native events.
//
// Architecture:
//   gilrs::Gilrs ──next_event()──► GamepadPump ──► Vec<NativeEvent>
//
// Gilrs reports analog values as f32 in [-1, 1] with y pointing up. The
// core expects the signed 16-bit convention with y pointing down, so
// stick axes are scaled and vertical axes negated here. Analog triggers
// arrive either as `ButtonChanged` on the `*Trigger2` buttons or as the
// Z axes depending on the mapping; both become trigger axis events.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use log::{debug, error, info, trace, warn};
use winit::event::ElementState;

//=== Internal Dependencies ===============================================

use crate::core::error::{Error, Result};
use crate::core::platform_bridge::{NativeAxis, NativeEvent, NativeKind};

//=== GamepadPump =========================================================

/// Non-blocking source of controller events.
pub(crate) struct GamepadPump {
    gilrs: Gilrs,
    origin: Instant,
}

impl GamepadPump {
    /// Initializes gilrs.
    ///
    /// Platforms without gamepad support yield a pump that never reports
    /// anything. Any other initialization failure is fatal.
    pub(crate) fn new(origin: Instant) -> Result<Self> {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => {
                info!(target: "platform::gamepad", "Initialized gilrs");
                gilrs
            }
            Err(gilrs::Error::NotImplemented(dummy)) => {
                warn!(target: "platform::gamepad", "Gamepads are not supported on this platform");
                dummy
            }
            Err(e) => {
                error!(target: "platform::gamepad", "Failed to initialize gilrs: {}", e);
                return Err(Error::Backend(e.to_string()));
            }
        };
        Ok(Self { gilrs, origin })
    }

    /// One `ControllerAdded` per pad already connected at startup.
    pub(crate) fn connected(&self) -> Vec<NativeEvent> {
        let timestamp = self.origin.elapsed().as_secs_f64();
        self.gilrs
            .gamepads()
            .map(|(id, pad)| {
                info!(target: "platform::gamepad", "Found gamepad {} ({})", pad.name(), id);
                NativeEvent::new(
                    timestamp,
                    NativeKind::ControllerAdded {
                        instance: instance_id(id),
                        name: pad.name().to_owned(),
                    },
                )
            })
            .collect()
    }

    /// Every event gilrs has queued since the last call.
    pub(crate) fn drain(&mut self) -> Vec<NativeEvent> {
        let mut events = Vec::new();
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            trace!(target: "platform::gamepad", "gilrs event {:?} from {}", event, id);
            let timestamp = self.origin.elapsed().as_secs_f64();
            let instance = instance_id(id);

            let kind = match event {
                EventType::Connected => {
                    let name = self.gilrs.gamepad(id).name().to_owned();
                    info!(target: "platform::gamepad", "Gamepad {} connected ({})", name, id);
                    Some(NativeKind::ControllerAdded { instance, name })
                }
                EventType::Disconnected => {
                    info!(target: "platform::gamepad", "Gamepad {} disconnected", id);
                    Some(NativeKind::ControllerRemoved { instance })
                }
                EventType::ButtonPressed(button, _) => {
                    button_kind(instance, button, ElementState::Pressed)
                }
                EventType::ButtonReleased(button, _) => {
                    button_kind(instance, button, ElementState::Released)
                }
                EventType::ButtonChanged(button, value, _) => {
                    trigger_from_button(button).map(|axis| NativeKind::ControllerAxis {
                        instance,
                        axis,
                        value: scale_axis(value),
                    })
                }
                EventType::AxisChanged(axis, value, _) => {
                    convert_axis(axis, value).map(|(axis, value)| NativeKind::ControllerAxis {
                        instance,
                        axis,
                        value,
                    })
                }
                _ => None,
            };

            match kind {
                Some(kind) => events.push(NativeEvent::new(timestamp, kind)),
                None => debug!(target: "platform::gamepad", "Ignored gilrs event {:?}", event),
            }
        }
        events
    }
}

//=== Conversion ==========================================================

fn instance_id(id: GamepadId) -> u32 {
    u32::try_from(usize::from(id)).unwrap_or(u32::MAX)
}

/// Digital button event; analog trigger buttons are reported as axes.
fn button_kind(instance: u32, button: Button, state: ElementState) -> Option<NativeKind> {
    if trigger_from_button(button).is_some() {
        return None;
    }
    Some(NativeKind::ControllerButton {
        instance,
        button,
        state,
    })
}

fn trigger_from_button(button: Button) -> Option<NativeAxis> {
    match button {
        Button::LeftTrigger2 => Some(NativeAxis::TriggerLeft),
        Button::RightTrigger2 => Some(NativeAxis::TriggerRight),
        _ => None,
    }
}

/// Scales a gilrs value in `[-1, 1]` to a signed 16-bit sample.
fn scale_axis(value: f32) -> i16 {
    let scaled = (f64::from(value).clamp(-1.0, 1.0) * f64::from(i16::MAX)).round();
    // Within i16 range after the clamp.
    scaled as i16
}

/// Maps a gilrs axis to the native axis and sample, flipping vertical
/// stick axes to the down-positive convention.
fn convert_axis(axis: Axis, value: f32) -> Option<(NativeAxis, i16)> {
    let converted = match axis {
        Axis::LeftStickX => (NativeAxis::LeftX, scale_axis(value)),
        Axis::LeftStickY => (NativeAxis::LeftY, scale_axis(-value)),
        Axis::RightStickX => (NativeAxis::RightX, scale_axis(value)),
        Axis::RightStickY => (NativeAxis::RightY, scale_axis(-value)),
        Axis::LeftZ => (NativeAxis::TriggerLeft, scale_axis(value)),
        Axis::RightZ => (NativeAxis::TriggerRight, scale_axis(value)),
        _ => return None,
    };
    Some(converted)
}

//=========================================================================
// Unit Tests
//=========================================================================
