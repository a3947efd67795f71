//=========================================================================
// Winit Translator
//=========================================================================
//
// Converts Winit window events into native events for the core.
//
// Architecture:
//   WindowEvent → WinitTranslator → NativeEvent → Context::dispatch
//
// Stateless apart from the clock origin: modifier tracking, key mapping
// and window lookup all happen in the core, so this layer only copies
// fields and stamps the time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use winit::event::{MouseScrollDelta, WindowEvent};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{NativeEvent, NativeKind};

//=== WinitTranslator =====================================================

/// Stamps and converts Winit window events.
pub(crate) struct WinitTranslator {
    origin: Instant,
}

impl WinitTranslator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(origin: Instant) -> Self {
        Self { origin }
    }

    //--- Event Processing -------------------------------------------------

    /// Seconds elapsed since the context origin.
    pub(crate) fn timestamp(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Converts one window event of the window known as `window`.
    pub(crate) fn translate(&self, window: u64, event: &WindowEvent) -> NativeEvent {
        NativeEvent::new(self.timestamp(), translate_kind(window, event))
    }
}

//=== Conversion ==========================================================

/// Maps a window event to its native kind; unmapped events become
/// `NativeKind::Unsupported`.
///
/// Wheel line deltas are passed through as lines, pixel deltas as pixels.
pub(crate) fn translate_kind(window: u64, event: &WindowEvent) -> NativeKind {
    match event {
        //--- Keyboard -----------------------------------------------------
        WindowEvent::KeyboardInput { event: key, .. } => NativeKind::Key {
            window,
            key: key.physical_key,
            state: key.state,
            repeat: key.repeat,
        },
        WindowEvent::ModifiersChanged(modifiers) => NativeKind::ModifiersChanged(modifiers.state()),

        //--- Mouse --------------------------------------------------------
        WindowEvent::CursorMoved { position, .. } => NativeKind::CursorMoved {
            window,
            x: position.x,
            y: position.y,
            touch: false,
        },
        WindowEvent::MouseInput { state, button, .. } => NativeKind::MouseButton {
            window,
            button: *button,
            state: *state,
            touch: false,
        },
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match *delta {
                MouseScrollDelta::LineDelta(x, y) => (f64::from(x), f64::from(y)),
                MouseScrollDelta::PixelDelta(position) => (position.x, position.y),
            };
            NativeKind::MouseWheel { window, dx, dy }
        }

        //--- Window -------------------------------------------------------
        WindowEvent::Resized(size) => NativeKind::WindowResized {
            window,
            width: size.width,
            height: size.height,
        },
        WindowEvent::Moved(position) => NativeKind::WindowMoved {
            window,
            x: position.x,
            y: position.y,
        },
        WindowEvent::Focused(focused) => NativeKind::WindowFocused {
            window,
            focused: *focused,
        },
        WindowEvent::CloseRequested => NativeKind::WindowCloseRequested { window },

        _ => NativeKind::Unsupported,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::Modifiers;
    use winit::keyboard::ModifiersState;

    #[test]
    fn window_events_carry_native_id() {
        assert_eq!(
            translate_kind(9, &WindowEvent::Resized(PhysicalSize::new(800, 600))),
            NativeKind::WindowResized {
                window: 9,
                width: 800,
                height: 600
            }
        );
        assert_eq!(
            translate_kind(9, &WindowEvent::Moved(PhysicalPosition::new(-5, 10))),
            NativeKind::WindowMoved {
                window: 9,
                x: -5,
                y: 10
            }
        );
        assert_eq!(
            translate_kind(9, &WindowEvent::Focused(false)),
            NativeKind::WindowFocused {
                window: 9,
                focused: false
            }
        );
        assert_eq!(
            translate_kind(9, &WindowEvent::CloseRequested),
            NativeKind::WindowCloseRequested { window: 9 }
        );
    }

    #[test]
    fn modifiers_are_forwarded() {
        let event = WindowEvent::ModifiersChanged(Modifiers::from(ModifiersState::SHIFT));
        assert_eq!(
            translate_kind(1, &event),
            NativeKind::ModifiersChanged(ModifiersState::SHIFT)
        );
    }

    #[test]
    fn unrelated_events_are_unsupported() {
        assert_eq!(translate_kind(1, &WindowEvent::Destroyed), NativeKind::Unsupported);
        assert_eq!(
            translate_kind(1, &WindowEvent::RedrawRequested),
            NativeKind::Unsupported
        );
    }

    #[test]
    fn timestamps_are_monotonic() {
        let translator = WinitTranslator::new(Instant::now());
        let first = translator.translate(1, &WindowEvent::Focused(true));
        let second = translator.translate(1, &WindowEvent::Focused(false));
        assert!(second.timestamp >= first.timestamp);
        assert!(first.timestamp >= 0.0);
    }
}
