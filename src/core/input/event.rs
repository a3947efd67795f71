//=========================================================================
// Canonical Event Types
//
// Backend-agnostic representation of everything the platform core
// delivers to application code.
//
// This module abstracts away platform-specific input (winit, gilrs)
// into a unified format: logical key/button identifiers with stable
// indices, and one tagged `CanonicalEvent` per meaningful native event.
//
// Event Flow:
// ```text
// NativeEvent (winit / gilrs / channel)
//         ↓
//    Normalizer (read-only lookups)
//         ↓
//    Enricher (device state, history, deadzones)
//         ↓
//    CanonicalEvent (this module) → handler / caller
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::deadzone::StickCoordinate;
use crate::core::registry::Handle;

//=== Button ==============================================================

/// A logical key or button with a dense index.
///
/// Indices are stable and below `COUNT`, which never exceeds 128 so a
/// full down-state fits in one `u128` snapshot.
pub trait Button: Copy + Eq + std::fmt::Debug + 'static {
    /// Number of distinct buttons of this family.
    const COUNT: usize;

    /// Dense index in `0..COUNT`.
    fn index(self) -> usize;

    /// Inverse of [`Button::index`].
    fn from_index(index: usize) -> Option<Self>;
}

macro_rules! indexed_buttons {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in index order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl Button for $name {
            const COUNT: usize = $name::ALL.len();

            fn index(self) -> usize {
                self as usize
            }

            fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }
    };
}

//=== MouseButton =========================================================

indexed_buttons! {
    /// Physical mouse button identifier.
    ///
    /// `Back` and `Forward` are the usual thumb buttons; anything beyond
    /// those has no logical index and is discarded by the normalizer.
    MouseButton {
        /// Primary button (typically left).
        Left,
        /// Middle button (wheel click).
        Middle,
        /// Secondary button (typically right).
        Right,
        Back,
        Forward,
    }
}

//=== KeyCode =============================================================

indexed_buttons! {
    /// Physical keyboard key identifier.
    ///
    /// Represents the physical key location, not the character produced.
    /// For example, `KeyA` is always the same physical key regardless of
    /// keyboard layout (QWERTY vs AZERTY).
    KeyCode {
        Digit0, Digit1, Digit2, Digit3, Digit4,
        Digit5, Digit6, Digit7, Digit8, Digit9,

        KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
        KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
        KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

        F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

        ArrowDown, ArrowLeft, ArrowRight, ArrowUp,

        Space, Enter, Escape, Tab, Backspace, Delete,
        Insert, Home, End, PageUp, PageDown,

        ShiftLeft, ShiftRight, ControlLeft, ControlRight,
        AltLeft, AltRight, SuperLeft, SuperRight,

        Minus, Equal, BracketLeft, BracketRight, Backslash,
        Semicolon, Quote, Comma, Period, Slash, Backquote, CapsLock,

        Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
        Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
        NumpadAdd, NumpadSubtract, NumpadMultiply, NumpadDivide,
        NumpadEnter, NumpadDecimal,
    }
}

//=== ControllerButton ====================================================

indexed_buttons! {
    /// Digital buttons of a standard-layout game controller.
    ///
    /// Face buttons use the Xbox naming (A bottom, B right, X left,
    /// Y top). Analog triggers are axes, not buttons.
    ControllerButton {
        A, B, X, Y,
        Back, Guide, Start,
        LeftStick, RightStick,
        LeftShoulder, RightShoulder,
        DPadUp, DPadDown, DPadLeft, DPadRight,
    }
}

//=== Stick / Trigger =====================================================

/// Analog stick of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

/// Analog trigger of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Left,
    Right,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt, Super).
///
/// The system does not distinguish between left/right variants here;
/// the individual modifier keys are still tracked as regular keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        logo: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ..Self::NONE };

    /// Ctrl only.
    pub const CTRL: Self = Self { ctrl: true, ..Self::NONE };

    /// Alt only.
    pub const ALT: Self = Self { alt: true, ..Self::NONE };
}

//=== EventKind ===========================================================

/// Kind discriminator and kind-specific payload of a canonical event.
///
/// Device handles inside an event are non-owning. For `DeviceRemove` the
/// handle is already closed by the time the event is delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Discarded native event; filtered before reaching the caller.
    Nothing,

    /// Application quit requested.
    Quit,

    //--- Device Lifecycle -------------------------------------------------
    DeviceInsert { device: Handle },
    DeviceRemove { device: Handle },

    //--- Keyboard ---------------------------------------------------------
    KeyPress {
        keyboard: Handle,
        window: Option<Handle>,
        key: KeyCode,
        modifiers: Modifiers,
    },
    KeyRelease {
        keyboard: Handle,
        window: Option<Handle>,
        key: KeyCode,
        modifiers: Modifiers,
    },

    //--- Mouse ------------------------------------------------------------
    /// Cursor moved. Coordinates are window-relative pixels, top-left
    /// origin; `dx`/`dy` are relative to the previous position.
    MouseMotion {
        mouse: Handle,
        window: Option<Handle>,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
    },
    MouseButton {
        mouse: Handle,
        window: Option<Handle>,
        button: MouseButton,
        pressed: bool,
        x: f64,
        y: f64,
    },
    MouseWheel {
        mouse: Handle,
        window: Option<Handle>,
        dx: f64,
        dy: f64,
    },

    //--- Controller -------------------------------------------------------
    StickMotion {
        controller: Handle,
        stick: Stick,
        coord: StickCoordinate,
    },
    TriggerMotion {
        controller: Handle,
        trigger: Trigger,
        value: f64,
    },
    ControllerButton {
        controller: Handle,
        button: ControllerButton,
        pressed: bool,
    },

    //--- Window -----------------------------------------------------------
    WindowResize { window: Handle, width: u32, height: u32 },
    WindowMove { window: Handle, x: i32, y: i32 },
    WindowFocus { window: Handle, focused: bool },
    WindowClose { window: Handle },

    //--- Timing -----------------------------------------------------------
    AnimationFinished { animation: Handle },

    /// A named timer reached its threshold.
    ///
    /// `overshoot` is the time already elapsed past the most recent
    /// threshold crossing; `fire_count` is 1-based; `crossings` counts the
    /// thresholds passed within the single advance that fired.
    TimerFired {
        clock: Handle,
        name: String,
        overshoot: f64,
        fire_count: u32,
        crossings: u32,
    },
}

//=== CanonicalEvent ======================================================

/// One normalized, enriched event with its timestamp (seconds since the
/// context origin).
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEvent {
    pub timestamp: f64,
    pub kind: EventKind,
}

impl CanonicalEvent {
    pub fn new(timestamp: f64, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }

    pub fn nothing(timestamp: f64) -> Self {
        Self::new(timestamp, EventKind::Nothing)
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self.kind, EventKind::Nothing)
    }

    /// Window this event concerns, if any.
    pub fn window(&self) -> Option<Handle> {
        match self.kind {
            EventKind::KeyPress { window, .. }
            | EventKind::KeyRelease { window, .. }
            | EventKind::MouseMotion { window, .. }
            | EventKind::MouseButton { window, .. }
            | EventKind::MouseWheel { window, .. } => window,
            EventKind::WindowResize { window, .. }
            | EventKind::WindowMove { window, .. }
            | EventKind::WindowFocus { window, .. }
            | EventKind::WindowClose { window } => Some(window),
            _ => None,
        }
    }

    /// Input device this event concerns, if any.
    pub fn device(&self) -> Option<Handle> {
        match self.kind {
            EventKind::DeviceInsert { device } | EventKind::DeviceRemove { device } => {
                Some(device)
            }
            EventKind::KeyPress { keyboard, .. } | EventKind::KeyRelease { keyboard, .. } => {
                Some(keyboard)
            }
            EventKind::MouseMotion { mouse, .. }
            | EventKind::MouseButton { mouse, .. }
            | EventKind::MouseWheel { mouse, .. } => Some(mouse),
            EventKind::StickMotion { controller, .. }
            | EventKind::TriggerMotion { controller, .. }
            | EventKind::ControllerButton { controller, .. } => Some(controller),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ObjectKind;

    //=====================================================================
    // Button Index Tests
    //=====================================================================

    #[test]
    fn indices_are_dense_and_invertible() {
        for (i, key) in KeyCode::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
            assert_eq!(KeyCode::from_index(i), Some(*key));
        }
        assert_eq!(KeyCode::from_index(KeyCode::COUNT), None);
    }

    #[test]
    fn every_family_fits_in_a_snapshot() {
        assert!(KeyCode::COUNT <= 128);
        assert!(MouseButton::COUNT <= 128);
        assert!(ControllerButton::COUNT <= 128);
    }

    #[test]
    fn family_counts() {
        assert_eq!(MouseButton::COUNT, 5);
        assert_eq!(ControllerButton::COUNT, 15);
        assert_eq!(KeyCode::KeyA.index(), 10);
    }

    //=====================================================================
    // Modifiers Tests
    //=====================================================================

    #[test]
    fn modifier_constants() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert!(Modifiers::SHIFT.shift && !Modifiers::SHIFT.ctrl);
        assert!(Modifiers::CTRL.ctrl && !Modifiers::CTRL.alt);
        assert!(Modifiers::ALT.alt && !Modifiers::ALT.logo);
    }

    //=====================================================================
    // CanonicalEvent Tests
    //=====================================================================

    #[test]
    fn nothing_is_nothing() {
        assert!(CanonicalEvent::nothing(1.0).is_nothing());
        assert!(!CanonicalEvent::new(0.0, EventKind::Quit).is_nothing());
    }

    #[test]
    fn window_and_device_accessors() {
        let window = Handle::null(ObjectKind::Window);
        let keyboard = Handle::null(ObjectKind::Keyboard);

        let press = CanonicalEvent::new(
            0.0,
            EventKind::KeyPress {
                keyboard,
                window: Some(window),
                key: KeyCode::Space,
                modifiers: Modifiers::NONE,
            },
        );
        assert_eq!(press.window(), Some(window));
        assert_eq!(press.device(), Some(keyboard));

        let close = CanonicalEvent::new(0.0, EventKind::WindowClose { window });
        assert_eq!(close.window(), Some(window));
        assert_eq!(close.device(), None);

        assert_eq!(CanonicalEvent::new(0.0, EventKind::Quit).window(), None);
    }
}
