//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Native event model: the contract between backends and the core.
//
// Backends (winit, gilrs, tests) produce `NativeEvent`s; the core
// normalizes each one into at most one canonical event. Values keep the
// backend's conventions (winit key/button types, gilrs buttons, signed
// 16-bit axes with y pointing down) so every conversion happens in one
// place on the core side.
//
//=========================================================================

//=== External Dependencies ===============================================

use gilrs::Button as GilrsButton;
use winit::event::{ElementState, MouseButton as WinitMouseButton};
use winit::keyboard::{ModifiersState, PhysicalKey};

//=== NativeAxis ==========================================================

/// One analog axis as reported by a controller backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
    /// Axis without a standard-layout meaning.
    Other(u32),
}

//=== NativeKind ==========================================================

/// Payload of one native event.
///
/// Window ids are the backend's opaque window identifiers; controller
/// instance ids are the backend's per-device ids.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeKind {
    //--- Device Lifecycle -------------------------------------------------
    /// Self-generated once at startup for the process-wide keyboard.
    KeyboardAdded,
    /// Self-generated once at startup for the process-wide mouse.
    MouseAdded,
    ControllerAdded { instance: u32, name: String },
    ControllerRemoved { instance: u32 },

    //--- Keyboard ---------------------------------------------------------
    Key {
        window: u64,
        key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    },
    ModifiersChanged(ModifiersState),

    //--- Mouse ------------------------------------------------------------
    /// Absolute cursor position in window pixels.
    CursorMoved { window: u64, x: f64, y: f64, touch: bool },
    MouseButton {
        window: u64,
        button: WinitMouseButton,
        state: ElementState,
        touch: bool,
    },
    MouseWheel { window: u64, dx: f64, dy: f64 },

    //--- Controller -------------------------------------------------------
    ControllerButton {
        instance: u32,
        button: GilrsButton,
        state: ElementState,
    },
    /// Signed 16-bit sample; vertical stick axes are down-positive.
    ControllerAxis { instance: u32, axis: NativeAxis, value: i16 },

    //--- Window -----------------------------------------------------------
    WindowResized { window: u64, width: u32, height: u32 },
    WindowMoved { window: u64, x: i32, y: i32 },
    WindowFocused { window: u64, focused: bool },
    WindowCloseRequested { window: u64 },

    //--- Application ------------------------------------------------------
    Quit,
    /// Anything the backend reports that the core has no use for.
    Unsupported,
}

//=== NativeEvent =========================================================

/// A native event with its timestamp in seconds since the context origin.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    pub timestamp: f64,
    pub kind: NativeKind,
}

impl NativeEvent {
    pub fn new(timestamp: f64, kind: NativeKind) -> Self {
        Self { timestamp, kind }
    }
}
