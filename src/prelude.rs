//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_platform::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Context facade
pub use crate::context::{Context, ContextBuilder};
pub use crate::core::error::{Error, Result};

// Registry
pub use crate::core::registry::{Handle, ObjectKind};

// Input
pub use crate::core::input::{
    Button, CanonicalEvent, ControllerButton, DeadzoneMode, EventKind, KeyCode, Modifiers,
    MouseButton, Stick, StickCoordinate, Trigger,
};

// Properties
pub use crate::core::objects::PropertyValue;

// Native event ingress
pub use crate::core::platform_bridge::{ChannelSource, EventSource, NativeEvent, NativeKind};

// Event loop
pub use crate::platform::{run, Flow};
