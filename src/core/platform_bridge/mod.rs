//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges platform backends (winit, gilrs, channels) with the core.
//
// This module defines the contract between backends and the event core,
// so a backend can be swapped (or replaced by a test feeding a channel)
// without touching normalization or device state.
//
// Components:
// - `interface`: native event model (the contract)
// - `event_source`: pull interface and the channel-backed source
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event_source;
pub mod interface;

//=== Public API ==========================================================

pub use event_source::{ChannelSource, EventSource};
pub use interface::{NativeAxis, NativeEvent, NativeKind};
