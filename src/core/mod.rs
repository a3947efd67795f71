//=========================================================================
// Core Systems
//
// Backend-agnostic systems owned by a `Context`.
//
// Responsibilities:
// - `registry`: handles, identities and creation-ordered registries
// - `objects`: every object kind, ownership cascades and properties
// - `input`: canonical events, device trackers, history, deadzones
// - `timing`: frame animations and named timer clocks
// - `platform_bridge`: the native event contract backends produce
// - `error`: fatal-class errors
//
// Notes:
// Nothing in here spawns threads or touches the OS. Backends live in
// `crate::platform` and only ever talk to the core through native events.
//
//=========================================================================

pub mod error;
pub mod input;
pub mod objects;
pub mod platform_bridge;
pub mod registry;
pub mod timing;
