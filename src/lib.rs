//=========================================================================
// Aetheric Platform: Library Root
//
// Input and timing event core of a cross-platform multimedia layer.
//
// Responsibilities:
// - Expose the `Context` facade owning every object and device
// - Normalize native events (Winit, gilrs, channels) into canonical ones
// - Keep per-device state, press history and deadzone-shaped analog input
// - Drive frame animations and named timers from a per-frame delta
//
// Typical usage:
// ```no_run
// use aetheric_platform::{ContextBuilder, platform::{self, Flow}};
//
// fn main() -> Result<(), aetheric_platform::Error> {
//     let context = ContextBuilder::new().build();
//     platform::run(context, "Demo", |_ctx, _event| Flow::Continue)?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the backend-agnostic systems (registry, input, timing,
// objects). It is public so applications can feed native events
// themselves, e.g. from a channel in tests.
//
pub mod core;

// `platform` runs a context on a real Winit event loop with gilrs.
pub mod platform;

// `prelude` re-exports the common types.
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod context;

//--- Public Exports ------------------------------------------------------

pub use context::{Context, ContextBuilder, Handler, PENDING_CAPACITY};
pub use core::error::{Error, Result};
