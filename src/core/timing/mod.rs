//=========================================================================
// Timing
//=========================================================================
//
// Delta-driven state machines: sprite animations and named timer clocks.
//
// Both are advanced by the same per-frame delta. Neither reads a wall
// clock, so tests drive them with exact deltas.
//
//=========================================================================

//=== Submodules ==========================================================

mod animation;
mod clock;

//=== Public API ==========================================================

pub use animation::{Animation, FrameGeometry};
pub use clock::{Clock, Timer, TimerFire, MIN_THRESHOLD, TIMER_CAPACITY};
