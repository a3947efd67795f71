//=========================================================================
// Input System
//=========================================================================
//
// Canonical input events and the per-device state behind them.
//
// Architecture:
// ```text
//  NativeEvent ──► normalizer ──► CanonicalEvent (placeholder handles)
//       │                               │
//       └────────► enricher ◄───────────┘
//                     │
//                     ├─ Keyboard / Mouse / Controller (state trackers)
//                     ├─ HistoryRing (64 press snapshots per device)
//                     └─ deadzone shaping for sticks and triggers
// ```
//
// The normalizer only reads; every mutation happens in the enricher, so
// by the time an event reaches a handler the device state already
// reflects it.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod deadzone;
pub mod devices;
pub mod event;
pub mod history;
pub mod keymap;
pub mod state_tracker;

pub(crate) mod enricher;
pub(crate) mod normalizer;

//=== Public API ==========================================================

pub use deadzone::{shape_stick, shape_trigger, DeadzoneMode, StickCoordinate};
pub use devices::{Controller, DeadzonePolicy, Keyboard, Mouse};
pub use event::{
    Button, CanonicalEvent, ControllerButton, EventKind, KeyCode, Modifiers, MouseButton, Stick,
    Trigger,
};
pub use history::{HistoryRing, HISTORY_DEPTH};
pub use state_tracker::{ButtonSet, ButtonTracker};
