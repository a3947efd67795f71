//=========================================================================
// Input Devices
//=========================================================================
//
// Registry-managed device objects updated by the enricher.
//
// Architecture:
//   Keyboard   → ButtonTracker<KeyCode>         + modifiers
//   Mouse      → ButtonTracker<MouseButton>     + cursor / wheel
//   Controller → ButtonTracker<ControllerButton> + shadow axes → deadzones
//
// Native backends report one analog axis per event, so controllers keep
// the last raw sample of every axis and reshape the whole stick whenever
// either of its axes moves.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::deadzone::{self, DeadzoneMode, StickCoordinate};
use super::event::{ControllerButton, KeyCode, Modifiers, MouseButton, Stick, Trigger};
use super::state_tracker::ButtonTracker;
use crate::core::registry::Handle;

//=== Keyboard ============================================================

/// The process-wide keyboard.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    pub keys: ButtonTracker<KeyCode>,
    pub modifiers: Modifiers,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }
}

//=== Mouse ===============================================================

/// The process-wide mouse.
///
/// `x`/`y` are window-relative pixels of the last motion; `wheel_x` /
/// `wheel_y` accumulate every wheel delta since creation. The first
/// motion has no previous position and reports a zero delta.
#[derive(Debug, Clone, Default)]
pub struct Mouse {
    pub buttons: ButtonTracker<MouseButton>,
    pub x: f64,
    pub y: f64,
    pub window: Option<Handle>,
    pub wheel_x: f64,
    pub wheel_y: f64,
    seen_motion: bool,
}

impl Mouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the cursor and returns the delta from the previous position.
    pub fn move_to(&mut self, x: f64, y: f64, window: Option<Handle>) -> (f64, f64) {
        let delta = if self.seen_motion {
            (x - self.x, y - self.y)
        } else {
            (0.0, 0.0)
        };
        self.seen_motion = true;
        self.x = x;
        self.y = y;
        self.window = window;
        delta
    }

    pub fn scroll(&mut self, dx: f64, dy: f64) {
        self.wheel_x += dx;
        self.wheel_y += dy;
    }
}

//=== DeadzonePolicy ======================================================

/// Deadzone settings applied to a controller's sticks and triggers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadzonePolicy {
    pub stick_mode: DeadzoneMode,
    pub stick_value: f64,
    pub trigger_value: f64,
}

impl Default for DeadzonePolicy {
    fn default() -> Self {
        Self {
            stick_mode: DeadzoneMode::ScaledRadial,
            stick_value: 0.24,
            trigger_value: 0.12,
        }
    }
}

//=== Controller ==========================================================

/// One hot-plugged game controller.
#[derive(Debug, Clone)]
pub struct Controller {
    instance_id: u32,
    name: String,
    pub buttons: ButtonTracker<ControllerButton>,
    pub deadzones: DeadzonePolicy,

    // Raw shadow state in the native convention (y down-positive).
    stick_raw: [[i16; 2]; 2],
    trigger_raw: [i16; 2],

    sticks: [StickCoordinate; 2],
    triggers: [f64; 2],
}

impl Controller {
    pub fn new(instance_id: u32, name: impl Into<String>, deadzones: DeadzonePolicy) -> Self {
        Self {
            instance_id,
            name: name.into(),
            buttons: ButtonTracker::new(),
            deadzones,
            stick_raw: [[0; 2]; 2],
            trigger_raw: [0; 2],
            sticks: [StickCoordinate::ZERO; 2],
            triggers: [0.0; 2],
        }
    }

    /// Native instance id the backend uses for this device.
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Analog Input -----------------------------------------------------

    /// Records a new raw horizontal sample and reshapes the stick.
    pub fn move_stick_x(&mut self, stick: Stick, raw: i16) -> StickCoordinate {
        self.stick_raw[stick_slot(stick)][0] = raw;
        self.reshape_stick(stick)
    }

    /// Records a new raw vertical sample (native, down-positive) and
    /// reshapes the stick.
    pub fn move_stick_y(&mut self, stick: Stick, raw: i16) -> StickCoordinate {
        self.stick_raw[stick_slot(stick)][1] = raw;
        self.reshape_stick(stick)
    }

    /// Records a new raw trigger sample and returns its shaped value.
    pub fn pull_trigger(&mut self, trigger: Trigger, raw: i16) -> f64 {
        let slot = trigger_slot(trigger);
        self.trigger_raw[slot] = raw;
        self.triggers[slot] = deadzone::shape_trigger(raw, self.deadzones.trigger_value);
        self.triggers[slot]
    }

    /// Re-applies the current deadzone policy to all shadow samples.
    ///
    /// Called after the policy changes so readings do not wait for the
    /// next motion event.
    pub fn reshape_all(&mut self) {
        for stick in [Stick::Left, Stick::Right] {
            self.reshape_stick(stick);
        }
        for trigger in [Trigger::Left, Trigger::Right] {
            let slot = trigger_slot(trigger);
            self.triggers[slot] =
                deadzone::shape_trigger(self.trigger_raw[slot], self.deadzones.trigger_value);
        }
    }

    pub fn stick(&self, stick: Stick) -> StickCoordinate {
        self.sticks[stick_slot(stick)]
    }

    pub fn trigger(&self, trigger: Trigger) -> f64 {
        self.triggers[trigger_slot(trigger)]
    }

    fn reshape_stick(&mut self, stick: Stick) -> StickCoordinate {
        let slot = stick_slot(stick);
        let [x, y] = self.stick_raw[slot];
        let coord = deadzone::shape_stick(
            x,
            y.saturating_neg(),
            self.deadzones.stick_mode,
            self.deadzones.stick_value,
        );
        self.sticks[slot] = coord;
        coord
    }
}

fn stick_slot(stick: Stick) -> usize {
    match stick {
        Stick::Left => 0,
        Stick::Right => 1,
    }
}

fn trigger_slot(trigger: Trigger) -> usize {
    match trigger {
        Trigger::Left => 0,
        Trigger::Right => 1,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_policy() -> DeadzonePolicy {
        DeadzonePolicy {
            stick_mode: DeadzoneMode::None,
            stick_value: 0.0,
            trigger_value: 0.0,
        }
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn mouse_motion_reports_delta() {
        let mut mouse = Mouse::new();
        assert_eq!(mouse.move_to(10.0, 20.0, None), (0.0, 0.0));
        assert_eq!(mouse.move_to(15.0, 18.0, None), (5.0, -2.0));
        assert_eq!((mouse.x, mouse.y), (15.0, 18.0));
    }

    #[test]
    fn mouse_wheel_accumulates() {
        let mut mouse = Mouse::new();
        mouse.scroll(0.0, 1.0);
        mouse.scroll(0.5, -3.0);
        assert_eq!((mouse.wheel_x, mouse.wheel_y), (0.5, -2.0));
    }

    //=====================================================================
    // Controller Tests
    //=====================================================================

    #[test]
    fn stick_combines_shadow_axes() {
        let mut pad = Controller::new(3, "pad", raw_policy());

        let after_x = pad.move_stick_x(Stick::Left, i16::MAX);
        assert_eq!(after_x.x, 1.0);
        assert_eq!(after_x.y, 0.0);

        // Native y is down-positive: a full "down" sample reads as -1.
        let after_y = pad.move_stick_y(Stick::Left, i16::MAX);
        assert!(after_y.x > 0.0 && after_y.y < 0.0);
        assert!((after_y.magnitude - 1.0).abs() < 1e-12);

        assert_eq!(pad.stick(Stick::Right), StickCoordinate::ZERO);
    }

    #[test]
    fn native_up_reads_positive() {
        let mut pad = Controller::new(1, "pad", raw_policy());
        let coord = pad.move_stick_y(Stick::Right, i16::MIN);
        assert_eq!(coord.y, 1.0);
    }

    #[test]
    fn default_policy_suppresses_drift() {
        let mut pad = Controller::new(1, "pad", DeadzonePolicy::default());
        let coord = pad.move_stick_x(Stick::Left, 3000);
        assert!(coord.is_neutral());
        assert_eq!(pad.pull_trigger(Trigger::Right, 1000), 0.0);
    }

    #[test]
    fn reshape_all_applies_new_policy() {
        let mut pad = Controller::new(1, "pad", raw_policy());
        pad.move_stick_x(Stick::Left, 3000);
        pad.pull_trigger(Trigger::Left, 1000);
        assert!(!pad.stick(Stick::Left).is_neutral());

        pad.deadzones = DeadzonePolicy::default();
        pad.reshape_all();
        assert!(pad.stick(Stick::Left).is_neutral());
        assert_eq!(pad.trigger(Trigger::Left), 0.0);
    }

    #[test]
    fn controller_identity() {
        let pad = Controller::new(42, "Pro Controller", DeadzonePolicy::default());
        assert_eq!(pad.instance_id(), 42);
        assert_eq!(pad.name(), "Pro Controller");
    }
}
