//=========================================================================
// Named Timer Clocks
//=========================================================================
//
// Fixed-capacity table of named countdown timers advanced by a delta.
//
// Architecture:
//   advance(dt) → for each live, unpaused slot:
//                   current += dt → current >= threshold? → TimerFire
//                   repeat  → current wraps modulo threshold
//                   one-shot → slot freed
//
// A timer fires at most once per advance, however many thresholds the
// delta spans; the number of crossings is reported with the fire.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{trace, warn};

//=== Constants ===========================================================

/// Number of timer slots per clock.
pub const TIMER_CAPACITY: usize = 128;

/// Smallest accepted timer threshold, in seconds.
pub const MIN_THRESHOLD: f64 = 1e-6;

//=== Timer ===============================================================

/// One named countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    name: String,
    current: f64,
    threshold: f64,
    paused: bool,
    repeat: bool,
    fires: u32,
}

impl Timer {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seconds accumulated toward the threshold.
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    /// How many times this timer has fired.
    pub fn fires(&self) -> u32 {
        self.fires
    }
}

//=== TimerFire ===========================================================

/// Record of one timer reaching its threshold during an advance.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerFire {
    pub name: String,
    /// Seconds past the most recent threshold crossing.
    pub overshoot: f64,
    /// 1-based count of fires including this one.
    pub fire_count: u32,
    /// Thresholds spanned by the advance that fired.
    pub crossings: u32,
}

//=== Clock ===============================================================

/// A clock owning up to [`TIMER_CAPACITY`] named timers.
#[derive(Debug, Clone)]
pub struct Clock {
    slots: [Option<Timer>; TIMER_CAPACITY],
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            elapsed: 0.0,
        }
    }

    //--- Table Management -------------------------------------------------

    /// Adds a timer, replacing any existing timer with the same name.
    ///
    /// Returns the slot index, or `None` when every slot is taken.
    /// Thresholds below [`MIN_THRESHOLD`] are raised to it.
    pub fn add_timer(&mut self, name: &str, seconds: f64, repeat: bool) -> Option<usize> {
        let threshold = if seconds.is_nan() || seconds < MIN_THRESHOLD {
            warn!(target: "timing", "Timer '{}' threshold {} raised to {}", name, seconds, MIN_THRESHOLD);
            MIN_THRESHOLD
        } else {
            seconds
        };

        if self.remove_timer(name) {
            trace!(target: "timing", "Timer '{}' replaced", name);
        }

        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(Timer {
            name: name.to_owned(),
            current: 0.0,
            threshold,
            paused: false,
            repeat,
            fires: 0,
        });
        Some(index)
    }

    /// Frees the slot holding `name`. Returns `false` if there was none.
    pub fn remove_timer(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.slots[index] = None;
                true
            }
            None => false,
        }
    }

    pub fn pause_timer(&mut self, name: &str) -> bool {
        self.set_paused(name, true)
    }

    pub fn resume_timer(&mut self, name: &str) -> bool {
        self.set_paused(name, false)
    }

    pub fn timer(&self, name: &str) -> Option<&Timer> {
        self.position(name).and_then(|index| self.slots[index].as_ref())
    }

    /// Live timers in slot order.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.timers().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Total seconds this clock has been advanced.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    //--- Advancement ------------------------------------------------------

    /// Advances every unpaused timer by `dt` and returns the fires in slot
    /// order.
    pub fn advance(&mut self, dt: f64) -> Vec<TimerFire> {
        let mut fires = Vec::new();
        if dt.is_nan() || dt < 0.0 {
            warn!(target: "timing", "Ignoring invalid clock delta {}", dt);
            return fires;
        }
        self.elapsed += dt;

        for slot in self.slots.iter_mut() {
            let Some(timer) = slot.as_mut() else { continue };
            if timer.paused {
                continue;
            }

            timer.current += dt;
            if timer.current < timer.threshold {
                continue;
            }

            let crossings = (timer.current / timer.threshold).floor().max(1.0) as u32;
            timer.fires = timer.fires.saturating_add(1);

            if timer.repeat {
                timer.current = timer.current.rem_euclid(timer.threshold);
                fires.push(TimerFire {
                    name: timer.name.clone(),
                    overshoot: timer.current,
                    fire_count: timer.fires,
                    crossings,
                });
            } else {
                fires.push(TimerFire {
                    name: std::mem::take(&mut timer.name),
                    overshoot: timer.current - timer.threshold,
                    fire_count: timer.fires,
                    crossings,
                });
                *slot = None;
            }
        }
        fires
    }

    //--- Internal Helpers -------------------------------------------------

    fn position(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|timer| timer.name == name))
    }

    fn set_paused(&mut self, name: &str, paused: bool) -> bool {
        match self.position(name).and_then(|index| self.slots[index].as_mut()) {
            Some(timer) => {
                timer.paused = paused;
                true
            }
            None => false,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
