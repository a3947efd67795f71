//=========================================================================
// Deadzone Engine
//=========================================================================
//
// Pure shaping of dual-axis analog stick samples.
//
// Architecture:
//   (raw x, raw y) → normalize → polar (clamped) → mode → StickCoordinate
//
// Sticks are sampled by two independent potentiometers, so the raw range
// is a square while the physical gate is a circle: corners reach a
// magnitude of √2 before clamping. Every mode therefore clamps magnitude
// to 1.0 before and after shaping.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f64::consts::TAU;

//=== DeadzoneMode ========================================================

/// Shape of the neutral region applied to a stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeadzoneMode {
    /// Raw reading, clamped to the unit circle.
    None,
    /// Each axis is zeroed independently below the threshold.
    Axial,
    /// The whole vector is zeroed below the threshold.
    Radial,
    /// Radial, then rescaled so output runs 0..1 from the threshold out.
    #[default]
    ScaledRadial,
    /// X deadzone grows with Y deflection (diamond-shaped dead region).
    XBowtie,
    /// Y deadzone grows with X deflection.
    YBowtie,
}

impl DeadzoneMode {
    pub const ALL: [DeadzoneMode; 6] = [
        DeadzoneMode::None,
        DeadzoneMode::Axial,
        DeadzoneMode::Radial,
        DeadzoneMode::ScaledRadial,
        DeadzoneMode::XBowtie,
        DeadzoneMode::YBowtie,
    ];

    /// Stable integer code, used by the property surface.
    pub fn code(self) -> i64 {
        match self {
            DeadzoneMode::None => 0,
            DeadzoneMode::Axial => 1,
            DeadzoneMode::Radial => 2,
            DeadzoneMode::ScaledRadial => 3,
            DeadzoneMode::XBowtie => 4,
            DeadzoneMode::YBowtie => 5,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|mode| mode.code() == code)
    }
}

//=== StickCoordinate =====================================================

/// Shaped stick reading in both polar and cartesian form.
///
/// Invariants: `magnitude ∈ [0, 1]`, `angle ∈ [0, 2π)`, and `x`, `y`
/// lie in `[-1, 1]` with y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickCoordinate {
    pub magnitude: f64,
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

impl StickCoordinate {
    /// The neutral reading.
    pub const ZERO: Self = Self {
        magnitude: 0.0,
        angle: 0.0,
        x: 0.0,
        y: 0.0,
    };

    /// Builds a coordinate from cartesian components, clamping to the
    /// unit circle. Components inside the circle are kept exactly.
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        let x = x.clamp(-1.0, 1.0);
        let y = y.clamp(-1.0, 1.0);
        let magnitude = x.hypot(y);
        if magnitude == 0.0 {
            return Self::ZERO;
        }

        let angle = normalize_angle(y.atan2(x));
        if magnitude > 1.0 {
            Self {
                magnitude: 1.0,
                angle,
                x: x / magnitude,
                y: y / magnitude,
            }
        } else {
            Self { magnitude, angle, x, y }
        }
    }

    /// Builds a coordinate from polar components, clamping magnitude to
    /// `[0, 1]` and normalizing the angle into `[0, 2π)`.
    pub fn from_polar(magnitude: f64, angle: f64) -> Self {
        let magnitude = magnitude.clamp(0.0, 1.0);
        if magnitude == 0.0 {
            return Self::ZERO;
        }

        let angle = normalize_angle(angle);
        Self {
            magnitude,
            angle,
            x: (magnitude * angle.cos()).clamp(-1.0, 1.0),
            y: (magnitude * angle.sin()).clamp(-1.0, 1.0),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.magnitude == 0.0
    }
}

//=== Normalization =======================================================

/// Maps a signed 16-bit sample to `[-1, 1]` (i16::MIN saturates to -1).
pub fn normalize_axis(raw: i16) -> f64 {
    (f64::from(raw) / f64::from(i16::MAX)).clamp(-1.0, 1.0)
}

/// Maps a signed 16-bit trigger sample to `[0, 1]`.
pub fn normalize_trigger(raw: i16) -> f64 {
    normalize_axis(raw).max(0.0)
}

//=== Shaping =============================================================

/// Shapes one stick sample.
///
/// `x` is right-positive and `y` up-positive (callers flip native
/// down-positive axes first). `value` is the deadzone size in `[0, 1]`;
/// out-of-range values are clamped.
pub fn shape_stick(x: i16, y: i16, mode: DeadzoneMode, value: f64) -> StickCoordinate {
    let value = value.clamp(0.0, 1.0);
    let raw = StickCoordinate::from_cartesian(normalize_axis(x), normalize_axis(y));

    match mode {
        DeadzoneMode::None => raw,

        DeadzoneMode::Axial => {
            let x = if raw.x.abs() < value { 0.0 } else { raw.x };
            let y = if raw.y.abs() < value { 0.0 } else { raw.y };
            StickCoordinate::from_cartesian(x, y)
        }

        DeadzoneMode::Radial => {
            if raw.magnitude < value {
                StickCoordinate::ZERO
            } else {
                raw
            }
        }

        DeadzoneMode::ScaledRadial => {
            if raw.magnitude < value || value >= 1.0 {
                StickCoordinate::ZERO
            } else {
                let scaled = (raw.magnitude - value) / (1.0 - value);
                StickCoordinate::from_polar(scaled, raw.angle)
            }
        }

        DeadzoneMode::XBowtie => {
            let dead = lerp(0.0, value, raw.y.abs());
            let x = if raw.x.abs() < dead { 0.0 } else { raw.x };
            StickCoordinate::from_cartesian(x, raw.y)
        }

        DeadzoneMode::YBowtie => {
            let dead = lerp(0.0, value, raw.x.abs());
            let y = if raw.y.abs() < dead { 0.0 } else { raw.y };
            StickCoordinate::from_cartesian(raw.x, y)
        }
    }
}

/// Shapes one trigger sample: zero below `deadzone`, then linearly
/// rescaled so a full pull still reads 1.0.
pub fn shape_trigger(raw: i16, deadzone: f64) -> f64 {
    let value = normalize_trigger(raw);
    let deadzone = deadzone.clamp(0.0, 1.0);

    if value < deadzone || deadzone >= 1.0 {
        0.0
    } else {
        ((value - deadzone) / (1.0 - deadzone)).clamp(0.0, 1.0)
    }
}

fn normalize_angle(angle: f64) -> f64 {
    let angle = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

//=========================================================================
// Unit Tests
//=========================================================================
