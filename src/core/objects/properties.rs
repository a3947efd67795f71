//=========================================================================
// Properties
//=========================================================================
//
// Named, typed get/set surface shared by every object kind.
//
// Each kind answers a closed set of names. Failures are reported as a
// `PropertyError`; the context turns them into a warning plus the
// documented default (0, 0.0, "", or no handle).
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::registry::Handle;

//=== PropertyValue =======================================================

/// Value of a named property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Str(String),
    /// Reference to another object.
    Object(Handle),
    /// Reference to a texture used as image data.
    Image(Handle),
}

impl PropertyValue {
    /// Name of the value's type, used in mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Str(_) => "string",
            PropertyValue::Object(_) => "object",
            PropertyValue::Image(_) => "image",
        }
    }

    /// Integer view; floats are truncated.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            PropertyValue::Int(v) => Some(v),
            PropertyValue::Float(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Float view; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            PropertyValue::Float(v) => Some(v),
            PropertyValue::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Handle view of both `Object` and `Image` values.
    pub fn as_handle(&self) -> Option<Handle> {
        match *self {
            PropertyValue::Object(h) | PropertyValue::Image(h) => Some(h),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

//=== PropertyError =======================================================

/// Why a property access failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("unknown property '{0}'")]
    Unknown(String),

    #[error("property '{name}' expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("property '{0}' is read-only")]
    ReadOnly(String),
}

impl PropertyError {
    pub fn unknown(name: &str) -> Self {
        PropertyError::Unknown(name.to_owned())
    }

    pub fn read_only(name: &str) -> Self {
        PropertyError::ReadOnly(name.to_owned())
    }

    pub fn mismatch(name: &str, expected: &'static str, found: &PropertyValue) -> Self {
        PropertyError::TypeMismatch {
            name: name.to_owned(),
            expected,
            found: found.type_name(),
        }
    }
}

//=== Properties ==========================================================

/// Named property access implemented by every object kind.
pub trait Properties {
    /// Names this object answers to, in a stable order.
    fn property_names(&self) -> &'static [&'static str];

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError>;

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError>;
}

//--- Conversion Helpers --------------------------------------------------

pub(crate) fn expect_int(name: &str, value: &PropertyValue) -> Result<i64, PropertyError> {
    value.as_int().ok_or_else(|| PropertyError::mismatch(name, "int", value))
}

pub(crate) fn expect_float(name: &str, value: &PropertyValue) -> Result<f64, PropertyError> {
    value.as_float().ok_or_else(|| PropertyError::mismatch(name, "float", value))
}

pub(crate) fn expect_str(name: &str, value: PropertyValue) -> Result<String, PropertyError> {
    match value {
        PropertyValue::Str(s) => Ok(s),
        other => Err(PropertyError::mismatch(name, "string", &other)),
    }
}

/// Non-negative integer property that fits in `u32`.
pub(crate) fn expect_u32(name: &str, value: &PropertyValue) -> Result<u32, PropertyError> {
    let raw = expect_int(name, value)?;
    u32::try_from(raw).map_err(|_| PropertyError::mismatch(name, "non-negative int", value))
}

//=========================================================================
// Unit Tests
//=========================================================================
