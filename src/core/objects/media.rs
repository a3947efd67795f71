//=========================================================================
// Audio Objects
//=========================================================================
//
// Sound effects and the music singleton.
//
// Decoding and mixing live in the backend; these records carry the
// settings application code reads and writes through properties.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::properties::{expect_float, expect_int, Properties, PropertyError, PropertyValue};

//=== Sound ===============================================================

/// A loaded sound effect.
#[derive(Debug, Clone)]
pub struct Sound {
    path: String,
    volume: f64,
}

impl Sound {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            volume: 1.0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }
}

impl Properties for Sound {
    fn property_names(&self) -> &'static [&'static str] {
        &["path", "volume"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        match name {
            "path" => Ok(self.path.clone().into()),
            "volume" => Ok(self.volume.into()),
            _ => Err(PropertyError::unknown(name)),
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match name {
            "volume" => self.volume = expect_float(name, &value)?.clamp(0.0, 1.0),
            "path" => return Err(PropertyError::read_only(name)),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

//=== Music ===============================================================

/// The streamed music track. At most one is open at a time.
#[derive(Debug, Clone)]
pub struct Music {
    path: String,
    volume: f64,
    looping: bool,
}

impl Music {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            volume: 1.0,
            looping: true,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl Properties for Music {
    fn property_names(&self) -> &'static [&'static str] {
        &["path", "volume", "loop"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        match name {
            "path" => Ok(self.path.clone().into()),
            "volume" => Ok(self.volume.into()),
            "loop" => Ok(self.looping.into()),
            _ => Err(PropertyError::unknown(name)),
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match name {
            "volume" => self.volume = expect_float(name, &value)?.clamp(0.0, 1.0),
            "loop" => self.looping = expect_int(name, &value)? != 0,
            "path" => return Err(PropertyError::read_only(name)),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
