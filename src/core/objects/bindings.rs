//=========================================================================
// Property Bindings
//=========================================================================
//
// `Properties` for the input devices and timing objects.
//
// These types live in `input` and `timing` and know nothing about the
// property surface; the bindings below expose their state by name.
// Button fields read as the logical index, or -1 when unset.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::properties::{
    expect_float, expect_int, expect_u32, Properties, PropertyError, PropertyValue,
};
use crate::core::input::{
    Button, Controller, DeadzoneMode, Keyboard, Mouse, Stick, Trigger,
};
use crate::core::timing::{Animation, Clock};

//--- Helpers -------------------------------------------------------------

fn button_index<B: Button>(button: Option<B>) -> PropertyValue {
    PropertyValue::Int(button.map_or(-1, |b| b.index() as i64))
}

//=== Keyboard ============================================================

impl Properties for Keyboard {
    fn property_names(&self) -> &'static [&'static str] {
        &["shift", "ctrl", "alt", "logo", "held", "last_pressed", "last_released"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        Ok(match name {
            "shift" => self.modifiers.shift.into(),
            "ctrl" => self.modifiers.ctrl.into(),
            "alt" => self.modifiers.alt.into(),
            "logo" => self.modifiers.logo.into(),
            "held" => PropertyValue::Int(self.keys.down().len() as i64),
            "last_pressed" => button_index(self.keys.last_pressed()),
            "last_released" => button_index(self.keys.last_released()),
            _ => return Err(PropertyError::unknown(name)),
        })
    }

    fn set_property(&mut self, name: &str, _value: PropertyValue) -> Result<(), PropertyError> {
        if self.property_names().contains(&name) {
            Err(PropertyError::read_only(name))
        } else {
            Err(PropertyError::unknown(name))
        }
    }
}

//=== Mouse ===============================================================

impl Properties for Mouse {
    fn property_names(&self) -> &'static [&'static str] {
        &["x", "y", "wheel_x", "wheel_y", "window", "held", "last_pressed", "last_released"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        Ok(match name {
            "x" => self.x.into(),
            "y" => self.y.into(),
            "wheel_x" => self.wheel_x.into(),
            "wheel_y" => self.wheel_y.into(),
            "window" => match self.window {
                Some(window) => PropertyValue::Object(window),
                None => return Err(PropertyError::unknown(name)),
            },
            "held" => PropertyValue::Int(self.buttons.down().len() as i64),
            "last_pressed" => button_index(self.buttons.last_pressed()),
            "last_released" => button_index(self.buttons.last_released()),
            _ => return Err(PropertyError::unknown(name)),
        })
    }

    fn set_property(&mut self, name: &str, _value: PropertyValue) -> Result<(), PropertyError> {
        if self.property_names().contains(&name) {
            Err(PropertyError::read_only(name))
        } else {
            Err(PropertyError::unknown(name))
        }
    }
}

//=== Controller ==========================================================

impl Properties for Controller {
    fn property_names(&self) -> &'static [&'static str] {
        &[
            "name", "instance", "deadzone_mode", "deadzone", "trigger_deadzone",
            "left_x", "left_y", "right_x", "right_y", "left_trigger", "right_trigger",
            "held", "last_pressed", "last_released",
        ]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        Ok(match name {
            "name" => self.name().into(),
            "instance" => self.instance_id().into(),
            "deadzone_mode" => PropertyValue::Int(self.deadzones.stick_mode.code()),
            "deadzone" => self.deadzones.stick_value.into(),
            "trigger_deadzone" => self.deadzones.trigger_value.into(),
            "left_x" => self.stick(Stick::Left).x.into(),
            "left_y" => self.stick(Stick::Left).y.into(),
            "right_x" => self.stick(Stick::Right).x.into(),
            "right_y" => self.stick(Stick::Right).y.into(),
            "left_trigger" => self.trigger(Trigger::Left).into(),
            "right_trigger" => self.trigger(Trigger::Right).into(),
            "held" => PropertyValue::Int(self.buttons.down().len() as i64),
            "last_pressed" => button_index(self.buttons.last_pressed()),
            "last_released" => button_index(self.buttons.last_released()),
            _ => return Err(PropertyError::unknown(name)),
        })
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match name {
            "deadzone_mode" => {
                let code = expect_int(name, &value)?;
                self.deadzones.stick_mode = DeadzoneMode::from_code(code)
                    .ok_or_else(|| PropertyError::mismatch(name, "deadzone mode code", &value))?;
            }
            "deadzone" => self.deadzones.stick_value = expect_float(name, &value)?.clamp(0.0, 1.0),
            "trigger_deadzone" => {
                self.deadzones.trigger_value = expect_float(name, &value)?.clamp(0.0, 1.0)
            }
            _ if self.property_names().contains(&name) => {
                return Err(PropertyError::read_only(name))
            }
            _ => return Err(PropertyError::unknown(name)),
        }
        self.reshape_all();
        Ok(())
    }
}

//=== Animation ===========================================================

impl Properties for Animation {
    fn property_names(&self) -> &'static [&'static str] {
        &[
            "atlas", "owns_atlas", "frame_width", "frame_height", "first_frame",
            "frame_count", "period", "elapsed", "loop", "current_frame", "finished",
        ]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        let geometry = self.geometry();
        Ok(match name {
            "atlas" => match self.atlas() {
                Some(atlas) => PropertyValue::Image(atlas),
                None => return Err(PropertyError::unknown(name)),
            },
            "owns_atlas" => self.owns_atlas().into(),
            "frame_width" => geometry.width.into(),
            "frame_height" => geometry.height.into(),
            "first_frame" => geometry.first_frame.into(),
            "frame_count" => self.frame_count().into(),
            "period" => self.period().into(),
            "elapsed" => self.elapsed().into(),
            "loop" => self.is_looping().into(),
            "current_frame" => self.current_frame().into(),
            "finished" => self.is_finished().into(),
            _ => return Err(PropertyError::unknown(name)),
        })
    }

    /// `atlas` needs the texture registry and is handled by the owner of
    /// the registries before reaching this method.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match name {
            "owns_atlas" => self.set_owns_atlas(expect_int(name, &value)? != 0),
            "frame_width" => self.geometry_mut().width = expect_u32(name, &value)?,
            "frame_height" => self.geometry_mut().height = expect_u32(name, &value)?,
            "first_frame" => self.geometry_mut().first_frame = expect_u32(name, &value)?,
            "frame_count" => {
                // Negative clears the override.
                let count = expect_int(name, &value)?;
                self.geometry_mut().count_override = u32::try_from(count).ok();
            }
            "period" => {
                let period = expect_float(name, &value)?;
                if period < 0.0 {
                    return Err(PropertyError::mismatch(name, "non-negative float", &value));
                }
                self.set_period(period);
            }
            "elapsed" => self.seek(expect_float(name, &value)?),
            "loop" => self.set_looping(expect_int(name, &value)? != 0),
            "atlas" | "current_frame" | "finished" => return Err(PropertyError::read_only(name)),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

//=== Clock ===============================================================

impl Properties for Clock {
    fn property_names(&self) -> &'static [&'static str] {
        &["elapsed", "timers"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        match name {
            "elapsed" => Ok(self.elapsed().into()),
            "timers" => Ok(PropertyValue::Int(self.len() as i64)),
            _ => Err(PropertyError::unknown(name)),
        }
    }

    fn set_property(&mut self, name: &str, _value: PropertyValue) -> Result<(), PropertyError> {
        if self.property_names().contains(&name) {
            Err(PropertyError::read_only(name))
        } else {
            Err(PropertyError::unknown(name))
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
