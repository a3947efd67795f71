//=========================================================================
// Windows and Window Resources
//=========================================================================
//
// Bookkeeping for windows and the textures/fonts created against them.
//
// Surface management, rasterization and upload belong to the backend;
// these records keep the geometry the event core reads and the
// ownership links the registry cascades through on close.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::properties::{
    expect_float, expect_str, expect_u32, Properties, PropertyError, PropertyValue,
};
use crate::core::registry::{Handle, ObjectKind};

//=== Window ==============================================================

/// An open window.
#[derive(Debug, Clone)]
pub struct Window {
    native_id: u64,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub focused: bool,
    textures: Vec<Handle>,
    fonts: Vec<Handle>,
}

impl Window {
    pub fn new(native_id: u64, title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            native_id,
            title: title.into(),
            width,
            height,
            x: 0,
            y: 0,
            focused: false,
            textures: Vec::new(),
            fonts: Vec::new(),
        }
    }

    /// Backend identifier used to route native events.
    pub fn native_id(&self) -> u64 {
        self.native_id
    }

    //--- Owned Resources --------------------------------------------------

    pub fn textures(&self) -> &[Handle] {
        &self.textures
    }

    pub fn fonts(&self) -> &[Handle] {
        &self.fonts
    }

    pub(crate) fn adopt(&mut self, resource: Handle) {
        match resource.kind() {
            ObjectKind::Texture => self.textures.push(resource),
            ObjectKind::Font => self.fonts.push(resource),
            _ => {}
        }
    }

    pub(crate) fn release(&mut self, resource: Handle) {
        self.textures.retain(|&h| h != resource);
        self.fonts.retain(|&h| h != resource);
    }

    /// Drains every owned resource handle, textures first.
    pub(crate) fn take_resources(&mut self) -> Vec<Handle> {
        let mut owned = std::mem::take(&mut self.textures);
        owned.append(&mut self.fonts);
        owned
    }
}

impl Properties for Window {
    fn property_names(&self) -> &'static [&'static str] {
        &["title", "width", "height", "x", "y", "focused"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        Ok(match name {
            "title" => self.title.clone().into(),
            "width" => self.width.into(),
            "height" => self.height.into(),
            "x" => i64::from(self.x).into(),
            "y" => i64::from(self.y).into(),
            "focused" => self.focused.into(),
            _ => return Err(PropertyError::unknown(name)),
        })
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match name {
            "title" => self.title = expect_str(name, value)?,
            "width" => self.width = expect_u32(name, &value)?,
            "height" => self.height = expect_u32(name, &value)?,
            "x" | "y" | "focused" => return Err(PropertyError::read_only(name)),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

//=== Texture =============================================================

/// Image data created for a window (or unattached, e.g. an atlas).
#[derive(Debug, Clone)]
pub struct Texture {
    pub window: Option<Handle>,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(window: Option<Handle>, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            window,
            name: name.into(),
            width,
            height,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Properties for Texture {
    fn property_names(&self) -> &'static [&'static str] {
        &["name", "width", "height", "window"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        match name {
            "name" => Ok(self.name.clone().into()),
            "width" => Ok(self.width.into()),
            "height" => Ok(self.height.into()),
            "window" => self
                .window
                .map(PropertyValue::Object)
                .ok_or_else(|| PropertyError::unknown(name)),
            _ => Err(PropertyError::unknown(name)),
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match name {
            "name" => self.name = expect_str(name, value)?,
            "width" | "height" | "window" => return Err(PropertyError::read_only(name)),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

//=== Font ================================================================

/// A font face at a point size.
#[derive(Debug, Clone)]
pub struct Font {
    pub window: Option<Handle>,
    pub family: String,
    pub size: f64,
}

impl Font {
    pub fn new(window: Option<Handle>, family: impl Into<String>, size: f64) -> Self {
        Self {
            window,
            family: family.into(),
            size,
        }
    }
}

impl Properties for Font {
    fn property_names(&self) -> &'static [&'static str] {
        &["family", "size", "window"]
    }

    fn get_property(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        match name {
            "family" => Ok(self.family.clone().into()),
            "size" => Ok(self.size.into()),
            "window" => self
                .window
                .map(PropertyValue::Object)
                .ok_or_else(|| PropertyError::unknown(name)),
            _ => Err(PropertyError::unknown(name)),
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match name {
            "size" => {
                let size = expect_float(name, &value)?;
                if size <= 0.0 {
                    return Err(PropertyError::mismatch(name, "positive float", &value));
                }
                self.size = size;
            }
            "family" | "window" => return Err(PropertyError::read_only(name)),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Registry;

    fn handles() -> (Handle, Handle) {
        let mut textures = Registry::new(ObjectKind::Texture);
        let mut fonts = Registry::new(ObjectKind::Font);
        (textures.insert(1, ()).unwrap(), fonts.insert(2, ()).unwrap())
    }

    #[test]
    fn window_tracks_owned_resources() {
        let (texture, font) = handles();
        let mut window = Window::new(9, "main", 800, 600);
        window.adopt(texture);
        window.adopt(font);
        assert_eq!(window.textures(), &[texture]);
        assert_eq!(window.fonts(), &[font]);

        window.release(texture);
        assert!(window.textures().is_empty());
        assert_eq!(window.take_resources(), vec![font]);
        assert!(window.fonts().is_empty());
    }

    #[test]
    fn window_properties() {
        let mut window = Window::new(1, "main", 800, 600);
        assert_eq!(window.get_property("width"), Ok(PropertyValue::Int(800)));
        assert!(window.set_property("title", "renamed".into()).is_ok());
        assert_eq!(window.title, "renamed");

        assert_eq!(
            window.set_property("focused", PropertyValue::Int(1)),
            Err(PropertyError::read_only("focused"))
        );
        assert!(matches!(
            window.set_property("width", PropertyValue::Int(-5)),
            Err(PropertyError::TypeMismatch { .. })
        ));
        assert_eq!(window.get_property("depth"), Err(PropertyError::unknown("depth")));
    }

    #[test]
    fn font_size_must_be_positive() {
        let mut font = Font::new(None, "mono", 12.0);
        assert!(font.set_property("size", PropertyValue::Float(0.0)).is_err());
        assert!(font.set_property("size", PropertyValue::Int(16)).is_ok());
        assert_eq!(font.size, 16.0);
    }

    #[test]
    fn texture_window_link_is_read_only() {
        let mut texture = Texture::new(None, "atlas", 64, 64);
        assert!(texture.get_property("window").is_err());
        assert_eq!(
            texture.set_property("window", PropertyValue::Int(0)),
            Err(PropertyError::read_only("window"))
        );
        assert_eq!(texture.size(), (64, 64));
    }
}
