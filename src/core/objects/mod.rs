//=========================================================================
// Objects
//=========================================================================
//
// Owner of every registry, one per object kind.
//
// Architecture:
// ```text
//  Objects
//   ├─ IdSequence             (shared identity source)
//   ├─ Registry<Window>   ──► owns Texture / Font handles (cascade on close)
//   ├─ Registry<Texture>  ◄── Animation atlas (optionally owned)
//   ├─ Registry<Keyboard>, Registry<Mouse>   (process-wide singletons)
//   ├─ Registry<Controller>                  (hot-plugged)
//   ├─ Registry<Animation>, Registry<Clock>  (+ auto-update lists)
//   └─ Registry<Sound>, Registry<Music>      (music is a singleton)
// ```
//
// Dispatch over kinds is a closed `match` on `ObjectKind`, so adding a
// kind is a compile error everywhere it must be handled.
//
//=========================================================================

//=== Submodules ==========================================================

mod bindings;
pub mod media;
pub mod properties;
pub mod window;

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::{Controller, Keyboard, Mouse};
use crate::core::registry::{Handle, IdSequence, ObjectKind, Registry};
use crate::core::timing::{Animation, Clock};

//=== Public API ==========================================================

pub use media::{Music, Sound};
pub use properties::{Properties, PropertyError, PropertyValue};
pub use window::{Font, Texture, Window};

//=== Objects =============================================================

/// Every open object, grouped by kind.
pub struct Objects {
    ids: IdSequence,

    pub(crate) windows: Registry<Window>,
    pub(crate) textures: Registry<Texture>,
    pub(crate) fonts: Registry<Font>,
    pub(crate) keyboards: Registry<Keyboard>,
    pub(crate) mice: Registry<Mouse>,
    pub(crate) controllers: Registry<Controller>,
    pub(crate) animations: Registry<Animation>,
    pub(crate) clocks: Registry<Clock>,
    pub(crate) sounds: Registry<Sound>,
    pub(crate) music: Registry<Music>,

    keyboard: Option<Handle>,
    mouse: Option<Handle>,
    current_music: Option<Handle>,

    auto_clocks: Vec<Handle>,
    auto_animations: Vec<Handle>,
}

impl Objects {
    pub fn new(ids: IdSequence) -> Self {
        Self {
            ids,
            windows: Registry::new(ObjectKind::Window),
            textures: Registry::new(ObjectKind::Texture),
            fonts: Registry::new(ObjectKind::Font),
            keyboards: Registry::new(ObjectKind::Keyboard),
            mice: Registry::new(ObjectKind::Mouse),
            controllers: Registry::new(ObjectKind::Controller),
            animations: Registry::new(ObjectKind::Animation),
            clocks: Registry::new(ObjectKind::Clock),
            sounds: Registry::new(ObjectKind::Sound),
            music: Registry::new(ObjectKind::Music),
            keyboard: None,
            mouse: None,
            current_music: None,
            auto_clocks: Vec::new(),
            auto_animations: Vec::new(),
        }
    }

    //--- Creation ---------------------------------------------------------

    pub fn add_window(&mut self, window: Window) -> Handle {
        let handle = self.windows.allocate(&mut self.ids, window);
        debug!(target: "registry", "Opened {:?}", handle);
        handle
    }

    /// Registers a texture and links it to its owner window, if any.
    ///
    /// A closed owner window is misuse: the texture is kept unattached.
    pub fn add_texture(&mut self, mut texture: Texture) -> Handle {
        let owner = texture.window.filter(|&w| self.windows.contains(w));
        if texture.window.is_some() && owner.is_none() {
            warn!(target: "registry", "Texture '{}' created for a closed window", texture.name);
        }
        texture.window = owner;

        let handle = self.textures.allocate(&mut self.ids, texture);
        if let Some(window) = owner.and_then(|w| self.windows.get_mut(w)) {
            window.adopt(handle);
        }
        handle
    }

    /// Registers a font and links it to its owner window, if any.
    pub fn add_font(&mut self, mut font: Font) -> Handle {
        let owner = font.window.filter(|&w| self.windows.contains(w));
        if font.window.is_some() && owner.is_none() {
            warn!(target: "registry", "Font '{}' created for a closed window", font.family);
        }
        font.window = owner;

        let handle = self.fonts.allocate(&mut self.ids, font);
        if let Some(window) = owner.and_then(|w| self.windows.get_mut(w)) {
            window.adopt(handle);
        }
        handle
    }

    /// Registers the keyboard singleton. Returns `None` if one is open.
    pub fn add_keyboard(&mut self, keyboard: Keyboard) -> Option<Handle> {
        if self.keyboard.is_some() {
            warn!(target: "registry", "Keyboard already open");
            return None;
        }
        let handle = self.keyboards.allocate(&mut self.ids, keyboard);
        self.keyboard = Some(handle);
        Some(handle)
    }

    /// Registers the mouse singleton. Returns `None` if one is open.
    pub fn add_mouse(&mut self, mouse: Mouse) -> Option<Handle> {
        if self.mouse.is_some() {
            warn!(target: "registry", "Mouse already open");
            return None;
        }
        let handle = self.mice.allocate(&mut self.ids, mouse);
        self.mouse = Some(handle);
        Some(handle)
    }

    pub fn add_controller(&mut self, controller: Controller) -> Handle {
        self.controllers.allocate(&mut self.ids, controller)
    }

    pub fn add_animation(&mut self, animation: Animation) -> Handle {
        let handle = self.animations.allocate(&mut self.ids, animation);
        debug!(target: "timing", "Registered {:?}", handle);
        handle
    }

    pub fn add_clock(&mut self, clock: Clock) -> Handle {
        let handle = self.clocks.allocate(&mut self.ids, clock);
        debug!(target: "timing", "Registered {:?}", handle);
        handle
    }

    pub fn add_sound(&mut self, sound: Sound) -> Handle {
        self.sounds.allocate(&mut self.ids, sound)
    }

    /// Opens the music singleton, closing the previous track first.
    pub fn set_music(&mut self, music: Music) -> Handle {
        if let Some(previous) = self.current_music {
            warn!(target: "registry", "Replacing open music {:?}", previous);
            self.close(previous);
        }
        let handle = self.music.allocate(&mut self.ids, music);
        self.current_music = Some(handle);
        handle
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn is_open(&self, handle: Handle) -> bool {
        match handle.kind() {
            ObjectKind::Window => self.windows.contains(handle),
            ObjectKind::Texture => self.textures.contains(handle),
            ObjectKind::Font => self.fonts.contains(handle),
            ObjectKind::Keyboard => self.keyboards.contains(handle),
            ObjectKind::Mouse => self.mice.contains(handle),
            ObjectKind::Controller => self.controllers.contains(handle),
            ObjectKind::Animation => self.animations.contains(handle),
            ObjectKind::Clock => self.clocks.contains(handle),
            ObjectKind::Sound => self.sounds.contains(handle),
            ObjectKind::Music => self.music.contains(handle),
        }
    }

    /// Open handles of `kind`, oldest first.
    pub fn list_all(&self, kind: ObjectKind) -> Vec<Handle> {
        match kind {
            ObjectKind::Window => self.windows.list_all(),
            ObjectKind::Texture => self.textures.list_all(),
            ObjectKind::Font => self.fonts.list_all(),
            ObjectKind::Keyboard => self.keyboards.list_all(),
            ObjectKind::Mouse => self.mice.list_all(),
            ObjectKind::Controller => self.controllers.list_all(),
            ObjectKind::Animation => self.animations.list_all(),
            ObjectKind::Clock => self.clocks.list_all(),
            ObjectKind::Sound => self.sounds.list_all(),
            ObjectKind::Music => self.music.list_all(),
        }
    }

    /// Closes `handle` and everything it owns.
    ///
    /// Windows close their textures and fonts first; animations close an
    /// owned atlas. Closing a closed handle warns and returns `false`.
    pub fn close(&mut self, handle: Handle) -> bool {
        if !self.is_open(handle) {
            warn!(target: "registry", "Close of already closed {:?}", handle);
            return false;
        }

        match handle.kind() {
            ObjectKind::Window => {
                let owned = self
                    .windows
                    .get_mut(handle)
                    .map(Window::take_resources)
                    .unwrap_or_default();
                for resource in owned {
                    self.close(resource);
                }
                self.windows.remove(handle);
            }
            ObjectKind::Texture => {
                if let Some(texture) = self.textures.remove(handle) {
                    self.unlink(texture.window, handle);
                }
            }
            ObjectKind::Font => {
                if let Some(font) = self.fonts.remove(handle) {
                    self.unlink(font.window, handle);
                }
            }
            ObjectKind::Keyboard => {
                self.keyboards.remove(handle);
                self.keyboard = self.keyboard.filter(|&k| k != handle);
            }
            ObjectKind::Mouse => {
                self.mice.remove(handle);
                self.mouse = self.mouse.filter(|&m| m != handle);
            }
            ObjectKind::Controller => {
                self.controllers.remove(handle);
            }
            ObjectKind::Animation => {
                self.auto_animations.retain(|&a| a != handle);
                if let Some(animation) = self.animations.remove(handle) {
                    if let Some(atlas) = animation.atlas().filter(|_| animation.owns_atlas()) {
                        if self.textures.contains(atlas) {
                            self.close(atlas);
                        }
                    }
                }
            }
            ObjectKind::Clock => {
                self.auto_clocks.retain(|&c| c != handle);
                self.clocks.remove(handle);
            }
            ObjectKind::Sound => {
                self.sounds.remove(handle);
            }
            ObjectKind::Music => {
                self.music.remove(handle);
                self.current_music = self.current_music.filter(|&m| m != handle);
            }
        }

        debug!(target: "registry", "Closed {:?}", handle);
        true
    }

    fn unlink(&mut self, owner: Option<Handle>, resource: Handle) {
        if let Some(window) = owner.and_then(|w| self.windows.get_mut(w)) {
            window.release(resource);
        }
    }

    //--- Singletons & Lookups ---------------------------------------------

    pub fn keyboard(&self) -> Option<Handle> {
        self.keyboard
    }

    pub fn mouse(&self) -> Option<Handle> {
        self.mouse
    }

    pub fn current_music(&self) -> Option<Handle> {
        self.current_music
    }

    /// Window registered under a backend window id.
    pub fn window_by_native(&self, native_id: u64) -> Option<Handle> {
        self.windows.find(|w| w.native_id() == native_id)
    }

    /// Controller registered under a backend instance id.
    pub fn controller_by_instance(&self, instance_id: u32) -> Option<Handle> {
        self.controllers.find(|c| c.instance_id() == instance_id)
    }

    //--- Registry Views ---------------------------------------------------

    pub fn windows(&self) -> &Registry<Window> {
        &self.windows
    }

    pub fn textures(&self) -> &Registry<Texture> {
        &self.textures
    }

    pub fn fonts(&self) -> &Registry<Font> {
        &self.fonts
    }

    pub fn keyboards(&self) -> &Registry<Keyboard> {
        &self.keyboards
    }

    pub fn mice(&self) -> &Registry<Mouse> {
        &self.mice
    }

    pub fn controllers(&self) -> &Registry<Controller> {
        &self.controllers
    }

    pub fn animations(&self) -> &Registry<Animation> {
        &self.animations
    }

    pub fn clocks(&self) -> &Registry<Clock> {
        &self.clocks
    }

    pub fn sounds(&self) -> &Registry<Sound> {
        &self.sounds
    }

    pub fn music(&self) -> &Registry<Music> {
        &self.music
    }

    //--- Auto Update ------------------------------------------------------

    /// Adds or removes a clock or animation from per-frame advancement.
    ///
    /// Registration order is advancement order. Other kinds and closed
    /// handles are misuse and return `false`.
    pub fn set_auto_update(&mut self, handle: Handle, enabled: bool) -> bool {
        if !self.is_open(handle) {
            warn!(target: "timing", "Auto-update on closed {:?}", handle);
            return false;
        }
        let list = match handle.kind() {
            ObjectKind::Clock => &mut self.auto_clocks,
            ObjectKind::Animation => &mut self.auto_animations,
            other => {
                warn!(target: "timing", "Auto-update is not supported for {}", other);
                return false;
            }
        };

        let present = list.contains(&handle);
        if enabled && !present {
            list.push(handle);
        } else if !enabled {
            list.retain(|&h| h != handle);
        }
        true
    }

    pub fn auto_clocks(&self) -> &[Handle] {
        &self.auto_clocks
    }

    pub fn auto_animations(&self) -> &[Handle] {
        &self.auto_animations
    }

    //--- Atlas Management -------------------------------------------------

    /// Points an animation at a texture atlas, closing a previously owned
    /// atlas that is being replaced.
    pub fn attach_atlas(&mut self, animation: Handle, atlas: Option<Handle>, owned: bool) -> bool {
        let size = match atlas {
            Some(texture) => match self.textures.get(texture) {
                Some(texture) => texture.size(),
                None => {
                    warn!(target: "timing", "Atlas {:?} is not an open texture", texture);
                    return false;
                }
            },
            None => (0, 0),
        };

        let Some(anim) = self.animations.get_mut(animation) else {
            warn!(target: "timing", "Atlas attached to closed {:?}", animation);
            return false;
        };
        if let Some(previous) = anim.set_atlas(atlas, size, owned) {
            if self.textures.contains(previous) {
                self.close(previous);
            }
        }
        true
    }

    //--- Properties -------------------------------------------------------

    /// Property view of any open object.
    pub fn properties(&self, handle: Handle) -> Option<&dyn Properties> {
        let object: &dyn Properties = match handle.kind() {
            ObjectKind::Window => self.windows.get(handle)?,
            ObjectKind::Texture => self.textures.get(handle)?,
            ObjectKind::Font => self.fonts.get(handle)?,
            ObjectKind::Keyboard => self.keyboards.get(handle)?,
            ObjectKind::Mouse => self.mice.get(handle)?,
            ObjectKind::Controller => self.controllers.get(handle)?,
            ObjectKind::Animation => self.animations.get(handle)?,
            ObjectKind::Clock => self.clocks.get(handle)?,
            ObjectKind::Sound => self.sounds.get(handle)?,
            ObjectKind::Music => self.music.get(handle)?,
        };
        Some(object)
    }

    fn properties_mut(&mut self, handle: Handle) -> Option<&mut dyn Properties> {
        let object: &mut dyn Properties = match handle.kind() {
            ObjectKind::Window => self.windows.get_mut(handle)?,
            ObjectKind::Texture => self.textures.get_mut(handle)?,
            ObjectKind::Font => self.fonts.get_mut(handle)?,
            ObjectKind::Keyboard => self.keyboards.get_mut(handle)?,
            ObjectKind::Mouse => self.mice.get_mut(handle)?,
            ObjectKind::Controller => self.controllers.get_mut(handle)?,
            ObjectKind::Animation => self.animations.get_mut(handle)?,
            ObjectKind::Clock => self.clocks.get_mut(handle)?,
            ObjectKind::Sound => self.sounds.get_mut(handle)?,
            ObjectKind::Music => self.music.get_mut(handle)?,
        };
        Some(object)
    }

    /// Sets a property on an open object.
    ///
    /// Returns `None` when the handle is closed. An animation's `atlas`
    /// resolves the texture size here, since the animation cannot.
    pub fn set_property(
        &mut self,
        handle: Handle,
        name: &str,
        value: PropertyValue,
    ) -> Option<Result<(), PropertyError>> {
        if !self.is_open(handle) {
            return None;
        }

        if handle.kind() == ObjectKind::Animation && name == "atlas" {
            let PropertyValue::Image(texture) = value else {
                return Some(Err(PropertyError::mismatch(name, "image", &value)));
            };
            let owned = self
                .animations
                .get(handle)
                .is_some_and(Animation::owns_atlas);
            return Some(if self.attach_atlas(handle, Some(texture), owned) {
                Ok(())
            } else {
                Err(PropertyError::mismatch(name, "open texture", &value))
            });
        }

        self.properties_mut(handle)
            .map(|object| object.set_property(name, value))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::DeadzonePolicy;

    fn objects() -> Objects {
        Objects::new(IdSequence::new(42))
    }

    fn window_with_resources(objects: &mut Objects) -> (Handle, Handle, Handle) {
        let window = objects.add_window(Window::new(1, "main", 640, 480));
        let texture = objects.add_texture(Texture::new(Some(window), "tiles", 64, 64));
        let font = objects.add_font(Font::new(Some(window), "mono", 12.0));
        (window, texture, font)
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn closing_window_cascades_to_resources() {
        let mut objects = objects();
        let (window, texture, font) = window_with_resources(&mut objects);
        assert_eq!(objects.windows.get(window).unwrap().textures(), &[texture]);

        assert!(objects.close(window));
        assert!(!objects.is_open(window));
        assert!(!objects.is_open(texture));
        assert!(!objects.is_open(font));
    }

    #[test]
    fn closing_texture_unlinks_from_window() {
        let mut objects = objects();
        let (window, texture, _) = window_with_resources(&mut objects);

        assert!(objects.close(texture));
        assert!(objects.windows.get(window).unwrap().textures().is_empty());
        assert!(objects.is_open(window));
    }

    #[test]
    fn double_close_is_reported() {
        let mut objects = objects();
        let sound = objects.add_sound(Sound::new("boom.wav"));
        assert!(objects.close(sound));
        assert!(!objects.close(sound));
    }

    #[test]
    fn texture_for_closed_window_is_unattached() {
        let mut objects = objects();
        let window = objects.add_window(Window::new(1, "main", 640, 480));
        objects.close(window);

        let texture = objects.add_texture(Texture::new(Some(window), "late", 8, 8));
        assert_eq!(objects.textures.get(texture).unwrap().window, None);
    }

    #[test]
    fn animation_closes_owned_atlas_only() {
        let mut objects = objects();
        let owned = objects.add_texture(Texture::new(None, "owned", 32, 32));
        let shared = objects.add_texture(Texture::new(None, "shared", 32, 32));

        let a = objects.add_animation(Animation::new());
        let b = objects.add_animation(Animation::new());
        assert!(objects.attach_atlas(a, Some(owned), true));
        assert!(objects.attach_atlas(b, Some(shared), false));

        objects.close(a);
        objects.close(b);
        assert!(!objects.is_open(owned));
        assert!(objects.is_open(shared));
    }

    #[test]
    fn replacing_owned_atlas_closes_previous() {
        let mut objects = objects();
        let first = objects.add_texture(Texture::new(None, "first", 32, 32));
        let second = objects.add_texture(Texture::new(None, "second", 64, 32));
        let anim = objects.add_animation(Animation::new());

        objects.attach_atlas(anim, Some(first), true);
        objects.attach_atlas(anim, Some(second), true);
        assert!(!objects.is_open(first));
        assert_eq!(objects.animations.get(anim).unwrap().atlas_size(), (64, 32));
    }

    //=====================================================================
    // Singleton Tests
    //=====================================================================

    #[test]
    fn keyboard_and_mouse_are_singletons() {
        let mut objects = objects();
        let keyboard = objects.add_keyboard(Keyboard::new()).unwrap();
        assert!(objects.add_keyboard(Keyboard::new()).is_none());
        assert_eq!(objects.keyboard(), Some(keyboard));

        objects.close(keyboard);
        assert_eq!(objects.keyboard(), None);
        assert!(objects.add_mouse(Mouse::new()).is_some());
        assert!(objects.add_mouse(Mouse::new()).is_none());
    }

    #[test]
    fn music_replaces_previous_track() {
        let mut objects = objects();
        let first = objects.set_music(Music::new("a.ogg"));
        let second = objects.set_music(Music::new("b.ogg"));
        assert!(!objects.is_open(first));
        assert_eq!(objects.current_music(), Some(second));
        assert_eq!(objects.list_all(ObjectKind::Music), vec![second]);
    }

    //=====================================================================
    // Lookup Tests
    //=====================================================================

    #[test]
    fn lookups_by_backend_id() {
        let mut objects = objects();
        let window = objects.add_window(Window::new(77, "main", 640, 480));
        let pad = objects.add_controller(Controller::new(5, "pad", DeadzonePolicy::default()));

        assert_eq!(objects.window_by_native(77), Some(window));
        assert_eq!(objects.window_by_native(78), None);
        assert_eq!(objects.controller_by_instance(5), Some(pad));
        assert_eq!(objects.controller_by_instance(6), None);
    }

    #[test]
    fn list_all_per_kind_is_creation_ordered() {
        let mut objects = objects();
        let a = objects.add_clock(Clock::new());
        let noise = objects.add_clock(Clock::new());
        let b = objects.add_clock(Clock::new());
        objects.close(noise);
        let c = objects.add_clock(Clock::new());
        assert_eq!(objects.list_all(ObjectKind::Clock), vec![a, b, c]);
    }

    //=====================================================================
    // Auto Update Tests
    //=====================================================================

    #[test]
    fn auto_update_keeps_registration_order() {
        let mut objects = objects();
        let first = objects.add_clock(Clock::new());
        let second = objects.add_clock(Clock::new());

        assert!(objects.set_auto_update(second, true));
        assert!(objects.set_auto_update(first, true));
        assert!(objects.set_auto_update(second, true));
        assert_eq!(objects.auto_clocks(), &[second, first]);

        objects.close(second);
        assert_eq!(objects.auto_clocks(), &[first]);

        let sound = objects.add_sound(Sound::new("x.wav"));
        assert!(!objects.set_auto_update(sound, true));
    }

    //=====================================================================
    // Property Tests
    //=====================================================================

    #[test]
    fn animation_atlas_property_resolves_size() {
        let mut objects = objects();
        let atlas = objects.add_texture(Texture::new(None, "sheet", 128, 64));
        let anim = objects.add_animation(Animation::new());

        let result = objects.set_property(anim, "atlas", PropertyValue::Image(atlas));
        assert_eq!(result, Some(Ok(())));
        assert_eq!(objects.animations.get(anim).unwrap().atlas_size(), (128, 64));

        let wrong = objects.set_property(anim, "atlas", PropertyValue::Object(atlas));
        assert!(matches!(wrong, Some(Err(PropertyError::TypeMismatch { .. }))));
    }

    #[test]
    fn closed_handle_has_no_properties() {
        let mut objects = objects();
        let sound = objects.add_sound(Sound::new("x.wav"));
        objects.close(sound);
        assert!(objects.properties(sound).is_none());
        assert_eq!(objects.set_property(sound, "volume", PropertyValue::Float(0.5)), None);
    }
}
