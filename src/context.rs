//=========================================================================
// Platform Context
//
// Single owner of every registry, device and clock, and the only entry
// point through which native events and frame time enter the core.
//
// Architecture:
// ```text
//     ContextBuilder ──build()──> Context
//         │                         │
//         ├─ with_seed()            ├─ dispatch(NativeEvent)
//         ├─ with_stick_deadzone()  │     normalize → enrich → handler
//         └─ with_trigger_deadzone()├─ poll_event / wait_event (EventSource)
//                                   └─ advance_frame(dt)
//                                         animations → clocks → pending queue
// ```
//
// Everything is single-threaded and synchronous. Device state is updated
// strictly before the corresponding event reaches the handler or caller.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::{Error, Result};
use crate::core::input::{
    enricher, normalizer, ButtonSet, CanonicalEvent, Controller, ControllerButton, DeadzoneMode,
    DeadzonePolicy, EventKind, KeyCode, Keyboard, Mouse, MouseButton, Stick, StickCoordinate,
    Trigger,
};
use crate::core::objects::{Font, Music, Objects, PropertyValue, Sound, Texture, Window};
use crate::core::platform_bridge::{EventSource, NativeEvent, NativeKind};
use crate::core::registry::{Handle, IdSequence, ObjectKind};
use crate::core::timing::{Animation, Clock, FrameGeometry, TIMER_CAPACITY};

/// Synthesized events kept for polling. The oldest is dropped beyond this.
pub const PENDING_CAPACITY: usize = 256;

//=== Handler =============================================================

/// Global callback invoked once per delivered event, after every state
/// update caused by that event.
pub type Handler = Box<dyn FnMut(&Context, &CanonicalEvent)>;

//=== ContextBuilder ======================================================

/// Builder for configuring and constructing a [`Context`].
///
/// # Default Values
///
/// - **Seed**: drawn from OS entropy
/// - **Stick deadzone**: scaled-radial, 0.24
/// - **Trigger deadzone**: 0.12
/// - **Synthesized devices**: keyboard and mouse inserted at build time
///
/// # Examples
///
/// ```
/// use aetheric_platform::ContextBuilder;
/// use aetheric_platform::core::input::DeadzoneMode;
///
/// let context = ContextBuilder::new()
///     .with_seed(7)
///     .with_stick_deadzone(DeadzoneMode::Radial, 0.2)
///     .build();
/// assert!(context.keyboard().is_some());
/// ```
pub struct ContextBuilder {
    seed: Option<u32>,
    deadzones: DeadzonePolicy,
    synthesize_devices: bool,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            seed: None,
            deadzones: DeadzonePolicy::default(),
            synthesize_devices: true,
        }
    }

    /// Seeds the identity sequence for reproducible handles.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the stick deadzone applied to controllers attached later.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `[0, 1]`.
    pub fn with_stick_deadzone(mut self, mode: DeadzoneMode, value: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "Stick deadzone must be in [0, 1], got {}",
            value
        );
        self.deadzones.stick_mode = mode;
        self.deadzones.stick_value = value;
        self
    }

    /// Sets the trigger deadzone applied to controllers attached later.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `[0, 1]`.
    pub fn with_trigger_deadzone(mut self, value: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "Trigger deadzone must be in [0, 1], got {}",
            value
        );
        self.deadzones.trigger_value = value;
        self
    }

    /// Whether `build` inserts the keyboard and mouse singletons.
    ///
    /// Default: true
    pub fn with_synthesized_devices(mut self, enabled: bool) -> Self {
        self.synthesize_devices = enabled;
        self
    }

    pub fn build(self) -> Context {
        let ids = match self.seed {
            Some(seed) => IdSequence::new(seed),
            None => IdSequence::from_entropy(),
        };
        info!(
            target: "platform",
            "Building context (stick deadzone: {:?} {}, trigger deadzone: {})",
            self.deadzones.stick_mode, self.deadzones.stick_value, self.deadzones.trigger_value
        );

        let mut context = Context {
            objects: Objects::new(ids),
            deadzones: self.deadzones,
            pending: VecDeque::with_capacity(PENDING_CAPACITY),
            pending_overflow: false,
            handler: None,
            native_time: 0.0,
            frame_time: 0.0,
        };

        if self.synthesize_devices {
            context.dispatch(NativeEvent::new(0.0, NativeKind::KeyboardAdded));
            context.dispatch(NativeEvent::new(0.0, NativeKind::MouseAdded));
        }
        context
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Context =============================================================

/// Owner of all platform objects, device state and clocks.
pub struct Context {
    objects: Objects,
    deadzones: DeadzonePolicy,
    pending: VecDeque<CanonicalEvent>,
    pending_overflow: bool,
    handler: Option<Handler>,
    /// Latest native timestamp seen.
    native_time: f64,
    /// Sum of frame deltas.
    frame_time: f64,
}

impl Context {
    //--- Event Dispatch ---------------------------------------------------

    /// Normalizes and enriches one native event.
    ///
    /// Returns the delivered event, or `None` when the native event was
    /// discarded. The handler, if any, has already seen the event.
    pub fn dispatch(&mut self, native: NativeEvent) -> Option<CanonicalEvent> {
        if native.timestamp > self.native_time {
            self.native_time = native.timestamp;
        }

        let mut event = normalizer::normalize(&native, &self.objects);
        enricher::enrich(&native, &mut event, &mut self.objects, &self.deadzones);
        if event.is_nothing() {
            return None;
        }

        self.notify(&event);
        Some(event)
    }

    /// Next meaningful event without blocking.
    ///
    /// Synthesized events (animation, timer) come first, then native
    /// events from `source`; discarded native events are skipped.
    pub fn poll_event(&mut self, source: &mut impl EventSource) -> Option<CanonicalEvent> {
        if let Some(event) = self.poll_pending() {
            return Some(event);
        }
        while let Some(native) = source.poll() {
            if let Some(event) = self.dispatch(native) {
                return Some(event);
            }
        }
        None
    }

    /// Next meaningful event, blocking on `source` until one arrives.
    pub fn wait_event(&mut self, source: &mut impl EventSource) -> Result<CanonicalEvent> {
        if let Some(event) = self.poll_pending() {
            return Ok(event);
        }
        loop {
            let native = source.wait()?;
            if let Some(event) = self.dispatch(native) {
                return Ok(event);
            }
        }
    }

    /// Next synthesized event, if any.
    pub fn poll_pending(&mut self) -> Option<CanonicalEvent> {
        let event = self.pending.pop_front();
        if self.pending.is_empty() {
            self.pending_overflow = false;
        }
        event
    }

    /// Number of synthesized events not yet polled.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Installs the global handler, replacing any previous one.
    pub fn set_handler(&mut self, handler: impl FnMut(&Context, &CanonicalEvent) + 'static) {
        self.handler = Some(Box::new(handler));
    }

    pub fn clear_handler(&mut self) {
        self.handler = None;
    }

    /// Seconds since the context origin: the later of the latest native
    /// timestamp and the accumulated frame time.
    pub fn now(&self) -> f64 {
        self.native_time.max(self.frame_time)
    }

    fn notify(&mut self, event: &CanonicalEvent) {
        if let Some(mut handler) = self.handler.take() {
            handler(self, event);
            self.handler = Some(handler);
        }
    }

    fn emit(&mut self, kind: EventKind) {
        let event = CanonicalEvent::new(self.now(), kind);
        self.notify(&event);

        if self.pending.len() == PENDING_CAPACITY {
            if !self.pending_overflow {
                warn!(
                    target: "timing",
                    "Pending queue full ({} events), dropping the oldest until drained",
                    PENDING_CAPACITY
                );
                self.pending_overflow = true;
            }
            self.pending.pop_front();
        }
        self.pending.push_back(event);
    }

    //--- Frame Timing -----------------------------------------------------

    /// Advances every auto-updated animation, then every auto-updated
    /// clock, each in registration order.
    pub fn advance_frame(&mut self, dt: f64) {
        if dt.is_nan() || dt < 0.0 {
            warn!(target: "timing", "Ignoring invalid frame delta {}", dt);
            return;
        }
        self.frame_time += dt;

        for animation in self.objects.auto_animations().to_vec() {
            self.advance_animation(animation, dt);
        }
        for clock in self.objects.auto_clocks().to_vec() {
            self.advance_clock(clock, dt);
        }
    }

    /// Advances one animation. Returns whether it finished a cycle.
    pub fn advance_animation(&mut self, animation: Handle, dt: f64) -> bool {
        let Some(anim) = self.objects.animations.get_mut(animation) else {
            warn!(target: "timing", "Advance of closed {:?}", animation);
            return false;
        };
        let finished = anim.advance(dt);
        if finished {
            debug!(target: "timing", "{:?} finished", animation);
            self.emit(EventKind::AnimationFinished { animation });
        }
        finished
    }

    /// Advances one clock. Returns how many timers fired.
    pub fn advance_clock(&mut self, clock: Handle, dt: f64) -> usize {
        let Some(c) = self.objects.clocks.get_mut(clock) else {
            warn!(target: "timing", "Advance of closed {:?}", clock);
            return 0;
        };
        let fires = c.advance(dt);
        let count = fires.len();
        for fire in fires {
            self.emit(EventKind::TimerFired {
                clock,
                name: fire.name,
                overshoot: fire.overshoot,
                fire_count: fire.fire_count,
                crossings: fire.crossings,
            });
        }
        count
    }

    //--- Object Lifecycle -------------------------------------------------

    /// Registers a window known to the backend under `native_id`.
    pub fn open_window(&mut self, native_id: u64, title: &str, width: u32, height: u32) -> Handle {
        let handle = self.objects.add_window(Window::new(native_id, title, width, height));
        info!(target: "platform", "Window '{}' ({}x{}) opened as {:?}", title, width, height, handle);
        handle
    }

    /// Registers a texture, owned by `window` when given.
    pub fn create_texture(
        &mut self,
        window: Option<Handle>,
        name: &str,
        width: u32,
        height: u32,
    ) -> Handle {
        self.objects.add_texture(Texture::new(window, name, width, height))
    }

    pub fn create_font(&mut self, window: Option<Handle>, family: &str, size: f64) -> Handle {
        self.objects.add_font(Font::new(window, family, size))
    }

    pub fn create_sound(&mut self, path: &str) -> Handle {
        self.objects.add_sound(Sound::new(path))
    }

    /// Opens the current music track, closing the previous one.
    pub fn open_music(&mut self, path: &str) -> Handle {
        self.objects.set_music(Music::new(path))
    }

    pub fn create_animation(&mut self) -> Handle {
        self.objects.add_animation(Animation::new())
    }

    pub fn create_clock(&mut self) -> Handle {
        self.objects.add_clock(Clock::new())
    }

    /// Closes `handle` and everything it owns. Closing a closed handle
    /// warns and returns `false`.
    pub fn close(&mut self, handle: Handle) -> bool {
        self.objects.close(handle)
    }

    pub fn is_open(&self, handle: Handle) -> bool {
        self.objects.is_open(handle)
    }

    /// Open handles of `kind`, oldest first.
    pub fn list_all(&self, kind: ObjectKind) -> Vec<Handle> {
        self.objects.list_all(kind)
    }

    /// Read-only view of every registry.
    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    //--- Keyboard Queries -------------------------------------------------

    pub fn keyboard(&self) -> Option<Handle> {
        self.objects.keyboard()
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.with_keyboard(false, |k| k.keys.is_down(key))
    }

    pub fn last_key_pressed_time(&self, key: KeyCode) -> Option<f64> {
        self.with_keyboard(None, |k| k.keys.last_press_time(key))
    }

    pub fn last_key_released_time(&self, key: KeyCode) -> Option<f64> {
        self.with_keyboard(None, |k| k.keys.last_release_time(key))
    }

    pub fn last_key_pressed(&self) -> Option<KeyCode> {
        self.with_keyboard(None, |k| k.keys.last_pressed())
    }

    pub fn last_key_released(&self) -> Option<KeyCode> {
        self.with_keyboard(None, |k| k.keys.last_released())
    }

    /// Compares the most recent key-down snapshots, oldest first.
    pub fn check_key_history(&self, expected: &[&[KeyCode]]) -> bool {
        self.with_keyboard(false, |k| k.keys.check_history_of(expected))
    }

    fn with_keyboard<R>(&self, default: R, f: impl FnOnce(&Keyboard) -> R) -> R {
        match self.objects.keyboard().and_then(|h| self.objects.keyboards().get(h)) {
            Some(keyboard) => f(keyboard),
            None => {
                warn!(target: "input", "No keyboard open");
                default
            }
        }
    }

    //--- Mouse Queries ----------------------------------------------------

    pub fn mouse(&self) -> Option<Handle> {
        self.objects.mouse()
    }

    /// Last cursor position in window pixels.
    pub fn mouse_position(&self) -> (f64, f64) {
        self.with_mouse((0.0, 0.0), |m| (m.x, m.y))
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.with_mouse(false, |m| m.buttons.is_down(button))
    }

    pub fn last_mouse_pressed_time(&self, button: MouseButton) -> Option<f64> {
        self.with_mouse(None, |m| m.buttons.last_press_time(button))
    }

    pub fn last_mouse_released_time(&self, button: MouseButton) -> Option<f64> {
        self.with_mouse(None, |m| m.buttons.last_release_time(button))
    }

    pub fn check_mouse_history(&self, expected: &[&[MouseButton]]) -> bool {
        self.with_mouse(false, |m| m.buttons.check_history_of(expected))
    }

    fn with_mouse<R>(&self, default: R, f: impl FnOnce(&Mouse) -> R) -> R {
        match self.objects.mouse().and_then(|h| self.objects.mice().get(h)) {
            Some(mouse) => f(mouse),
            None => {
                warn!(target: "input", "No mouse open");
                default
            }
        }
    }

    //--- Controller Queries -----------------------------------------------

    /// Controller attached under a backend instance id.
    pub fn controller(&self, instance_id: u32) -> Option<Handle> {
        self.objects.controller_by_instance(instance_id)
    }

    /// Every attached controller, oldest first.
    pub fn controllers(&self) -> Vec<Handle> {
        self.objects.list_all(ObjectKind::Controller)
    }

    pub fn is_controller_button_down(&self, controller: Handle, button: ControllerButton) -> bool {
        self.with_controller(controller, false, |c| c.buttons.is_down(button))
    }

    pub fn last_controller_pressed_time(
        &self,
        controller: Handle,
        button: ControllerButton,
    ) -> Option<f64> {
        self.with_controller(controller, None, |c| c.buttons.last_press_time(button))
    }

    pub fn last_controller_released_time(
        &self,
        controller: Handle,
        button: ControllerButton,
    ) -> Option<f64> {
        self.with_controller(controller, None, |c| c.buttons.last_release_time(button))
    }

    pub fn check_controller_history(
        &self,
        controller: Handle,
        expected: &[ButtonSet<ControllerButton>],
    ) -> bool {
        self.with_controller(controller, false, |c| c.buttons.check_history(expected))
    }

    /// Shaped reading of one stick.
    pub fn stick(&self, controller: Handle, stick: Stick) -> StickCoordinate {
        self.with_controller(controller, StickCoordinate::ZERO, |c| c.stick(stick))
    }

    /// Shaped reading of one trigger in `[0, 1]`.
    pub fn trigger(&self, controller: Handle, trigger: Trigger) -> f64 {
        self.with_controller(controller, 0.0, |c| c.trigger(trigger))
    }

    fn with_controller<R>(
        &self,
        controller: Handle,
        default: R,
        f: impl FnOnce(&Controller) -> R,
    ) -> R {
        match self.objects.controllers().get(controller) {
            Some(c) => f(c),
            None => {
                warn!(target: "input", "Query on closed {:?}", controller);
                default
            }
        }
    }

    //--- Animations -------------------------------------------------------

    /// Creates an animation over a grid atlas of `frame_width` x
    /// `frame_height` cells. The frame count is derived from the atlas.
    ///
    /// Returns `None` if `atlas` is not an open texture.
    pub fn load_animation_grid(
        &mut self,
        atlas: Handle,
        frame_width: u32,
        frame_height: u32,
        period: f64,
        owns_atlas: bool,
    ) -> Option<Handle> {
        let geometry = FrameGeometry {
            width: frame_width,
            height: frame_height,
            first_frame: 0,
            count_override: None,
        };
        self.load_animation(atlas, geometry, period, owns_atlas)
    }

    /// Creates an animation over a horizontal strip of `frame_count`
    /// equally wide frames spanning the whole atlas.
    pub fn load_animation_strip(
        &mut self,
        atlas: Handle,
        frame_count: u32,
        period: f64,
        owns_atlas: bool,
    ) -> Option<Handle> {
        let Some((width, height)) = self.objects.textures().get(atlas).map(Texture::size) else {
            warn!(target: "timing", "Animation atlas {:?} is not an open texture", atlas);
            return None;
        };
        if frame_count == 0 {
            warn!(target: "timing", "Animation strip needs at least one frame");
            return None;
        }

        let geometry = FrameGeometry {
            width: width / frame_count,
            height,
            first_frame: 0,
            count_override: Some(frame_count),
        };
        self.load_animation(atlas, geometry, period, owns_atlas)
    }

    fn load_animation(
        &mut self,
        atlas: Handle,
        geometry: FrameGeometry,
        period: f64,
        owns_atlas: bool,
    ) -> Option<Handle> {
        if !self.objects.textures().contains(atlas) {
            warn!(target: "timing", "Animation atlas {:?} is not an open texture", atlas);
            return None;
        }

        let mut animation = Animation::new();
        animation.set_geometry(geometry);
        animation.set_period(period);
        let handle = self.objects.add_animation(animation);
        self.objects.attach_atlas(handle, Some(atlas), owns_atlas);

        debug!(
            target: "timing",
            "{:?} loaded with {} frames of {}x{}",
            handle,
            self.objects.animations().get(handle).map_or(0, Animation::frame_count),
            geometry.width,
            geometry.height
        );
        Some(handle)
    }

    //--- Clocks -----------------------------------------------------------

    /// Adds a named timer, replacing any timer of the same name.
    ///
    /// A full timer table is fatal: the error is logged and returned.
    /// Adding to a closed clock warns and does nothing.
    pub fn add_timer(&mut self, clock: Handle, name: &str, seconds: f64, repeat: bool) -> Result<()> {
        let Some(c) = self.objects.clocks.get_mut(clock) else {
            warn!(target: "timing", "Timer '{}' added to closed {:?}", name, clock);
            return Ok(());
        };
        match c.add_timer(name, seconds, repeat) {
            Some(_) => Ok(()),
            None => {
                error!(
                    target: "timing",
                    "Timer table of {:?} is full ({} slots), cannot add '{}'",
                    clock, TIMER_CAPACITY, name
                );
                Err(Error::TimerTableFull {
                    clock,
                    name: name.to_owned(),
                    capacity: TIMER_CAPACITY,
                })
            }
        }
    }

    pub fn remove_timer(&mut self, clock: Handle, name: &str) -> bool {
        self.with_clock_mut(clock, name, |c| c.remove_timer(name))
    }

    pub fn pause_timer(&mut self, clock: Handle, name: &str) -> bool {
        self.with_clock_mut(clock, name, |c| c.pause_timer(name))
    }

    pub fn resume_timer(&mut self, clock: Handle, name: &str) -> bool {
        self.with_clock_mut(clock, name, |c| c.resume_timer(name))
    }

    /// Seconds accumulated by a timer since its last fire.
    pub fn timer_elapsed(&self, clock: Handle, name: &str) -> Option<f64> {
        let Some(c) = self.objects.clocks().get(clock) else {
            warn!(target: "timing", "Timer query on closed {:?}", clock);
            return None;
        };
        c.timer(name).map(|t| t.current())
    }

    fn with_clock_mut(&mut self, clock: Handle, name: &str, f: impl FnOnce(&mut Clock) -> bool) -> bool {
        let Some(c) = self.objects.clocks.get_mut(clock) else {
            warn!(target: "timing", "Timer '{}' on closed {:?}", name, clock);
            return false;
        };
        let found = f(c);
        if !found {
            warn!(target: "timing", "No timer '{}' on {:?}", name, clock);
        }
        found
    }

    /// Adds or removes a clock or animation from [`Context::advance_frame`].
    pub fn set_auto_update(&mut self, handle: Handle, enabled: bool) -> bool {
        self.objects.set_auto_update(handle, enabled)
    }

    //--- Properties -------------------------------------------------------

    /// Reads a named property. Closed handles and unknown or mistyped
    /// names warn and return `None`.
    pub fn get_property(&self, handle: Handle, name: &str) -> Option<PropertyValue> {
        let Some(object) = self.objects.properties(handle) else {
            warn!(target: "properties", "Property '{}' read on closed {:?}", name, handle);
            return None;
        };
        object
            .get_property(name)
            .map_err(|err| warn!(target: "properties", "{:?}: {}", handle, err))
            .ok()
    }

    /// Writes a named property. Returns `false` after a warning on failure.
    pub fn set_property(&mut self, handle: Handle, name: &str, value: impl Into<PropertyValue>) -> bool {
        match self.objects.set_property(handle, name, value.into()) {
            Some(Ok(())) => true,
            Some(Err(err)) => {
                warn!(target: "properties", "{:?}: {}", handle, err);
                false
            }
            None => {
                warn!(target: "properties", "Property '{}' written on closed {:?}", name, handle);
                false
            }
        }
    }

    /// Integer property, or 0.
    pub fn get_int(&self, handle: Handle, name: &str) -> i64 {
        self.get_property(handle, name)
            .and_then(|v| v.as_int())
            .unwrap_or(0)
    }

    /// Float property, or 0.0.
    pub fn get_float(&self, handle: Handle, name: &str) -> f64 {
        self.get_property(handle, name)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0)
    }

    /// String property, or the empty string.
    pub fn get_str(&self, handle: Handle, name: &str) -> String {
        self.get_property(handle, name)
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default()
    }

    /// Object or image property, or `None`.
    pub fn get_handle(&self, handle: Handle, name: &str) -> Option<Handle> {
        self.get_property(handle, name).and_then(|v| v.as_handle())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
