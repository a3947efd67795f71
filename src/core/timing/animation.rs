//=========================================================================
// Animation Clock
//=========================================================================
//
// Sprite-sheet playback driven by an external frame delta.
//
// Architecture:
//   advance(dt) → elapsed += dt → crossed end? → finished (once) → wrap / hold
//
// The animation is one continuous timeline of `period × frame_count`
// seconds. Crossing its end signals "finished" once per cycle: looping
// animations wrap back into the timeline (re-arming the signal), while
// non-looping ones hold at the end until seeked.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::registry::Handle;

//=== FrameGeometry =======================================================

/// Layout of frames inside the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    /// Index of the first frame used by this animation.
    pub first_frame: u32,
    /// Explicit frame count; caps the count derived from the atlas.
    pub count_override: Option<u32>,
}

//=== Animation ===========================================================

/// Elapsed-time state machine over a frame atlas.
#[derive(Debug, Clone)]
pub struct Animation {
    atlas: Option<Handle>,
    owns_atlas: bool,
    atlas_size: (u32, u32),
    geometry: FrameGeometry,
    period: f64,
    elapsed: f64,
    looping: bool,
    signaled: bool,
}

impl Animation {
    /// An empty animation: no atlas, no frames.
    pub fn new() -> Self {
        Self {
            atlas: None,
            owns_atlas: false,
            atlas_size: (0, 0),
            geometry: FrameGeometry::default(),
            period: 0.0,
            elapsed: 0.0,
            looping: false,
            signaled: false,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Replaces the atlas and returns the previous one if it was owned.
    ///
    /// The caller is responsible for closing the returned handle.
    pub fn set_atlas(&mut self, atlas: Option<Handle>, size: (u32, u32), owned: bool) -> Option<Handle> {
        let previous = self.atlas.filter(|_| self.owns_atlas);
        let previous = previous.filter(|&old| Some(old) != atlas);
        self.atlas = atlas;
        self.atlas_size = if atlas.is_some() { size } else { (0, 0) };
        self.owns_atlas = owned && atlas.is_some();
        previous
    }

    pub fn set_owns_atlas(&mut self, owned: bool) {
        self.owns_atlas = owned && self.atlas.is_some();
    }

    pub fn set_geometry(&mut self, geometry: FrameGeometry) {
        self.geometry = geometry;
    }

    pub fn geometry_mut(&mut self) -> &mut FrameGeometry {
        &mut self.geometry
    }

    /// Sets the per-frame duration; negative periods are rejected.
    pub fn set_period(&mut self, period: f64) {
        if period.is_nan() || period < 0.0 {
            warn!(target: "timing", "Ignoring invalid animation period {}", period);
            return;
        }
        self.period = period;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Seeks to `elapsed` seconds, clamped to the timeline.
    ///
    /// Seeking below the end re-arms the finished signal.
    pub fn seek(&mut self, elapsed: f64) {
        let total = self.total();
        self.elapsed = elapsed.clamp(0.0, total);
        if self.elapsed < total {
            self.signaled = false;
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn atlas(&self) -> Option<Handle> {
        self.atlas
    }

    pub fn owns_atlas(&self) -> bool {
        self.owns_atlas
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        self.atlas_size
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether the end of the timeline has been signaled this cycle.
    pub fn is_finished(&self) -> bool {
        self.signaled
    }

    /// Number of frames played.
    ///
    /// Derived from the atlas as `atlas_area / frame_area - first_frame`
    /// and capped by the explicit override. Without an atlas the override
    /// alone decides.
    pub fn frame_count(&self) -> u32 {
        let g = self.geometry;
        let frame_area = u64::from(g.width) * u64::from(g.height);
        let derived = if self.atlas.is_some() && frame_area > 0 {
            let atlas_area = u64::from(self.atlas_size.0) * u64::from(self.atlas_size.1);
            let count = (atlas_area / frame_area).saturating_sub(u64::from(g.first_frame));
            Some(u32::try_from(count).unwrap_or(u32::MAX))
        } else {
            None
        };

        match (derived, g.count_override) {
            (Some(derived), Some(explicit)) => derived.min(explicit),
            (Some(derived), None) => derived,
            (None, Some(explicit)) => explicit,
            (None, None) => 0,
        }
    }

    /// Length of the timeline in seconds.
    pub fn total(&self) -> f64 {
        self.period * f64::from(self.frame_count())
    }

    /// Atlas frame index for the current elapsed time.
    pub fn current_frame(&self) -> u32 {
        let first = self.geometry.first_frame;
        let count = self.frame_count();
        if count == 0 || self.period <= 0.0 {
            return first;
        }
        let offset = (self.elapsed / self.period).floor() as u32;
        first + offset.min(count - 1)
    }

    //--- Playback ---------------------------------------------------------

    /// Advances playback by `dt` seconds.
    ///
    /// Returns `true` exactly when this call crossed the end of the
    /// timeline for the first time in the current cycle.
    pub fn advance(&mut self, dt: f64) -> bool {
        if dt.is_nan() || dt <= 0.0 {
            return false;
        }

        let total = self.total();
        if total <= 0.0 {
            return false;
        }

        self.elapsed += dt;
        if self.elapsed < total {
            return false;
        }

        let fired = !self.signaled;
        self.signaled = true;

        if self.looping {
            self.elapsed = self.elapsed.rem_euclid(total);
            // Back inside the timeline: the next crossing signals again.
            self.signaled = false;
        } else {
            self.elapsed = total;
        }
        fired
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ObjectKind;

    const EPS: f64 = 1e-9;

    /// period = 0.5s, 4 frames → 2.0s timeline.
    fn four_frames(looping: bool) -> Animation {
        let mut anim = Animation::new();
        anim.set_geometry(FrameGeometry {
            width: 16,
            height: 16,
            first_frame: 0,
            count_override: Some(4),
        });
        anim.set_period(0.5);
        anim.set_looping(looping);
        anim
    }

    fn atlas_handle() -> Handle {
        // Only the presence of a handle matters here.
        let mut registry = crate::core::registry::Registry::new(ObjectKind::Texture);
        registry.insert(77, ()).unwrap()
    }

    //=====================================================================
    // Frame Count Tests
    //=====================================================================

    #[test]
    fn frame_count_derived_from_atlas() {
        let mut anim = Animation::new();
        anim.set_atlas(Some(atlas_handle()), (64, 32), false);
        anim.set_geometry(FrameGeometry { width: 16, height: 16, first_frame: 2, count_override: None });

        // 64*32 / (16*16) = 8 frames, minus the 2 skipped.
        assert_eq!(anim.frame_count(), 6);
    }

    #[test]
    fn override_caps_derived_count() {
        let mut anim = Animation::new();
        anim.set_atlas(Some(atlas_handle()), (64, 32), false);
        anim.set_geometry(FrameGeometry { width: 16, height: 16, first_frame: 0, count_override: Some(3) });
        assert_eq!(anim.frame_count(), 3);

        anim.geometry_mut().count_override = Some(100);
        assert_eq!(anim.frame_count(), 8);
    }

    #[test]
    fn zero_sized_frames_have_no_count() {
        let mut anim = Animation::new();
        anim.set_atlas(Some(atlas_handle()), (64, 32), false);
        assert_eq!(anim.frame_count(), 0);
        assert!(!anim.advance(1.0));
    }

    //=====================================================================
    // Playback Tests
    //=====================================================================

    #[test]
    fn looping_wraps_and_fires_once() {
        let mut anim = four_frames(true);
        assert!((anim.total() - 2.0).abs() < EPS);

        assert!(anim.advance(2.5));
        assert!((anim.elapsed() - 0.5).abs() < EPS);
        assert_eq!(anim.current_frame(), 1);
        assert!(!anim.is_finished());
    }

    #[test]
    fn looping_fires_again_next_cycle() {
        let mut anim = four_frames(true);
        assert!(anim.advance(2.5));
        assert!(!anim.advance(1.0));
        assert!(anim.advance(1.0));
    }

    #[test]
    fn non_looping_saturates_at_end() {
        let mut anim = four_frames(false);

        assert!(anim.advance(2.5));
        assert!((anim.elapsed() - 2.0).abs() < EPS);
        assert_eq!(anim.current_frame(), 3);
        assert!(anim.is_finished());

        assert!(!anim.advance(1.0), "finished must only fire once");
        assert_eq!(anim.current_frame(), 3);
    }

    #[test]
    fn seek_below_end_rearms_signal() {
        let mut anim = four_frames(false);
        assert!(anim.advance(3.0));

        anim.seek(1.0);
        assert!(!anim.is_finished());
        assert_eq!(anim.current_frame(), 2);
        assert!(anim.advance(1.5));
    }

    #[test]
    fn current_frame_includes_first_frame_offset() {
        let mut anim = four_frames(false);
        anim.geometry_mut().first_frame = 5;
        anim.advance(0.75);
        assert_eq!(anim.current_frame(), 6);

        anim.advance(10.0);
        assert_eq!(anim.current_frame(), 8);
    }

    #[test]
    fn non_positive_delta_is_ignored() {
        let mut anim = four_frames(true);
        assert!(!anim.advance(0.0));
        assert!(!anim.advance(-1.0));
        assert_eq!(anim.elapsed(), 0.0);
    }

    //=====================================================================
    // Atlas Ownership Tests
    //=====================================================================

    #[test]
    fn replacing_owned_atlas_returns_previous() {
        let mut registry = crate::core::registry::Registry::new(ObjectKind::Texture);
        let first = registry.insert(1, ()).unwrap();
        let second = registry.insert(2, ()).unwrap();

        let mut anim = Animation::new();
        assert_eq!(anim.set_atlas(Some(first), (32, 32), true), None);
        assert!(anim.owns_atlas());
        assert_eq!(anim.set_atlas(Some(second), (32, 32), false), Some(first));
        assert_eq!(anim.set_atlas(None, (32, 32), true), None);
        assert!(!anim.owns_atlas());
        assert_eq!(anim.atlas_size(), (0, 0));
    }
}
