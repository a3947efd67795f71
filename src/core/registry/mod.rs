//=========================================================================
// Object Registry
//=========================================================================
//
// Generic open/close lifecycle shared by every object kind.
//
// Architecture:
//   IdSequence → Handle { kind, id } → Registry<T> (one per kind)
//
// A handle is "open" exactly while its id is present in the registry of
// its kind. Iteration order is creation order, which callers rely on for
// printing and deterministic traversal.
//
//=========================================================================

//=== Submodules ==========================================================

mod id_sequence;

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use log::warn;

//=== Public API ==========================================================

pub use id_sequence::IdSequence;

//=== ObjectKind ==========================================================

/// Closed set of object kinds managed by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Window,
    Texture,
    Font,
    Keyboard,
    Mouse,
    Controller,
    Animation,
    Clock,
    Sound,
    Music,
}

impl ObjectKind {
    /// Every kind, in declaration order.
    pub const ALL: [ObjectKind; 10] = [
        ObjectKind::Window,
        ObjectKind::Texture,
        ObjectKind::Font,
        ObjectKind::Keyboard,
        ObjectKind::Mouse,
        ObjectKind::Controller,
        ObjectKind::Animation,
        ObjectKind::Clock,
        ObjectKind::Sound,
        ObjectKind::Music,
    ];

    /// Lowercase name used in log output.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Window => "window",
            ObjectKind::Texture => "texture",
            ObjectKind::Font => "font",
            ObjectKind::Keyboard => "keyboard",
            ObjectKind::Mouse => "mouse",
            ObjectKind::Controller => "controller",
            ObjectKind::Animation => "animation",
            ObjectKind::Clock => "clock",
            ObjectKind::Sound => "sound",
            ObjectKind::Music => "music",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== Handle ==============================================================

/// Opaque, copyable reference to one registry-managed object.
///
/// Handles never own the object; the registry of their kind does. A
/// handle outlives its object safely: every lookup through a closed
/// handle misses and degrades to a warning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    kind: ObjectKind,
    id: u32,
}

impl Handle {
    /// A handle that is never open. Used as a placeholder inside events
    /// whose device has not been allocated yet.
    pub const fn null(kind: ObjectKind) -> Self {
        Self { kind, id: 0 }
    }

    pub fn kind(self) -> ObjectKind {
        self.kind
    }

    pub fn id(self) -> u32 {
        self.id
    }

    pub fn is_null(self) -> bool {
        self.id == 0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.kind, self.id)
    }
}

//=== Registry ============================================================

struct Entry<T> {
    created: Instant,
    serial: u64,
    value: T,
}

/// Set of open objects of a single kind.
pub struct Registry<T> {
    kind: ObjectKind,
    entries: HashMap<u32, Entry<T>>,
    next_serial: u64,
}

impl<T> Registry<T> {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            next_serial: 0,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    //--- Lifecycle --------------------------------------------------------

    /// Registers `value` under `id` and returns its handle.
    ///
    /// Inserting an id that is already open is misuse: the existing
    /// object is kept, the new value is dropped and `None` is returned.
    pub fn insert(&mut self, id: u32, value: T) -> Option<Handle> {
        let handle = Handle { kind: self.kind, id };
        if id == 0 || self.entries.contains_key(&id) {
            warn!(target: "registry", "Duplicate insertion of {:?} ignored", handle);
            return None;
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        self.entries.insert(
            id,
            Entry {
                created: Instant::now(),
                serial,
                value,
            },
        );
        Some(handle)
    }

    /// Registers `value` under the next free id drawn from `ids`.
    ///
    /// Ids already open (possible only after the sequence wraps) are
    /// skipped rather than overwritten.
    pub fn allocate(&mut self, ids: &mut IdSequence, value: T) -> Handle {
        let mut id = ids.next_id();
        while self.entries.contains_key(&id) {
            warn!(target: "registry", "Identity {:08x} already open for {}, redrawing", id, self.kind);
            id = ids.next_id();
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        self.entries.insert(
            id,
            Entry {
                created: Instant::now(),
                serial,
                value,
            },
        );
        Handle { kind: self.kind, id }
    }

    /// Removes the object and hands ownership back to the caller.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if handle.kind != self.kind {
            return None;
        }
        self.entries.remove(&handle.id).map(|entry| entry.value)
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains(&self, handle: Handle) -> bool {
        handle.kind == self.kind && self.entries.contains_key(&handle.id)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        if handle.kind != self.kind {
            return None;
        }
        self.entries.get(&handle.id).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if handle.kind != self.kind {
            return None;
        }
        self.entries.get_mut(&handle.id).map(|entry| &mut entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All open handles, oldest first.
    pub fn list_all(&self) -> Vec<Handle> {
        self.ordered().into_iter().map(|(handle, _)| handle).collect()
    }

    /// All open objects with their handles, oldest first.
    pub fn ordered(&self) -> Vec<(Handle, &T)> {
        let mut items: Vec<_> = self.entries.iter().collect();
        items.sort_by(|(_, a), (_, b)| {
            a.created.cmp(&b.created).then(a.serial.cmp(&b.serial))
        });
        items
            .into_iter()
            .map(|(&id, entry)| (Handle { kind: self.kind, id }, &entry.value))
            .collect()
    }

    /// First open object matching `predicate`, in creation order.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Handle> {
        self.entries
            .iter()
            .filter(|(_, entry)| predicate(&entry.value))
            .min_by_key(|(_, entry)| (entry.created, entry.serial))
            .map(|(&id, _)| Handle { kind: self.kind, id })
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("open", &self.list_all())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (Registry<&'static str>, IdSequence) {
        (Registry::new(ObjectKind::Sound), IdSequence::new(7))
    }

    #[test]
    fn insert_then_get() {
        let (mut reg, mut ids) = registry();
        let h = reg.insert(ids.next_id(), "boom").unwrap();

        assert!(reg.contains(h));
        assert_eq!(reg.get(h), Some(&"boom"));
        assert_eq!(h.kind(), ObjectKind::Sound);
    }

    #[test]
    fn duplicate_insert_keeps_original() {
        let (mut reg, _) = registry();
        let h = reg.insert(5, "first").unwrap();

        assert!(reg.insert(5, "second").is_none());
        assert_eq!(reg.get(h), Some(&"first"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn null_id_is_rejected() {
        let (mut reg, _) = registry();
        assert!(reg.insert(0, "null").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_closes_handle() {
        let (mut reg, mut ids) = registry();
        let h = reg.insert(ids.next_id(), "boom").unwrap();

        assert_eq!(reg.remove(h), Some("boom"));
        assert!(!reg.contains(h));
        assert_eq!(reg.remove(h), None);
        assert_eq!(reg.get(h), None);
    }

    #[test]
    fn foreign_kind_handle_misses() {
        let (mut reg, _) = registry();
        reg.insert(9, "boom").unwrap();

        let foreign = Handle { kind: ObjectKind::Font, id: 9 };
        assert!(!reg.contains(foreign));
        assert!(reg.get(foreign).is_none());
        assert!(reg.remove(foreign).is_none());
    }

    /// Creation order survives arbitrary churn around the tracked objects.
    #[test]
    fn list_all_is_creation_ordered() {
        let (mut reg, mut ids) = registry();

        let noise1 = reg.insert(ids.next_id(), "n1").unwrap();
        let a = reg.insert(ids.next_id(), "a").unwrap();
        let noise2 = reg.insert(ids.next_id(), "n2").unwrap();
        let b = reg.insert(ids.next_id(), "b").unwrap();
        reg.remove(noise1);
        let noise3 = reg.insert(ids.next_id(), "n3").unwrap();
        let c = reg.insert(ids.next_id(), "c").unwrap();
        reg.remove(noise2);
        reg.remove(noise3);
        for _ in 0..20 {
            let h = reg.insert(ids.next_id(), "x").unwrap();
            reg.remove(h);
        }

        assert_eq!(reg.list_all(), vec![a, b, c]);
    }

    #[test]
    fn find_returns_oldest_match() {
        let (mut reg, mut ids) = registry();
        let first = reg.insert(ids.next_id(), "hit").unwrap();
        reg.insert(ids.next_id(), "hit").unwrap();

        assert_eq!(reg.find(|v| *v == "hit"), Some(first));
        assert_eq!(reg.find(|v| *v == "miss"), None);
    }

    #[test]
    fn find_skips_closed_and_keeps_creation_order() {
        let (mut reg, mut ids) = registry();
        let gone = reg.insert(ids.next_id(), "hit").unwrap();
        let older = reg.insert(ids.next_id(), "hit").unwrap();
        for _ in 0..10 {
            reg.insert(ids.next_id(), "other").unwrap();
        }
        reg.insert(ids.next_id(), "hit").unwrap();
        reg.remove(gone);

        assert_eq!(reg.find(|v| *v == "hit"), Some(older));
        assert_eq!(reg.find(|v| *v == "other"), reg.list_all().get(1).copied());
    }

    #[test]
    fn allocate_skips_open_ids() {
        let mut reg = Registry::new(ObjectKind::Sound);
        let mut twin = IdSequence::new(3);
        let first_id = twin.next_id();
        reg.insert(first_id, "taken").unwrap();

        let mut ids = IdSequence::new(3);
        let h = reg.allocate(&mut ids, "fresh");
        assert_ne!(h.id(), first_id);
        assert_eq!(reg.get(h), Some(&"fresh"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn null_handle_is_null() {
        let h = Handle::null(ObjectKind::Controller);
        assert!(h.is_null());
        assert_eq!(h.kind(), ObjectKind::Controller);
    }

    #[test]
    fn handle_debug_names_kind() {
        let h = Handle { kind: ObjectKind::Clock, id: 0xabc };
        assert_eq!(format!("{:?}", h), "clock#00000abc");
    }
}
