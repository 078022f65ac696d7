//! Maps opaque focus handles to DOM elements.
//!
//! The core only ever sees [`FocusHandle`]s. Registering the same element
//! twice yields the same handle and bumps its reference count; the entry is
//! dropped when every reference has been released.

use std::collections::BTreeMap;

use velvet_core::FocusHandle;

#[derive(Debug)]
struct Entry<T> {
    target: T,
    refs: usize,
}

/// Handle table, generic so it can be exercised without a DOM.
#[derive(Debug)]
pub(crate) struct FocusRegistry<T> {
    next: u64,
    entries: BTreeMap<u64, Entry<T>>,
}

impl<T> Default for FocusRegistry<T> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: BTreeMap::new(),
        }
    }
}

impl<T: PartialEq> FocusRegistry<T> {
    /// Handle for `target`, reusing an existing one when registered already.
    pub(crate) fn register(&mut self, target: T) -> FocusHandle {
        if let Some((raw, entry)) = self
            .entries
            .iter_mut()
            .find(|(_, entry)| entry.target == target)
        {
            entry.refs += 1;
            return FocusHandle::new(*raw);
        }
        self.next += 1;
        self.entries.insert(self.next, Entry { target, refs: 1 });
        FocusHandle::new(self.next)
    }

    /// The element behind `handle`, if still registered.
    pub(crate) fn resolve(&self, handle: FocusHandle) -> Option<&T> {
        self.entries.get(&handle.raw()).map(|entry| &entry.target)
    }

    /// Drop one reference to `handle`. Unknown handles are ignored.
    pub(crate) fn release(&mut self, handle: FocusHandle) {
        let raw = handle.raw();
        let Some(entry) = self.entries.get_mut(&raw) else {
            return;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            self.entries.remove(&raw);
        }
    }

    /// Number of live handles.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_target_same_handle() {
        let mut registry = FocusRegistry::default();
        let a = registry.register("button");
        let b = registry.register("button");
        let c = registry.register("input");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(c), Some(&"input"));
    }

    #[test]
    fn entry_lives_until_last_release() {
        let mut registry = FocusRegistry::default();
        let a = registry.register("button");
        registry.register("button");

        registry.release(a);
        assert_eq!(registry.resolve(a), Some(&"button"));

        registry.release(a);
        assert_eq!(registry.resolve(a), None);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn unknown_release_is_ignored() {
        let mut registry: FocusRegistry<&str> = FocusRegistry::default();
        registry.release(FocusHandle::new(42));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn handles_are_not_reused() {
        let mut registry = FocusRegistry::default();
        let a = registry.register("button");
        registry.release(a);
        let b = registry.register("button");
        assert_ne!(a, b);
    }
}
