//! Identifier generator port: mints ids for automations, sections, and entries.

use opsdeck_domain::id::IdKind;

/// Source of fresh identifier strings.
///
/// Each store owns its own generator, so two stores never share a counter.
/// Generators are not required to be collision-free: the store checks every
/// candidate against the ids already in use, including ids handed out earlier
/// in the same operation, and asks again on a clash.
pub trait IdGenerator {
    /// Produce the next candidate id for `kind`.
    fn next_id(&mut self, kind: IdKind) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self, kind: IdKind) -> String {
        (**self).next_id(kind)
    }
}
