//! Entity trait: records the backend identifies by id.

/// A record with a stable backend identifier.
///
/// Client-side collections (catalog, progress maps) key their updates on this.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
