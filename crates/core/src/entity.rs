//! Entity trait: things compared by identity rather than by value.

/// Something with a stable identity, such as a catalog product.
///
/// Two products with the same id are the same product even if their display
/// fields differ; lookups and cart lines key on [`Entity::id`].
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
