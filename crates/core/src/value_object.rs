//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two amounts of
/// `1.99` are the same amount, while two products with the same name but
/// different ids are different entities.
///
/// ```ignore
/// let a: Money = "1.99".parse()?;
/// let b: Money = "1.990".parse()?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
