//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**; they are defined entirely by their
/// attribute values and are never mutated in place. In this workspace that
/// covers recipe lines of composite products, operation metadata entries and
/// computed report rollups.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ComponentRequirement {
///     component_id: ProductId,
///     quantity_per_unit: i64,
/// }
///
/// impl ValueObject for ComponentRequirement {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
