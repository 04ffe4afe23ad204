//! Value object trait: equality by value, not identity.
//!
//! Everything this product computes is a value: records, summaries and bulk
//! groups are recomputed from scratch on every invocation and carry no
//! identity of their own.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two value
/// objects with the same attribute values are the same value.
///
/// The trait requires:
/// - **Clone**: values are copied, not referenced
/// - **PartialEq**: compared by attribute values
/// - **Debug**: debuggable (logging, testing)
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Quantity {
///     amount: f64,
///     unit: String,
/// }
///
/// impl ValueObject for Quantity {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
