//! Trait for types that have OIDs with conventional names

/// Trait for types that have OIDs with conventional/standard names
///
/// This trait allows retrieving human-readable names for well-known OIDs.
/// For example, a digest algorithm with OID `2.16.840.1.101.3.4.2.1` has the
/// conventional name `sha256`.
pub trait OidName {
    /// Returns the conventional name for this type's OID, if it has one
    fn oid_name(&self) -> Option<&'static str>;
}
