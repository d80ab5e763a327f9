//! Error types for PKIX types

use thiserror::Error;

/// Result type for PKIX types operations
pub type Result<T> = std::result::Result<T, Error>;

/// PKIX types error types
#[derive(Debug, Error)]
pub enum Error {
    // AlgorithmIdentifier errors
    #[error("AlgorithmIdentifier: expected SEQUENCE, got {0}")]
    AlgorithmIdentifierExpectedSequence(&'static str),
    #[error("AlgorithmIdentifier: expected 1 or 2 elements, got {0}")]
    AlgorithmIdentifierInvalidElementCount(usize),
    #[error("AlgorithmIdentifier: expected OBJECT IDENTIFIER for algorithm")]
    AlgorithmIdentifierExpectedOid,

    // Attribute errors
    #[error("Attribute: expected SEQUENCE, got {0}")]
    AttributeExpectedSequence(&'static str),
    #[error("Attribute: expected 2 elements, got {0}")]
    AttributeInvalidElementCount(usize),
    #[error("Attribute: expected OBJECT IDENTIFIER for attrType")]
    AttributeExpectedOid,
    #[error("Attribute: expected SET for attrValues")]
    AttributeExpectedSet,

    // Attributes errors
    #[error("Attributes: expected SET, got {0}")]
    AttributesExpectedSet(&'static str),
    #[error("Attributes: SET must contain at least one Attribute")]
    AttributesEmpty,

    /// ASN.1 encoding/decoding error
    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] tsumiki_asn1::error::Error),
}
