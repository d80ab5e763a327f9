use thiserror::Error;
use tsumiki_asn1::Integer;

use crate::archive_timestamp;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong number of elements, duplicate fields, empty mandatory lists.
    MalformedStructure,
    /// A version other than v1.
    UnsupportedVersion,
    /// A context-specific tag with no meaning at its position.
    UnknownTag,
    /// An element of the wrong ASN.1 type.
    TypeMismatch,
    /// A failure reported by a nested structure or a lower layer.
    Nested,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("EvidenceRecord: expected SEQUENCE, got {0}")]
    ExpectedSequence(&'static str),
    #[error("EvidenceRecord: expected 3 to 5 elements, got {0}")]
    InvalidElementCount(usize),
    #[error("EvidenceRecord: expected INTEGER for version, got {0}")]
    ExpectedVersionInteger(&'static str),
    #[error("EvidenceRecord: unsupported version {0}")]
    UnsupportedVersion(Integer),
    #[error("EvidenceRecord: expected SEQUENCE for digestAlgorithms, got {0}")]
    ExpectedDigestAlgorithms(&'static str),
    #[error("EvidenceRecord: expected AlgorithmIdentifier at digestAlgorithms[{index}], got {actual}")]
    DigestAlgorithmTypeMismatch { index: usize, actual: &'static str },
    #[error("EvidenceRecord: invalid AlgorithmIdentifier at digestAlgorithms[{index}]: {source}")]
    DigestAlgorithm {
        index: usize,
        #[source]
        source: tsumiki_pkix_types::Error,
    },
    #[error("EvidenceRecord: expected context-specific element at position {index}, got {actual}")]
    ExpectedTagged { index: usize, actual: &'static str },
    #[error("EvidenceRecord: unknown tag [{0}]")]
    UnknownTag(u8),
    #[error("EvidenceRecord: duplicate tag [{0}]")]
    DuplicateTag(u8),
    #[error("EvidenceRecord: expected constructed encoding for [{0}]")]
    ExpectedConstructed(u8),

    #[error("CryptoInfos: expected SEQUENCE, got {0}")]
    CryptoInfosExpectedSequence(&'static str),
    #[error("CryptoInfos: at least one Attribute is required")]
    CryptoInfosEmpty,

    #[error("EncryptionInfo: expected SEQUENCE, got {0}")]
    EncryptionInfoExpectedSequence(&'static str),
    #[error("EncryptionInfo: expected 2 elements, got {0}")]
    EncryptionInfoInvalidElementCount(usize),
    #[error("EncryptionInfo: expected OBJECT IDENTIFIER for encryptionInfoType, got {0}")]
    EncryptionInfoExpectedOid(&'static str),

    #[error("expected exactly one top-level element, got {0}")]
    ExpectedSingleElement(usize),

    #[error("ArchiveTimeStampSequence error: {0}")]
    ArchiveTimeStamp(#[from] archive_timestamp::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] tsumiki_pkix_types::Error),

    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] tsumiki_asn1::error::Error),

    #[error("DER error: {0}")]
    Der(#[from] tsumiki_der::error::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidElementCount(_)
            | Error::DuplicateTag(_)
            | Error::ExpectedConstructed(_)
            | Error::CryptoInfosEmpty
            | Error::EncryptionInfoInvalidElementCount(_)
            | Error::ExpectedSingleElement(_) => ErrorKind::MalformedStructure,
            Error::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            Error::UnknownTag(_) => ErrorKind::UnknownTag,
            Error::ExpectedSequence(_)
            | Error::ExpectedVersionInteger(_)
            | Error::ExpectedDigestAlgorithms(_)
            | Error::DigestAlgorithmTypeMismatch { .. }
            | Error::ExpectedTagged { .. }
            | Error::CryptoInfosExpectedSequence(_)
            | Error::EncryptionInfoExpectedSequence(_)
            | Error::EncryptionInfoExpectedOid(_) => ErrorKind::TypeMismatch,
            Error::DigestAlgorithm { .. }
            | Error::ArchiveTimeStamp(_)
            | Error::PkixTypes(_)
            | Error::ASN1Error(_)
            | Error::Der(_) => ErrorKind::Nested,
        }
    }
}
