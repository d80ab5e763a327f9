use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{structure}: expected SEQUENCE, got {actual}")]
    ExpectedSequence {
        structure: &'static str,
        actual: &'static str,
    },
    #[error("{structure}: expected {expected} elements, got {actual}")]
    InvalidElementCount {
        structure: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("ArchiveTimeStamp: unknown tag [{0}]")]
    UnknownTag(u8),
    #[error("ArchiveTimeStamp: duplicate tag [{0}]")]
    DuplicateTag(u8),
    #[error("ArchiveTimeStamp: expected context-specific element, got {0}")]
    ExpectedTagged(&'static str),
    #[error("ArchiveTimeStamp: expected constructed encoding for [{0}]")]
    ExpectedConstructed(u8),

    #[error("PartialHashtree: expected OCTET STRING, got {0}")]
    PartialHashtreeExpectedOctetString(&'static str),

    #[error("ContentInfo: expected OBJECT IDENTIFIER for contentType, got {0}")]
    ContentInfoExpectedOid(&'static str),
    #[error("ContentInfo: expected [0] EXPLICIT content")]
    ContentInfoExpectedContent,

    #[error("timestamp {index}: {source}")]
    TimeStamp {
        index: usize,
        #[source]
        source: Box<Error>,
    },
    #[error("chain {index}: {source}")]
    Chain {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] tsumiki_pkix_types::Error),
}
