//! Evidence Record Syntax (RFC 4998)
//!
//! Typed decoding, validation and canonical re-encoding of `EvidenceRecord`
//! values on top of the generic ASN.1 element tree.
//!
//! ```no_run
//! use tsumiki_ers::EvidenceRecord;
//!
//! # fn main() -> tsumiki_ers::Result<()> {
//! # let bytes: Vec<u8> = vec![];
//! let record = EvidenceRecord::from_der(&bytes)?;
//! for algorithm in record.digest_algorithms() {
//!     println!("{}", algorithm);
//! }
//! let reencoded = record.to_der()?;
//! # let _ = reencoded;
//! # Ok(())
//! # }
//! ```
//!
//! Nothing here verifies hashes or timestamps.

use tsumiki_asn1::{Element, TaggedContent};

pub mod archive_timestamp;
pub mod crypto_infos;
pub mod encryption_info;
pub mod error;
pub mod evidence_record;
pub mod options;

pub use archive_timestamp::{
    ArchiveTimeStamp, ArchiveTimeStampChain, ArchiveTimeStampSequence, ContentInfo,
    PartialHashtree,
};
pub use crypto_infos::CryptoInfos;
pub use encryption_info::EncryptionInfo;
pub use error::{Error, ErrorKind, Result};
pub use evidence_record::{EvidenceRecord, Version};
pub use options::{DecodeOptions, DuplicateTagPolicy};

/// id-mod-ers88-v1, the OID of the ERS ASN.1 module.
pub const ID_MOD_ERS88_V1: &str = "1.3.6.1.5.5.11.0.2.1";

/// Re-tags a SEQUENCE or SET with an IMPLICIT context-specific tag.
pub(crate) fn implicit(slot: u8, element: Element) -> Element {
    let members = match element {
        Element::Sequence(members) | Element::Set(members) => members,
        other => vec![other],
    };
    Element::ContextSpecific {
        slot,
        content: TaggedContent::Constructed(members),
    }
}
