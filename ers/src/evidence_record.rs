//! EvidenceRecord
//!
//! [RFC 4998 Section 3](https://datatracker.ietf.org/doc/html/rfc4998#section-3):
//! ```asn1
//! EvidenceRecord ::= SEQUENCE {
//!     version                   INTEGER { v1(1) } ,
//!     digestAlgorithms          SEQUENCE OF AlgorithmIdentifier,
//!     cryptoInfos               [0] CryptoInfos OPTIONAL,
//!     encryptionInfo            [1] EncryptionInfo OPTIONAL,
//!     archiveTimeStampSequence  ArchiveTimeStampSequence
//! }
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace, warn};
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::{ASN1Object, Element, Integer};
use tsumiki_der::Der;
use tsumiki_pkix_types::AlgorithmIdentifier;

use crate::archive_timestamp::{
    ArchiveTimeStamp, ArchiveTimeStampChain, ArchiveTimeStampSequence,
};
use crate::crypto_infos::CryptoInfos;
use crate::encryption_info::EncryptionInfo;
use crate::error::{Error, Result};
use crate::options::{DecodeOptions, DuplicateTagPolicy};
use crate::{ID_MOD_ERS88_V1, implicit};

/// EvidenceRecord version. Only v1 is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Version {
    V1 = 1,
}

impl TryFrom<&Integer> for Version {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self> {
        match value.to_i64() {
            Some(1) => Ok(Version::V1),
            _ => Err(Error::UnsupportedVersion(value.clone())),
        }
    }
}

impl From<Version> for Integer {
    fn from(v: Version) -> Self {
        Integer::from(v as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionalTag {
    CryptoInfos = 0,
    EncryptionInfo = 1,
}

impl TryFrom<u8> for OptionalTag {
    type Error = Error;

    fn try_from(slot: u8) -> Result<Self> {
        match slot {
            0 => Ok(OptionalTag::CryptoInfos),
            1 => Ok(OptionalTag::EncryptionInfo),
            n => Err(Error::UnknownTag(n)),
        }
    }
}

/// Evidence for the existence and integrity of archived data.
///
/// Values are immutable; operations that change the record return a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceRecord {
    version: Version,
    digest_algorithms: Vec<AlgorithmIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crypto_infos: Option<CryptoInfos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encryption_info: Option<EncryptionInfo>,
    archive_time_stamp_sequence: ArchiveTimeStampSequence,
}

impl EvidenceRecord {
    pub fn new(
        digest_algorithms: Vec<AlgorithmIdentifier>,
        crypto_infos: Option<CryptoInfos>,
        encryption_info: Option<EncryptionInfo>,
        archive_time_stamp_sequence: ArchiveTimeStampSequence,
    ) -> Self {
        Self {
            version: Version::V1,
            digest_algorithms,
            crypto_infos,
            encryption_info,
            archive_time_stamp_sequence,
        }
    }

    /// Builds a record from generic digest algorithm elements.
    ///
    /// Every element must be an AlgorithmIdentifier SEQUENCE.
    pub fn try_new(
        digest_algorithms: &[Element],
        crypto_infos: Option<CryptoInfos>,
        encryption_info: Option<EncryptionInfo>,
        archive_time_stamp_sequence: ArchiveTimeStampSequence,
    ) -> Result<Self> {
        let digest_algorithms = decode_digest_algorithms(digest_algorithms)?;
        Ok(Self::new(
            digest_algorithms,
            crypto_infos,
            encryption_info,
            archive_time_stamp_sequence,
        ))
    }

    /// Decodes with explicit [`DecodeOptions`]. The `Decoder` impl uses the
    /// defaults.
    pub fn decode_with(element: &Element, options: &DecodeOptions) -> Result<Self> {
        let Element::Sequence(elements) = element else {
            return Err(Error::ExpectedSequence(element.type_name()));
        };
        if !(3..=5).contains(&elements.len()) {
            return Err(Error::InvalidElementCount(elements.len()));
        }

        let version = match &elements[0] {
            Element::Integer(version) => Version::try_from(version)?,
            other => return Err(Error::ExpectedVersionInteger(other.type_name())),
        };

        let digest_algorithms = match &elements[1] {
            Element::Sequence(algorithms) => decode_digest_algorithms(algorithms)?,
            other => return Err(Error::ExpectedDigestAlgorithms(other.type_name())),
        };

        let last = elements.len() - 1;
        let mut crypto_infos = None;
        let mut encryption_info = None;
        for (index, elm) in elements.iter().enumerate().take(last).skip(2) {
            let Element::ContextSpecific { slot, content } = elm else {
                return Err(Error::ExpectedTagged {
                    index,
                    actual: elm.type_name(),
                });
            };
            let tag = OptionalTag::try_from(*slot)?;
            trace!(?tag, index, "decoding tagged field");

            let members = content.elements().ok_or(Error::ExpectedConstructed(*slot))?;
            match tag {
                OptionalTag::CryptoInfos => {
                    check_duplicate(&crypto_infos, tag, options)?;
                    crypto_infos = Some(CryptoInfos::try_from(members)?);
                }
                OptionalTag::EncryptionInfo => {
                    check_duplicate(&encryption_info, tag, options)?;
                    encryption_info = Some(EncryptionInfo::try_from(members)?);
                }
            }
        }

        let archive_time_stamp_sequence: ArchiveTimeStampSequence = elements[last].decode()?;

        debug!(
            elements = elements.len(),
            digest_algorithms = digest_algorithms.len(),
            crypto_infos = crypto_infos.is_some(),
            encryption_info = encryption_info.is_some(),
            chains = archive_time_stamp_sequence.len(),
            "decoded evidence record"
        );

        Ok(EvidenceRecord {
            version,
            digest_algorithms,
            crypto_infos,
            encryption_info,
            archive_time_stamp_sequence,
        })
    }

    /// Decodes a DER buffer holding exactly one EvidenceRecord.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let der: Der = bytes.decode()?;
        let asn1_obj: ASN1Object = der.decode()?;
        match asn1_obj.elements() {
            [element] => element.decode(),
            elements => Err(Error::ExpectedSingleElement(elements.len())),
        }
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element: Element = self.encode()?;
        let der: Der = ASN1Object::new(vec![element]).encode()?;
        Ok(der.encode()?)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn digest_algorithms(&self) -> &[AlgorithmIdentifier] {
        &self.digest_algorithms
    }

    pub fn crypto_infos(&self) -> Option<&CryptoInfos> {
        self.crypto_infos.as_ref()
    }

    pub fn encryption_info(&self) -> Option<&EncryptionInfo> {
        self.encryption_info.as_ref()
    }

    pub fn archive_time_stamp_sequence(&self) -> &ArchiveTimeStampSequence {
        &self.archive_time_stamp_sequence
    }

    /// Returns a record with `time_stamp` added.
    ///
    /// With `new_chain` the timestamp starts a new chain (hash tree renewal);
    /// otherwise it extends the last chain (timestamp renewal).
    pub fn add_archive_time_stamp(&self, time_stamp: ArchiveTimeStamp, new_chain: bool) -> Self {
        let archive_time_stamp_sequence = if new_chain {
            self.archive_time_stamp_sequence
                .append(ArchiveTimeStampChain::new(vec![time_stamp]))
        } else {
            self.archive_time_stamp_sequence.append_time_stamp(time_stamp)
        };
        Self {
            archive_time_stamp_sequence,
            ..self.clone()
        }
    }
}

fn decode_digest_algorithms(elements: &[Element]) -> Result<Vec<AlgorithmIdentifier>> {
    elements
        .iter()
        .enumerate()
        .map(|(index, elm)| match elm {
            Element::Sequence(_) => Decoder::<Element, AlgorithmIdentifier>::decode(elm)
                .map_err(|source| Error::DigestAlgorithm { index, source }),
            other => Err(Error::DigestAlgorithmTypeMismatch {
                index,
                actual: other.type_name(),
            }),
        })
        .collect()
}

fn check_duplicate<T>(
    current: &Option<T>,
    tag: OptionalTag,
    options: &DecodeOptions,
) -> Result<()> {
    if current.is_none() {
        return Ok(());
    }
    match options.duplicate_tags {
        DuplicateTagPolicy::Reject => Err(Error::DuplicateTag(tag as u8)),
        DuplicateTagPolicy::LastWins => {
            warn!(?tag, "duplicate tagged field, keeping the last one");
            Ok(())
        }
    }
}

impl fmt::Display for EvidenceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvidenceRecord: Oid({})", ID_MOD_ERS88_V1)
    }
}

impl DecodableFrom<Element> for EvidenceRecord {}

impl Decoder<Element, EvidenceRecord> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EvidenceRecord> {
        EvidenceRecord::decode_with(self, &DecodeOptions::default())
    }
}

impl EncodableTo<EvidenceRecord> for Element {}

impl Encoder<EvidenceRecord, Element> for EvidenceRecord {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let digest_algorithms = self
            .digest_algorithms
            .iter()
            .map(|algorithm| algorithm.encode())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let optional_elements = [
            self.crypto_infos
                .as_ref()
                .map(|infos| infos.encode())
                .transpose()?
                .map(|encoded| implicit(OptionalTag::CryptoInfos as u8, encoded)),
            self.encryption_info
                .as_ref()
                .map(|info| info.encode())
                .transpose()?
                .map(|encoded| implicit(OptionalTag::EncryptionInfo as u8, encoded)),
        ];

        let elements = [
            Element::Integer(self.version.into()),
            Element::Sequence(digest_algorithms),
        ]
        .into_iter()
        .chain(optional_elements.into_iter().flatten())
        .chain(std::iter::once(self.archive_time_stamp_sequence.encode()?))
        .collect();

        Ok(Element::Sequence(elements))
    }
}
