//! ArchiveTimeStamp and the containers that hold it
//!
//! RFC 4998 Section 4 and Section 5:
//! ```asn1
//! ArchiveTimeStamp ::= SEQUENCE {
//!     digestAlgorithm [0] AlgorithmIdentifier OPTIONAL,
//!     attributes      [1] Attributes OPTIONAL,
//!     reducedHashtree [2] SEQUENCE OF PartialHashtree OPTIONAL,
//!     timeStamp       ContentInfo }
//! ```
//!
//! The module uses IMPLICIT TAGS, so each tagged field is a constructed
//! context-specific element holding the members of the underlying SEQUENCE
//! or SET.

use serde::Serialize;
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::Element;
use tsumiki_pkix_types::{AlgorithmIdentifier, Attributes};

use crate::implicit;

pub mod chain;
pub mod content_info;
pub mod error;
pub mod hashtree;

pub use chain::{ArchiveTimeStampChain, ArchiveTimeStampSequence};
pub use content_info::ContentInfo;
pub use error::{Error, Result};
pub use hashtree::PartialHashtree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldTag {
    DigestAlgorithm = 0,
    Attributes = 1,
    ReducedHashtree = 2,
}

impl TryFrom<u8> for FieldTag {
    type Error = Error;

    fn try_from(slot: u8) -> Result<Self> {
        match slot {
            0 => Ok(FieldTag::DigestAlgorithm),
            1 => Ok(FieldTag::Attributes),
            2 => Ok(FieldTag::ReducedHashtree),
            n => Err(Error::UnknownTag(n)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveTimeStamp {
    #[serde(skip_serializing_if = "Option::is_none")]
    digest_algorithm: Option<AlgorithmIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reduced_hashtree: Option<Vec<PartialHashtree>>,
    time_stamp: ContentInfo,
}

impl ArchiveTimeStamp {
    pub fn new(time_stamp: ContentInfo) -> Self {
        Self {
            digest_algorithm: None,
            attributes: None,
            reduced_hashtree: None,
            time_stamp,
        }
    }

    pub fn with_digest_algorithm(self, digest_algorithm: AlgorithmIdentifier) -> Self {
        Self {
            digest_algorithm: Some(digest_algorithm),
            ..self
        }
    }

    pub fn with_attributes(self, attributes: Attributes) -> Self {
        Self {
            attributes: Some(attributes),
            ..self
        }
    }

    pub fn with_reduced_hashtree(self, reduced_hashtree: Vec<PartialHashtree>) -> Self {
        Self {
            reduced_hashtree: Some(reduced_hashtree),
            ..self
        }
    }

    pub fn digest_algorithm(&self) -> Option<&AlgorithmIdentifier> {
        self.digest_algorithm.as_ref()
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    pub fn reduced_hashtree(&self) -> Option<&[PartialHashtree]> {
        self.reduced_hashtree.as_deref()
    }

    pub fn time_stamp(&self) -> &ContentInfo {
        &self.time_stamp
    }
}

impl DecodableFrom<Element> for ArchiveTimeStamp {}

impl Decoder<Element, ArchiveTimeStamp> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ArchiveTimeStamp> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                structure: "ArchiveTimeStamp",
                actual: self.type_name(),
            });
        };
        let Some((time_stamp, fields)) = elements.split_last() else {
            return Err(Error::InvalidElementCount {
                structure: "ArchiveTimeStamp",
                expected: "1 to 4",
                actual: 0,
            });
        };
        if fields.len() > 3 {
            return Err(Error::InvalidElementCount {
                structure: "ArchiveTimeStamp",
                expected: "1 to 4",
                actual: elements.len(),
            });
        }

        let time_stamp: ContentInfo = time_stamp.decode()?;
        let mut archive_time_stamp = ArchiveTimeStamp::new(time_stamp);
        for field in fields {
            let Element::ContextSpecific { slot, content } = field else {
                return Err(Error::ExpectedTagged(field.type_name()));
            };
            let tag = FieldTag::try_from(*slot)?;
            let members = content.elements().ok_or(Error::ExpectedConstructed(*slot))?;

            match tag {
                FieldTag::DigestAlgorithm if archive_time_stamp.digest_algorithm.is_none() => {
                    let algorithm: AlgorithmIdentifier =
                        Element::Sequence(members.to_vec()).decode()?;
                    archive_time_stamp.digest_algorithm = Some(algorithm);
                }
                FieldTag::Attributes if archive_time_stamp.attributes.is_none() => {
                    archive_time_stamp.attributes = Some(Attributes::try_from(members)?);
                }
                FieldTag::ReducedHashtree if archive_time_stamp.reduced_hashtree.is_none() => {
                    let trees = members
                        .iter()
                        .map(Decoder::<Element, PartialHashtree>::decode)
                        .collect::<Result<Vec<_>>>()?;
                    archive_time_stamp.reduced_hashtree = Some(trees);
                }
                _ => return Err(Error::DuplicateTag(*slot)),
            }
        }

        Ok(archive_time_stamp)
    }
}

impl EncodableTo<ArchiveTimeStamp> for Element {}

impl Encoder<ArchiveTimeStamp, Element> for ArchiveTimeStamp {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let digest_algorithm = self
            .digest_algorithm
            .as_ref()
            .map(|algorithm| algorithm.encode())
            .transpose()?
            .map(|encoded| implicit(FieldTag::DigestAlgorithm as u8, encoded));
        let attributes = self
            .attributes
            .as_ref()
            .map(|attributes| attributes.encode())
            .transpose()?
            .map(|encoded| implicit(FieldTag::Attributes as u8, encoded));
        let reduced_hashtree = self
            .reduced_hashtree
            .as_ref()
            .map(|trees| {
                trees
                    .iter()
                    .map(|tree| tree.encode())
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .map(|encoded| implicit(FieldTag::ReducedHashtree as u8, Element::Sequence(encoded)));

        let elements = [digest_algorithm, attributes, reduced_hashtree]
            .into_iter()
            .flatten()
            .chain(std::iter::once(self.time_stamp.encode()?))
            .collect();

        Ok(Element::Sequence(elements))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use rstest::rstest;
    use tsumiki_asn1::{ObjectIdentifier, OctetString, TaggedContent};

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    fn content_info() -> Element {
        Element::Sequence(vec![
            Element::ObjectIdentifier(oid(ContentInfo::OID_SIGNED_DATA)),
            tagged(0, vec![Element::Sequence(vec![])]),
        ])
    }

    fn tagged(slot: u8, members: Vec<Element>) -> Element {
        Element::ContextSpecific {
            slot,
            content: TaggedContent::Constructed(members),
        }
    }

    fn digest_field() -> Element {
        tagged(
            0,
            vec![Element::ObjectIdentifier(oid(AlgorithmIdentifier::OID_SHA256))],
        )
    }

    fn attributes_field() -> Element {
        tagged(
            1,
            vec![Element::Sequence(vec![
                Element::ObjectIdentifier(oid("1.2.3.4")),
                Element::Set(vec![Element::Null]),
            ])],
        )
    }

    fn hashtree_field() -> Element {
        tagged(
            2,
            vec![
                Element::Sequence(vec![Element::OctetString(OctetString::from(vec![0xaa]))]),
                Element::Sequence(vec![
                    Element::OctetString(OctetString::from(vec![0xbb])),
                    Element::OctetString(OctetString::from(vec![0xcc])),
                ]),
            ],
        )
    }

    #[test]
    fn test_archive_time_stamp_decode_minimal() {
        let elem = Element::Sequence(vec![content_info()]);
        let ats: ArchiveTimeStamp = elem.decode().unwrap();

        assert!(ats.digest_algorithm().is_none());
        assert!(ats.attributes().is_none());
        assert!(ats.reduced_hashtree().is_none());
        assert!(ats.time_stamp().is_signed_data());

        let encoded: Element = ats.encode().unwrap();
        assert_eq!(elem, encoded);
    }

    #[test]
    fn test_archive_time_stamp_decode_all_fields() {
        let elem = Element::Sequence(vec![
            digest_field(),
            attributes_field(),
            hashtree_field(),
            content_info(),
        ]);
        let ats: ArchiveTimeStamp = elem.decode().unwrap();

        assert_eq!(
            ats.digest_algorithm().map(|alg| alg.algorithm().to_string()),
            Some(AlgorithmIdentifier::OID_SHA256.to_string())
        );
        assert_eq!(ats.attributes().map(|attrs| attrs.len()), Some(1));
        let trees = ats.reduced_hashtree().unwrap();
        assert_eq!(trees.len(), 2);
        assert!(trees[1].contains_hash(&[0xcc]));

        let encoded: Element = ats.encode().unwrap();
        assert_eq!(elem, encoded);
    }

    #[test]
    fn test_archive_time_stamp_encode_is_canonical() {
        let elem = Element::Sequence(vec![hashtree_field(), digest_field(), content_info()]);
        let ats: ArchiveTimeStamp = elem.decode().unwrap();

        let encoded: Element = ats.encode().unwrap();
        assert_eq!(
            encoded,
            Element::Sequence(vec![digest_field(), hashtree_field(), content_info()])
        );
    }

    #[test]
    fn test_archive_time_stamp_builder() {
        let time_stamp: ContentInfo = content_info().decode().unwrap();
        let algorithm = AlgorithmIdentifier::new(oid(AlgorithmIdentifier::OID_SHA512));
        let ats = ArchiveTimeStamp::new(time_stamp)
            .with_digest_algorithm(algorithm.clone())
            .with_reduced_hashtree(vec![PartialHashtree::new(vec![OctetString::from(
                vec![0x01],
            )])]);

        assert_eq!(ats.digest_algorithm(), Some(&algorithm));
        assert_eq!(ats.reduced_hashtree().map(|trees| trees.len()), Some(1));

        let json = serde_json::to_value(&ats).unwrap();
        assert_eq!(json["digest_algorithm"]["algorithm"], "sha512");
        assert!(json.get("attributes").is_none());
    }

    #[rstest(input, expected_error_variant,
        case(Element::Null, "ExpectedSequence"),
        case(Element::Sequence(vec![]), "InvalidElementCount"),
        case(Element::Sequence(vec![digest_field(), attributes_field(), hashtree_field(), digest_field(), content_info()]), "InvalidElementCount"),
        case(Element::Sequence(vec![tagged(3, vec![]), content_info()]), "UnknownTag(3)"),
        case(Element::Sequence(vec![digest_field(), digest_field(), content_info()]), "DuplicateTag(0)"),
        case(Element::Sequence(vec![Element::Null, content_info()]), "ExpectedTagged(\"NULL\")"),
        case(Element::Sequence(vec![
            Element::ContextSpecific { slot: 2, content: TaggedContent::Primitive(OctetString::from(vec![])) },
            content_info(),
        ]), "ExpectedConstructed(2)"),
        case(Element::Sequence(vec![tagged(2, vec![Element::Null]), content_info()]), "ExpectedSequence"),
        case(Element::Sequence(vec![tagged(0, vec![Element::Null]), content_info()]), "AlgorithmIdentifierExpectedOid"),
        case(Element::Sequence(vec![digest_field()]), "ContentInfo"),
        case(Element::Sequence(vec![tagged(1, vec![]), content_info()]), "AttributesEmpty"),
    )]
    fn test_archive_time_stamp_decode_failure(input: Element, expected_error_variant: &str) {
        let result: Result<ArchiveTimeStamp> = input.decode();
        let err = result.unwrap_err();
        let err_str = format!("{:?}", err);
        assert!(
            err_str.contains(expected_error_variant),
            "Expected error '{}', but got '{}'",
            expected_error_variant,
            err_str
        );
    }
}
