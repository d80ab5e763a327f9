use std::ops::Deref;

use serde::Serialize;
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::{Element, TaggedContent};
use tsumiki_pkix_types::Attribute;

use crate::error::{Error, Result};

/// Data useful for verifying the record, such as certificates or CRLs.
///
/// ```asn1
/// CryptoInfos ::= SEQUENCE SIZE (1..MAX) OF Attribute
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CryptoInfos(Vec<Attribute>);

impl CryptoInfos {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(Error::CryptoInfosEmpty);
        }
        Ok(Self(attributes))
    }
}

impl Deref for CryptoInfos {
    type Target = [Attribute];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Decodes the members of the SEQUENCE, as found inside the IMPLICIT `[0]`.
impl TryFrom<&[Element]> for CryptoInfos {
    type Error = Error;

    fn try_from(elements: &[Element]) -> Result<Self> {
        let attributes = elements
            .iter()
            .map(Decoder::<Element, Attribute>::decode)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        CryptoInfos::new(attributes)
    }
}

impl DecodableFrom<Element> for CryptoInfos {}

impl Decoder<Element, CryptoInfos> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CryptoInfos> {
        match self {
            Element::Sequence(elements)
            | Element::ContextSpecific {
                slot: 0,
                content: TaggedContent::Constructed(elements),
            } => CryptoInfos::try_from(elements.as_slice()),
            _ => Err(Error::CryptoInfosExpectedSequence(self.type_name())),
        }
    }
}

impl EncodableTo<CryptoInfos> for Element {}

impl Encoder<CryptoInfos, Element> for CryptoInfos {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let elements = self
            .0
            .iter()
            .map(|attribute| attribute.encode())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Element::Sequence(elements))
    }
}
