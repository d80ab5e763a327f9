use serde::Serialize;
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::{Element, OctetString};

use super::error::{Error, Result};

/// One level of a reduced hash tree.
///
/// ```asn1
/// PartialHashtree ::= SEQUENCE OF OCTET STRING
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialHashtree(Vec<OctetString>);

impl PartialHashtree {
    pub fn new(values: Vec<OctetString>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[OctetString] {
        &self.0
    }

    pub fn contains_hash(&self, hash: &[u8]) -> bool {
        self.0.iter().any(|value| value.as_bytes() == hash)
    }
}

impl DecodableFrom<Element> for PartialHashtree {}

impl Decoder<Element, PartialHashtree> for Element {
    type Error = Error;

    fn decode(&self) -> Result<PartialHashtree> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                structure: "PartialHashtree",
                actual: self.type_name(),
            });
        };
        let values = elements
            .iter()
            .map(|elm| match elm {
                Element::OctetString(value) => Ok(value.clone()),
                other => Err(Error::PartialHashtreeExpectedOctetString(other.type_name())),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PartialHashtree(values))
    }
}

impl EncodableTo<PartialHashtree> for Element {}

impl Encoder<PartialHashtree, Element> for PartialHashtree {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(
            self.0.iter().cloned().map(Element::OctetString).collect(),
        ))
    }
}
