use serde::{Serialize, ser::SerializeStruct};
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::{Element, ObjectIdentifier, TaggedContent};

use crate::error::{Error, Result};

/// How the protected data objects were encrypted before hashing.
///
/// ```asn1
/// EncryptionInfo ::= SEQUENCE {
///     encryptionInfoType  ENCINFO-TYPE.&id({SupportedEncryptionAlgorithms}),
///     encryptionInfoValue ENCINFO-TYPE.&Type({SupportedEncryptionAlgorithms}{@encryptionInfoType})
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionInfo {
    encryption_info_type: ObjectIdentifier,
    encryption_info_value: Element,
}

impl EncryptionInfo {
    pub fn new(encryption_info_type: ObjectIdentifier, encryption_info_value: Element) -> Self {
        Self {
            encryption_info_type,
            encryption_info_value,
        }
    }

    pub fn encryption_info_type(&self) -> &ObjectIdentifier {
        &self.encryption_info_type
    }

    pub fn encryption_info_value(&self) -> &Element {
        &self.encryption_info_value
    }
}

impl Serialize for EncryptionInfo {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EncryptionInfo", 2)?;
        state.serialize_field("type", &self.encryption_info_type)?;
        state.serialize_field("value", &self.encryption_info_value.to_string())?;
        state.end()
    }
}

impl TryFrom<&[Element]> for EncryptionInfo {
    type Error = Error;

    fn try_from(elements: &[Element]) -> Result<Self> {
        let [info_type, info_value] = elements else {
            return Err(Error::EncryptionInfoInvalidElementCount(elements.len()));
        };
        let Element::ObjectIdentifier(info_type) = info_type else {
            return Err(Error::EncryptionInfoExpectedOid(info_type.type_name()));
        };
        Ok(EncryptionInfo::new(info_type.clone(), info_value.clone()))
    }
}

impl DecodableFrom<Element> for EncryptionInfo {}

impl Decoder<Element, EncryptionInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EncryptionInfo> {
        match self {
            Element::Sequence(elements)
            | Element::ContextSpecific {
                slot: 1,
                content: TaggedContent::Constructed(elements),
            } => EncryptionInfo::try_from(elements.as_slice()),
            _ => Err(Error::EncryptionInfoExpectedSequence(self.type_name())),
        }
    }
}

impl EncodableTo<EncryptionInfo> for Element {}

impl Encoder<EncryptionInfo, Element> for EncryptionInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.encryption_info_type.clone()),
            self.encryption_info_value.clone(),
        ]))
    }
}
