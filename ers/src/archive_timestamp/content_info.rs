use serde::{Serialize, ser::SerializeStruct};
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::{Element, ObjectIdentifier, TaggedContent};

use super::error::{Error, Result};

/// CMS ContentInfo carrying a timestamp token (RFC 5652, RFC 3161).
///
/// ```asn1
/// ContentInfo ::= SEQUENCE {
///     contentType  ContentType,
///     content      [0] EXPLICIT ANY DEFINED BY contentType }
/// ```
///
/// The content is kept as a generic element; the token is not verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInfo {
    content_type: ObjectIdentifier,
    content: Element,
}

impl ContentInfo {
    /// id-signedData
    pub const OID_SIGNED_DATA: &'static str = "1.2.840.113549.1.7.2";

    pub fn new(content_type: ObjectIdentifier, content: Element) -> Self {
        Self {
            content_type,
            content,
        }
    }

    pub fn content_type(&self) -> &ObjectIdentifier {
        &self.content_type
    }

    pub fn content(&self) -> &Element {
        &self.content
    }

    pub fn is_signed_data(&self) -> bool {
        self.content_type == Self::OID_SIGNED_DATA
    }
}

impl Serialize for ContentInfo {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ContentInfo", 2)?;
        state.serialize_field("content_type", &self.content_type)?;
        state.serialize_field("content", self.content.type_name())?;
        state.end()
    }
}

impl DecodableFrom<Element> for ContentInfo {}

impl Decoder<Element, ContentInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ContentInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                structure: "ContentInfo",
                actual: self.type_name(),
            });
        };
        let [content_type, content] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                structure: "ContentInfo",
                expected: "2",
                actual: elements.len(),
            });
        };
        let Element::ObjectIdentifier(content_type) = content_type else {
            return Err(Error::ContentInfoExpectedOid(content_type.type_name()));
        };
        let Element::ContextSpecific {
            slot: 0,
            content: TaggedContent::Constructed(inner),
        } = content
        else {
            return Err(Error::ContentInfoExpectedContent);
        };
        let [content] = inner.as_slice() else {
            return Err(Error::ContentInfoExpectedContent);
        };

        Ok(ContentInfo {
            content_type: content_type.clone(),
            content: content.clone(),
        })
    }
}

impl EncodableTo<ContentInfo> for Element {}

impl Encoder<ContentInfo, Element> for ContentInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.content_type.clone()),
            Element::ContextSpecific {
                slot: 0,
                content: TaggedContent::Constructed(vec![self.content.clone()]),
            },
        ]))
    }
}
