//! CMS Attribute type
//!
//! Defined in [RFC 5652 Section 5.3](https://datatracker.ietf.org/doc/html/rfc5652#section-5.3)

use std::ops::Deref;

use serde::{Serialize, ser::SerializeStruct};
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::{AsOid, Element, ObjectIdentifier};

use crate::error::{Error, Result};

/// Attribute
///
/// ```asn1
/// Attribute ::= SEQUENCE {
///     attrType    OBJECT IDENTIFIER,
///     attrValues  SET OF AttributeValue }
///
/// AttributeValue ::= ANY
/// ```
///
/// Values are kept as generic elements in their encoded order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    attribute_type: ObjectIdentifier,
    values: Vec<Element>,
}

impl Attribute {
    pub fn new(attribute_type: ObjectIdentifier, values: Vec<Element>) -> Self {
        Self {
            attribute_type,
            values,
        }
    }

    /// Get the attribute type OID
    pub fn attribute_type(&self) -> &ObjectIdentifier {
        &self.attribute_type
    }

    pub fn values(&self) -> &[Element] {
        &self.values
    }
}

impl Serialize for Attribute {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        let mut state = serializer.serialize_struct("Attribute", 2)?;
        state.serialize_field("type", &self.attribute_type)?;
        state.serialize_field("values", &values)?;
        state.end()
    }
}

impl DecodableFrom<Element> for Attribute {}

impl Decoder<Element, Attribute> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Attribute> {
        let Element::Sequence(seq) = self else {
            return Err(Error::AttributeExpectedSequence(self.type_name()));
        };

        let [attr_type, attr_values] = seq.as_slice() else {
            return Err(Error::AttributeInvalidElementCount(seq.len()));
        };

        let Element::ObjectIdentifier(attribute_type) = attr_type else {
            return Err(Error::AttributeExpectedOid);
        };

        let Element::Set(values) = attr_values else {
            return Err(Error::AttributeExpectedSet);
        };

        Ok(Attribute {
            attribute_type: attribute_type.clone(),
            values: values.clone(),
        })
    }
}

impl EncodableTo<Attribute> for Element {}

impl Encoder<Attribute, Element> for Attribute {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.attribute_type.clone()),
            Element::Set(self.values.clone()),
        ]))
    }
}

/// Attributes
///
/// ```asn1
/// Attributes ::= SET SIZE (1..MAX) OF Attribute
/// ```
///
/// Inside an IMPLICIT tag the SET identifier is replaced, so the members can
/// also be decoded straight from a slice of elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Create a new Attributes collection
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(Error::AttributesEmpty);
        }
        Ok(Self(attributes))
    }

    /// Get an attribute by OID
    pub fn get_by_oid<O: AsOid>(&self, oid: O) -> Result<Option<&Attribute>> {
        let oid = oid.as_oid()?;
        Ok(self.0.iter().find(|attr| attr.attribute_type() == &oid))
    }

    /// Elements of the members, without the enclosing SET.
    pub fn to_elements(&self) -> Result<Vec<Element>> {
        self.0.iter().map(|attr| attr.encode()).collect()
    }
}

impl Deref for Attributes {
    type Target = [Attribute];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&[Element]> for Attributes {
    type Error = Error;

    fn try_from(elements: &[Element]) -> Result<Self> {
        let attributes = elements
            .iter()
            .map(Decoder::<Element, Attribute>::decode)
            .collect::<Result<Vec<_>>>()?;
        Attributes::new(attributes)
    }
}

impl DecodableFrom<Element> for Attributes {}

impl Decoder<Element, Attributes> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Attributes> {
        match self {
            Element::Set(elements) => Attributes::try_from(elements.as_slice()),
            _ => Err(Error::AttributesExpectedSet(self.type_name())),
        }
    }
}

impl EncodableTo<Attributes> for Element {}

impl Encoder<Attributes, Element> for Attributes {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Set(self.to_elements()?))
    }
}
