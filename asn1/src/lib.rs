//! Generic ASN.1 values decoded from DER.
//!
//! An [`ASN1Object`] is the untyped, ordered element tree of a DER document.
//! Schema-aware crates turn [`Element`]s into typed structures with the
//! `Decoder` trait and back with `Encoder`.

use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, NaiveDateTime};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_der::{Der, PrimitiveTag, Tag, Tlv};

use crate::error::Error;

pub mod error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object, Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        let tlvs = self
            .elements
            .iter()
            .map(Tlv::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Der::new(tlvs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    PrintableString(String),
    IA5String(String),
    UTCTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    ContextSpecific {
        slot: u8,
        content: TaggedContent,
    },
    /// Any other value, kept verbatim so it re-encodes byte for byte.
    Unimplemented(Tlv),
}

/// Content of a context-specific value.
///
/// The tag alone does not say whether the value is IMPLICIT or EXPLICIT, so
/// the raw shape is kept and the schema-aware layer interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedContent {
    /// Primitive encoding: the content octets of an IMPLICIT primitive type.
    Primitive(OctetString),
    /// Constructed encoding: the single inner value of an EXPLICIT tag, or
    /// the members of an IMPLICIT SEQUENCE/SET.
    Constructed(Vec<Element>),
}

impl TaggedContent {
    pub fn is_constructed(&self) -> bool {
        matches!(self, TaggedContent::Constructed(_))
    }

    pub fn elements(&self) -> Option<&[Element]> {
        match self {
            TaggedContent::Constructed(elements) => Some(elements),
            TaggedContent::Primitive(_) => None,
        }
    }

    pub fn data(&self) -> Option<&OctetString> {
        match self {
            TaggedContent::Primitive(data) => Some(data),
            TaggedContent::Constructed(_) => None,
        }
    }
}

impl Element {
    /// ASN.1 name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::UTF8String(_) => "UTF8String",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::PrintableString(_) => "PrintableString",
            Element::IA5String(_) => "IA5String",
            Element::UTCTime(_) => "UTCTime",
            Element::GeneralizedTime(_) => "GeneralizedTime",
            Element::ContextSpecific { .. } => "context-specific",
            Element::Unimplemented(_) => "unimplemented",
        }
    }
}

fn decode_children(tlv: &Tlv, type_name: &'static str) -> Result<Vec<Element>, Error> {
    tlv.tlvs()
        .ok_or(Error::ExpectedConstructed(type_name))?
        .iter()
        .map(Element::try_from)
        .collect()
}

fn decode_universal(tag: PrimitiveTag, tlv: &Tlv) -> Result<Element, Error> {
    match tag {
        PrimitiveTag::Sequence => return decode_children(tlv, "SEQUENCE").map(Element::Sequence),
        PrimitiveTag::Set => return decode_children(tlv, "SET").map(Element::Set),
        _ => {}
    }

    // Constructed string encodings are BER only; keep them as they are.
    let Some(data) = tlv.data() else {
        return Ok(Element::Unimplemented(tlv.clone()));
    };

    match tag {
        PrimitiveTag::Boolean => match data {
            [0x00] => Ok(Element::Boolean(false)),
            [0xff] => Ok(Element::Boolean(true)),
            _ => Err(Error::InvalidBoolean),
        },
        PrimitiveTag::Integer => Integer::try_from(data).map(Element::Integer),
        PrimitiveTag::BitString => BitString::try_from(data).map(Element::BitString),
        PrimitiveTag::OctetString => Ok(Element::OctetString(OctetString::from(data))),
        PrimitiveTag::Null => {
            if data.is_empty() {
                Ok(Element::Null)
            } else {
                Err(Error::InvalidNull)
            }
        }
        PrimitiveTag::ObjectIdentifier => {
            ObjectIdentifier::try_from(data).map(Element::ObjectIdentifier)
        }
        PrimitiveTag::UTF8String => String::from_utf8(data.to_vec())
            .map(Element::UTF8String)
            .map_err(|_| Error::Utf8StringInvalidUtf8),
        PrimitiveTag::PrintableString => {
            if data.iter().all(|b| is_printable(*b)) {
                Ok(Element::PrintableString(
                    String::from_utf8_lossy(data).into_owned(),
                ))
            } else {
                Err(Error::PrintableStringInvalidEncoding)
            }
        }
        PrimitiveTag::IA5String => {
            if data.is_ascii() {
                Ok(Element::IA5String(String::from_utf8_lossy(data).into_owned()))
            } else {
                Err(Error::Ia5StringInvalidEncoding)
            }
        }
        PrimitiveTag::UTCTime => parse_utc_time(data).map(Element::UTCTime),
        PrimitiveTag::GeneralizedTime => {
            parse_generalized_time(data).map(Element::GeneralizedTime)
        }
        PrimitiveTag::Sequence | PrimitiveTag::Set | PrimitiveTag::Unimplemented(_) => {
            Ok(Element::Unimplemented(tlv.clone()))
        }
    }
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b" '()+,-./:=?".contains(&b)
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _) => decode_universal(*primitive_tag, tlv),
            Tag::ContextSpecific { slot, constructed } => {
                let content = if *constructed {
                    TaggedContent::Constructed(decode_children(tlv, "context-specific")?)
                } else {
                    let data = tlv.data().unwrap_or_default();
                    TaggedContent::Primitive(OctetString::from(data))
                };
                Ok(Element::ContextSpecific {
                    slot: *slot,
                    content,
                })
            }
            Tag::Other(_) => Ok(Element::Unimplemented(tlv.clone())),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({})", bs),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(seq) => write!(f, "Sequence({})", join(seq)),
            Element::Set(set) => write!(f, "Set({})", join(set)),
            Element::PrintableString(s) => write!(f, "PrintableString({})", s),
            Element::IA5String(s) => write!(f, "IA5String({})", s),
            Element::UTCTime(dt) => write!(f, "UTCTime({})", dt),
            Element::GeneralizedTime(dt) => write!(f, "GeneralizedTime({})", dt),
            Element::ContextSpecific { slot, content } => match content {
                TaggedContent::Primitive(data) => write!(f, "[{}]({})", slot, data),
                TaggedContent::Constructed(elements) => {
                    write!(f, "[{}]({})", slot, join(elements))
                }
            },
            Element::Unimplemented(tlv) => {
                write!(f, "Unimplemented(0x{:02x})", tlv.tag().identifier())
            }
        }
    }
}

fn join(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn encode_children(elements: &[Element]) -> Result<Vec<Tlv>, Error> {
    elements.iter().map(Tlv::try_from).collect()
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        let primitive = |tag: PrimitiveTag, data: Vec<u8>| Tlv::new_primitive(Tag::universal(tag), data);

        let tlv = match element {
            Element::Boolean(b) => {
                primitive(PrimitiveTag::Boolean, vec![if *b { 0xff } else { 0x00 }])
            }
            Element::Integer(i) => primitive(PrimitiveTag::Integer, i.to_bytes()),
            Element::BitString(bs) => primitive(PrimitiveTag::BitString, Vec::from(bs.clone())),
            Element::OctetString(os) => {
                primitive(PrimitiveTag::OctetString, os.as_bytes().to_vec())
            }
            Element::Null => primitive(PrimitiveTag::Null, vec![]),
            Element::ObjectIdentifier(oid) => {
                primitive(PrimitiveTag::ObjectIdentifier, Vec::from(oid))
            }
            Element::UTF8String(s) => primitive(PrimitiveTag::UTF8String, s.as_bytes().to_vec()),
            Element::Sequence(elements) => Tlv::new_constructed(
                Tag::universal(PrimitiveTag::Sequence),
                encode_children(elements)?,
            ),
            Element::Set(elements) => {
                Tlv::new_constructed(Tag::universal(PrimitiveTag::Set), encode_children(elements)?)
            }
            Element::PrintableString(s) => {
                primitive(PrimitiveTag::PrintableString, s.as_bytes().to_vec())
            }
            Element::IA5String(s) => primitive(PrimitiveTag::IA5String, s.as_bytes().to_vec()),
            // RFC 5280 4.1.2.5: dates outside 1950..=2049 use GeneralizedTime.
            Element::UTCTime(dt) if !(1950..=2049).contains(&dt.year()) => primitive(
                PrimitiveTag::GeneralizedTime,
                format_generalized_time(dt).into_bytes(),
            ),
            Element::UTCTime(dt) => {
                let time_str = dt.format("%y%m%d%H%M%SZ").to_string();
                primitive(PrimitiveTag::UTCTime, time_str.into_bytes())
            }
            Element::GeneralizedTime(dt) => primitive(
                PrimitiveTag::GeneralizedTime,
                format_generalized_time(dt).into_bytes(),
            ),
            Element::ContextSpecific { slot, content } => match content {
                TaggedContent::Primitive(data) => Tlv::new_primitive(
                    Tag::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                    },
                    data.as_bytes().to_vec(),
                ),
                TaggedContent::Constructed(elements) => Tlv::new_constructed(
                    Tag::ContextSpecific {
                        slot: *slot,
                        constructed: true,
                    },
                    encode_children(elements)?,
                ),
            },
            Element::Unimplemented(tlv) => tlv.clone(),
        };
        Ok(tlv)
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        Tlv::try_from(self)
    }
}

/// ASN.1 INTEGER of arbitrary size.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    /// Minimal two's complement big-endian content octets.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::IntegerNoData),
            // the first 9 bits must not all be equal
            [0x00, next, ..] if next & 0x80 == 0 => Err(Error::IntegerNotMinimal),
            [0xff, next, ..] if next & 0x80 == 0x80 => Err(Error::IntegerNotMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(value),
            }),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl AsRef<BigInt> for Integer {
    fn as_ref(&self) -> &BigInt {
        &self.inner
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// ASN.1 OBJECT IDENTIFIER.
///
/// Always holds at least two arcs, with the first two forming a valid root
/// (`0.x` or `1.x` with `x < 40`, or `2.x`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn from_arcs(arcs: Vec<u64>) -> Result<Self, Error> {
        validate_arcs(&arcs)?;
        Ok(ObjectIdentifier { inner: arcs })
    }

    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }
}

fn validate_arcs(arcs: &[u64]) -> Result<(), Error> {
    match arcs {
        [0 | 1, second, ..] if *second < 40 => Ok(()),
        [2, second, ..] if *second <= u64::MAX - 80 => Ok(()),
        [first, second, ..] => Err(Error::ObjectIdentifierInvalidComponent(format!(
            "{}.{}",
            first, second
        ))),
        _ => Err(Error::ObjectIdentifierTooFewComponents),
    }
}

fn write_base128(value: u64, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7f) as u8 | 0x80);
        rest >>= 7;
    }
    out.extend(groups.iter().rev());
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut current = 0u64;
        let mut pending = false;
        for &b in value {
            if !pending && b == 0x80 {
                return Err(Error::ObjectIdentifierNotMinimal);
            }
            if current > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierOverflow);
            }
            current = (current << 7) | u64::from(b & 0x7f);
            pending = b & 0x80 == 0x80;
            if !pending {
                subidentifiers.push(current);
                current = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs as X * 40 + Y.
        let Some((&first, rest)) = subidentifiers.split_first() else {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        };
        let (root, second) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        inner.push(root);
        inner.push(second);
        inner.extend_from_slice(rest);

        Ok(ObjectIdentifier { inner })
    }
}

impl From<&ObjectIdentifier> for Vec<u8> {
    fn from(oid: &ObjectIdentifier) -> Self {
        let mut out = Vec::new();
        // at least two arcs, see validate_arcs
        write_base128(oid.inner[0] * 40 + oid.inner[1], &mut out);
        for arc in &oid.inner[2..] {
            write_base128(*arc, &mut out);
        }
        out
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| arc.parse::<u64>())
            .collect::<Result<Vec<u64>, _>>()?;
        ObjectIdentifier::from_arcs(arcs)
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        *self == other.to_string()
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Trait for types that can be converted to an ObjectIdentifier
pub trait AsOid {
    fn as_oid(&self) -> Result<ObjectIdentifier, Error>;
}

impl AsOid for ObjectIdentifier {
    fn as_oid(&self) -> Result<ObjectIdentifier, Error> {
        Ok(self.clone())
    }
}

impl AsOid for &ObjectIdentifier {
    fn as_oid(&self) -> Result<ObjectIdentifier, Error> {
        Ok((*self).clone())
    }
}

impl AsOid for &str {
    fn as_oid(&self) -> Result<ObjectIdentifier, Error> {
        ObjectIdentifier::from_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Result<Self, Error> {
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        Ok(BitString { unused, data })
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - self.unused as usize
    }
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BitString", 2)?;
        state.serialize_field("bit_length", &self.bit_len())?;
        state.serialize_field("bits", &hex(&self.data, ":"))?;
        state.end()
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value.split_first() {
            Some((&unused, data)) => BitString::new(unused, data.to_vec()),
            None => Err(Error::BitStringNoData),
        }
    }
}

impl From<BitString> for Vec<u8> {
    fn from(value: BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend(value.data);
        result
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = self
            .data
            .iter()
            .map(|b| format!("{:08b}", b))
            .collect::<String>();
        write!(f, "{}", &bits[..self.bit_len()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex(&self.inner, ""))
        } else {
            self.inner.serialize(serializer)
        }
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self, Self::Error> {
        let der: Der = value.as_bytes().decode().map_err(Error::FailedToDecodeDer)?;
        der.decode()
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.inner, ""))
    }
}

fn hex(bytes: &[u8], separator: &str) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(separator)
}

// RFC 5280 4.1.2.5.1: YY >= 50 is 19YY, YY < 50 is 20YY.
fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let s = std::str::from_utf8(data).map_err(|_| Error::UtcTimeInvalidFormat)?;
    let yy = s
        .get(..2)
        .and_then(|yy| yy.parse::<u8>().ok())
        .ok_or(Error::UtcTimeInvalidFormat)?;
    let century = if yy >= 50 { "19" } else { "20" };
    NaiveDateTime::parse_from_str(&format!("{}{}", century, s), "%Y%m%d%H%M%SZ")
        .map_err(|_| Error::UtcTimeInvalidFormat)
}

// X.690 11.7.3: no trailing zeros in the fraction, no bare decimal point.
fn format_generalized_time(dt: &NaiveDateTime) -> String {
    let mut time_str = dt.format("%Y%m%d%H%M%S%.f").to_string();
    if time_str.contains('.') {
        let trimmed = time_str.trim_end_matches('0').trim_end_matches('.').len();
        time_str.truncate(trimmed);
    }
    time_str.push('Z');
    time_str
}

fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let s = std::str::from_utf8(data).map_err(|_| Error::GeneralizedTimeInvalidFormat)?;
    let format = if s.contains('.') {
        "%Y%m%d%H%M%S%.fZ"
    } else {
        "%Y%m%d%H%M%SZ"
    };
    NaiveDateTime::parse_from_str(s, format).map_err(|_| Error::GeneralizedTimeInvalidFormat)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[rstest(input, expected,
        case(vec![0x01], "1"),
        case(vec![0x00], "0"),
        case(vec![0x00, 0x80], "128"),
        case(vec![0xff], "-1"),
        case(vec![0xff, 0x7f], "-129"),
        case(vec![0x03, 0xd4, 0x15, 0x31, 0x8e, 0x2c, 0x57, 0x1d, 0x29, 0x05, 0xfc, 0x3e, 0x05, 0x27, 0x68, 0x9d, 0x0d, 0x09], "333504890676592408951587385614406537514249"),
    )]
    fn test_integer_from_bytes(input: Vec<u8>, expected: &str) {
        let actual = Integer::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, actual.to_string());
        assert_eq!(input, actual.to_bytes());
    }

    #[rstest(input, expected_error_variant,
        case(vec![], "IntegerNoData"),
        case(vec![0x00, 0x01], "IntegerNotMinimal"),
        case(vec![0xff, 0x80], "IntegerNotMinimal"),
    )]
    fn test_integer_from_bytes_failure(input: Vec<u8>, expected_error_variant: &str) {
        let err = Integer::try_from(input.as_slice()).unwrap_err();
        assert!(format!("{:?}", err).contains(expected_error_variant));
    }

    #[rstest(input, expected_json,
        case(Integer::from(0), r#""0""#),
        case(Integer::from(-1), r#""-1""#),
        case(Integer::from(BigInt::from_str("333504890676592408951587385614406537514249").unwrap()), r#""333504890676592408951587385614406537514249""#),
    )]
    fn test_integer_serialize(input: Integer, expected_json: &str) {
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(expected_json, json);
        let back: Integer = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }

    #[rstest(input, expected,
        // 1.2
        case(vec![0x2a], "1.2"),
        // 1.2.840.113549.1.1.11
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b], "1.2.840.113549.1.1.11"),
        // 0.9.2342.19200300.100.1.1
        case(vec![0x09, 0x92, 0x26, 0x89, 0x93, 0xf2, 0x2c, 0x64, 0x01, 0x01], "0.9.2342.19200300.100.1.1"),
        // id-mod-ers88-v1 carries a zero arc
        case(vec![0x2b, 0x06, 0x01, 0x05, 0x05, 0x0b, 0x00, 0x02, 0x01], "1.3.6.1.5.5.11.0.2.1"),
        // 2.999.3: the first subidentifier spans two octets
        case(vec![0x88, 0x37, 0x03], "2.999.3"),
    )]
    fn test_object_identifier_bytes(input: Vec<u8>, expected: &str) {
        let actual = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, actual.to_string());
        assert_eq!(input, Vec::from(&actual));
    }

    #[rstest(input, expected_error_variant,
        case(vec![], "ObjectIdentifierNoData"),
        case(vec![0x2a, 0x86], "ObjectIdentifierIncompleteEncoding"),
        case(vec![0x2a, 0x80, 0x01], "ObjectIdentifierNotMinimal"),
        case(vec![0x2a, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f], "ObjectIdentifierOverflow"),
    )]
    fn test_object_identifier_bytes_failure(input: Vec<u8>, expected_error_variant: &str) {
        let err = ObjectIdentifier::try_from(input.as_slice()).unwrap_err();
        assert!(format!("{:?}", err).contains(expected_error_variant));
    }

    #[rstest(input, expected_error_variant,
        case("1", "ObjectIdentifierTooFewComponents"),
        case("1.40", "ObjectIdentifierInvalidComponent"),
        case("3.1", "ObjectIdentifierInvalidComponent"),
        case("1.2.x", "ParseInt"),
        case("", "ParseInt"),
    )]
    fn test_object_identifier_from_str_failure(input: &str, expected_error_variant: &str) {
        let err = ObjectIdentifier::from_str(input).unwrap_err();
        assert!(format!("{:?}", err).contains(expected_error_variant));
    }

    #[test]
    fn test_object_identifier_compare_with_str() {
        let actual = oid("2.16.840.1.101.3.4.2.1");
        assert!(actual == "2.16.840.1.101.3.4.2.1");
        assert!("2.16.840.1.101.3.4.2.1" == actual);
        assert_eq!(
            serde_json::to_string(&actual).unwrap(),
            r#""2.16.840.1.101.3.4.2.1""#
        );
    }

    #[rstest(input, expected,
        case(BitString::new(0, vec![0b1010_1010]).unwrap(), "10101010"),
        case(BitString::new(2, vec![0b1010_1010, 0b1100_1100]).unwrap(), "10101010110011"),
        case(BitString::new(0, vec![]).unwrap(), ""),
    )]
    fn test_bitstring_to_string(input: BitString, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[rstest(input, expected_error_variant,
        case(vec![], "BitStringNoData"),
        case(vec![0x08, 0x00], "BitStringUnusedBitsOutOfRange"),
        case(vec![0x01], "BitStringUnusedBitsOutOfRange"),
    )]
    fn test_bitstring_from_bytes_failure(input: Vec<u8>, expected_error_variant: &str) {
        let err = BitString::try_from(input.as_slice()).unwrap_err();
        assert!(format!("{:?}", err).contains(expected_error_variant));
    }

    #[rstest(input, expected,
        case(b"500101000000Z".to_vec(), NaiveDate::from_ymd_opt(1950, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()),
        case(b"491231235959Z".to_vec(), NaiveDate::from_ymd_opt(2049, 12, 31).unwrap().and_hms_opt(23, 59, 59).unwrap()),
        case(b"191215190210Z".to_vec(), NaiveDate::from_ymd_opt(2019, 12, 15).unwrap().and_hms_opt(19, 2, 10).unwrap()),
    )]
    fn test_parse_utc_time(input: Vec<u8>, expected: NaiveDateTime) {
        let actual = parse_utc_time(&input).unwrap();
        assert_eq!(expected, actual);

        let tlv = Tlv::try_from(&Element::UTCTime(actual)).unwrap();
        assert_eq!(Some(input.as_slice()), tlv.data());
    }

    #[rstest(input, expected,
        case(b"20191216030210Z".to_vec(), NaiveDate::from_ymd_opt(2019, 12, 16).unwrap().and_hms_opt(3, 2, 10).unwrap()),
        case(b"20240229120000.123Z".to_vec(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_milli_opt(12, 0, 0, 123).unwrap()),
    )]
    fn test_parse_generalized_time(input: Vec<u8>, expected: NaiveDateTime) {
        let actual = parse_generalized_time(&input).unwrap();
        assert_eq!(expected, actual);

        let tlv = Tlv::try_from(&Element::GeneralizedTime(actual)).unwrap();
        assert_eq!(Some(input.as_slice()), tlv.data());
    }

    #[rstest(input,
        case(b"20240101120000.1Z".to_vec()),
        case(b"20240101120000.12Z".to_vec()),
        case(b"20240101120000.1234Z".to_vec()),
        case(b"20240101120000.000000001Z".to_vec()),
        case(b"20240101120000Z".to_vec()),
    )]
    fn test_generalized_time_fraction_reencodes_unchanged(input: Vec<u8>) {
        let tlv = Tlv::new_primitive(Tag::universal(PrimitiveTag::GeneralizedTime), input.clone());
        let element = Element::try_from(&tlv).unwrap();

        let encoded = Tlv::try_from(&element).unwrap();
        assert_eq!(Some(input.as_slice()), encoded.data());
    }

    #[rstest(nanos, expected,
        case(100_000_000, b"20240101120000.1Z".to_vec()),
        case(120_000_000, b"20240101120000.12Z".to_vec()),
        case(0, b"20240101120000Z".to_vec()),
    )]
    fn test_generalized_time_drops_trailing_zeros(nanos: u32, expected: Vec<u8>) {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_nano_opt(12, 0, 0, nanos)
            .unwrap();
        let tlv = Tlv::try_from(&Element::GeneralizedTime(dt)).unwrap();
        assert_eq!(Some(expected.as_slice()), tlv.data());
    }

    #[rstest(year, expected,
        case(2050, b"20500101000000Z".to_vec()),
        case(1949, b"19490101000000Z".to_vec()),
    )]
    fn test_utc_time_out_of_range_encodes_as_generalized_time(year: i32, expected: Vec<u8>) {
        let dt = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let tlv = Tlv::try_from(&Element::UTCTime(dt)).unwrap();
        assert_eq!(tlv.tag(), &Tag::universal(PrimitiveTag::GeneralizedTime));
        assert_eq!(Some(expected.as_slice()), tlv.data());
    }

    #[rstest(element, expected_bytes,
        case(Element::Boolean(true), vec![0x01, 0x01, 0xff]),
        case(Element::Integer(Integer::from(1)), vec![0x02, 0x01, 0x01]),
        case(Element::Null, vec![0x05, 0x00]),
        case(Element::ObjectIdentifier(oid("1.2.3.4")), vec![0x06, 0x03, 0x2a, 0x03, 0x04]),
        case(Element::UTF8String("x".to_string()), vec![0x0c, 0x01, 0x78]),
        case(Element::Sequence(vec![]), vec![0x30, 0x00]),
        case(Element::Set(vec![Element::Null]), vec![0x31, 0x02, 0x05, 0x00]),
        case(Element::ContextSpecific { slot: 1, content: TaggedContent::Primitive(OctetString::from(vec![0xab])) }, vec![0x81, 0x01, 0xab]),
        case(Element::ContextSpecific { slot: 0, content: TaggedContent::Constructed(vec![Element::Null, Element::Boolean(false)]) }, vec![0xa0, 0x05, 0x05, 0x00, 0x01, 0x01, 0x00]),
    )]
    fn test_element_to_tlv(element: Element, expected_bytes: Vec<u8>) {
        let tlv: Tlv = element.encode().unwrap();
        assert_eq!(expected_bytes, tlv.to_bytes());

        let back = Element::try_from(&tlv).unwrap();
        assert_eq!(element, back);
    }

    #[test]
    fn test_context_specific_constructed_keeps_all_children() {
        // [0] IMPLICIT SEQUENCE OF with three members
        let input: &[u8] = &[0xa0, 0x09, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x02, 0x01, 0x03];
        let der: Der = input.decode().unwrap();
        let asn1: ASN1Object = der.decode().unwrap();

        let Element::ContextSpecific { slot, content } = &asn1.elements()[0] else {
            panic!("expected context-specific element");
        };
        assert_eq!(*slot, 0);
        assert_eq!(content.elements().map(|e| e.len()), Some(3));
        assert!(content.data().is_none());
    }

    #[test]
    fn test_unimplemented_roundtrip() {
        // [APPLICATION 1] primitive and an ENUMERATED survive untouched
        let input: &[u8] = &[0x30, 0x07, 0x41, 0x02, 0x01, 0x02, 0x0a, 0x01, 0x05];
        let der: Der = input.decode().unwrap();
        let asn1: ASN1Object = der.decode().unwrap();

        let Element::Sequence(elements) = &asn1.elements()[0] else {
            panic!("expected SEQUENCE");
        };
        assert!(elements.iter().all(|e| matches!(e, Element::Unimplemented(_))));

        let der: Der = asn1.encode().unwrap();
        let bytes: Vec<u8> = der.encode().unwrap();
        assert_eq!(input, bytes.as_slice());
    }

    #[rstest(input, expected_error_variant,
        case(vec![0x01, 0x01, 0x01], "InvalidBoolean"),
        case(vec![0x05, 0x01, 0x00], "InvalidNull"),
        case(vec![0x13, 0x01, 0x2a], "PrintableStringInvalidEncoding"),
        case(vec![0x16, 0x01, 0x80], "Ia5StringInvalidEncoding"),
        case(vec![0x0c, 0x01, 0xff], "Utf8StringInvalidUtf8"),
        case(vec![0x17, 0x02, 0x39, 0x39], "UtcTimeInvalidFormat"),
        case(vec![0x10, 0x00], "ExpectedConstructed"),
    )]
    fn test_decode_element_failure(input: Vec<u8>, expected_error_variant: &str) {
        let der: Der = input.decode().unwrap();
        let result: Result<ASN1Object, Error> = der.decode();
        let err = result.unwrap_err();
        let err_str = format!("{:?}", err);
        assert!(
            err_str.contains(expected_error_variant),
            "Expected error '{}', but got '{}'",
            expected_error_variant,
            err_str
        );
    }

    #[rstest(element, expected,
        case(Element::Integer(Integer::from(1)), "INTEGER"),
        case(Element::Sequence(vec![]), "SEQUENCE"),
        case(Element::OctetString(OctetString::from(vec![])), "OCTET STRING"),
        case(Element::ContextSpecific { slot: 0, content: TaggedContent::Constructed(vec![]) }, "context-specific"),
    )]
    fn test_element_type_name(element: Element, expected: &str) {
        assert_eq!(expected, element.type_name());
    }

    #[test]
    fn test_octet_string_to_asn1_object() {
        let os = OctetString::from(vec![0x30, 0x03, 0x02, 0x01, 0x07]);
        let asn1 = ASN1Object::try_from(&os).unwrap();
        assert_eq!(
            asn1.elements(),
            &[Element::Sequence(vec![Element::Integer(Integer::from(7))])]
        );
        assert_eq!(os.to_string(), "3003020107");
    }
}
