//! DER tag-length-value layer.
//!
//! Parses a byte buffer into a tree of [`Tlv`]s and writes it back. Only the
//! DER subset of BER is accepted: definite lengths in their shortest form and
//! low tag numbers (0-30).

use nom::{IResult, Parser};
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};

use crate::error::Error;

pub mod error;

pub const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_CLASS_UNIVERSAL: u8 = 0x00;
const TAG_CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_NUMBER_MASK: u8 = 0x1f;

const LENGTH_LONG_FORM: u8 = 0x80;
const MAX_LENGTH_OCTETS: usize = std::mem::size_of::<usize>();

/// Maximum nesting of constructed values accepted by the parser.
pub const MAX_DEPTH: usize = 64;

/// A DER document: the ordered top-level TLVs of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        parse_der(self)
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        parse_der(self)
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut buf = Vec::new();
        for tlv in &self.elements {
            tlv.write(&mut buf);
        }
        Ok(buf)
    }
}

fn parse_der(mut input: &[u8]) -> Result<Der, Error> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut elements = Vec::new();
    while !input.is_empty() {
        let (rest, tlv) = Tlv::parse(input, 0)?;
        elements.push(tlv);
        input = rest;
    }
    Ok(Der { elements })
}

/// Universal class tag numbers the toolkit understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    UTF8String,
    Sequence,
    Set,
    PrintableString,
    IA5String,
    UTCTime,
    GeneralizedTime,
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    fn from(number: u8) -> Self {
        match number {
            0x01 => PrimitiveTag::Boolean,
            0x02 => PrimitiveTag::Integer,
            0x03 => PrimitiveTag::BitString,
            0x04 => PrimitiveTag::OctetString,
            0x05 => PrimitiveTag::Null,
            0x06 => PrimitiveTag::ObjectIdentifier,
            0x0c => PrimitiveTag::UTF8String,
            0x10 => PrimitiveTag::Sequence,
            0x11 => PrimitiveTag::Set,
            0x13 => PrimitiveTag::PrintableString,
            0x16 => PrimitiveTag::IA5String,
            0x17 => PrimitiveTag::UTCTime,
            0x18 => PrimitiveTag::GeneralizedTime,
            n => PrimitiveTag::Unimplemented(n),
        }
    }
}

impl From<&PrimitiveTag> for u8 {
    fn from(tag: &PrimitiveTag) -> Self {
        match tag {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::UTCTime => 0x17,
            PrimitiveTag::GeneralizedTime => 0x18,
            PrimitiveTag::Unimplemented(n) => *n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Universal class. The raw identifier octet is kept so the constructed
    /// bit survives re-encoding.
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
    /// Application or private class, kept as the raw identifier octet.
    Other(u8),
}

impl Tag {
    /// Universal tag with the constructed bit set for SEQUENCE and SET.
    pub fn universal(tag: PrimitiveTag) -> Self {
        let number = u8::from(&tag);
        let identifier = match tag {
            PrimitiveTag::Sequence | PrimitiveTag::Set => number | TAG_CONSTRUCTED,
            _ => number,
        };
        Tag::Primitive(tag, identifier)
    }

    pub fn identifier(&self) -> u8 {
        match self {
            Tag::Primitive(_, identifier) | Tag::Other(identifier) => *identifier,
            Tag::ContextSpecific { slot, constructed } => {
                let constructed = if *constructed { TAG_CONSTRUCTED } else { 0 };
                TAG_CLASS_CONTEXT_SPECIFIC | constructed | (slot & TAG_NUMBER_MASK)
            }
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.identifier() & TAG_CONSTRUCTED == TAG_CONSTRUCTED
    }
}

impl TryFrom<u8> for Tag {
    type Error = Error;

    fn try_from(identifier: u8) -> Result<Self, Self::Error> {
        let number = identifier & TAG_NUMBER_MASK;
        if number == TAG_NUMBER_MASK {
            return Err(Error::HighTagNumber(identifier));
        }
        let tag = match identifier & TAG_CLASS_MASK {
            TAG_CLASS_UNIVERSAL => Tag::Primitive(PrimitiveTag::from(number), identifier),
            TAG_CLASS_CONTEXT_SPECIFIC => Tag::ContextSpecific {
                slot: number,
                constructed: identifier & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            },
            _ => Tag::Other(identifier),
        };
        Ok(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Data(Vec<u8>),
    Tlvs(Vec<Tlv>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlvs(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Content octets of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlvs(_) => None,
        }
    }

    /// Nested TLVs of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Data(_) => None,
            Value::Tlvs(tlvs) => Some(tlvs),
        }
    }

    /// The full encoding of this TLV, identifier and length included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write(&mut buf);
        buf
    }

    fn write(&self, buf: &mut Vec<u8>) {
        buf.push(self.tag.identifier());
        match &self.value {
            Value::Data(data) => {
                write_length(data.len(), buf);
                buf.extend_from_slice(data);
            }
            Value::Tlvs(tlvs) => {
                let mut content = Vec::new();
                for tlv in tlvs {
                    tlv.write(&mut content);
                }
                write_length(content.len(), buf);
                buf.extend(content);
            }
        }
    }

    fn parse(input: &[u8], depth: usize) -> Result<(&[u8], Tlv), Error> {
        if depth > MAX_DEPTH {
            return Err(Error::NestingTooDeep(MAX_DEPTH));
        }
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, content) = take_bytes(input, length)?;

        if tag.is_constructed() {
            let mut tlvs = Vec::new();
            let mut content = content;
            while !content.is_empty() {
                let (rest, tlv) = Self::parse(content, depth + 1)?;
                tlvs.push(tlv);
                content = rest;
            }
            return Ok((input, Tlv::new_constructed(tag, tlvs)));
        }

        Ok((input, Tlv::new_primitive(tag, content.to_vec())))
    }
}

fn be_u8(input: &[u8]) -> IResult<&[u8], u8> {
    nom::number::complete::be_u8(input)
}

fn take_bytes(input: &[u8], count: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

fn parse_tag(input: &[u8]) -> Result<(&[u8], Tag), Error> {
    let (input, identifier) = be_u8(input)?;
    Ok((input, Tag::try_from(identifier)?))
}

fn parse_length(input: &[u8]) -> Result<(&[u8], usize), Error> {
    let (input, first) = be_u8(input)?;
    if first & LENGTH_LONG_FORM == 0 {
        // short form: 0-127
        return Ok((input, first as usize));
    }

    // long form: the low 7 bits count the length octets that follow
    let octets = (first & !LENGTH_LONG_FORM) as usize;
    if octets == 0 {
        return Err(Error::IndefiniteLength);
    }
    if octets > MAX_LENGTH_OCTETS {
        return Err(Error::LengthTooLong(octets));
    }
    let (input, bytes) = take_bytes(input, octets)?;
    if bytes.first() == Some(&0) {
        return Err(Error::NonMinimalLength);
    }
    let length = bytes
        .iter()
        .fold(0usize, |length, &b| (length << 8) | b as usize);
    if length < LENGTH_LONG_FORM as usize {
        return Err(Error::NonMinimalLength);
    }
    Ok((input, length))
}

fn write_length(length: usize, buf: &mut Vec<u8>) {
    if length < LENGTH_LONG_FORM as usize {
        buf.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    buf.push(LENGTH_LONG_FORM | (bytes.len() - skip) as u8);
    buf.extend_from_slice(&bytes[skip..]);
}
