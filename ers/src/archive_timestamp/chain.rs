use std::ops::Deref;

use serde::Serialize;
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::Element;

use super::ArchiveTimeStamp;
use super::error::{Error, Result};

/// Timestamps renewed with the same hash algorithm, oldest first.
///
/// ```asn1
/// ArchiveTimeStampChain ::= SEQUENCE OF ArchiveTimeStamp
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveTimeStampChain(Vec<ArchiveTimeStamp>);

impl ArchiveTimeStampChain {
    pub fn new(time_stamps: Vec<ArchiveTimeStamp>) -> Self {
        Self(time_stamps)
    }

    /// Returns a new chain with `time_stamp` appended.
    pub fn append(&self, time_stamp: ArchiveTimeStamp) -> Self {
        let mut time_stamps = self.0.clone();
        time_stamps.push(time_stamp);
        Self(time_stamps)
    }
}

impl Deref for ArchiveTimeStampChain {
    type Target = [ArchiveTimeStamp];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DecodableFrom<Element> for ArchiveTimeStampChain {}

impl Decoder<Element, ArchiveTimeStampChain> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ArchiveTimeStampChain> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                structure: "ArchiveTimeStampChain",
                actual: self.type_name(),
            });
        };
        let time_stamps = elements
            .iter()
            .enumerate()
            .map(|(index, elm)| {
                Decoder::<Element, ArchiveTimeStamp>::decode(elm).map_err(|source| {
                    Error::TimeStamp {
                        index,
                        source: Box::new(source),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ArchiveTimeStampChain(time_stamps))
    }
}

impl EncodableTo<ArchiveTimeStampChain> for Element {}

impl Encoder<ArchiveTimeStampChain, Element> for ArchiveTimeStampChain {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let elements = self
            .0
            .iter()
            .map(|time_stamp| time_stamp.encode())
            .collect::<Result<Vec<_>>>()?;
        Ok(Element::Sequence(elements))
    }
}

/// Chains in the order they were started; a new chain begins whenever the
/// hash algorithm is renewed.
///
/// ```asn1
/// ArchiveTimeStampSequence ::= SEQUENCE OF ArchiveTimeStampChain
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveTimeStampSequence(Vec<ArchiveTimeStampChain>);

impl ArchiveTimeStampSequence {
    pub fn new(chains: Vec<ArchiveTimeStampChain>) -> Self {
        Self(chains)
    }

    /// Returns a new sequence with `chain` appended.
    pub fn append(&self, chain: ArchiveTimeStampChain) -> Self {
        let mut chains = self.0.clone();
        chains.push(chain);
        Self(chains)
    }

    /// Returns a new sequence with `time_stamp` appended to the last chain,
    /// starting the first chain if there is none.
    pub fn append_time_stamp(&self, time_stamp: ArchiveTimeStamp) -> Self {
        let mut chains = self.0.clone();
        match chains.last_mut() {
            Some(last) => *last = last.append(time_stamp),
            None => chains.push(ArchiveTimeStampChain::new(vec![time_stamp])),
        }
        Self(chains)
    }
}

impl Deref for ArchiveTimeStampSequence {
    type Target = [ArchiveTimeStampChain];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DecodableFrom<Element> for ArchiveTimeStampSequence {}

impl Decoder<Element, ArchiveTimeStampSequence> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ArchiveTimeStampSequence> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence {
                structure: "ArchiveTimeStampSequence",
                actual: self.type_name(),
            });
        };
        let chains = elements
            .iter()
            .enumerate()
            .map(|(index, elm)| {
                Decoder::<Element, ArchiveTimeStampChain>::decode(elm).map_err(|source| {
                    Error::Chain {
                        index,
                        source: Box::new(source),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ArchiveTimeStampSequence(chains))
    }
}

impl EncodableTo<ArchiveTimeStampSequence> for Element {}

impl Encoder<ArchiveTimeStampSequence, Element> for ArchiveTimeStampSequence {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let elements = self
            .0
            .iter()
            .map(|chain| chain.encode())
            .collect::<Result<Vec<_>>>()?;
        Ok(Element::Sequence(elements))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::str::FromStr;

    use super::*;
    use crate::archive_timestamp::ContentInfo;
    use tsumiki_asn1::{ObjectIdentifier, TaggedContent};

    fn time_stamp_element(marker: i64) -> Element {
        Element::Sequence(vec![Element::Sequence(vec![
            Element::ObjectIdentifier(
                ObjectIdentifier::from_str(ContentInfo::OID_SIGNED_DATA).unwrap(),
            ),
            Element::ContextSpecific {
                slot: 0,
                content: TaggedContent::Constructed(vec![Element::Integer(marker.into())]),
            },
        ])])
    }

    fn time_stamp(marker: i64) -> ArchiveTimeStamp {
        time_stamp_element(marker).decode().unwrap()
    }

    #[test]
    fn test_sequence_decode_preserves_order() {
        let elem = Element::Sequence(vec![
            Element::Sequence(vec![time_stamp_element(1), time_stamp_element(2)]),
            Element::Sequence(vec![time_stamp_element(3)]),
        ]);

        let sequence: ArchiveTimeStampSequence = elem.decode().unwrap();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[0].len(), 2);
        assert_eq!(sequence[0][1], time_stamp(2));
        assert_eq!(sequence[1][0], time_stamp(3));

        let encoded: Element = sequence.encode().unwrap();
        assert_eq!(elem, encoded);
    }

    #[test]
    fn test_sequence_decode_reports_position() {
        let elem = Element::Sequence(vec![
            Element::Sequence(vec![time_stamp_element(1)]),
            Element::Sequence(vec![time_stamp_element(2), Element::Null]),
        ]);

        let result: Result<ArchiveTimeStampSequence> = elem.decode();
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Chain { index: 1, .. }));
        assert_eq!(
            err.to_string(),
            "chain 1: timestamp 1: ArchiveTimeStamp: expected SEQUENCE, got NULL"
        );
        let source = err.source().unwrap();
        assert!(source.to_string().starts_with("timestamp 1"));
    }

    #[test]
    fn test_chain_append_keeps_original() {
        let chain = ArchiveTimeStampChain::new(vec![time_stamp(1)]);
        let appended = chain.append(time_stamp(2));

        assert_eq!(chain.len(), 1);
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[1], time_stamp(2));
    }

    #[test]
    fn test_sequence_append_time_stamp() {
        let empty = ArchiveTimeStampSequence::default();
        let started = empty.append_time_stamp(time_stamp(1));
        assert!(empty.is_empty());
        assert_eq!(started.len(), 1);

        let extended = started.append_time_stamp(time_stamp(2));
        assert_eq!(extended.len(), 1);
        assert_eq!(extended[0].len(), 2);

        let renewed = extended.append(ArchiveTimeStampChain::new(vec![time_stamp(3)]));
        assert_eq!(renewed.len(), 2);
        assert_eq!(extended.len(), 1);
    }
}
