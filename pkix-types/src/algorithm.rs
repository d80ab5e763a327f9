//! AlgorithmIdentifier type
//!
//! Defined in [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2)

use std::fmt;

use serde::{Serialize, ser::SerializeStruct};
use tsumiki::decoder::{DecodableFrom, Decoder};
use tsumiki::encoder::{EncodableTo, Encoder};
use tsumiki_asn1::{Element, ObjectIdentifier};

use crate::OidName;
use crate::error::{Error, Result};

/// Parameters field in AlgorithmIdentifier
///
/// Wrapped in Option:
/// - None: Field not present (OPTIONAL field omitted, 0 bytes)
/// - Some(AlgorithmParameters::Null): Explicit NULL value
/// - Some(AlgorithmParameters::Other(element)): Any other ASN.1 element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    /// Explicit NULL (05 00)
    Null,
    /// Any other ASN.1 element, kept as decoded
    Other(Element),
}

impl Serialize for AlgorithmParameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            AlgorithmParameters::Null => serializer.serialize_str("Null"),
            AlgorithmParameters::Other(Element::ObjectIdentifier(oid)) => {
                serializer.serialize_str(&oid.to_string())
            }
            AlgorithmParameters::Other(Element::Integer(n)) => {
                let mut state = serializer.serialize_struct("Integer", 1)?;
                state.serialize_field("value", &n.to_string())?;
                state.end()
            }
            AlgorithmParameters::Other(other) => serializer.serialize_str(other.type_name()),
        }
    }
}

/// Algorithm Identifier
///
/// [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2):
/// ```asn1
/// AlgorithmIdentifier ::= SEQUENCE {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ANY DEFINED BY algorithm OPTIONAL
/// }
/// ```
///
/// Evidence records list the digest algorithms used to build their hash trees
/// as AlgorithmIdentifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    /// Algorithm OID
    pub algorithm: ObjectIdentifier,
    /// Optional parameters
    /// - None: Field not present (usual for SHA-2 digests)
    /// - Some(AlgorithmParameters::Null): NULL parameters
    /// - Some(AlgorithmParameters::Other(...)): anything else
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    // Digest algorithm OIDs (RFC 3279, RFC 5754, NIST CSOR)
    pub const OID_SHA1: &'static str = "1.3.14.3.2.26";
    pub const OID_SHA224: &'static str = "2.16.840.1.101.3.4.2.4";
    pub const OID_SHA256: &'static str = "2.16.840.1.101.3.4.2.1";
    pub const OID_SHA384: &'static str = "2.16.840.1.101.3.4.2.2";
    pub const OID_SHA512: &'static str = "2.16.840.1.101.3.4.2.3";
    pub const OID_SHA512_224: &'static str = "2.16.840.1.101.3.4.2.5";
    pub const OID_SHA512_256: &'static str = "2.16.840.1.101.3.4.2.6";
    pub const OID_SHA3_224: &'static str = "2.16.840.1.101.3.4.2.7";
    pub const OID_SHA3_256: &'static str = "2.16.840.1.101.3.4.2.8";
    pub const OID_SHA3_384: &'static str = "2.16.840.1.101.3.4.2.9";
    pub const OID_SHA3_512: &'static str = "2.16.840.1.101.3.4.2.10";

    /// Create a new AlgorithmIdentifier with algorithm OID only
    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    /// Create a new AlgorithmIdentifier with parameters
    pub fn new_with_params(algorithm: ObjectIdentifier, parameters: AlgorithmParameters) -> Self {
        Self {
            algorithm,
            parameters: Some(parameters),
        }
    }

    /// Get the algorithm OID
    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    /// Get the parameters
    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }
}

impl OidName for AlgorithmIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        match self.algorithm.to_string().as_str() {
            AlgorithmIdentifier::OID_SHA1 => Some("sha1"),
            AlgorithmIdentifier::OID_SHA224 => Some("sha224"),
            AlgorithmIdentifier::OID_SHA256 => Some("sha256"),
            AlgorithmIdentifier::OID_SHA384 => Some("sha384"),
            AlgorithmIdentifier::OID_SHA512 => Some("sha512"),
            AlgorithmIdentifier::OID_SHA512_224 => Some("sha512-224"),
            AlgorithmIdentifier::OID_SHA512_256 => Some("sha512-256"),
            AlgorithmIdentifier::OID_SHA3_224 => Some("sha3-224"),
            AlgorithmIdentifier::OID_SHA3_256 => Some("sha3-256"),
            AlgorithmIdentifier::OID_SHA3_384 => Some("sha3-384"),
            AlgorithmIdentifier::OID_SHA3_512 => Some("sha3-512"),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.oid_name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.algorithm),
        }
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", 2)?;

        // Use human-readable name if available, otherwise use OID
        let oid_string = self.algorithm.to_string();
        let algorithm_display = self.oid_name().unwrap_or(&oid_string);
        state.serialize_field("algorithm", &algorithm_display)?;

        if let Some(ref params) = self.parameters {
            state.serialize_field("parameters", params)?;
        }
        state.end()
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::AlgorithmIdentifierExpectedSequence(self.type_name()));
        };

        let (algorithm, parameters) = match elements.as_slice() {
            [Element::ObjectIdentifier(oid)] => (oid.clone(), None),
            [Element::ObjectIdentifier(oid), Element::Null] => {
                (oid.clone(), Some(AlgorithmParameters::Null))
            }
            [Element::ObjectIdentifier(oid), other] => (
                oid.clone(),
                Some(AlgorithmParameters::Other(other.clone())),
            ),
            [_] | [_, _] => return Err(Error::AlgorithmIdentifierExpectedOid),
            _ => return Err(Error::AlgorithmIdentifierInvalidElementCount(elements.len())),
        };

        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let params_elem = self.parameters.as_ref().map(|params| match params {
            AlgorithmParameters::Null => Element::Null,
            AlgorithmParameters::Other(element) => element.clone(),
        });

        let elements: Vec<_> = std::iter::once(Element::ObjectIdentifier(self.algorithm.clone()))
            .chain(params_elem)
            .collect();

        Ok(Element::Sequence(elements))
    }
}
