//! # tsumiki
//!
//! Core traits for encoding and decoding in the tsumiki toolkit.
//!
//! Every layer of the toolkit is a typed value, and moving between layers is
//! a `decode` or an `encode` call:
//!
//! ```text
//! Vec<u8> → Der → ASN1Object → Element → EvidenceRecord
//! ```
//!
//! The `Decoder` trait converts from one layer to the next and the `Encoder`
//! trait converts back. Both are paired with a marker trait
//! (`DecodableFrom` / `EncodableTo`) so that only the conversions a crate
//! explicitly declares are possible.
//!
//! ## Example
//!
//! ```ignore
//! use tsumiki::decoder::Decoder;
//! use tsumiki_asn1::ASN1Object;
//! use tsumiki_der::Der;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
