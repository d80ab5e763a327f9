//! Decoder trait for type-safe conversions.
//!
//! A source type `T` implements `Decoder<T, D>` to produce a `D`, and `D`
//! opts in with `DecodableFrom<T>`.
//!
//! ```no_run
//! use tsumiki::decoder::{DecodableFrom, Decoder};
//!
//! struct Raw(Vec<u8>);
//! struct Parsed(usize);
//!
//! #[derive(Debug)]
//! struct ParseError;
//!
//! impl DecodableFrom<Raw> for Parsed {}
//!
//! impl Decoder<Raw, Parsed> for Raw {
//!     type Error = ParseError;
//!
//!     fn decode(&self) -> Result<Parsed, Self::Error> {
//!         Ok(Parsed(self.0.len()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type. When a source can decode into several
/// destinations, the destination is picked by the annotated result type:
///
/// ```ignore
/// let algorithm: AlgorithmIdentifier = element.decode()?;
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
pub trait DecodableFrom<T> {}
