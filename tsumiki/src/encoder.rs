//! Encoder trait, the reverse direction of [`crate::decoder::Decoder`].
//!
//! A typed value `T` implements `Encoder<T, E>` to produce its lower-level
//! representation `E`, and `E` opts in with `EncodableTo<T>`.
//!
//! ```no_run
//! use tsumiki::encoder::{EncodableTo, Encoder};
//!
//! struct Parsed(u8);
//! struct Raw(Vec<u8>);
//!
//! impl EncodableTo<Parsed> for Raw {}
//!
//! impl Encoder<Parsed, Raw> for Parsed {
//!     type Error = std::convert::Infallible;
//!
//!     fn encode(&self) -> Result<Raw, Self::Error> {
//!         Ok(Raw(vec![self.0]))
//!     }
//! }
//! ```

/// Encoder trait for converting a value of type `T` into type `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` cannot be represented as `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be produced from type `T`.
pub trait EncodableTo<T> {}
