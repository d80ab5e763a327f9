//! PKIX (Public Key Infrastructure using X.509) Common Types
//!
//! Type definitions shared by structures built on X.509 and CMS:
//! - RFC 5280: `AlgorithmIdentifier`
//! - RFC 5652: `Attribute` and `Attributes`

pub mod algorithm;
pub mod attribute;
pub mod error;
pub mod oid_name;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters};
pub use attribute::{Attribute, Attributes};
pub use error::{Error, Result};
pub use oid_name::OidName;
