//! Configuration tree model.
//!
//! A [`ConfigSnapshot`] holds the PKI resource collections of one full
//! configuration view. Each collection is a typed record ([`TrustStore`],
//! [`SecurityProfile`]) with an explicit identity and optional attributes, so
//! the diff engine works over a checked shape.

mod types;

pub use types::*;
