//! Data model types and title normalization for the Steam → GOG catalog.
//!
//! This crate defines the persistent data model without any database
//! dependencies. Consumers can use these types directly for serialization,
//! display, or passing to `steam-gog-db` for persistence.

pub mod normalize;
pub mod types;

pub use normalize::{EDITION_SUFFIXES, normalize};
pub use types::*;
