//! Title index and the conservative three-tier matcher.
//!
//! Pure and I/O free: the index is built once per run from GOG products and
//! then queried read-only for every Steam title.

pub mod index;
pub mod matcher;

pub use index::{Lookup, TitleIndex};
pub use matcher::{DEFAULT_MIN_LIKE_LENGTH, MatchConfig, MatchOutcome, match_title};
