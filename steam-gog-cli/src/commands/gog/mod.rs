pub(crate) mod fetch;
pub(crate) mod index;
pub(crate) mod matching;
pub(crate) mod report;
pub(crate) mod stats;
