//! Schema adaptation
//!
//! Turns raw service JSON from either API generation into normalized,
//! version-independent records.
//!
//! # Overview
//!
//! Adaptation runs in two stages:
//! 1. Completion on the raw object: keys one generation omits are derived
//!    from the keys it does send (`hasFile` from `episodeFile`, `protocol`
//!    from the download client). Existing keys are never overwritten.
//! 2. Conversion through serde into `Episode`, `Movie` or `QueueItem`.
//!    Unknown keys are dropped; a record missing a required field fails on
//!    its own.

mod adapter;
mod records;

pub use adapter::{adapt, adapt_all, guess_protocol, records_from_body, Normalize};
pub use records::{
    sxe, Episode, EpisodeRef, Movie, MovieRef, Protocol, Quality, QualityModel, QueueItem,
    QueueMedia, SeriesRef,
};

#[cfg(test)]
mod tests;
