//! # Bio word correlations
//!
//! Measures how strongly each bio word is associated with a boolean
//! covariate of the profile (gender, age bracket, country, ...).
//!
//! ## Architecture
//!
//! ```text
//! corpus (Iterator<Item = Result<Profile, E>>)
//!     │
//!     ├──> Tokenizer
//!     │      └─ bio -> WordMultiset (lowercase, trimmed to letters)
//!     │
//!     ├──> ContingencyCounts (one pass, O(distinct words))
//!     │      ├─ n, k           records / covariate hits
//!     │      └─ occur, cooccur per word, presence counted once per record
//!     │
//!     └──> finish()
//!            └─ phi coefficient per word, NaN when undefined
//! ```
//!
//! Counts from disjoint shards merge by addition, so [`correlate_sharded`]
//! produces the same table as a sequential [`correlate`].

mod aggregate;
mod counts;
mod rank;
mod tokenizer;

pub use aggregate::{correlate, correlate_sharded, Profile};
pub use counts::{is_degenerate, phi, ContingencyCounts, CorrelationTable, DEGENERATE};
pub use rank::{bottom_correlations, top_correlations, DEFAULT_REPORT_LIMIT};
pub use tokenizer::{tokenize, words_in_bio, WordMultiset};
