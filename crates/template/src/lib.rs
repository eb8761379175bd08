//! # Request templates
//!
//! Replays requests captured from the web client with some body fields
//! changed.
//!
//! ```text
//! HAR capture ──> har::api_from_har ──> ApiCalls (api file)
//!                                          │
//!                                          └─> ApiTemplates::load (bodies parsed once)
//!                                                 │
//!                  SubstitutionSet ──> substitute ─┴─> PreparedRequest
//! ```
//!
//! A parsed [`CallTemplate`] is never modified; every request gets its own
//! substituted copy, so one template can serve concurrent callers.

mod call;
mod error;
mod har;
mod node;
mod substitute;

pub use call::{
    ApiCalls, ApiTemplates, CallKind, CallTemplate, CapturedCall, PreparedRequest, DISLIKE_VOTE,
};
pub use error::{Result, TemplateError};
pub use har::api_from_har;
pub use node::DocumentNode;
pub use substitute::{substitute, substitutions, SubstitutionSet};
