//! Marginalia Domain Layer
//!
//! This crate contains the data model shared by the clippings pipeline and
//! its formatters. It performs no I/O and depends only on `chrono` for
//! calendar timestamps.
//!
//! ## Key Concepts
//!
//! - **Clipping**: one highlight, note or bookmark exported by a Kindle
//! - **Location range**: the device-internal `[start, end]` position of a clipping
//! - **Book key**: title plus optional author, the grouping key for clippings
//! - **Category**: a hierarchical label parsed from note markup such as `(P>Sub)`
//! - **Annotated highlight**: a deduplicated highlight with the notes matched to it
//!
//! ## Architecture
//!
//! - Pure value types only
//! - Records are created once by the parser and never mutated in place
//! - Every later stage derives new values from the previous stage's output

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotated;
pub mod book;
pub mod category;
pub mod record;

// Re-exports for convenience
pub use annotated::{AnnotatedHighlight, BookAnnotations, CategorizedNote};
pub use book::BookKey;
pub use category::Category;
pub use record::{AddedAt, ClippingKind, ClippingRecord, LocationRange};
