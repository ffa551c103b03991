//! Dataset module
//!
//! Reads the seed file and checks its shape.
//!
//! # Overview
//!
//! The seed file is a JSON object whose top-level keys are collection names.
//! Each collection maps document identifiers to document bodies:
//!
//! ```json
//! {
//!   "users": { "u1": { "name": "Ann" } },
//!   "posts": { "p1": { "title": "Hi" } }
//! }
//! ```
//!
//! Key order is preserved, so collections upload in the order they are written.

mod parser;

pub use parser::{load_dataset, load_dataset_from_str, load_dataset_from_value};
