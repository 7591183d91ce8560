//! Parsers for production tracking exports.
//!
//! # Parsers
//!
//! - [`records_parser`]: Parse JSON rows of per-order stage timestamps
//!
//! # Example
//!
//! ```no_run
//! use shopfloor_rust::parsing::records_parser::parse_records_file;
//! use std::path::Path;
//!
//! let records = parse_records_file(Path::new("records.json"))
//!     .expect("Failed to parse records");
//! ```

pub mod records_parser;


pub use records_parser::{parse_records_file, parse_records_json_str};
