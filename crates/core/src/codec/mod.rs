//! Codec for the generator's search-index table.
//!
//! - `keys`: search-key mangling (`io_new` <-> `io_5fnew`) and page-name decoding.
//! - `entities`: HTML character references used inside labels.
//! - `parser`: winnow parser for `var searchData = [...];`.
//! - `writer`: the inverse of the parser.

pub mod entities;
pub mod keys;
pub mod parser;
pub mod writer;

pub use entities::{decode_entities, encode_entities, NBSP};
pub use keys::{decode_page_name, demangle_key, mangle_key};
pub use parser::{parse_search_data, ParseError};
pub use writer::write_search_data;
