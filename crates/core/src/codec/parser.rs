//! Parser for the generator's `searchData` tables.
//!
//! ## Grammar
//!
//! ```text
//! <file>       := ["var" <ident> "="] <entries> [";"]
//! <entries>    := "[" <entry> ("," <entry>)* [","] "]"
//! <entry>      := "[" <string> "," "[" <string> ("," <occurrence>)* [","] "]" "]"
//! <occurrence> := "[" <string> "," <integer> "," <string> [","] "]"
//! <string>     := single- or double-quoted JavaScript string literal
//! ```
//!
//! Whitespace is allowed between all tokens.

use thiserror::Error;
use winnow::ascii::{digit1, multispace0, multispace1};
use winnow::combinator::{delimited, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_till, take_while};
use winnow::ModalResult;

use crate::model::{Occurrence, SymbolEntry};

/// Error produced when a search-data table is not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search data at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// Byte offset of the failure in the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column (in characters).
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn at(input: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(input.len());
        let consumed = input.get(..offset).unwrap_or(input);
        let line = consumed.matches('\n').count() + 1;
        let column = match consumed.rfind('\n') {
            Some(nl) => consumed[nl + 1..].chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        Self { offset, line, column, message: message.into() }
    }
}

/// Parse a complete `searchData` table into its entries, in file order.
///
/// # Examples
///
/// ```
/// use doxsearch_core::codec::parse_search_data;
///
/// let entries = parse_search_data(
///     "var searchData=[['io_5fref',['io_ref',['../io-mainloop_8c.html#aa2',1,'io-mainloop.c']]]];",
/// )
/// .unwrap();
/// assert_eq!(entries[0].name, "io_ref");
/// assert_eq!(entries[0].occurrences[0].scope, "io-mainloop.c");
/// ```
pub fn parse_search_data(input: &str) -> Result<Vec<SymbolEntry>, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::at(input, 0, "empty input"));
    }

    search_data.parse(input).map_err(|e| {
        let detail = e.inner().to_string();
        let message = if detail.is_empty() { "unexpected input".to_string() } else { detail };
        ParseError::at(input, e.offset(), message)
    })
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

fn search_data(input: &mut &str) -> ModalResult<Vec<SymbolEntry>> {
    ws(input)?;
    opt(preamble).parse_next(input)?;
    let entries = entry_list(input)?;
    (ws, opt(';'), ws).void().parse_next(input)?;
    Ok(entries)
}

/// `var searchData =`
fn preamble(input: &mut &str) -> ModalResult<()> {
    (
        "var",
        multispace1,
        take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '$'),
        ws,
        '=',
        ws,
    )
        .void()
        .parse_next(input)
}

fn entry_list(input: &mut &str) -> ModalResult<Vec<SymbolEntry>> {
    delimited(('[', ws), separated(0.., entry, (ws, ',', ws)), (ws, opt(','), ws, ']'))
        .parse_next(input)
}

fn entry(input: &mut &str) -> ModalResult<SymbolEntry> {
    ('[', ws).void().parse_next(input)?;
    let key = quoted_string(input)?;
    (ws, ',', ws, '[', ws).void().parse_next(input)?;
    let name = quoted_string(input)?;
    let occurrences: Vec<Occurrence> =
        repeat(0.., preceded((ws, ',', ws), occurrence)).parse_next(input)?;
    (ws, opt(','), ws, ']', ws, ']').void().parse_next(input)?;
    Ok(SymbolEntry { key, name, occurrences })
}

fn occurrence(input: &mut &str) -> ModalResult<Occurrence> {
    ('[', ws).void().parse_next(input)?;
    let href = quoted_string(input)?;
    (ws, ',', ws).void().parse_next(input)?;
    let flag = integer(input)?;
    (ws, ',', ws).void().parse_next(input)?;
    let label = quoted_string(input)?;
    (ws, opt(','), ws, ']').void().parse_next(input)?;
    Ok(Occurrence::from_label(&href, flag, &label))
}

fn integer(input: &mut &str) -> ModalResult<i64> {
    (opt('-'), digit1).take().try_map(|s: &str| s.parse::<i64>()).parse_next(input)
}

/// A single- or double-quoted JavaScript string literal, unescaped.
fn quoted_string(input: &mut &str) -> ModalResult<String> {
    let quote = quote_char(input)?;
    let mut out = String::new();

    loop {
        out.push_str(plain_run(input, quote)?);
        if next_char(input)? == quote {
            return Ok(out);
        }

        // Backslash escape.
        match next_char(input)? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            'x' => out.push(hex_char(input, 2)?),
            'u' => out.push(hex_char(input, 4)?),
            // Line continuation.
            '\n' => {}
            // `\'`, `\"`, `\\`, `\/` and any other escaped character map to itself.
            other => out.push(other),
        }
    }
}

fn quote_char(input: &mut &str) -> ModalResult<char> {
    one_of(['\'', '"']).parse_next(input)
}

fn next_char(input: &mut &str) -> ModalResult<char> {
    any.parse_next(input)
}

fn plain_run<'s>(input: &mut &'s str, quote: char) -> ModalResult<&'s str> {
    take_till(0.., move |c: char| c == quote || c == '\\').parse_next(input)
}

/// `digits` hex digits naming a Unicode scalar value (`\xHH`, `\uXXXX`).
fn hex_char(input: &mut &str, digits: usize) -> ModalResult<char> {
    let checkpoint = *input;
    let hex: &str = take_while(digits, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => Ok(c),
        None => {
            *input = checkpoint;
            Err(ErrMode::from_input(input))
        }
    }
}

fn ws<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    multispace0.parse_next(input)
}
