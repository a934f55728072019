//! Line classification shared by the `.tim` and `.sto` readers.
//!
//! Both formats are whitespace tokenised. A line whose first character is not blank opens a
//! section, every other non-empty line belongs to the body of the current section, and lines
//! starting with `*` are comments.

use std::str::FromStr;

use crate::{E, error::SmpsError};

/// A meaningful line of an SMPS file, split into whitespace separated tokens.
#[derive(Debug, PartialEq)]
pub(crate) enum Line<'a> {
    /// Section header; the first token is the section keyword.
    Header(Vec<&'a str>),
    /// Body line of the current section.
    Data(Vec<&'a str>),
}

/// Classifies a raw line, returning `None` for comments and blank lines.
pub(crate) fn classify(raw: &str) -> Option<Line<'_>> {
    if raw.starts_with('*') || raw.trim().is_empty() {
        return None;
    }

    let tokens = raw.split_whitespace().collect();
    if raw.starts_with(|c: char| c.is_whitespace()) {
        Some(Line::Data(tokens))
    } else {
        Some(Line::Header(tokens))
    }
}

/// Iterates over the meaningful lines of `program` together with their 1-based line numbers.
pub(crate) fn lines(program: &str) -> impl Iterator<Item = (usize, Line<'_>)> {
    program
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| classify(raw).map(|line| (i + 1, line)))
}

/// Parses a numeric token, reporting the line it came from on failure.
pub(crate) fn parse_number(token: &str, line: usize) -> Result<E, SmpsError> {
    E::from_str(token).map_err(|_| SmpsError::SyntaxError {
        line,
        message: format!("expected a number, found `{token}`"),
    })
}

/// Checks that a data line carries between `min` and `max` tokens.
pub(crate) fn expect_tokens(
    tokens: &[&str],
    min: usize,
    max: usize,
    line: usize,
) -> Result<(), SmpsError> {
    if tokens.len() < min || tokens.len() > max {
        let expected = if min == max {
            format!("{min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(SmpsError::SyntaxError {
            line,
            message: format!("expected {expected} fields, found {}", tokens.len()),
        });
    }
    Ok(())
}
