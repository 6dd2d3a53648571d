use nom::error::{ContextError, ErrorKind, ParseError};
use std::collections::BTreeSet;
use std::fmt;

// -----------------------------------------------------------------------------------------------

/// Grammar failure carrying the input at the failure point and the tokens that would have
/// matched there.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxError<'a> {
    pub input: &'a str,
    pub expected: BTreeSet<&'static str>,
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        SyntaxError {
            input,
            expected: BTreeSet::new(),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(mut self, other: Self) -> Self {
        match self.input.len().cmp(&other.input.len()) {
            std::cmp::Ordering::Less => self,
            std::cmp::Ordering::Greater => other,
            std::cmp::Ordering::Equal => {
                self.expected.extend(other.expected);
                self
            }
        }
    }
}

impl<'a> ContextError<&'a str> for SyntaxError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        if other.input.len() == input.len() {
            other.expected.clear();
            other.expected.insert(ctx);
        }
        other
    }
}

pub type IResult<'a, T> = nom::IResult<&'a str, T, SyntaxError<'a>>;

// -----------------------------------------------------------------------------------------------

/// Owned form of a grammar failure, located by offset into the parsed text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub offset: usize,
    pub expected: BTreeSet<&'static str>,
    pub fatal: bool,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "error at offset {}", self.offset)?;
        if !self.expected.is_empty() {
            let expected = self
                .expected
                .iter()
                .map(|v| format!("\"{}\"", v))
                .collect::<Vec<String>>();
            write!(f, ": expected {}", expected.join(" or "))?;
        }
        Ok(())
    }
}

impl Failure {
    pub fn new(offset: usize, expected: &'static str, fatal: bool) -> Self {
        Failure {
            offset,
            expected: BTreeSet::from([expected]),
            fatal,
        }
    }

    /// Converts a nom error raised while parsing a suffix of `text`.
    pub fn from_nom(text: &str, err: nom::Err<SyntaxError<'_>>) -> Self {
        let (e, fatal) = match err {
            nom::Err::Error(e) => (e, false),
            nom::Err::Failure(e) => (e, true),
            nom::Err::Incomplete(_) => {
                return Failure {
                    offset: text.len(),
                    expected: BTreeSet::new(),
                    fatal: true,
                };
            }
        };

        Failure {
            offset: text.len() - e.input.len(),
            expected: e.expected,
            fatal,
        }
    }

    /// Merges the expected tokens of a failure at the same offset.
    pub fn merge(mut self, other: Failure) -> Self {
        match self.offset.cmp(&other.offset) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => {
                self.expected.extend(other.expected);
                self.fatal |= other.fatal;
                self
            }
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Success<T> {
    pub value: T,
    pub offset: usize,
}

pub type ParseResult<T> = Result<Success<T>, Failure>;

/// Runs `parser` on `text` starting at `offset`.
pub fn parse_at<'a, T, F>(mut parser: F, text: &'a str, offset: usize) -> ParseResult<T>
where
    F: FnMut(&'a str) -> IResult<'a, T>,
{
    match parser(&text[offset..]) {
        Ok((rest, value)) => Ok(Success {
            value,
            offset: text.len() - rest.len(),
        }),
        Err(e) => Err(Failure::from_nom(text, e)),
    }
}

// -----------------------------------------------------------------------------------------------


// -----------------------------------------------------------------------------------------------
