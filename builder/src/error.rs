use std::collections::BTreeSet;
use thiserror::Error;
use xml_parser::error::Failure;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("syntax error at offset {offset}: expected {}", expected_tokens(.expected))]
    Syntax {
        offset: usize,
        expected: BTreeSet<&'static str>,
        fatal: bool,
    },
    #[error("well-formedness error at offset {offset}: {message}")]
    WellFormedness { offset: usize, message: String },
    #[error("namespace error at offset {offset}: {message}")]
    Namespace { offset: usize, message: String },
    #[error("expansion of entity `{entity}` produced {expanded} characters from {initial} characters of input")]
    EntityExpansion {
        entity: String,
        expanded: usize,
        initial: usize,
    },
    #[error(transparent)]
    Dom(#[from] xml_dom::error::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    WellFormedness,
    ResourceLimit,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::WellFormedness { .. } | Error::Namespace { .. } | Error::Dom(_) => {
                ErrorKind::WellFormedness
            }
            Error::EntityExpansion { .. } => ErrorKind::ResourceLimit,
        }
    }

    pub(crate) fn well_formedness(offset: usize, message: impl Into<String>) -> Self {
        Error::WellFormedness {
            offset,
            message: message.into(),
        }
    }
}

impl From<Failure> for Error {
    fn from(value: Failure) -> Self {
        Error::Syntax {
            offset: value.offset,
            expected: value.expected,
            fatal: value.fatal,
        }
    }
}

fn expected_tokens(expected: &BTreeSet<&'static str>) -> String {
    if expected.is_empty() {
        return "valid markup".to_string();
    }

    expected
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<String>>()
        .join(" or ")
}

pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let err = Error::from(Failure::new(3, "<", true));
        assert_eq!(ErrorKind::Syntax, err.kind());
        assert_eq!(
            "syntax error at offset 3: expected \"<\"",
            err.to_string()
        );

        let err = Error::well_formedness(1, "two root elements");
        assert_eq!(ErrorKind::WellFormedness, err.kind());
        assert_eq!(
            "well-formedness error at offset 1: two root elements",
            err.to_string()
        );

        let err = Error::Namespace {
            offset: 0,
            message: "undeclared prefix `p`".to_string(),
        };
        assert_eq!(ErrorKind::WellFormedness, err.kind());

        let err = Error::EntityExpansion {
            entity: "a".to_string(),
            expanded: 10,
            initial: 2,
        };
        assert_eq!(ErrorKind::ResourceLimit, err.kind());
        assert_eq!(
            "expansion of entity `a` produced 10 characters from 2 characters of input",
            err.to_string()
        );
    }
}

// -----------------------------------------------------------------------------------------------
