pub mod helper;
pub mod model;
pub mod xmlchar;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::satisfy;
use nom::combinator::{all_consuming, map, recognize};
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;

/// Name - (Char* ':' Char*)
///
/// [\[4\] NCName](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-NCName)
pub fn ncname(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c != ':' && xmlchar::is_name_start_char(c)),
        take_while(|c| c != ':' && xmlchar::is_name_char(c)),
    ))(input)
}

/// PrefixedName | UnprefixedName
///
/// [\[7\] QName](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-QName)
pub fn qname(input: &str) -> IResult<&str, model::QName<'_>> {
    alt((
        map(prefixed_name, model::QName::from),
        map(ncname, model::QName::from),
    ))(input)
}

/// Splits a complete qualified name, or returns `None` if `input` is not a QName.
pub fn split_qname(input: &str) -> Option<model::QName<'_>> {
    all_consuming(qname)(input).ok().map(|(_, name)| name)
}

/// Prefix ':' LocalPart
///
/// [\[8\] PrefixedName](https://www.w3.org/TR/2009/REC-xml-names-20091208/#NT-PrefixedName)
fn prefixed_name(input: &str) -> IResult<&str, model::PrefixedName> {
    map(
        tuple((ncname, preceded(tag(":"), ncname))),
        model::PrefixedName::from,
    )(input)
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ncname() {
        let (rest, ret) = ncname("abc:d").unwrap();
        assert_eq!(":d", rest);
        assert_eq!("abc", ret);

        let _err = ncname("1abc").err().unwrap();
        let _err = ncname(":abc").err().unwrap();
    }

    #[test]
    fn test_qname() {
        let (rest, ret) = qname("a:b").unwrap();
        assert_eq!("", rest);
        assert_eq!(
            model::QName::Prefixed(model::PrefixedName {
                prefix: "a",
                local_part: "b"
            }),
            ret
        );

        let (rest, ret) = qname("ab").unwrap();
        assert_eq!("", rest);
        assert_eq!(model::QName::Unprefixed("ab"), ret);
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(Some(model::QName::Unprefixed("a")), split_qname("a"));
        assert_eq!(None, split_qname("a:b:c"));
        assert_eq!(None, split_qname("a:"));
        assert_eq!(None, split_qname(":a"));
    }
}

// -----------------------------------------------------------------------------------------------
