use nom::bytes::complete::tag;
use nom::error::{context, ContextError, ErrorKind, ParseError};
use nom::{
    Compare, CompareResult, Err, FindSubstring, IResult, InputLength, Parser, Slice,
};
use std::ops::{RangeFrom, RangeTo};

// -----------------------------------------------------------------------------------------------

/// Fails when the value recognized by `parser` equals `except`, ignoring ASCII case.
pub fn take_except<F, T, Input, Error: ParseError<Input>>(
    mut parser: F,
    except: T,
) -> impl FnMut(Input) -> IResult<Input, Input, Error>
where
    F: Parser<Input, Input, Error>,
    Input: Clone + Compare<T> + InputLength,
    T: Clone + InputLength,
{
    move |input: Input| {
        let i = input.clone();
        let e = except.clone();
        match parser.parse(i) {
            Ok((rest, value)) => {
                let same_len = value.input_len() == e.input_len();
                match value.compare_no_case(e) {
                    CompareResult::Ok if same_len => Err(Err::Error(Error::from_error_kind(
                        input,
                        ErrorKind::TakeUntil,
                    ))),
                    _ => Ok((rest, value)),
                }
            }
            Err(e) => Err(e),
        }
    }
}

/// Truncates the value recognized by `parser` before the first occurrence of `except`.
pub fn take_until<F, T, Input, Error: ParseError<Input>>(
    mut parser: F,
    except: T,
) -> impl FnMut(Input) -> IResult<Input, Input, Error>
where
    F: Parser<Input, Input, Error>,
    Input: Clone + FindSubstring<T> + InputLength + Slice<RangeFrom<usize>> + Slice<RangeTo<usize>>,
    T: Clone,
{
    move |input: Input| {
        let i = input.clone();
        let e = except.clone();
        match parser.parse(i) {
            Ok((rest, value)) => match value.find_substring(e) {
                Some(index) => {
                    if index == 0 {
                        Err(Err::Error(Error::from_error_kind(
                            input,
                            ErrorKind::TakeUntil,
                        )))
                    } else {
                        Ok((input.slice(index..), input.slice(..index)))
                    }
                }
                None => Ok((rest, value)),
            },
            Err(e) => Err(e),
        }
    }
}

/// Recognizes `word` literally, reporting `word` as the expected token on failure.
pub fn token<'a, Error>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str, Error>
where
    Error: ParseError<&'a str> + ContextError<&'a str>,
{
    context(word, tag(word))
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nom::character::complete::alpha1;

    #[test]
    fn test_take_except() {
        let (rest, ret) = take_except::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("aaa").unwrap();
        assert_eq!("", rest);
        assert_eq!("aaa", ret);

        let (rest, ret) = take_except::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("bca").unwrap();
        assert_eq!("", rest);
        assert_eq!("bca", ret);

        let (rest, ret) = take_except::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("b").unwrap();
        assert_eq!("", rest);
        assert_eq!("b", ret);

        let err = take_except::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("1")
            .err()
            .unwrap();
        assert_eq!(Err::Error(("1", ErrorKind::Alpha)), err);

        let err = take_except::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("BC")
            .err()
            .unwrap();
        assert_eq!(Err::Error(("BC", ErrorKind::TakeUntil)), err);
    }

    #[test]
    fn test_take_until() {
        let (rest, ret) = take_until::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("aaa").unwrap();
        assert_eq!("", rest);
        assert_eq!("aaa", ret);

        let (rest, ret) = take_until::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("aabc").unwrap();
        assert_eq!("bc", rest);
        assert_eq!("aa", ret);

        let (rest, ret) = take_until::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("aa1").unwrap();
        assert_eq!("1", rest);
        assert_eq!("aa", ret);

        let err = take_until::<_, _, _, (_, ErrorKind)>(alpha1, "bc")("bc")
            .err()
            .unwrap();
        assert_eq!(Err::Error(("bc", ErrorKind::TakeUntil)), err);
    }

    #[test]
    fn test_token() {
        let (rest, ret) = token::<nom::error::VerboseError<&str>>("<!--")("<!-- a").unwrap();
        assert_eq!(" a", rest);
        assert_eq!("<!--", ret);

        let err = token::<nom::error::VerboseError<&str>>("<!--")("<?a").err().unwrap();
        match err {
            Err::Error(e) => assert!(e
                .errors
                .iter()
                .any(|(_, kind)| *kind == nom::error::VerboseErrorKind::Context("<!--"))),
            _ => unreachable!(),
        }
    }
}

// -----------------------------------------------------------------------------------------------
