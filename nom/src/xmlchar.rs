use nom::error::{ErrorKind, ParseError};
use nom::{AsChar, IResult, InputTakeAtPosition};

// -----------------------------------------------------------------------------------------------

/// #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
///
/// [\[2\] Char](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Char)
pub fn is_char(c: char) -> bool {
    in_ranges(
        c,
        &[
            ('\u{9}', '\u{A}'),
            ('\u{D}', '\u{D}'),
            ('\u{20}', '\u{D7FF}'),
            ('\u{E000}', '\u{FFFD}'),
            ('\u{10000}', '\u{10FFFF}'),
        ],
    )
}

/// (#x20 | #x9 | #xD | #xA)+
///
/// [\[3\] S](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-S)
pub fn is_whitespace(c: char) -> bool {
    matches!(c, '\u{20}' | '\u{9}' | '\u{D}' | '\u{A}')
}

/// [\[4\] NameStartChar](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NameStartChar)
pub fn is_name_start_char(c: char) -> bool {
    c == ':'
        || c == '_'
        || c.is_ascii_alphabetic()
        || in_ranges(
            c,
            &[
                ('\u{C0}', '\u{D6}'),
                ('\u{D8}', '\u{F6}'),
                ('\u{F8}', '\u{2FF}'),
                ('\u{370}', '\u{37D}'),
                ('\u{37F}', '\u{1FFF}'),
                ('\u{200C}', '\u{200D}'),
                ('\u{2070}', '\u{218F}'),
                ('\u{2C00}', '\u{2FEF}'),
                ('\u{3001}', '\u{D7FF}'),
                ('\u{F900}', '\u{FDCF}'),
                ('\u{FDF0}', '\u{FFFD}'),
                ('\u{10000}', '\u{EFFFF}'),
            ],
        )
}

/// NameStartChar | "-" | "." | \[0-9] | #xB7 | \[#x0300-#x036F] | \[#x203F-#x2040]
///
/// [\[4a\] NameChar](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NameChar)
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || c == '-'
        || c == '.'
        || c.is_ascii_digit()
        || c == '\u{B7}'
        || in_ranges(c, &[('\u{300}', '\u{36F}'), ('\u{203F}', '\u{2040}')])
}

/// #x20 | #xD | #xA | \[a-zA-Z0-9] | \[-'()+,./:=?;!*#@$_%]
///
/// [\[13\] PubidChar](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PubidChar)
pub fn is_pubid_char(c: char) -> bool {
    matches!(c, '\u{20}' | '\u{D}' | '\u{A}')
        || c.is_ascii_alphanumeric()
        || "-'()+,./:=?;!*#@$_%".contains(c)
}

/// Returns whether `c` falls within any of the inclusive `ranges`.
pub fn in_ranges(c: char, ranges: &[(char, char)]) -> bool {
    ranges.iter().any(|&(first, last)| first <= c && c <= last)
}

// -----------------------------------------------------------------------------------------------

/// Recognizes zero or more XML characters except `except`.
pub fn char_except0<T, E: ParseError<T>>(except: &'static str) -> impl Fn(T) -> IResult<T, T, E>
where
    T: InputTakeAtPosition,
    <T as InputTakeAtPosition>::Item: AsChar,
{
    move |input: T| {
        input.split_at_position_complete(|i| {
            let c = i.as_char();
            !is_char(c) || except.contains(c)
        })
    }
}

/// Recognizes one or more XML characters except `except`.
pub fn char_except1<T, E: ParseError<T>>(except: &'static str) -> impl Fn(T) -> IResult<T, T, E>
where
    T: InputTakeAtPosition,
    <T as InputTakeAtPosition>::Item: AsChar,
{
    move |input: T| {
        input.split_at_position1_complete(
            |i| {
                let c = i.as_char();
                !is_char(c) || except.contains(c)
            },
            ErrorKind::Char,
        )
    }
}

/// Recognizes zero or more public identifier characters except `except`.
pub fn pubid_char_except0<T, E: ParseError<T>>(
    except: &'static str,
) -> impl Fn(T) -> IResult<T, T, E>
where
    T: InputTakeAtPosition,
    <T as InputTakeAtPosition>::Item: AsChar,
{
    move |input: T| {
        input.split_at_position_complete(|i| {
            let c = i.as_char();
            !is_pubid_char(c) || except.contains(c)
        })
    }
}

/// Recognizes zero or more encoding name characters.
///
/// (\[A-Za-z0-9._] | '-')*
pub fn enc_name0<T, E: ParseError<T>>(input: T) -> IResult<T, T, E>
where
    T: InputTakeAtPosition,
    <T as InputTakeAtPosition>::Item: AsChar,
{
    input.split_at_position_complete(|i| {
        let c = i.as_char();
        !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
    })
}

// -----------------------------------------------------------------------------------------------


// -----------------------------------------------------------------------------------------------
