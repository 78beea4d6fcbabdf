//! Parsing of printf-style format strings.
//!
//! A format string is split into literal runs and directives. Each directive
//! is `%` followed by optional flags (`-` left-align, `0` zero-pad), an
//! optional width, an optional `.precision`, and a conversion character:
//!
//! | conversion | consumes | rendering |
//! |------------|----------|-----------|
//! | `d`        | number   | decimal integer |
//! | `x` / `X`  | number   | lower / upper hexadecimal |
//! | `f`        | number   | fixed-point float |
//! | `s`        | text     | string |
//! | `c`        | number   | single character |
//! | `p`        | number or text | natural rendering of either |
//! | `n`        | name     | the name's text |
//! | `%`        | nothing  | literal `%` |
//!
//! `\n` in the format string is a newline; any other `\<c>` escape is the
//! literal `<c>`. Parsing is separate from application: this module produces
//! a [`Segment`] list and knows nothing about runtime values.

use std::fmt;

/// Conversion kind of a single directive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// `%d` - decimal integer.
    Decimal,
    /// `%x` - lowercase hexadecimal integer.
    HexLower,
    /// `%X` - uppercase hexadecimal integer.
    HexUpper,
    /// `%f` - fixed-point float.
    Float,
    /// `%s` - string.
    Str,
    /// `%c` - single character from an integer code.
    Char,
    /// `%p` - number or text, rendered naturally.
    Any,
    /// `%n` - a name's text.
    Name,
}

/// A parsed directive: flags, width, precision and conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveSpec {
    /// `-` flag: pad on the right instead of the left.
    pub left_align: bool,
    /// `0` flag: pad numbers with zeros.
    pub zero_pad: bool,
    /// Minimum field width.
    pub width: Option<usize>,
    /// Precision (float decimals, string truncation).
    pub precision: Option<usize>,
    /// The conversion character.
    pub conversion: Conversion,
}

/// One piece of a parsed format string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A literal run of text (escapes already resolved).
    Literal(String),
    /// A directive that consumes one operand.
    Directive(DirectiveSpec),
}

/// Error from parsing a format string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatSpecError {
    /// The string ended inside a `%...` directive.
    UnterminatedDirective,
    /// A character that is neither a flag, a width/precision digit, nor a
    /// known conversion appeared inside a directive.
    UnknownConversion(char),
}

impl fmt::Display for FormatSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSpecError::UnterminatedDirective => write!(f, "unterminated format directive"),
            FormatSpecError::UnknownConversion(c) => {
                write!(f, "unknown conversion character `{c}`")
            }
        }
    }
}

impl std::error::Error for FormatSpecError {}

/// Parse a format string into literal and directive segments.
pub fn parse_format(fmt: &str) -> Result<Vec<Segment>, FormatSpecError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = fmt.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '%' => {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    literal.push('%');
                    continue;
                }
                let spec = parse_directive(&mut chars)?;
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Directive(spec));
            }
            '\\' => match chars.next() {
                Some('n') => literal.push('\n'),
                Some(other) => literal.push(other),
                None => literal.push('\\'),
            },
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Parse the remainder of a directive after the `%`.
fn parse_directive(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<DirectiveSpec, FormatSpecError> {
    let mut left_align = false;
    let mut zero_pad = false;
    let mut width: Option<usize> = None;
    let mut precision: Option<usize> = None;
    let mut in_precision = false;

    loop {
        let Some(c) = chars.next() else {
            return Err(FormatSpecError::UnterminatedDirective);
        };

        let conversion = match c {
            'd' => Conversion::Decimal,
            'x' => Conversion::HexLower,
            'X' => Conversion::HexUpper,
            'f' => Conversion::Float,
            's' => Conversion::Str,
            'c' => Conversion::Char,
            'p' => Conversion::Any,
            'n' => Conversion::Name,
            '-' => {
                left_align = true;
                continue;
            }
            '.' => {
                in_precision = true;
                precision = Some(0);
                continue;
            }
            '0' if width.is_none() && !in_precision => {
                zero_pad = true;
                continue;
            }
            d @ '0'..='9' => {
                let digit = (d as usize) - ('0' as usize);
                let field = if in_precision {
                    &mut precision
                } else {
                    &mut width
                };
                *field = Some(field.unwrap_or(0).saturating_mul(10).saturating_add(digit));
                continue;
            }
            other => return Err(FormatSpecError::UnknownConversion(other)),
        };

        return Ok(DirectiveSpec {
            left_align,
            zero_pad,
            width,
            precision,
            conversion,
        });
    }
}
