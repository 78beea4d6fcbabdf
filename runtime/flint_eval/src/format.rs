//! Application of printf-style format directives to stack operands.
//!
//! Directive *parsing* lives in `flint_ir::format_spec`; this module
//! consumes one stack operand per directive and renders it. Width,
//! left-alignment and zero-padding are applied here; float precision
//! defaults to six decimals as C's `%f` does.

use flint_ir::format_spec::{parse_format, Conversion, DirectiveSpec, Segment};
use flint_ir::SourcePos;

use crate::errors::{format_error, print_error, EvalError, EvalResult};
use crate::runtime::ExecContext;
use crate::value::Value;

/// Render a whole format string, popping one operand per directive.
pub fn render_format(
    cx: &mut ExecContext,
    format: &str,
    pos: Option<&SourcePos>,
) -> EvalResult<String> {
    let segments =
        parse_format(format).map_err(|e| format_error(e.to_string()).at(pos))?;

    let mut out = String::with_capacity(format.len());
    for segment in &segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Directive(spec) => {
                let operand = cx.stack.pop(pos)?;
                let rendered = render_directive(cx, spec, &operand, pos)?;
                out.push_str(&rendered);
                cx.cache.reclaim(operand);
            }
        }
    }
    Ok(out)
}

/// Render one directive against one operand.
fn render_directive(
    cx: &mut ExecContext,
    spec: &DirectiveSpec,
    operand: &Value,
    pos: Option<&SourcePos>,
) -> EvalResult<String> {
    let core = match spec.conversion {
        Conversion::Decimal => {
            let n = cx.number_of(operand, pos)?.as_int()?;
            format!("{n}")
        }
        Conversion::HexLower => {
            let n = cx.number_of(operand, pos)?.as_int()?;
            format!("{n:x}")
        }
        Conversion::HexUpper => {
            let n = cx.number_of(operand, pos)?.as_int()?;
            format!("{n:X}")
        }
        Conversion::Float => {
            let f = cx.number_of(operand, pos)?.as_float()?;
            let precision = spec.precision.unwrap_or(6);
            format!("{f:.precision$}")
        }
        Conversion::Str => {
            let text = cx.text_of(operand, pos)?;
            match spec.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text.as_str().to_owned(),
            }
        }
        Conversion::Char => {
            let n = cx.number_of(operand, pos)?.as_int()?;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let c = (n as u8) as char;
            c.to_string()
        }
        Conversion::Any => {
            let value = cx.resolved(operand, pos)?;
            match &value {
                Value::Int(n) => format!("{n}"),
                Value::Float(f) => format!("{f:.3}"),
                Value::Text(t) => t.as_str().to_owned(),
                _ => return Err(print_error().at(pos)),
            }
        }
        Conversion::Name => match operand {
            Value::Name(name) => name.as_str().to_owned(),
            _ => return Err(EvalError::custom("unknown %n type").at(pos)),
        },
    };

    Ok(pad(&core, spec))
}

/// Apply width, alignment and zero padding.
fn pad(core: &str, spec: &DirectiveSpec) -> String {
    let Some(width) = spec.width else {
        return core.to_owned();
    };
    let len = core.chars().count();
    if len >= width {
        return core.to_owned();
    }
    let fill = width - len;

    if spec.left_align {
        let mut out = core.to_owned();
        out.push_str(&" ".repeat(fill));
        out
    } else if spec.zero_pad {
        // Zero padding goes between the sign and the digits.
        let (sign, digits) = match core.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", core),
        };
        let mut out = String::with_capacity(width);
        out.push_str(sign);
        out.push_str(&"0".repeat(fill));
        out.push_str(digits);
        out
    } else {
        let mut out = String::with_capacity(width);
        out.push_str(&" ".repeat(fill));
        out.push_str(core);
        out
    }
}
