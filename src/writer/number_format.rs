//! Numeric format specifications for table cells
//!
//! Accepts the printf / format-spec vocabulary used to describe how numbers
//! are written: `%G`, `%.4E`, `:g`, `:.18g`, `{:.3f}`. The grammar is an
//! optional `{`, a `%` or `:` prefix, optional flags, an optional width, an
//! optional `.precision`, one of `e E f F g G` and an optional closing `}`.
//!
//! Flags follow the prefix's own convention. After `%` they are any of
//! `-` (left-align), `0` (zero-pad), `+` and space (sign of non-negative
//! values). After `:` they are an optional `<` or `>` alignment, an optional
//! `+`, `-` or space sign, then an optional `0`.

use crate::constants::{DEFAULT_NUMBER_FORMAT, DEFAULT_PRECISION};
use crate::{FmfError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatStyle {
    /// `e`: mantissa and signed two-digit exponent
    Exponent,
    /// `f`: fixed number of decimals
    Fixed,
    /// `g`: fixed or exponent, whichever is shorter, trailing zeros removed
    General,
}

/// What is written in front of non-negative values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SignFlag {
    #[default]
    Negative,
    Always,
    Space,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left_align: bool,
    zero_pad: bool,
    sign: SignFlag,
}

impl Flags {
    /// printf flags, any order
    fn parse_printf(body: &str) -> (Self, &str) {
        let mut flags = Self::default();
        let rest = body.trim_start_matches(|c: char| match c {
            '-' => {
                flags.left_align = true;
                true
            }
            '0' => {
                flags.zero_pad = true;
                true
            }
            '+' => {
                flags.sign = SignFlag::Always;
                true
            }
            ' ' => {
                if flags.sign == SignFlag::Negative {
                    flags.sign = SignFlag::Space;
                }
                true
            }
            _ => false,
        });
        (flags, rest)
    }

    /// format-spec flags: `[<>][+- ][0]`
    fn parse_format_spec(mut body: &str) -> (Self, &str) {
        let mut flags = Self::default();
        if let Some(rest) = body.strip_prefix('<') {
            flags.left_align = true;
            body = rest;
        } else if let Some(rest) = body.strip_prefix('>') {
            body = rest;
        }
        if let Some(rest) = body.strip_prefix('+') {
            flags.sign = SignFlag::Always;
            body = rest;
        } else if let Some(rest) = body.strip_prefix(' ') {
            flags.sign = SignFlag::Space;
            body = rest;
        } else if let Some(rest) = body.strip_prefix('-') {
            body = rest;
        }
        if let Some(rest) = body.strip_prefix('0') {
            flags.zero_pad = !flags.left_align;
            body = rest;
        }
        (flags, body)
    }
}

/// A parsed number format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumberFormat {
    spec: String,
    style: FloatStyle,
    uppercase: bool,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            spec: DEFAULT_NUMBER_FORMAT.to_string(),
            style: FloatStyle::General,
            uppercase: true,
            flags: Flags::default(),
            width: None,
            precision: None,
        }
    }
}

impl NumberFormat {
    /// Parse a format spec
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: &str| FmfError::invalid_number_format(spec, reason);

        let mut body = spec.trim();
        if let Some(inner) = body.strip_prefix('{') {
            body = inner
                .strip_suffix('}')
                .ok_or_else(|| invalid("unbalanced braces"))?;
        }
        let (flags, body) = if let Some(rest) = body.strip_prefix('%') {
            Flags::parse_printf(rest)
        } else if let Some(rest) = body.strip_prefix(':') {
            Flags::parse_format_spec(rest)
        } else {
            return Err(invalid("expected a '%' or ':' prefix"));
        };

        let type_char = body
            .chars()
            .last()
            .ok_or_else(|| invalid("missing conversion type"))?;
        let (style, uppercase) = match type_char {
            'e' => (FloatStyle::Exponent, false),
            'E' => (FloatStyle::Exponent, true),
            'f' => (FloatStyle::Fixed, false),
            'F' => (FloatStyle::Fixed, true),
            'g' => (FloatStyle::General, false),
            'G' => (FloatStyle::General, true),
            _ => return Err(invalid("conversion type must be one of e, E, f, F, g, G")),
        };

        let sizing = &body[..body.len() - type_char.len_utf8()];
        let (width_text, precision_text) = match sizing.split_once('.') {
            Some((width, precision)) => (width, Some(precision)),
            None => (sizing, None),
        };

        let width = if width_text.is_empty() {
            None
        } else {
            Some(
                width_text
                    .parse::<usize>()
                    .map_err(|_| invalid("width must be a number"))?,
            )
        };
        let precision = match precision_text {
            Some(text) => Some(
                text.parse::<usize>()
                    .map_err(|_| invalid("precision must be a number"))?,
            ),
            None => None,
        };

        Ok(Self {
            spec: spec.to_string(),
            style,
            uppercase,
            flags,
            width,
            precision,
        })
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn style(&self) -> FloatStyle {
        self.style
    }

    /// Render a value
    pub fn format(&self, value: f64) -> String {
        let text = if value.is_nan() {
            "nan".to_string()
        } else if value.is_infinite() {
            let text = if value > 0.0 { "inf" } else { "-inf" };
            text.to_string()
        } else {
            let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
            match self.style {
                FloatStyle::Fixed => format!("{:.*}", precision, value),
                FloatStyle::Exponent => format_exponent(value, precision),
                FloatStyle::General => format_general(value, precision),
            }
        };

        let mut text = if self.uppercase {
            text.to_uppercase()
        } else {
            text
        };
        if !text.starts_with('-') {
            match self.flags.sign {
                SignFlag::Always => text.insert(0, '+'),
                SignFlag::Space => text.insert(0, ' '),
                SignFlag::Negative => {}
            }
        }

        let Some(width) = self.width else {
            return text;
        };
        if self.flags.left_align {
            format!("{:<width$}", text, width = width)
        } else if self.flags.zero_pad && value.is_finite() {
            // Zeros go between the sign and the digits
            let sign_len = if text.starts_with(['-', '+', ' ']) { 1 } else { 0 };
            let (sign, digits) = text.split_at(sign_len);
            let digits_width = width.saturating_sub(sign_len);
            format!("{}{:0>width$}", sign, digits, width = digits_width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }
}

/// Split Rust's `{:e}` output into mantissa and exponent
fn scientific_parts(value: f64, decimals: usize) -> (String, i32) {
    let rendered = format!("{:.*e}", decimals, value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (rendered, 0),
    }
}

fn join_exponent(mantissa: &str, exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

fn format_exponent(value: f64, precision: usize) -> String {
    let (mantissa, exponent) = scientific_parts(value, precision);
    join_exponent(&mantissa, exponent)
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn format_general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    let (mantissa, exponent) = scientific_parts(value, precision - 1);

    if exponent >= -4 && (exponent as i64) < precision as i64 {
        let decimals = (precision as i64 - 1 - exponent as i64).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        strip_trailing_zeros(&fixed).to_string()
    } else {
        join_exponent(strip_trailing_zeros(&mantissa), exponent)
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

impl std::str::FromStr for NumberFormat {
    type Err = FmfError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NumberFormat {
    type Error = FmfError;

    fn try_from(spec: String) -> Result<Self> {
        Self::parse(&spec)
    }
}

impl From<NumberFormat> for String {
    fn from(format: NumberFormat) -> Self {
        format.spec
    }
}
