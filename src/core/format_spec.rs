//! Format specifiers of the interpolation mini-language:
//! `[[fill]align][sign][#][0][width][,][.precision][type]`.

use crate::utils::error::{PrintError, Result};
use regex::Regex;
use serde_json::Number;
use std::sync::OnceLock;

const SPEC_PATTERN: &str = r"(?s)\A(?:(?P<fill>.)?(?P<align>[<>=^]))?(?P<sign>[-+ ])?(?P<alt>\#)?(?P<zeropad>0)?(?P<width>[1-9]\d*)?(?P<sep>,)?(?:\.(?P<precision>0|[1-9]\d*))?(?P<type>[eEfFgGn%])?\z";

/// Largest accepted width or precision.
pub const MAX_DIGITS: usize = 1_000_000;

fn spec_regex() -> Result<&'static Regex> {
    static RE: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = RE.get() {
        return Ok(re);
    }
    let re = Regex::new(SPEC_PATTERN)?;
    Ok(RE.get_or_init(|| re))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits.
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Minus,
    Plus,
    Space,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormatSpec {
    pub fill: char,
    pub align: Align,
    pub sign: Sign,
    pub alternate: bool,
    pub zero_pad: bool,
    pub width: usize,
    pub thousands: bool,
    pub precision: Option<usize>,
    pub kind: Option<char>,
}

fn invalid(message: String) -> PrintError {
    PrintError::format(message)
}

impl FormatSpec {
    /// Parse `spec` for a numeric (`numeric == true`) or a string operand.
    pub fn parse(spec: &str, numeric: bool) -> Result<Self> {
        let caps = spec_regex()?
            .captures(spec)
            .ok_or_else(|| invalid(format!("Invalid format specifier: {:?}", spec)))?;

        let explicit_fill = caps.name("fill").and_then(|m| m.as_str().chars().next());
        let align = match caps.name("align").map(|m| m.as_str()) {
            Some("<") => Align::Left,
            Some(">") => Align::Right,
            Some("^") => Align::Center,
            Some("=") => Align::AfterSign,
            _ if numeric => Align::Right,
            _ => Align::Left,
        };

        let zero_pad = caps.name("zeropad").is_some();
        let (fill, align) = if zero_pad {
            if explicit_fill.is_some_and(|c| c != '0') {
                return Err(invalid(format!(
                    "Fill character conflicts with format specifier: {:?}",
                    spec
                )));
            }
            if align != Align::Right && align != Align::AfterSign {
                return Err(invalid(format!(
                    "Alignment conflicts with format specifier: {:?}",
                    spec
                )));
            }
            ('0', Align::AfterSign)
        } else {
            (explicit_fill.unwrap_or(' '), align)
        };

        if !numeric {
            if align == Align::AfterSign {
                return Err(invalid("'=' not allowed in string format specifier".to_string()));
            }
            if caps.name("sign").is_some() {
                return Err(invalid("Sign not allowed in string format specifier".to_string()));
            }
            if caps.name("alt").is_some() {
                return Err(invalid(
                    "Alternate form (#) not allowed in string format specifier".to_string(),
                ));
            }
            if caps.name("sep").is_some() {
                return Err(invalid("Cannot specify ',' for a string".to_string()));
            }
            if let Some(kind) = caps.name("type") {
                return Err(invalid(format!(
                    "Unknown format code {:?} for a string",
                    kind.as_str()
                )));
            }
        }

        let sign = match caps.name("sign").map(|m| m.as_str()) {
            Some("+") => Sign::Plus,
            Some(" ") => Sign::Space,
            _ => Sign::Minus,
        };

        let number = |name: &str| -> Result<Option<usize>> {
            caps.name(name)
                .map(|m| {
                    let value = m
                        .as_str()
                        .parse::<usize>()
                        .map_err(|_| {
                            invalid(format!("Too many decimal digits in format string: {:?}", spec))
                        })?;
                    if value > MAX_DIGITS {
                        return Err(invalid(format!(
                            "{} {} exceeds {} in {:?}",
                            name, value, MAX_DIGITS, spec
                        )));
                    }
                    Ok(value)
                })
                .transpose()
        };

        Ok(Self {
            fill,
            align,
            sign,
            alternate: caps.name("alt").is_some(),
            zero_pad,
            width: number("width")?.unwrap_or(0),
            thousands: caps.name("sep").is_some(),
            precision: number("precision")?,
            kind: caps.name("type").and_then(|m| m.as_str().chars().next()),
        })
    }

    pub fn format_text(&self, text: &str) -> String {
        let body: String = match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text.to_string(),
        };
        self.pad("", &body)
    }

    pub fn format_number(&self, number: &Number) -> String {
        let (negative, digits) = match (self.kind, number.as_i64(), number.as_u64()) {
            (None, Some(i), _) => (i < 0, i.unsigned_abs().to_string()),
            (None, None, Some(u)) => (false, u.to_string()),
            _ => {
                let value = number.as_f64().unwrap_or(f64::NAN);
                (value.is_sign_negative() && value != 0.0, self.float_digits(value.abs()))
            }
        };

        let digits = if self.thousands {
            group_thousands(&digits)
        } else {
            digits
        };

        let sign = match (negative, self.sign) {
            (true, _) => "-",
            (false, Sign::Plus) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Minus) => "",
        };

        self.pad(sign, &digits)
    }

    fn float_digits(&self, value: f64) -> String {
        if !value.is_finite() {
            let text = if value.is_nan() { "nan" } else { "inf" };
            return match self.kind {
                Some('E') | Some('F') | Some('G') => text.to_uppercase(),
                _ => text.to_string(),
            };
        }

        match self.kind {
            Some('f') | Some('F') => {
                let p = self.precision.unwrap_or(6);
                let mut out = format!("{:.*}", p, value);
                if self.alternate && p == 0 {
                    out.push('.');
                }
                out
            }
            Some('e') => scientific(value, self.precision.unwrap_or(6)),
            Some('E') => scientific(value, self.precision.unwrap_or(6)).to_uppercase(),
            Some('%') => format!("{:.*}%", self.precision.unwrap_or(6), value * 100.0),
            Some('G') => general(value, self.precision, self.alternate).to_uppercase(),
            Some('g') | Some('n') => general(value, self.precision, self.alternate),
            _ => match self.precision {
                Some(_) => general(value, self.precision, self.alternate),
                None => shortest(value),
            },
        }
    }

    fn pad(&self, sign: &str, body: &str) -> String {
        let len = sign.chars().count() + body.chars().count();
        if len >= self.width {
            return format!("{}{}", sign, body);
        }
        let missing = self.width - len;
        let fill = |n: usize| self.fill.to_string().repeat(n);

        match self.align {
            Align::Left => format!("{}{}{}", sign, body, fill(missing)),
            Align::Right => format!("{}{}{}", fill(missing), sign, body),
            Align::Center => {
                let left = missing / 2;
                format!("{}{}{}{}", fill(left), sign, body, fill(missing - left))
            }
            Align::AfterSign => format!("{}{}{}", sign, fill(missing), body),
        }
    }
}

/// Shortest round-trip form, always showing a fractional part.
fn shortest(value: f64) -> String {
    let out = value.to_string();
    if out.contains('.') || out.contains('e') || out.contains("inf") || out.contains("NaN") {
        out
    } else {
        format!("{}.0", out)
    }
}

/// `1.500000e+03` style, with a signed exponent of at least two digits.
fn scientific(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw,
    }
}

fn general(value: f64, precision: Option<usize>, alternate: bool) -> String {
    let p = precision.unwrap_or(6).max(1);

    let exp = if value == 0.0 {
        0
    } else {
        format!("{:.*e}", p - 1, value)
            .split_once('e')
            .and_then(|(_, e)| e.parse::<i64>().ok())
            .unwrap_or(0)
    };

    let out = if exp >= -4 && exp < p as i64 {
        let decimals = (p as i64 - 1 - exp).max(0) as usize;
        format!("{:.*}", decimals, value)
    } else {
        scientific(value, p - 1)
    };

    if alternate {
        return out;
    }

    match out.split_once('e') {
        Some((mantissa, exponent)) => format!("{}e{}", strip_zeros(mantissa), exponent),
        None => strip_zeros(&out),
    }
}

fn strip_zeros(number: &str) -> String {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        number.to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let (int_part, rest) = match digits.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => digits.split_at(idx),
        None => (digits, ""),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push_str(rest);
    grouped
}
