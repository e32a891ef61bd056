//! String interpolation akin to Python's `str.format`, over JSON values.
//!
//! Supported on top of the usual `{}`, `{0}` and `{name}` fields:
//!
//! - negative indexes (`{-1}` is the last positional argument)
//! - attribute and item access (`{0.user.name}`, `{items[2]}`)
//! - conversions (`!s`, `!r`, `!a`) and format specifiers (`:>8.2f`)
//!
//! A brace that does not open or close a field is kept literally.

use crate::core::format_spec::FormatSpec;
use crate::utils::error::{PrintError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Arguments available to a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatArgs {
    #[serde(default)]
    pub positional: Vec<Value>,
    #[serde(default)]
    pub named: BTreeMap<String, Value>,
}

impl FormatArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Str,
    Repr,
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unused,
    Automatic(usize),
    Manual,
}

/// `str()` of a value: strings are unquoted, everything else is JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `repr()` of a value: strings are quoted and escaped, `null` and booleans
/// read `None`, `True` and `False`, containers recurse.
pub fn repr_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => repr_str(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(repr_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let items: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", repr_str(key), repr_value(value)))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
    }
}

/// Single quotes unless the text holds `'` and no `"`.
fn repr_str(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&escape_code(c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn escape_code(code: u32) -> String {
    match code {
        0..=0xff => format!("\\x{:02x}", code),
        0x100..=0xffff => format!("\\u{:04x}", code),
        _ => format!("\\U{:08x}", code),
    }
}

fn ascii_value(value: &Value) -> String {
    let mut out = String::new();
    for c in repr_value(value).chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&escape_code(c as u32));
        }
    }
    out
}

struct Interpolator<'a> {
    args: &'a FormatArgs,
    numbering: Numbering,
}

impl<'a> Interpolator<'a> {
    fn render_field(&mut self, field: &str) -> Result<String> {
        let (head, mut spec) = match field.split_once(':') {
            Some((head, spec)) => (head, Some(spec)),
            None => (field, None),
        };

        // 轉換符號可以寫在格式說明之前或之後
        let (name, conversion) = match head.split_once('!') {
            Some((name, conv)) => (name, Some(conv)),
            None => match spec.and_then(|s| s.split_once('!')) {
                Some((s, conv)) => {
                    spec = Some(s);
                    (head, Some(conv))
                }
                None => (head, None),
            },
        };

        let conversion = conversion
            .map(|c| match c {
                "s" | "str" => Ok(Conversion::Str),
                "r" | "repr" => Ok(Conversion::Repr),
                "a" | "ascii" => Ok(Conversion::Ascii),
                other => Err(PrintError::format(format!(
                    "Unknown conversion specifier: {:?}",
                    other
                ))),
            })
            .transpose()?;

        let value = self.resolve(name)?;
        let spec = spec.filter(|s| !s.is_empty());

        let text = match conversion {
            Some(Conversion::Str) => display_value(value),
            Some(Conversion::Repr) => repr_value(value),
            Some(Conversion::Ascii) => ascii_value(value),
            None => {
                if let (Value::Number(n), Some(spec)) = (value, spec) {
                    return Ok(FormatSpec::parse(spec, true)?.format_number(n));
                }
                display_value(value)
            }
        };

        match spec {
            Some(spec) => Ok(FormatSpec::parse(spec, false)?.format_text(&text)),
            None => Ok(text),
        }
    }

    fn resolve(&mut self, name: &str) -> Result<&'a Value> {
        let split = name
            .find(|c: char| matches!(c, '.' | '[' | '(' | ')' | ']'))
            .unwrap_or(name.len());
        let (arg_name, accessors) = name.split_at(split);

        let root = self.argument(arg_name)?;
        access(root, accessors)
    }

    fn argument(&mut self, arg_name: &str) -> Result<&'a Value> {
        if arg_name.is_empty() {
            let index = match self.numbering {
                Numbering::Manual => {
                    return Err(PrintError::format(
                        "cannot switch from manual field specification to automatic field numbering",
                    ))
                }
                Numbering::Unused => 0,
                Numbering::Automatic(last) => last + 1,
            };
            self.numbering = Numbering::Automatic(index);
            return self
                .args
                .positional
                .get(index)
                .ok_or_else(|| PrintError::format("Format index out of range"));
        }

        let digits = arg_name.strip_prefix('-').unwrap_or(arg_name);
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            if let Numbering::Automatic(_) = self.numbering {
                return Err(PrintError::format(
                    "cannot switch from automatic field numbering to manual field specification",
                ));
            }
            self.numbering = Numbering::Manual;

            let len = self.args.positional.len() as i64;
            let index = arg_name
                .parse::<i64>()
                .map(|n| if n < 0 { n + len } else { n })
                .map_err(|e| PrintError::format(format!("Invalid index {:?}: {}", arg_name, e)))?;

            let found = usize::try_from(index)
                .ok()
                .and_then(|i| self.args.positional.get(i))
                .or_else(|| self.args.named.get(arg_name));
            return found.ok_or_else(|| PrintError::format("Format index out of range"));
        }

        self.args
            .named
            .get(arg_name)
            .ok_or_else(|| PrintError::format(format!("Missing named argument {:?}", arg_name)))
    }
}

fn access<'v>(mut value: &'v Value, mut rest: &str) -> Result<&'v Value> {
    while let Some(c) = rest.chars().next() {
        match c {
            '.' => {
                let end = rest[1..]
                    .find(|c: char| matches!(c, '.' | '[' | ']' | '(' | ')'))
                    .map(|i| i + 1)
                    .unwrap_or(rest.len());
                let attr = &rest[1..end];
                if attr.is_empty() {
                    return Err(PrintError::format("Invalid attribute access in format string"));
                }
                value = value
                    .get(attr)
                    .ok_or_else(|| PrintError::format(format!("No attribute {:?}", attr)))?;
                rest = &rest[end..];
            }
            '[' => {
                let close = rest
                    .find(']')
                    .ok_or_else(|| PrintError::format("Invalid indexing in format string"))?;
                let key = &rest[1..close];
                if key.is_empty() {
                    return Err(PrintError::format("Empty indexing in format string"));
                }
                let item = match (value, key.parse::<usize>()) {
                    (Value::Array(items), Ok(index)) => items.get(index),
                    _ => value.get(key),
                };
                value = item.ok_or_else(|| PrintError::format(format!("No item {:?}", key)))?;
                rest = &rest[close + 1..];
            }
            '(' => {
                return Err(PrintError::format("Calls are not supported in format strings"));
            }
            _ => return Err(PrintError::format("Invalid operation in format string")),
        }
    }
    Ok(value)
}

/// Interpolate `template` with `args`.
pub fn interpolate(template: &str, args: &FormatArgs) -> Result<String> {
    let mut interpolator = Interpolator {
        args,
        numbering: Numbering::Unused,
    };
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('{') {
            // 欄位內不可再出現大括號，否則視為普通字元
            let inner = &tail[1..];
            match inner.find(|c: char| c == '{' || c == '}') {
                Some(end) if inner[end..].starts_with('}') => {
                    out.push_str(&interpolator.render_field(&inner[..end])?);
                    rest = &inner[end + 1..];
                    continue;
                }
                _ => {}
            }
        }

        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    out.push_str(rest);
    Ok(out)
}
