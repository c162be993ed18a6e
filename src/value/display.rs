//! Human-readable rendering of values
//!
//! Composites already on the current path print as `[Circular]`; a shared
//! composite printed earlier elsewhere prints as `[Shared]`. Each instance is
//! expanded at most once, so rendering is linear in the size of the graph.

use std::collections::HashSet;
use std::fmt::{self, Write};

use super::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Walk::default())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Render a double the way the host language prints numbers
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 && n.is_sign_negative() {
        "-0".to_string()
    } else {
        n.to_string()
    }
}

/// Composites on the current path and every composite expanded so far
#[derive(Default)]
struct Walk {
    path: Vec<usize>,
    seen: HashSet<usize>,
}

fn write_value<W: Write>(out: &mut W, value: &Value, walk: &mut Walk) -> fmt::Result {
    if let Some(id) = value.node_id() {
        if walk.path.contains(&id) {
            return out.write_str("[Circular]");
        }
        if !walk.seen.insert(id) {
            return out.write_str("[Shared]");
        }
        walk.path.push(id);
        let result = write_composite(out, value, walk);
        walk.path.pop();
        return result;
    }

    match value {
        Value::Undefined => out.write_str("undefined"),
        Value::Null => out.write_str("null"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Number(n) => out.write_str(&format_number(*n)),
        Value::BigInt(b) => write!(out, "{}n", b),
        Value::String(s) => write!(out, "{:?}", s),
        Value::Date(d) => write!(out, "Date({})", d.millis()),
        Value::Pattern(p) => write!(out, "{}", p),
        Value::Foreign(foreign) => write!(out, "{}", foreign),
        Value::Array(_) | Value::Map(_) | Value::Set(_) | Value::Record(_) => Ok(()),
    }
}

fn write_composite<W: Write>(out: &mut W, value: &Value, walk: &mut Walk) -> fmt::Result {
    match value {
        Value::Array(array) => {
            let data = array.borrow();
            out.write_char('[')?;
            let mut first = true;
            for item in &data.items {
                separator(out, &mut first, "")?;
                write_value(out, item, walk)?;
            }
            for (name, item) in &data.properties {
                separator(out, &mut first, "")?;
                write!(out, "{}: ", name)?;
                write_value(out, item, walk)?;
            }
            out.write_char(']')
        }
        Value::Map(map) => {
            let entries = map.borrow();
            write!(out, "Map({}) {{", entries.len())?;
            let mut first = true;
            for (key, item) in entries.iter() {
                separator(out, &mut first, " ")?;
                write_value(out, key, walk)?;
                out.write_str(" => ")?;
                write_value(out, item, walk)?;
            }
            close_brace(out, first)
        }
        Value::Set(set) => {
            let values = set.borrow();
            write!(out, "Set({}) {{", values.len())?;
            let mut first = true;
            for item in values.iter() {
                separator(out, &mut first, " ")?;
                write_value(out, item, walk)?;
            }
            close_brace(out, first)
        }
        Value::Record(record) => {
            let fields = record.borrow();
            out.write_char('{')?;
            let mut first = true;
            for (key, item) in fields.iter() {
                separator(out, &mut first, " ")?;
                write!(out, "{}: ", key)?;
                write_value(out, item, walk)?;
            }
            close_brace(out, first)
        }
        _ => Ok(()),
    }
}

/// Write `lead` before the first element, a comma before the rest
fn separator<W: Write>(out: &mut W, first: &mut bool, lead: &str) -> fmt::Result {
    if *first {
        *first = false;
        out.write_str(lead)
    } else {
        out.write_str(", ")
    }
}

fn close_brace<W: Write>(out: &mut W, empty: bool) -> fmt::Result {
    if empty {
        out.write_char('}')
    } else {
        out.write_str(" }")
    }
}
