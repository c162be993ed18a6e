//! Value Module
//!
//! The grammar of values that can be stored.
//!
//! ## Variants
//! - Primitives: undefined, null, bool, number (f64), bigint, string
//! - Date and Pattern (plain values, compared by content)
//! - Composites: Array, Map, Set, Record
//! - Foreign: anything outside the grammar (rejected by the codec)
//!
//! ## Identity
//! Composites are shared handles (`Rc<RefCell<..>>`). Cloning a handle
//! shares the instance, so a graph can contain the same collection at
//! several positions, including inside itself. The codec preserves that
//! sharing. Cycles keep their members alive like any `Rc` cycle; break them
//! (e.g. `clear()`) when the graph is no longer needed.

mod collections;
mod date;
mod display;
mod equality;
mod pattern;

use std::fmt;

use num_bigint::BigInt;

use crate::error::TypeMismatch;

pub use collections::{Array, ArrayData, Key, Map, Record, Set};
pub use date::{Date, MAX_DATE_MILLIS};
pub use pattern::{InvalidPatternFlags, Pattern, PatternFlags};

pub(crate) use equality::same_value_zero;

/// Largest integer a double represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Smallest integer a double represents exactly (-(2^53 - 1))
pub const MIN_SAFE_INTEGER: f64 = -9_007_199_254_740_991.0;

/// A storable value
///
/// Equality (`==`) is deep and cycle-aware: numbers compare with SameValue
/// semantics (NaN equals NaN, `0.0` differs from `-0.0`) and composite
/// graphs must have the same sharing shape.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Date(Date),
    Pattern(Pattern),
    Array(Array),
    Map(Map),
    Set(Set),
    Record(Record),
    Foreign(Foreign),
}

/// A value that exists in the host program but has no stored form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Foreign {
    pub kind: ForeignKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKind {
    Function,
    Symbol,
    HostObject,
}

impl Foreign {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            kind: ForeignKind::Function,
            name: name.into(),
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self {
            kind: ForeignKind::Symbol,
            name: name.into(),
        }
    }

    pub fn host_object(name: impl Into<String>) -> Self {
        Self {
            kind: ForeignKind::HostObject,
            name: name.into(),
        }
    }
}

impl fmt::Display for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ForeignKind::Function => write!(f, "[Function: {}]", self.name),
            ForeignKind::Symbol => write!(f, "Symbol({})", self.name),
            ForeignKind::HostObject => write!(f, "[object {}]", self.name),
        }
    }
}

impl Value {
    /// Short name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Pattern(_) => "pattern",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Record(_) => "record",
            Value::Foreign(_) => "foreign",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Map(_) | Value::Set(_) | Value::Record(_)
        )
    }

    /// True if both values are the same composite instance
    pub fn is_same_instance(&self, other: &Value) -> bool {
        match (self.node_id(), other.node_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Identity of a composite instance (address of its shared cell)
    pub(crate) fn node_id(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.node_id()),
            Value::Map(m) => Some(m.node_id()),
            Value::Set(s) => Some(s.node_id()),
            Value::Record(r) => Some(r.node_id()),
            _ => None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equality::GraphEq::default().eq(self, other)
    }
}

// =============================================================================
// Conversions into Value
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<BigInt> for Value {
    fn from(b: BigInt) -> Self {
        Value::BigInt(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Value::Pattern(p)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Set> for Value {
    fn from(s: Set) -> Self {
        Value::Set(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Foreign> for Value {
    fn from(f: Foreign) -> Self {
        Value::Foreign(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from(items))
    }
}

// =============================================================================
// Conversions out of Value
// =============================================================================

macro_rules! impl_try_from_value {
    ($target:ty, $expected:literal, $variant:ident) => {
        impl TryFrom<Value> for $target {
            type Error = TypeMismatch;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(TypeMismatch {
                        expected: $expected,
                        found: other.type_name(),
                    }),
                }
            }
        }
    };
}

impl_try_from_value!(bool, "bool", Bool);
impl_try_from_value!(f64, "number", Number);
impl_try_from_value!(BigInt, "bigint", BigInt);
impl_try_from_value!(String, "string", String);
impl_try_from_value!(Date, "date", Date);
impl_try_from_value!(Pattern, "pattern", Pattern);
impl_try_from_value!(Array, "array", Array);
impl_try_from_value!(Map, "map", Map);
impl_try_from_value!(Set, "set", Set);
impl_try_from_value!(Record, "record", Record);
