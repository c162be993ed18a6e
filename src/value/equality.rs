//! Value comparison
//!
//! - `same_value_zero`: key matching for Map and Set
//! - `GraphEq`: deep equality over possibly cyclic graphs

use std::collections::HashMap;

use super::Value;

/// SameValueZero: NaN matches NaN, zeros match regardless of sign,
/// composites match by identity
pub(crate) fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        _ => primitive_eq(a, b).unwrap_or_else(|| a.is_same_instance(b)),
    }
}

/// SameValue on doubles: NaN matches NaN, `0.0` differs from `-0.0`
fn same_number(x: f64, y: f64) -> bool {
    (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
}

/// Equality for everything except numbers and composites; `None` if either side is one of those
fn primitive_eq(a: &Value, b: &Value) -> Option<bool> {
    let eq = match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::Pattern(x), Value::Pattern(y)) => x == y,
        (Value::Foreign(x), Value::Foreign(y)) => x == y,
        (Value::Number(_), _) | (_, Value::Number(_)) => return None,
        _ if a.is_composite() || b.is_composite() => return None,
        _ => false,
    };
    Some(eq)
}

/// Deep, cycle-aware equality
///
/// Composites on the left are paired with composites on the right the first
/// time they are compared. A later encounter must hit the same partner, so
/// two graphs are equal only if they share instances in the same places.
#[derive(Default)]
pub(crate) struct GraphEq {
    forward: HashMap<usize, usize>,
    backward: HashMap<usize, usize>,
}

impl GraphEq {
    pub(crate) fn eq(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => same_number(*x, *y),
            (Value::Array(x), Value::Array(y)) => match self.pair(x.node_id(), y.node_id()) {
                Some(known) => known,
                None => {
                    let (x, y) = (x.borrow(), y.borrow());
                    x.items.len() == y.items.len()
                        && x.properties.len() == y.properties.len()
                        && x.items.iter().zip(&y.items).all(|(l, r)| self.eq(l, r))
                        && x
                            .properties
                            .iter()
                            .zip(&y.properties)
                            .all(|((ln, lv), (rn, rv))| ln == rn && self.eq(lv, rv))
                }
            },
            (Value::Map(x), Value::Map(y)) => match self.pair(x.node_id(), y.node_id()) {
                Some(known) => known,
                None => {
                    let (x, y) = (x.borrow(), y.borrow());
                    x.len() == y.len()
                        && x
                            .iter()
                            .zip(y.iter())
                            .all(|((lk, lv), (rk, rv))| self.eq(lk, rk) && self.eq(lv, rv))
                }
            },
            (Value::Set(x), Value::Set(y)) => match self.pair(x.node_id(), y.node_id()) {
                Some(known) => known,
                None => {
                    let (x, y) = (x.borrow(), y.borrow());
                    x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| self.eq(l, r))
                }
            },
            (Value::Record(x), Value::Record(y)) => match self.pair(x.node_id(), y.node_id()) {
                Some(known) => known,
                None => {
                    // Field order is not significant for records
                    let (x, y) = (x.borrow(), y.borrow());
                    x.len() == y.len()
                        && x.iter().all(|(key, lv)| {
                            y.iter()
                                .find(|(k, _)| k == key)
                                .map_or(false, |(_, rv)| self.eq(lv, rv))
                        })
                }
            },
            _ => primitive_eq(a, b).unwrap_or(false),
        }
    }

    /// `Some(result)` if either side was already paired, otherwise records the pair
    fn pair(&mut self, left: usize, right: usize) -> Option<bool> {
        if let Some(&partner) = self.forward.get(&left) {
            return Some(partner == right);
        }
        if self.backward.contains_key(&right) {
            return Some(false);
        }
        self.forward.insert(left, right);
        self.backward.insert(right, left);
        None
    }
}
