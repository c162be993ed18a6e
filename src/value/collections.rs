//! Composite values
//!
//! Shared, interior-mutable collection handles.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::{same_value_zero, Value};

/// Address of a shared cell, stable for as long as the cell is alive
fn cell_id<T>(cell: &Rc<RefCell<T>>) -> usize {
    Rc::as_ptr(cell) as *const () as usize
}

// =============================================================================
// Array
// =============================================================================

/// Contents of an [`Array`]
#[derive(Default)]
pub struct ArrayData {
    /// Indexed elements
    pub items: Vec<Value>,

    /// Extra named attributes, in insertion order
    pub properties: Vec<(String, Value)>,
}

/// Ordered sequence with optional named attributes
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<ArrayData>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().items.is_empty()
    }

    /// Append an element
    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().items.push(value.into());
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().items.get(index).cloned()
    }

    /// Store `value` at `index`, padding any gap with `Undefined`
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let mut data = self.0.borrow_mut();
        if index >= data.items.len() {
            data.items.resize(index + 1, Value::Undefined);
        }
        data.items[index] = value.into();
    }

    /// Snapshot of the elements (composite elements stay shared)
    pub fn items(&self) -> Vec<Value> {
        self.0.borrow().items.clone()
    }

    /// Set a named attribute, replacing an existing one in place
    pub fn set_property(&self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        let mut data = self.0.borrow_mut();
        match data.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => data.properties.push((name, value)),
        }
    }

    pub fn property(&self, name: &str) -> Option<Value> {
        self.0
            .borrow()
            .properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn properties(&self) -> Vec<(String, Value)> {
        self.0.borrow().properties.clone()
    }

    /// Remove all elements and attributes (breaks cycles through this array)
    pub fn clear(&self) {
        let mut data = self.0.borrow_mut();
        data.items.clear();
        data.properties.clear();
    }

    pub fn borrow(&self) -> Ref<'_, ArrayData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ArrayData> {
        self.0.borrow_mut()
    }

    /// True if both handles refer to the same instance
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn node_id(&self) -> usize {
        cell_id(&self.0)
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(ArrayData {
            items,
            properties: Vec::new(),
        })))
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

// =============================================================================
// Map
// =============================================================================

/// Insertion-ordered mapping with arbitrary keys
///
/// Keys are matched with SameValueZero: NaN matches NaN, `0.0` matches
/// `-0.0`, composites match only themselves.
#[derive(Clone, Default)]
pub struct Map(Rc<RefCell<Vec<(Value, Value)>>>);

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Insert or replace; an existing key keeps its position
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| same_value_zero(k, &key)) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| same_value_zero(k, key))
            .map(|(_, v)| v.clone())
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.borrow().iter().any(|(k, _)| same_value_zero(k, key))
    }

    /// Snapshot of the entries in insertion order
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn borrow(&self) -> Ref<'_, Vec<(Value, Value)>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn node_id(&self) -> usize {
        cell_id(&self.0)
    }
}

// =============================================================================
// Set
// =============================================================================

/// Insertion-ordered collection of unique values (SameValueZero)
#[derive(Clone, Default)]
pub struct Set(Rc<RefCell<Vec<Value>>>);

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Add a value; returns false if an equal value was already present
    pub fn insert(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        let mut values = self.0.borrow_mut();
        if values.iter().any(|v| same_value_zero(v, &value)) {
            return false;
        }
        values.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.borrow().iter().any(|v| same_value_zero(v, value))
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &Set) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn node_id(&self) -> usize {
        cell_id(&self.0)
    }
}

impl FromIterator<Value> for Set {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let set = Set::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

// =============================================================================
// Record
// =============================================================================

/// Record key: text or integer, kept as written
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Text(String),
    Int(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(s) => write!(f, "{:?}", s),
            Key::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i as i64)
    }
}

/// Insertion-ordered mapping from [`Key`] to value
#[derive(Clone, Default)]
pub struct Record(Rc<RefCell<Vec<(Key, Value)>>>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Insert or replace; an existing key keeps its position
    pub fn insert(&self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let mut fields = self.0.borrow_mut();
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, value)),
            None => {
                fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into();
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn keys(&self) -> Vec<Key> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn fields(&self) -> Vec<(Key, Value)> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn borrow(&self) -> Ref<'_, Vec<(Key, Value)>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn node_id(&self) -> usize {
        cell_id(&self.0)
    }
}

// =============================================================================
// Debug (cycle-safe, delegates to the value preview)
// =============================================================================

macro_rules! impl_debug_via_value {
    ($($handle:ident),*) => {
        $(
            impl fmt::Debug for $handle {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&Value::$handle(self.clone()), f)
                }
            }
        )*
    };
}

impl_debug_via_value!(Array, Map, Set, Record);
