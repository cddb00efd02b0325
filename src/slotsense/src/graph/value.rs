//! Attribute Values
//!
//! Host attributes are untyped until read. `Value` is the shape a read
//! produces; typed accessors on it return `None` when the shape does not match
//! so callers can treat "wrong shape" the same as "absent".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alpha at or below which a tint counts as transparent
pub const TRANSPARENT_ALPHA: f32 = 0.01;

/// Weak handle to a live host object.
///
/// Holding an id never keeps the object alive; every use goes back through
/// the graph and may find the object gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Object reference as it appears in snapshot files: `{ ref: 12 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefValue {
    #[serde(rename = "ref")]
    pub target: ObjectId,
}

/// A value read from a host attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Ref(RefValue),
}

impl Value {
    /// Build a reference value
    pub fn reference(id: ObjectId) -> Self {
        Value::Ref(RefValue { target: id })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Strict integer read (floats are not accepted)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integer or float, floats rounded half-to-even
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.is_finite() => Some(f.round_ties_even() as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_ref_id(&self) -> Option<ObjectId> {
        match self {
            Value::Ref(r) => Some(r.target),
            _ => None,
        }
    }

    /// Host-side text rendering of a scalar. `None` for null, lists and references.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::Null | Value::List(_) | Value::Ref(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::reference(id)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Screen rectangle of a renderable object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Image-like component data: a visual resource and its tint alpha
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Visual {
    pub fn new(resource: impl Into<String>, alpha: f32) -> Self {
        Self {
            resource: Some(resource.into()),
            alpha,
        }
    }

    /// A resource is assigned and the tint is not transparent
    pub fn is_visible(&self) -> bool {
        self.resource.is_some() && self.alpha > TRANSPARENT_ALPHA
    }
}
