//! Typed payload carried by a [`DataNode`](super::DataNode).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value stored on a node of the generic tree.
///
/// Covers the shapes attribute fields persist as:
/// - Scalars: Bool, Int, Float, String
/// - Sequences: BoolList, IntList, FloatList, StringList
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),

    BoolList(Vec<bool>),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    StringList(Vec<String>),
}

// ============================================================================
// Type checking
// ============================================================================

impl NodeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeValue::Bool(_) => "bool",
            NodeValue::Int(_) => "int",
            NodeValue::Float(_) => "double",
            NodeValue::String(_) => "string",
            NodeValue::BoolList(_) => "boolVector",
            NodeValue::IntList(_) => "intVector",
            NodeValue::FloatList(_) => "doubleVector",
            NodeValue::StringList(_) => "stringVector",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            NodeValue::BoolList(_) | NodeValue::IntList(_) | NodeValue::FloatList(_) | NodeValue::StringList(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NodeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempt to extract as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            NodeValue::Int(i) => Some(*i),
            NodeValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Attempt to extract as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            NodeValue::Float(f) => Some(*f),
            NodeValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            NodeValue::StringList(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            NodeValue::IntList(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_bool_list(&self) -> Option<&[bool]> {
        match self {
            NodeValue::BoolList(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            NodeValue::FloatList(l) => Some(l),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for NodeValue { fn from(v: bool) -> Self { NodeValue::Bool(v) } }
impl From<i32> for NodeValue { fn from(v: i32) -> Self { NodeValue::Int(v as i64) } }
impl From<i64> for NodeValue { fn from(v: i64) -> Self { NodeValue::Int(v) } }
impl From<f64> for NodeValue { fn from(v: f64) -> Self { NodeValue::Float(v) } }
impl From<String> for NodeValue { fn from(v: String) -> Self { NodeValue::String(v) } }
impl From<&str> for NodeValue { fn from(v: &str) -> Self { NodeValue::String(v.to_owned()) } }
impl From<Vec<bool>> for NodeValue { fn from(v: Vec<bool>) -> Self { NodeValue::BoolList(v) } }
impl From<Vec<i64>> for NodeValue { fn from(v: Vec<i64>) -> Self { NodeValue::IntList(v) } }
impl From<Vec<f64>> for NodeValue { fn from(v: Vec<f64>) -> Self { NodeValue::FloatList(v) } }
impl From<Vec<String>> for NodeValue { fn from(v: Vec<String>) -> Self { NodeValue::StringList(v) } }
impl From<Vec<&str>> for NodeValue {
    fn from(v: Vec<&str>) -> Self { NodeValue::StringList(v.into_iter().map(str::to_owned).collect()) }
}

// ============================================================================
// Display
// ============================================================================

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "(")?;
    for (i, v) in items.iter().enumerate() {
        if i > 0 { write!(f, ", ")?; }
        write!(f, "{v}")?;
    }
    write!(f, ")")
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Bool(b) => write!(f, "{b}"),
            NodeValue::Int(i) => write!(f, "{i}"),
            NodeValue::Float(v) => write!(f, "{v}"),
            NodeValue::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            NodeValue::BoolList(l) => write_list(f, l),
            NodeValue::IntList(l) => write_list(f, l),
            NodeValue::FloatList(l) => write_list(f, l),
            NodeValue::StringList(l) => {
                let quoted: Vec<NodeValue> = l.iter().map(|s| NodeValue::from(s.as_str())).collect();
                write_list(f, &quoted)
            }
        }
    }
}
