//! Dynamically typed call arguments
//!
//! Guarded functions and routines share one calling convention: an ordered
//! list of positional [`Value`]s plus an ordered list of keyword values.

use crate::array::{Array, Matrix};
use crate::dtype::{Complex128, DType};
use std::fmt;

/// A single argument or result value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Dense array
    Array(Array),
    /// Matrix-like 2-D container, normalised to `Array` by the guard
    Matrix(Matrix),
    /// Boolean flag
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Real scalar
    Float(f64),
    /// Complex scalar
    Complex(Complex128),
    /// String option
    Str(String),
    /// Several results
    Tuple(Vec<Value>),
    /// Absent value
    None,
}

impl Value {
    /// Element type of array-like and scalar values
    ///
    /// Scalars report the dtype they would have as a 0-d array.
    pub fn dtype(&self) -> Option<DType> {
        match self {
            Self::Array(a) => Some(a.dtype()),
            Self::Matrix(m) => Some(m.dtype()),
            Self::Bool(_) => Some(DType::Bool),
            Self::Int(_) => Some(DType::I64),
            Self::Float(_) => Some(DType::F64),
            Self::Complex(_) => Some(DType::Complex128),
            Self::Str(_) | Self::Tuple(_) | Self::None => None,
        }
    }

    /// Borrow as an array
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Take as an array
    pub fn into_array(self) -> Option<Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Read as a boolean flag
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Read as a real scalar (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Read as a complex scalar (reals widen)
    pub fn as_complex(&self) -> Option<Complex128> {
        match self {
            Self::Complex(z) => Some(*z),
            other => other.as_f64().map(|re| Complex128::new(re, 0.0)),
        }
    }

    /// Whether this is a boolean flag
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Short kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Matrix(_) => "matrix",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Complex(_) => "complex",
            Self::Str(_) => "str",
            Self::Tuple(_) => "tuple",
            Self::None => "none",
        }
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Self::Array(a)
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Self::Matrix(m)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Complex128> for Value {
    fn from(z: Complex128) -> Self {
        Self::Complex(z)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(a) => write!(f, "array({:?}, {})", a.shape(), a.dtype()),
            Self::Matrix(m) => write!(f, "matrix({}x{}, {})", m.rows(), m.cols(), m.dtype()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Complex(z) => write!(f, "{z}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Self::None => write!(f, "None"),
        }
    }
}

/// Positional and keyword arguments for one call
///
/// Keyword order is preserved; setting an existing keyword replaces its value
/// in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl CallArgs {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit parts
    pub fn from_parts(positional: Vec<Value>, keyword: Vec<(String, Value)>) -> Self {
        Self {
            positional,
            keyword,
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_keyword(name, value.into());
        self
    }

    /// Set or replace a keyword argument
    pub fn set_keyword(&mut self, name: &str, value: Value) {
        match self.keyword.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => self.keyword.push((name.to_owned(), value)),
        }
    }

    /// Positional arguments in order
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments in order
    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keyword
    }

    /// Positional argument at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Keyword argument by name
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keyword.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Positional argument at `index`, falling back to keyword `name`
    pub fn lookup(&self, index: usize, name: &str) -> Option<&Value> {
        self.get(index).or_else(|| self.keyword(name))
    }

    /// The first argument value: first positional, else first keyword
    pub fn first(&self) -> Option<&Value> {
        self.positional
            .first()
            .or_else(|| self.keyword.first().map(|(_, v)| v))
    }

    /// Total number of supplied arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// Whether no argument was supplied
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into positional and keyword parts
    pub fn into_parts(self) -> (Vec<Value>, Vec<(String, Value)>) {
        (self.positional, self.keyword)
    }
}
