//! Value representation
//!
//! A `Value` is either null, an inline primitive scalar, or a reference to a
//! heap object. Primitives are copied by value; references carry identity.

use std::fmt;
use std::sync::Arc;

use crate::object::ObjRef;
use crate::reflect::TypeInfo;

/// Built-in scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `byte` (signed 8-bit)
    Byte,
    /// `short` (signed 16-bit)
    Short,
    /// `int` (signed 32-bit)
    Int,
    /// `long` (signed 64-bit)
    Long,
    /// `float` (32-bit IEEE)
    Float,
    /// `double` (64-bit IEEE)
    Double,
    /// `char`
    Char,
    /// `str` (immutable text)
    Str,
}

impl PrimitiveType {
    /// The zero value of this primitive kind
    pub fn zero(&self) -> Primitive {
        match self {
            PrimitiveType::Boolean => Primitive::Boolean(false),
            PrimitiveType::Byte => Primitive::Byte(0),
            PrimitiveType::Short => Primitive::Short(0),
            PrimitiveType::Int => Primitive::Int(0),
            PrimitiveType::Long => Primitive::Long(0),
            PrimitiveType::Float => Primitive::Float(0.0),
            PrimitiveType::Double => Primitive::Double(0.0),
            PrimitiveType::Char => Primitive::Char('\0'),
            PrimitiveType::Str => Primitive::Str(Arc::from("")),
        }
    }

    /// Source-level name of the primitive kind
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Char => "char",
            PrimitiveType::Str => "str",
        }
    }
}

/// An inline scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Boolean
    Boolean(bool),
    /// 8-bit integer
    Byte(i8),
    /// 16-bit integer
    Short(i16),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Character
    Char(char),
    /// Immutable text
    Str(Arc<str>),
}

impl Primitive {
    /// Kind of this primitive
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Primitive::Boolean(_) => PrimitiveType::Boolean,
            Primitive::Byte(_) => PrimitiveType::Byte,
            Primitive::Short(_) => PrimitiveType::Short,
            Primitive::Int(_) => PrimitiveType::Int,
            Primitive::Long(_) => PrimitiveType::Long,
            Primitive::Float(_) => PrimitiveType::Float,
            Primitive::Double(_) => PrimitiveType::Double,
            Primitive::Char(_) => PrimitiveType::Char,
            Primitive::Str(_) => PrimitiveType::Str,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Boolean(b) => write!(f, "{}", b),
            Primitive::Byte(n) => write!(f, "{}", n),
            Primitive::Short(n) => write!(f, "{}", n),
            Primitive::Int(n) => write!(f, "{}", n),
            Primitive::Long(n) => write!(f, "{}", n),
            Primitive::Float(n) => write!(f, "{:?}", n),
            Primitive::Double(n) => write!(f, "{:?}", n),
            Primitive::Char(c) => write!(f, "{}", c),
            Primitive::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A runtime value
///
/// Equality on `Value` compares primitives by value and references by
/// identity. Use [`crate::graph::deep_equals`] for structural comparison.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Null / absence
    #[default]
    Null,
    /// Inline primitive
    Primitive(Primitive),
    /// Reference to a heap object
    Ref(ObjRef),
}

impl Value {
    /// Null value
    pub fn null() -> Self {
        Value::Null
    }

    /// Boolean value
    pub fn bool(b: bool) -> Self {
        Value::Primitive(Primitive::Boolean(b))
    }

    /// 32-bit integer value
    pub fn i32(n: i32) -> Self {
        Value::Primitive(Primitive::Int(n))
    }

    /// 64-bit integer value
    pub fn i64(n: i64) -> Self {
        Value::Primitive(Primitive::Long(n))
    }

    /// 64-bit float value
    pub fn f64(n: f64) -> Self {
        Value::Primitive(Primitive::Double(n))
    }

    /// Character value
    pub fn char(c: char) -> Self {
        Value::Primitive(Primitive::Char(c))
    }

    /// Text value
    pub fn str(s: &str) -> Self {
        Value::Primitive(Primitive::Str(Arc::from(s)))
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the primitive payload, if any
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Value::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Get the referenced heap object, if any
    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Get as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Primitive(Primitive::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Get as a 32-bit integer
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Primitive(Primitive::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get as a 64-bit integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Primitive(Primitive::Long(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get as a 64-bit float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Primitive(Primitive::Double(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Primitive(Primitive::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Runtime type of the value (`None` for null)
    pub fn runtime_type(&self) -> Option<TypeInfo> {
        match self {
            Value::Null => None,
            Value::Primitive(p) => Some(TypeInfo::Primitive(p.primitive_type())),
            Value::Ref(r) => Some(r.runtime_type()),
        }
    }

    /// Check whether two values are the same reference
    ///
    /// Primitives and null never share identity.
    pub fn same_reference(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<ObjRef> for Value {
    fn from(r: ObjRef) -> Self {
        Value::Ref(r)
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        Value::Primitive(p)
    }
}
