//! Type classification
//!
//! Maps a runtime type to the copy strategy the clone engine applies to it.

use crate::reflect::{ClassKind, ClassRegistry, TypeInfo};
use crate::value::Value;

/// Copy strategy category of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Inline scalar, copied by value
    Primitive,
    /// Immutable single-scalar wrapper, rewrapped
    BoxedScalar,
    /// Enum constant, shared
    Enumeration,
    /// Fixed-length array
    Array,
    /// List or set
    Collection,
    /// Key/value map
    Map,
    /// Anything else: copied slot by slot
    PlainObject,
}

impl TypeCategory {
    /// Categories whose values are returned as-is
    pub fn is_shared(&self) -> bool {
        matches!(self, TypeCategory::Primitive | TypeCategory::Enumeration)
    }
}

/// Classifies types against a registry
#[derive(Debug, Clone, Copy)]
pub struct TypeClassifier<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> TypeClassifier<'a> {
    /// Create a classifier over a registry
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    /// Classify a declared or runtime type
    pub fn classify(&self, type_info: &TypeInfo) -> TypeCategory {
        match type_info {
            TypeInfo::Primitive(_) => TypeCategory::Primitive,
            TypeInfo::Array(_) => TypeCategory::Array,
            TypeInfo::Class(id) => match self.registry.effective_kind(*id) {
                ClassKind::Boxed => TypeCategory::BoxedScalar,
                ClassKind::Enum => TypeCategory::Enumeration,
                ClassKind::Collection(_) => TypeCategory::Collection,
                ClassKind::Map => TypeCategory::Map,
                ClassKind::Object => TypeCategory::PlainObject,
            },
        }
    }

    /// Classify the runtime type of a value (`None` for null)
    pub fn classify_value(&self, value: &Value) -> Option<TypeCategory> {
        value.runtime_type().map(|t| self.classify(&t))
    }
}
