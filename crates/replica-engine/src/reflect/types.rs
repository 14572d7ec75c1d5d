//! Runtime type references

use crate::reflect::{ClassId, ClassRegistry};
use crate::value::{PrimitiveType, Value};

/// A declared or runtime type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    /// Built-in scalar
    Primitive(PrimitiveType),
    /// Registered class
    Class(ClassId),
    /// Array with the given component type
    Array(Box<TypeInfo>),
}

impl TypeInfo {
    /// Create a primitive type info
    pub fn primitive(kind: PrimitiveType) -> Self {
        TypeInfo::Primitive(kind)
    }

    /// Create a class type info
    pub fn class(class_id: ClassId) -> Self {
        TypeInfo::Class(class_id)
    }

    /// Create an array type info
    pub fn array(element_type: TypeInfo) -> Self {
        TypeInfo::Array(Box::new(element_type))
    }

    /// Class ID for class types
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            TypeInfo::Class(id) => Some(*id),
            _ => None,
        }
    }

    /// Component type for array types
    pub fn element_type(&self) -> Option<&TypeInfo> {
        match self {
            TypeInfo::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// Default slot value: the primitive zero, or null for references
    pub fn zero_value(&self) -> Value {
        match self {
            TypeInfo::Primitive(p) => Value::Primitive(p.zero()),
            _ => Value::Null,
        }
    }

    /// Human-readable name (`int`, `Man`, `String[]`)
    pub fn name(&self, registry: &ClassRegistry) -> String {
        match self {
            TypeInfo::Primitive(p) => p.name().to_string(),
            TypeInfo::Class(id) => registry
                .get_class(*id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("<class #{}>", id)),
            TypeInfo::Array(elem) => format!("{}[]", elem.name(registry)),
        }
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Accessible everywhere
    #[default]
    Public,
    /// Accessible to subclasses
    Protected,
    /// Accessible to the declaring class only
    Private,
}

impl Visibility {
    /// Whether access needs the private-level permission
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Visibility::Public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_info_array() {
        let arr = TypeInfo::array(TypeInfo::primitive(PrimitiveType::Int));
        assert_eq!(arr.element_type(), Some(&TypeInfo::Primitive(PrimitiveType::Int)));
        assert!(arr.class_id().is_none());
        assert!(arr.zero_value().is_null());
    }

    #[test]
    fn test_type_info_names() {
        let registry = ClassRegistry::with_standard_library();
        let string_id = crate::reflect::core_class_ids::STRING;
        assert_eq!(TypeInfo::class(string_id).name(&registry), "String");
        assert_eq!(
            TypeInfo::array(TypeInfo::class(string_id)).name(&registry),
            "String[]"
        );
        assert_eq!(TypeInfo::primitive(PrimitiveType::Long).name(&registry), "long");
    }

    #[test]
    fn test_visibility() {
        assert!(!Visibility::Public.is_restricted());
        assert!(Visibility::Protected.is_restricted());
        assert!(Visibility::Private.is_restricted());
    }
}
