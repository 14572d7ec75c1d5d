//! Class descriptors
//!
//! A `Class` is the runtime type descriptor the reflection layer walks:
//! ancestry, declared instance and static fields, constructors and the
//! structural kind that selects a copy strategy.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::object::ObjRef;
use crate::reflect::{TypeInfo, Visibility};
use crate::value::Value;

/// Class identifier (index into the class registry)
pub type ClassId = usize;

/// Ordering / uniqueness behavior of a collection class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionFlavor {
    /// Ordered, duplicates allowed
    Sequence,
    /// Ordered by insertion, duplicates rejected
    Set,
}

/// Structural kind of a class
///
/// Kinds other than `Boxed` are inherited: a subclass of a collection class
/// is a collection unless it declares otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    /// Plain object with field slots
    #[default]
    Object,
    /// Immutable wrapper around a single scalar `value` slot
    Boxed,
    /// Enumeration with a fixed set of constants
    Enum,
    /// List or set
    Collection(CollectionFlavor),
    /// Key/value map
    Map,
}

/// Field information for reflection
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Declared type
    pub type_info: TypeInfo,
    /// Declaring class ID
    pub declaring_class_id: ClassId,
    /// Slot index (instance storage for instance fields, static storage otherwise)
    pub field_index: usize,
    /// Visibility
    pub visibility: Visibility,
    /// Whether the field is static
    pub is_static: bool,
}

/// Parameter information for reflection
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    /// Parameter name
    pub name: String,
    /// Parameter type info
    pub type_info: TypeInfo,
    /// Parameter index
    pub index: usize,
}

/// Constructor body: initializes a freshly allocated object from arguments
pub type ConstructorBody = Arc<dyn Fn(&mut Init<'_>, &[Value]) -> Result<(), String> + Send + Sync>;

/// Constructor information for reflection
#[derive(Clone)]
pub struct ConstructorInfo {
    /// Parameter infos
    pub parameters: Vec<ParameterInfo>,
    /// Declaring class ID
    pub declaring_class_id: ClassId,
    /// Visibility
    pub visibility: Visibility,
    /// Initialization logic
    pub body: ConstructorBody,
}

impl ConstructorInfo {
    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("parameters", &self.parameters)
            .field("declaring_class_id", &self.declaring_class_id)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// Initialization scope handed to a constructor body
///
/// Gives named access to the new object's instance slots, inherited
/// ones included.
pub struct Init<'a> {
    this: &'a ObjRef,
    class: &'a Class,
}

impl<'a> Init<'a> {
    pub(crate) fn new(this: &'a ObjRef, class: &'a Class) -> Self {
        Self { this, class }
    }

    /// The object under construction
    pub fn this(&self) -> &ObjRef {
        self.this
    }

    /// Class being constructed
    pub fn class(&self) -> &Class {
        self.class
    }

    /// Set an instance field by name
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), String> {
        let index = self
            .class
            .field_index(name)
            .ok_or_else(|| format!("{} has no field '{}'", self.class.name, name))?;
        self.this.set_field(index, value)
    }

    /// Read an instance field by name
    pub fn get(&self, name: &str) -> Option<Value> {
        self.class
            .field_index(name)
            .and_then(|index| self.this.get_field(index))
    }
}

/// Class definition metadata
#[derive(Debug, Clone)]
pub struct Class {
    /// Class ID (unique identifier)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Parent class ID (None for root classes)
    pub parent_id: Option<ClassId>,
    /// Structural kind as declared (see [`ClassRegistry::effective_kind`](crate::reflect::ClassRegistry::effective_kind))
    pub kind: ClassKind,
    /// Abstract classes have no instances of their own
    pub is_abstract: bool,
    /// Number of instance fields (including inherited)
    pub field_count: usize,
    /// Declared instance fields, in declaration order
    pub fields: Vec<FieldInfo>,
    /// Declared static fields, in declaration order
    pub static_fields: Vec<FieldInfo>,
    /// Constructors, in declaration order
    pub constructors: Vec<ConstructorInfo>,
    pub(crate) static_values: Vec<Value>,
    pub(crate) field_indices: FxHashMap<String, usize>,
    pub(crate) slot_types: Vec<TypeInfo>,
}

impl Class {
    /// Slot index of an instance field, inherited fields included
    ///
    /// A field redeclared in a subclass resolves to the subclass slot.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    /// Declared types of all instance slots, ancestor slots first
    pub fn slot_types(&self) -> &[TypeInfo] {
        &self.slot_types
    }

    /// Get a static field value by name
    pub fn static_value(&self, name: &str) -> Option<Value> {
        self.static_fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| self.static_values.get(f.field_index).cloned())
    }

    /// Get number of static fields
    pub fn static_field_count(&self) -> usize {
        self.static_values.len()
    }

    /// Zero-argument constructor, if declared
    pub fn zero_arg_constructor(&self) -> Option<&ConstructorInfo> {
        self.constructors.iter().find(|c| c.parameters.is_empty())
    }
}
