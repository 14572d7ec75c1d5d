//! Object model
//!
//! Heap objects are shared through [`ObjRef`] handles. A handle's identity
//! is the allocation address, which is what the clone engine memoizes on.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

use crate::reflect::{ClassId, CollectionFlavor, TypeInfo};
use crate::value::Value;

/// Class instance with flat slot storage
///
/// Slots are laid out ancestor-first: inherited fields occupy the low
/// indices, the class's own fields follow.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Class ID (index into the class registry)
    pub class_id: ClassId,
    /// Field values
    pub fields: Vec<Value>,
}

impl Instance {
    /// Create a new instance with the given initial slot values
    pub fn new(class_id: ClassId, fields: Vec<Value>) -> Self {
        Self { class_id, fields }
    }

    /// Get a field value by index
    pub fn get_field(&self, index: usize) -> Option<Value> {
        self.fields.get(index).cloned()
    }

    /// Set a field value by index
    pub fn set_field(&mut self, index: usize, value: Value) -> Result<(), String> {
        if index < self.fields.len() {
            self.fields[index] = value;
            Ok(())
        } else {
            Err(format!(
                "Field index {} out of bounds (object has {} fields)",
                index,
                self.fields.len()
            ))
        }
    }

    /// Get number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Fixed-length array with a declared component type
#[derive(Debug, Clone)]
pub struct ArrayObject {
    /// Component type
    pub component: TypeInfo,
    /// Array elements
    pub elements: Vec<Value>,
}

impl ArrayObject {
    /// Create a new array with every element set to the component's zero value
    pub fn new(component: TypeInfo, length: usize) -> Self {
        let zero = component.zero_value();
        Self {
            component,
            elements: vec![zero; length],
        }
    }

    /// Create an array from existing elements
    pub fn from_elements(component: TypeInfo, elements: Vec<Value>) -> Self {
        Self {
            component,
            elements,
        }
    }

    /// Get array length
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.get(index).cloned()
    }

    /// Set element at index
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), String> {
        if index < self.elements.len() {
            self.elements[index] = value;
            Ok(())
        } else {
            Err(format!(
                "Array index {} out of bounds (length: {})",
                index,
                self.elements.len()
            ))
        }
    }
}

/// Key equality used by sets and maps
///
/// Primitives compare by value, references by identity.
pub fn key_eq(a: &Value, b: &Value) -> bool {
    a == b
}

/// Variable-length container (list or set)
#[derive(Debug, Clone)]
pub struct CollectionObject {
    /// Concrete collection class
    pub class_id: ClassId,
    /// Ordering / uniqueness behavior
    pub flavor: CollectionFlavor,
    /// Elements in insertion order
    pub elements: Vec<Value>,
}

impl CollectionObject {
    /// Create an empty collection
    pub fn new(class_id: ClassId, flavor: CollectionFlavor) -> Self {
        Self {
            class_id,
            flavor,
            elements: Vec::new(),
        }
    }

    /// Add an element; returns false if a set already holds an equal key
    pub fn add(&mut self, value: Value) -> bool {
        if self.flavor == CollectionFlavor::Set && self.contains(&value) {
            return false;
        }
        self.elements.push(value);
        true
    }

    /// Check if an equal element is present
    pub fn contains(&self, value: &Value) -> bool {
        self.elements.iter().any(|e| key_eq(e, value))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Associative container, insertion ordered
#[derive(Debug, Clone)]
pub struct MapObject {
    /// Concrete map class
    pub class_id: ClassId,
    /// Key/value pairs
    pub entries: Vec<(Value, Value)>,
}

impl MapObject {
    /// Create an empty map
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            entries: Vec::new(),
        }
    }

    /// Insert or replace; returns the previous value for the key
    pub fn put(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| key_eq(k, &key)) {
            return Some(std::mem::replace(&mut entry.1, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Look up a key
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries
            .iter()
            .find(|(k, _)| key_eq(k, key))
            .map(|(_, v)| v.clone())
    }

    /// Number of entries
    pub fn size(&self) -> usize {
        self.entries.len()
    }
}

/// Any heap-allocated object
#[derive(Debug, Clone)]
pub enum HeapObject {
    /// Class instance (plain objects, boxed scalars, enum constants)
    Instance(Instance),
    /// Array
    Array(ArrayObject),
    /// List or set
    Collection(CollectionObject),
    /// Map
    Map(MapObject),
}

impl HeapObject {
    /// Class ID of the object (`None` for arrays)
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            HeapObject::Instance(i) => Some(i.class_id),
            HeapObject::Array(_) => None,
            HeapObject::Collection(c) => Some(c.class_id),
            HeapObject::Map(m) => Some(m.class_id),
        }
    }

    /// Runtime type of the object
    pub fn runtime_type(&self) -> TypeInfo {
        match self {
            HeapObject::Array(a) => TypeInfo::array(a.component.clone()),
            HeapObject::Instance(i) => TypeInfo::Class(i.class_id),
            HeapObject::Collection(c) => TypeInfo::Class(c.class_id),
            HeapObject::Map(m) => TypeInfo::Class(m.class_id),
        }
    }

    /// Short shape name for diagnostics
    pub fn shape_name(&self) -> &'static str {
        match self {
            HeapObject::Instance(_) => "instance",
            HeapObject::Array(_) => "array",
            HeapObject::Collection(_) => "collection",
            HeapObject::Map(_) => "map",
        }
    }

    /// View as an instance
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            HeapObject::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// View as a mutable instance
    pub fn as_instance_mut(&mut self) -> Option<&mut Instance> {
        match self {
            HeapObject::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// View as an array
    pub fn as_array(&self) -> Option<&ArrayObject> {
        match self {
            HeapObject::Array(a) => Some(a),
            _ => None,
        }
    }

    /// View as a mutable array
    pub fn as_array_mut(&mut self) -> Option<&mut ArrayObject> {
        match self {
            HeapObject::Array(a) => Some(a),
            _ => None,
        }
    }

    /// View as a collection
    pub fn as_collection(&self) -> Option<&CollectionObject> {
        match self {
            HeapObject::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// View as a mutable collection
    pub fn as_collection_mut(&mut self) -> Option<&mut CollectionObject> {
        match self {
            HeapObject::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// View as a map
    pub fn as_map(&self) -> Option<&MapObject> {
        match self {
            HeapObject::Map(m) => Some(m),
            _ => None,
        }
    }

    /// View as a mutable map
    pub fn as_map_mut(&mut self) -> Option<&mut MapObject> {
        match self {
            HeapObject::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Shared handle to a heap object
///
/// Cloning the handle shares the object; it never copies it. Locks are held
/// only for the duration of a single read or write, never across recursion.
#[derive(Clone)]
pub struct ObjRef(Arc<RwLock<HeapObject>>);

impl ObjRef {
    /// Allocate a new heap object
    pub fn new(object: HeapObject) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Allocate a class instance
    pub fn instance(class_id: ClassId, fields: Vec<Value>) -> Self {
        Self::new(HeapObject::Instance(Instance::new(class_id, fields)))
    }

    /// Allocate an array holding the given elements
    pub fn array(component: TypeInfo, elements: Vec<Value>) -> Self {
        Self::new(HeapObject::Array(ArrayObject::from_elements(component, elements)))
    }

    /// Stable identity token (allocation address)
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Check reference identity
    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Acquire a shared read guard
    pub fn read(&self) -> RwLockReadGuard<'_, HeapObject> {
        self.0.read()
    }

    /// Acquire an exclusive write guard
    pub fn write(&self) -> RwLockWriteGuard<'_, HeapObject> {
        self.0.write()
    }

    /// Runtime type of the referenced object
    pub fn runtime_type(&self) -> TypeInfo {
        self.read().runtime_type()
    }

    /// Class ID of the referenced object (`None` for arrays)
    pub fn class_id(&self) -> Option<ClassId> {
        self.read().class_id()
    }

    /// Read an instance slot (`None` for non-instances or bad indices)
    pub fn get_field(&self, index: usize) -> Option<Value> {
        self.read().as_instance().and_then(|i| i.get_field(index))
    }

    /// Write an instance slot
    pub fn set_field(&self, index: usize, value: Value) -> Result<(), String> {
        let mut guard = self.write();
        let shape = guard.shape_name();
        match guard.as_instance_mut() {
            Some(instance) => instance.set_field(index, value),
            None => Err(format!("Cannot set field {} on {}", index, shape)),
        }
    }
}

// Debug never walks into the object: graphs may be cyclic.
impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef(0x{:x})", self.identity())
    }
}
