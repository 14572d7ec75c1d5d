//! Standard library bootstrap
//!
//! Installs the built-in classes every registry starts from: the root
//! `Object`, the boxed scalar wrappers, `String`, the `Enum` base and the
//! collection and map families. IDs are fixed (see [`core_class_ids`]) so
//! values built with the helpers below are valid in any registry created by
//! [`ClassRegistry::with_standard_library`].

use once_cell::sync::Lazy;

use crate::object::{CollectionObject, HeapObject, MapObject, ObjRef};
use crate::reflect::{
    ClassBuilder, ClassId, ClassKind, ClassRegistry, CollectionFlavor, ConstructorDefinition,
    FieldDefinition, ParameterDefinition, TypeInfo,
};
use crate::value::{PrimitiveType, Value};

/// Well-known class IDs for core types
pub mod core_class_ids {
    use crate::reflect::ClassId;

    /// Object class ID (base class)
    pub const OBJECT: ClassId = 0;
    /// Abstract numeric wrapper base
    pub const NUMBER: ClassId = 1;
    /// Boolean wrapper
    pub const BOOLEAN: ClassId = 2;
    /// Byte wrapper
    pub const BYTE: ClassId = 3;
    /// Short wrapper
    pub const SHORT: ClassId = 4;
    /// Integer wrapper
    pub const INTEGER: ClassId = 5;
    /// Long wrapper
    pub const LONG: ClassId = 6;
    /// Float wrapper
    pub const FLOAT: ClassId = 7;
    /// Double wrapper
    pub const DOUBLE: ClassId = 8;
    /// Character wrapper
    pub const CHARACTER: ClassId = 9;
    /// Text wrapper
    pub const STRING: ClassId = 10;
    /// Enum base class
    pub const ENUM: ClassId = 11;
    /// Abstract collection
    pub const COLLECTION: ClassId = 12;
    /// Abstract list
    pub const LIST: ClassId = 13;
    /// Array-backed list
    pub const ARRAY_LIST: ClassId = 14;
    /// Linked list
    pub const LINKED_LIST: ClassId = 15;
    /// Abstract set
    pub const SET: ClassId = 16;
    /// Hash set
    pub const HASH_SET: ClassId = 17;
    /// Abstract map
    pub const MAP: ClassId = 18;
    /// Hash map
    pub const HASH_MAP: ClassId = 19;
    /// Insertion-ordered hash map
    pub const LINKED_HASH_MAP: ClassId = 20;
}

static STANDARD_REGISTRY: Lazy<ClassRegistry> = Lazy::new(ClassRegistry::with_standard_library);

/// Shared registry holding only the standard library
pub fn standard_registry() -> &'static ClassRegistry {
    &STANDARD_REGISTRY
}

impl ClassRegistry {
    /// Create a registry pre-populated with the standard library
    pub fn with_standard_library() -> Self {
        let mut registry = ClassRegistry::new();
        install_standard_library(&mut registry);
        registry
    }
}

fn boxed(name: &str, parent: ClassId, kind: PrimitiveType) -> ClassBuilder {
    let value_type = TypeInfo::primitive(kind);
    ClassBuilder::new(name)
        .extends(parent)
        .kind(ClassKind::Boxed)
        .field(FieldDefinition::new("value", value_type.clone()).private())
        .constructor(ConstructorDefinition::assigning(vec![ParameterDefinition::new(
            "value", value_type,
        )]))
}

fn capacity_constructor() -> ConstructorDefinition {
    ConstructorDefinition::new(|_, args| match args.first().and_then(Value::as_i32) {
        Some(capacity) if capacity < 0 => Err(format!("Illegal capacity: {}", capacity)),
        _ => Ok(()),
    })
    .with_param(ParameterDefinition::new(
        "initialCapacity",
        TypeInfo::primitive(PrimitiveType::Int),
    ))
}

fn install_standard_library(registry: &mut ClassRegistry) {
    use core_class_ids::*;

    let builders = vec![
        ClassBuilder::new("Object").default_constructor(),
        ClassBuilder::new("Number")
            .extends(OBJECT)
            .abstract_class()
            .default_constructor(),
        boxed("Boolean", OBJECT, PrimitiveType::Boolean),
        boxed("Byte", NUMBER, PrimitiveType::Byte),
        boxed("Short", NUMBER, PrimitiveType::Short),
        boxed("Integer", NUMBER, PrimitiveType::Int),
        boxed("Long", NUMBER, PrimitiveType::Long),
        boxed("Float", NUMBER, PrimitiveType::Float),
        boxed("Double", NUMBER, PrimitiveType::Double),
        boxed("Character", OBJECT, PrimitiveType::Char),
        boxed("String", OBJECT, PrimitiveType::Str).default_constructor(),
        ClassBuilder::new("Enum")
            .extends(OBJECT)
            .kind(ClassKind::Enum)
            .abstract_class()
            .field(FieldDefinition::new("name", TypeInfo::primitive(PrimitiveType::Str)).private())
            .field(FieldDefinition::new("ordinal", TypeInfo::primitive(PrimitiveType::Int)).private())
            .constructor(
                ConstructorDefinition::assigning(vec![
                    ParameterDefinition::new("name", TypeInfo::primitive(PrimitiveType::Str)),
                    ParameterDefinition::new("ordinal", TypeInfo::primitive(PrimitiveType::Int)),
                ])
                .protected(),
            ),
        ClassBuilder::new("Collection")
            .extends(OBJECT)
            .kind(ClassKind::Collection(CollectionFlavor::Sequence))
            .abstract_class(),
        ClassBuilder::new("List").extends(COLLECTION).abstract_class(),
        ClassBuilder::new("ArrayList")
            .extends(LIST)
            .default_constructor()
            .constructor(capacity_constructor()),
        ClassBuilder::new("LinkedList")
            .extends(LIST)
            .default_constructor(),
        ClassBuilder::new("Set")
            .extends(COLLECTION)
            .kind(ClassKind::Collection(CollectionFlavor::Set))
            .abstract_class(),
        ClassBuilder::new("HashSet").extends(SET).default_constructor(),
        ClassBuilder::new("Map")
            .extends(OBJECT)
            .kind(ClassKind::Map)
            .abstract_class(),
        ClassBuilder::new("HashMap")
            .extends(MAP)
            .default_constructor()
            .constructor(capacity_constructor()),
        ClassBuilder::new("LinkedHashMap")
            .extends(HASH_MAP)
            .default_constructor(),
    ];

    for builder in builders {
        registry.insert_class(builder);
    }
}

// ============================================================================
// Value helpers for the standard library types
// ============================================================================

fn boxed_value(class_id: ClassId, value: Value) -> ObjRef {
    ObjRef::instance(class_id, vec![value])
}

/// Allocate a `String` wrapper
pub fn string(s: &str) -> ObjRef {
    boxed_value(core_class_ids::STRING, Value::str(s))
}

/// Allocate an `Integer` wrapper
pub fn integer(n: i32) -> ObjRef {
    boxed_value(core_class_ids::INTEGER, Value::i32(n))
}

/// Allocate a `Long` wrapper
pub fn long(n: i64) -> ObjRef {
    boxed_value(core_class_ids::LONG, Value::i64(n))
}

/// Allocate a `Double` wrapper
pub fn double(n: f64) -> ObjRef {
    boxed_value(core_class_ids::DOUBLE, Value::f64(n))
}

/// Allocate a `Boolean` wrapper
pub fn boolean(b: bool) -> ObjRef {
    boxed_value(core_class_ids::BOOLEAN, Value::bool(b))
}

/// Allocate a `Character` wrapper
pub fn character(c: char) -> ObjRef {
    boxed_value(core_class_ids::CHARACTER, Value::char(c))
}

/// Allocate an `ArrayList` holding the given elements
pub fn array_list(elements: Vec<Value>) -> ObjRef {
    let mut list = CollectionObject::new(core_class_ids::ARRAY_LIST, CollectionFlavor::Sequence);
    list.elements = elements;
    ObjRef::new(HeapObject::Collection(list))
}

/// Allocate a `HashSet` holding the given elements (duplicates dropped)
pub fn hash_set(elements: Vec<Value>) -> ObjRef {
    let mut set = CollectionObject::new(core_class_ids::HASH_SET, CollectionFlavor::Set);
    for element in elements {
        set.add(element);
    }
    ObjRef::new(HeapObject::Collection(set))
}

/// Allocate a `HashMap` holding the given entries
pub fn hash_map(entries: Vec<(Value, Value)>) -> ObjRef {
    let mut map = MapObject::new(core_class_ids::HASH_MAP);
    for (key, value) in entries {
        map.put(key, value);
    }
    ObjRef::new(HeapObject::Map(map))
}
