//! Runtime Reflection
//!
//! This module provides the runtime type descriptors the clone engine walks,
//! and the reflective operations it needs on them:
//! - class registry with inheritance and slot layout
//! - type classification into copy strategies
//! - field enumeration and permission-checked slot access
//! - instance creation through registered constructors
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut registry = ClassRegistry::with_standard_library();
//! let point = registry.define(
//!     ClassBuilder::new("Point")
//!         .field(FieldDefinition::new("x", TypeInfo::primitive(PrimitiveType::Int)))
//!         .default_constructor(),
//! )?;
//!
//! let accessor = Accessor::privileged();
//! let obj = InstanceFactory::new(&registry, &accessor).new_instance(point)?;
//! let x = FieldEnumerator::new(&registry).find(point, "x").unwrap();
//! x.write(&registry, &accessor, &obj, Value::i32(3))?;
//! ```

pub mod bootstrap;
mod builder;
mod class;
mod class_registry;
mod classifier;
mod factory;
mod fields;
mod permissions;
mod types;

pub use bootstrap::{core_class_ids, standard_registry};
pub use builder::{ClassBuilder, ConstructorDefinition, FieldDefinition, ParameterDefinition};
pub use class::{
    Class, ClassId, ClassKind, CollectionFlavor, ConstructorBody, ConstructorInfo, FieldInfo, Init,
    ParameterInfo,
};
pub use class_registry::ClassRegistry;
pub use classifier::{TypeCategory, TypeClassifier};
pub use factory::InstanceFactory;
pub use fields::{FieldEnumerator, FieldSlot};
pub use permissions::{Accessor, ParsePermissionError, ReflectionPermission};
pub use types::{TypeInfo, Visibility};
