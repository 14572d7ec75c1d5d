//! Replica Engine
//!
//! Generic deep copy of object graphs described by a runtime type registry:
//! - **Object model**: values, heap objects and identity handles (`value`, `object`)
//! - **Reflection**: class registry, classification, field access, instance
//!   creation and permissions (`reflect` module)
//! - **Clone engine**: identity-preserving recursive copy (`clone` module)
//! - **Graph utilities**: structural equality and rendering (`graph` module)
//! - **Configuration**: TOML engine options (`config` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use replica_engine::reflect::{bootstrap, ClassRegistry};
//! use replica_engine::{graph, Value};
//!
//! let registry = ClassRegistry::with_standard_library();
//! let books = bootstrap::array_list(vec![Value::Ref(bootstrap::string("book1"))]);
//!
//! let copy = replica_engine::clone(&registry, &Value::Ref(books.clone()))?;
//! assert!(graph::deep_equals(&Value::Ref(books), &copy));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Value representation
pub mod value;

/// Heap object model
pub mod object;

/// Error types
pub mod error;

/// Runtime reflection
pub mod reflect;

/// Deep clone engine
pub mod clone;

/// Structural equality and rendering
pub mod graph;

/// Engine configuration
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use clone::{CloneEngine, CloneOptions, MemoPolicy, MemoizationTable};
pub use config::{CloneConfig, ConfigError};
pub use error::{AccessError, CloneError, ConstructionError, RegistryError};
pub use object::{HeapObject, ObjRef};
pub use reflect::{ClassRegistry, TypeInfo};
pub use value::{Primitive, PrimitiveType, Value};

/// Deep-clone a value with default options
///
/// Equivalent to `CloneEngine::new(registry).clone(value)`.
pub fn clone(registry: &ClassRegistry, value: &Value) -> Result<Value, CloneError> {
    CloneEngine::new(registry).clone(value)
}
