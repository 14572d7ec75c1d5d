//! Error types
//!
//! `ConstructionError` and `AccessError` are raised by the reflection layer.
//! The clone engine wraps both into `CloneError` together with the name of
//! the type being processed.

use thiserror::Error;

use crate::reflect::ClassId;

/// Instance creation failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConstructionError {
    /// Class ID not present in the registry
    #[error("Unknown class id {0}")]
    UnknownClass(ClassId),

    /// Class can never be instantiated (abstract, enum)
    #[error("Class {class} is not instantiable: {reason}")]
    NotInstantiable {
        /// Class name
        class: String,
        /// Why it cannot be instantiated
        reason: &'static str,
    },

    /// No invocable constructor
    #[error("No usable constructor found for class {class}")]
    NoConstructor {
        /// Class name
        class: String,
    },

    /// Boxed scalar class lacks a one-argument constructor for its value slot
    #[error("No boxing constructor found for class {class}")]
    NoBoxingConstructor {
        /// Class name
        class: String,
    },

    /// Constructor body reported failure
    #[error("Constructor of {class} failed: {message}")]
    InitFailed {
        /// Class name
        class: String,
        /// Message reported by the constructor
        message: String,
    },
}

/// Slot read/write failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    /// Accessor lacks the required permission
    #[error("{operation} access to {class}.{field} denied")]
    Denied {
        /// Owning class name
        class: String,
        /// Field name
        field: String,
        /// "read" or "write"
        operation: &'static str,
    },

    /// Target is not a class instance
    #[error("Cannot access {class}.{field} on a non-instance ({shape})")]
    NotAnInstance {
        /// Owning class name
        class: String,
        /// Field name
        field: String,
        /// Actual object shape
        shape: &'static str,
    },

    /// Target instance's class does not inherit the owning class
    #[error("Cannot access {class}.{field} on an instance of {found}")]
    WrongClass {
        /// Owning class name
        class: String,
        /// Field name
        field: String,
        /// Actual class name
        found: String,
    },

    /// Slot index outside the instance's storage
    #[error("Slot {index} of {class}.{field} is out of bounds")]
    SlotOutOfBounds {
        /// Owning class name
        class: String,
        /// Field name
        field: String,
        /// Slot index
        index: usize,
    },

    /// Boxed scalar class has no `value` slot
    #[error("Boxed class {class} has no value slot")]
    MissingValueSlot {
        /// Class name
        class: String,
    },

    /// Object storage does not match its classification
    #[error("Expected {expected} storage, found {found}")]
    ShapeMismatch {
        /// Expected storage shape
        expected: &'static str,
        /// Actual storage shape
        found: &'static str,
    },
}

/// Failure of a `clone()` call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CloneError {
    /// An instance of `type_name` could not be constructed
    #[error("Failed to clone {type_name}: {source}")]
    Construction {
        /// Offending type
        type_name: String,
        /// Underlying failure
        #[source]
        source: ConstructionError,
    },

    /// A slot of `type_name` could not be read or written
    #[error("Failed to clone {type_name}: {source}")]
    Access {
        /// Offending type
        type_name: String,
        /// Underlying failure
        #[source]
        source: AccessError,
    },

    /// Reference chain deeper than the configured limit
    #[error("Clone depth limit {limit} exceeded at {type_name}")]
    DepthExceeded {
        /// Configured limit
        limit: usize,
        /// Type being entered when the limit was hit
        type_name: String,
    },
}

impl CloneError {
    /// Wrap a construction failure
    pub fn construction(type_name: impl Into<String>, source: ConstructionError) -> Self {
        CloneError::Construction {
            type_name: type_name.into(),
            source,
        }
    }

    /// Wrap an access failure
    pub fn access(type_name: impl Into<String>, source: AccessError) -> Self {
        CloneError::Access {
            type_name: type_name.into(),
            source,
        }
    }

    /// Name of the type the failure occurred at
    pub fn type_name(&self) -> &str {
        match self {
            CloneError::Construction { type_name, .. }
            | CloneError::Access { type_name, .. }
            | CloneError::DepthExceeded { type_name, .. } => type_name,
        }
    }
}

/// Class registration failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    /// A class with this name already exists
    #[error("Class {0} is already registered")]
    DuplicateClass(String),

    /// Parent class ID not registered
    #[error("Parent class id {parent} of {class} is not registered")]
    UnknownParent {
        /// Class being defined
        class: String,
        /// Missing parent ID
        parent: ClassId,
    },

    /// Two fields with the same name declared on one class
    #[error("Field {field} declared twice on {class}")]
    DuplicateField {
        /// Class being defined
        class: String,
        /// Field name
        field: String,
    },
}
