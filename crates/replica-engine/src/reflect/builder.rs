//! Class builder
//!
//! Describes a class (fields, constructors, kind, ancestry) before it is
//! registered. [`ClassRegistry::define`](crate::reflect::ClassRegistry::define)
//! turns a builder into a [`Class`](crate::reflect::Class) and assigns slot
//! offsets.

use std::sync::Arc;

use crate::reflect::{ClassId, ClassKind, ConstructorBody, Init, TypeInfo, Visibility};
use crate::value::Value;

/// Definition for a field
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Type information
    pub type_info: TypeInfo,
    /// Visibility
    pub visibility: Visibility,
    /// Whether this is a static field
    pub is_static: bool,
    /// Initial value of a static field
    pub initial_value: Option<Value>,
}

impl FieldDefinition {
    /// Create a public instance field
    pub fn new(name: &str, type_info: TypeInfo) -> Self {
        Self {
            name: name.to_string(),
            type_info,
            visibility: Visibility::Public,
            is_static: false,
            initial_value: None,
        }
    }

    /// Mark as private
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark as protected
    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }

    /// Mark as static field
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set the initial value (static fields)
    pub fn initial_value(mut self, value: Value) -> Self {
        self.initial_value = Some(value);
        self
    }
}

/// Parameter definition for constructor signatures
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
    /// Parameter name
    pub name: String,
    /// Parameter type info
    pub type_info: TypeInfo,
}

impl ParameterDefinition {
    /// Create a new parameter definition
    pub fn new(name: &str, type_info: TypeInfo) -> Self {
        Self {
            name: name.to_string(),
            type_info,
        }
    }
}

/// Definition for a constructor
#[derive(Clone)]
pub struct ConstructorDefinition {
    /// Parameters in order
    pub parameters: Vec<ParameterDefinition>,
    /// Visibility
    pub visibility: Visibility,
    /// Initialization logic
    pub body: ConstructorBody,
}

impl ConstructorDefinition {
    /// Create a public constructor with the given body
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Init<'_>, &[Value]) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            parameters: Vec::new(),
            visibility: Visibility::Public,
            body: Arc::new(body),
        }
    }

    /// Zero-argument constructor that leaves every slot at its zero value
    pub fn empty() -> Self {
        Self::new(|_, _| Ok(()))
    }

    /// Constructor assigning each argument to the field of the same name
    ///
    /// Parameter names must match field names.
    pub fn assigning(parameters: Vec<ParameterDefinition>) -> Self {
        let names: Vec<String> = parameters.iter().map(|p| p.name.clone()).collect();
        let mut ctor = Self::new(move |init, args| {
            for (name, arg) in names.iter().zip(args) {
                init.set(name, arg.clone())?;
            }
            Ok(())
        });
        ctor.parameters = parameters;
        ctor
    }

    /// Add a parameter
    pub fn with_param(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Mark as private
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark as protected
    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }
}

/// Builder for a class definition
#[derive(Clone)]
pub struct ClassBuilder {
    /// Class name
    pub name: String,
    /// Parent class
    pub parent: Option<ClassId>,
    /// Declared kind
    pub kind: ClassKind,
    /// Abstract flag
    pub is_abstract: bool,
    /// Fields in declaration order
    pub fields: Vec<FieldDefinition>,
    /// Constructors in declaration order
    pub constructors: Vec<ConstructorDefinition>,
    /// Enum constant names (enum classes only)
    pub enum_constants: Vec<String>,
}

impl ClassBuilder {
    /// Start a plain class definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            kind: ClassKind::Object,
            is_abstract: false,
            fields: Vec::new(),
            constructors: Vec::new(),
            enum_constants: Vec::new(),
        }
    }

    /// Set the parent class
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the structural kind
    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark as abstract
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a field
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a constructor
    pub fn constructor(mut self, ctor: ConstructorDefinition) -> Self {
        self.constructors.push(ctor);
        self
    }

    /// Add a public no-op zero-argument constructor
    pub fn default_constructor(self) -> Self {
        self.constructor(ConstructorDefinition::empty())
    }

    /// Add an enum constant (enum classes only)
    pub fn enum_constant(mut self, name: &str) -> Self {
        self.enum_constants.push(name.to_string());
        self
    }
}
