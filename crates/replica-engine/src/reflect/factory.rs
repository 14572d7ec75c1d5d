//! Instance factory
//!
//! Produces empty, structurally valid instances of registered classes
//! without knowing anything about their domain logic. Storage is allocated
//! from the class kind and then handed to a constructor body.
//!
//! Constructor selection:
//! 1. a zero-argument constructor the accessor may invoke;
//! 2. otherwise the first invocable constructor, called with placeholder
//!    arguments (primitive zero, a fresh zero-arg instance, or null).

use tracing::{trace, warn};

use crate::error::ConstructionError;
use crate::object::{ArrayObject, CollectionObject, HeapObject, Instance, MapObject, ObjRef};
use crate::reflect::{
    Accessor, Class, ClassId, ClassKind, ClassRegistry, ConstructorInfo, Init, TypeInfo,
};
use crate::value::Value;

/// Creates instances through registered constructors
#[derive(Debug, Clone, Copy)]
pub struct InstanceFactory<'a> {
    registry: &'a ClassRegistry,
    accessor: &'a Accessor,
}

impl<'a> InstanceFactory<'a> {
    /// Create a factory over a registry
    pub fn new(registry: &'a ClassRegistry, accessor: &'a Accessor) -> Self {
        Self { registry, accessor }
    }

    /// Create a new instance of a class
    pub fn new_instance(&self, class_id: ClassId) -> Result<ObjRef, ConstructionError> {
        let class = self.instantiable(class_id)?;

        if let Some(ctor) = self.zero_arg_constructor(class) {
            return self.invoke(class, ctor, &[]);
        }

        let ctor = class
            .constructors
            .iter()
            .find(|c| self.accessor.can_invoke(class.id, c.visibility))
            .ok_or_else(|| ConstructionError::NoConstructor {
                class: class.name.clone(),
            })?;
        let args: Vec<Value> = ctor
            .parameters
            .iter()
            .map(|p| self.placeholder(&p.type_info))
            .collect();
        warn!(
            class = %class.name,
            arity = ctor.arity(),
            "no zero-argument constructor, using placeholder arguments"
        );
        self.invoke(class, ctor, &args)
    }

    /// Create a boxed scalar around `value`
    ///
    /// Uses the constructor whose single parameter has type `value_type`.
    pub fn new_boxed(
        &self,
        class_id: ClassId,
        value_type: &TypeInfo,
        value: Value,
    ) -> Result<ObjRef, ConstructionError> {
        let class = self.instantiable(class_id)?;
        let ctor = class
            .constructors
            .iter()
            .find(|c| {
                c.arity() == 1
                    && &c.parameters[0].type_info == value_type
                    && self.accessor.can_invoke(class.id, c.visibility)
            })
            .ok_or_else(|| ConstructionError::NoBoxingConstructor {
                class: class.name.clone(),
            })?;
        self.invoke(class, ctor, &[value])
    }

    /// Allocate an array with every element set to the component's zero value
    pub fn new_array(&self, component: TypeInfo, length: usize) -> ObjRef {
        ObjRef::new(HeapObject::Array(ArrayObject::new(component, length)))
    }

    fn instantiable(&self, class_id: ClassId) -> Result<&'a Class, ConstructionError> {
        let class = self
            .registry
            .get_class(class_id)
            .ok_or(ConstructionError::UnknownClass(class_id))?;
        if class.is_abstract {
            return Err(ConstructionError::NotInstantiable {
                class: class.name.clone(),
                reason: "abstract class",
            });
        }
        if self.registry.effective_kind(class_id) == ClassKind::Enum {
            return Err(ConstructionError::NotInstantiable {
                class: class.name.clone(),
                reason: "enum constants are fixed",
            });
        }
        Ok(class)
    }

    fn zero_arg_constructor(&self, class: &'a Class) -> Option<&'a ConstructorInfo> {
        class
            .constructors
            .iter()
            .find(|c| c.parameters.is_empty() && self.accessor.can_invoke(class.id, c.visibility))
    }

    /// Default argument for a constructor parameter
    fn placeholder(&self, type_info: &TypeInfo) -> Value {
        match type_info {
            TypeInfo::Primitive(p) => Value::Primitive(p.zero()),
            TypeInfo::Array(_) => Value::Null,
            TypeInfo::Class(id) => self
                .instantiable(*id)
                .ok()
                .and_then(|class| {
                    let ctor = self.zero_arg_constructor(class)?;
                    self.invoke(class, ctor, &[]).ok()
                })
                .map(Value::Ref)
                .unwrap_or(Value::Null),
        }
    }

    fn allocate(&self, class: &Class) -> HeapObject {
        match self.registry.effective_kind(class.id) {
            ClassKind::Collection(flavor) => {
                HeapObject::Collection(CollectionObject::new(class.id, flavor))
            }
            ClassKind::Map => HeapObject::Map(MapObject::new(class.id)),
            ClassKind::Object | ClassKind::Boxed | ClassKind::Enum => {
                let slots = class.slot_types().iter().map(TypeInfo::zero_value).collect();
                HeapObject::Instance(Instance::new(class.id, slots))
            }
        }
    }

    fn check_arguments(&self, ctor: &ConstructorInfo, args: &[Value]) -> Result<(), String> {
        if args.len() != ctor.arity() {
            return Err(format!(
                "expected {} arguments, got {}",
                ctor.arity(),
                args.len()
            ));
        }
        for (param, arg) in ctor.parameters.iter().zip(args) {
            let accepted = match (&param.type_info, arg) {
                (TypeInfo::Primitive(kind), Value::Primitive(p)) => p.primitive_type() == *kind,
                (TypeInfo::Primitive(_), _) => false,
                (_, Value::Null) => true,
                (TypeInfo::Class(expected), Value::Ref(r)) => r
                    .class_id()
                    .is_some_and(|actual| self.registry.is_subclass_of(actual, *expected)),
                (TypeInfo::Array(_), Value::Ref(r)) => r.read().as_array().is_some(),
                (_, Value::Primitive(_)) => false,
            };
            if !accepted {
                return Err(format!(
                    "argument '{}' is not a {}",
                    param.name,
                    param.type_info.name(self.registry)
                ));
            }
        }
        Ok(())
    }

    fn invoke(
        &self,
        class: &Class,
        ctor: &ConstructorInfo,
        args: &[Value],
    ) -> Result<ObjRef, ConstructionError> {
        let init_failed = |message: String| ConstructionError::InitFailed {
            class: class.name.clone(),
            message,
        };
        self.check_arguments(ctor, args).map_err(init_failed)?;

        let this = ObjRef::new(self.allocate(class));
        let mut init = Init::new(&this, class);
        (ctor.body)(&mut init, args).map_err(init_failed)?;

        trace!(class = %class.name, arity = ctor.arity(), "constructed instance");
        Ok(this)
    }
}
