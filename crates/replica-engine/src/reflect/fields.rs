//! Field enumeration and slot access
//!
//! [`FieldEnumerator`] lists the instance fields of a class and its
//! ancestors as [`FieldSlot`]s. Slots read and write through an
//! [`Accessor`], which decides whether restricted fields are reachable.

use crate::error::AccessError;
use crate::object::ObjRef;
use crate::reflect::{Accessor, ClassId, ClassRegistry, FieldInfo, TypeInfo, Visibility};
use crate::value::Value;

/// One instance field of a class, inherited fields included
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    /// Field name
    pub name: String,
    /// Declared type
    pub declared_type: TypeInfo,
    /// Declaring class
    pub owner: ClassId,
    /// Declaring class name
    pub owner_name: String,
    /// Slot index in instance storage
    pub index: usize,
    /// Visibility
    pub visibility: Visibility,
}

impl FieldSlot {
    fn from_info(info: &FieldInfo, owner_name: &str) -> Self {
        Self {
            name: info.name.clone(),
            declared_type: info.type_info.clone(),
            owner: info.declaring_class_id,
            owner_name: owner_name.to_string(),
            index: info.field_index,
            visibility: info.visibility,
        }
    }

    fn denied(&self, operation: &'static str) -> AccessError {
        AccessError::Denied {
            class: self.owner_name.clone(),
            field: self.name.clone(),
            operation,
        }
    }

    fn check_target(&self, registry: &ClassRegistry, target: &ObjRef) -> Result<(), AccessError> {
        let guard = target.read();
        let instance = guard.as_instance().ok_or_else(|| AccessError::NotAnInstance {
            class: self.owner_name.clone(),
            field: self.name.clone(),
            shape: guard.shape_name(),
        })?;
        if !registry.is_subclass_of(instance.class_id, self.owner) {
            return Err(AccessError::WrongClass {
                class: self.owner_name.clone(),
                field: self.name.clone(),
                found: registry.class_name(instance.class_id),
            });
        }
        if self.index >= instance.field_count() {
            return Err(AccessError::SlotOutOfBounds {
                class: self.owner_name.clone(),
                field: self.name.clone(),
                index: self.index,
            });
        }
        Ok(())
    }

    /// Read the slot from an instance of the owning class
    pub fn read(
        &self,
        registry: &ClassRegistry,
        accessor: &Accessor,
        target: &ObjRef,
    ) -> Result<Value, AccessError> {
        if !accessor.can_read(self.owner, self.visibility) {
            return Err(self.denied("read"));
        }
        self.check_target(registry, target)?;
        target.get_field(self.index).ok_or(AccessError::SlotOutOfBounds {
            class: self.owner_name.clone(),
            field: self.name.clone(),
            index: self.index,
        })
    }

    /// Write the slot of an instance of the owning class
    pub fn write(
        &self,
        registry: &ClassRegistry,
        accessor: &Accessor,
        target: &ObjRef,
        value: Value,
    ) -> Result<(), AccessError> {
        if !accessor.can_write(self.owner, self.visibility) {
            return Err(self.denied("write"));
        }
        self.check_target(registry, target)?;
        target.set_field(self.index, value).map_err(|_| AccessError::SlotOutOfBounds {
            class: self.owner_name.clone(),
            field: self.name.clone(),
            index: self.index,
        })
    }
}

/// Lists instance fields of registered classes
#[derive(Debug, Clone, Copy)]
pub struct FieldEnumerator<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> FieldEnumerator<'a> {
    /// Create an enumerator over a registry
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    /// Instance fields of a class and all its ancestors
    ///
    /// The class's own fields come first, in declaration order, followed by
    /// each ancestor's. Static fields are never included. Unknown classes
    /// have no fields.
    pub fn fields_of(&self, class_id: ClassId) -> Vec<FieldSlot> {
        self.registry
            .hierarchy(class_id)
            .into_iter()
            .flat_map(|class| class.fields.iter().map(move |f| FieldSlot::from_info(f, &class.name)))
            .collect()
    }

    /// Instance fields declared on the class itself
    pub fn declared_fields(&self, class_id: ClassId) -> Vec<FieldSlot> {
        self.registry
            .get_class(class_id)
            .map(|class| {
                class
                    .fields
                    .iter()
                    .map(|f| FieldSlot::from_info(f, &class.name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find a field by name, searching from the class toward the root
    pub fn find(&self, class_id: ClassId, name: &str) -> Option<FieldSlot> {
        self.registry.hierarchy(class_id).into_iter().find_map(|class| {
            class
                .fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| FieldSlot::from_info(f, &class.name))
        })
    }
}
