//! Class registry for runtime type descriptors

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::RegistryError;
use crate::object::ObjRef;
use crate::reflect::{
    Class, ClassBuilder, ClassId, ClassKind, ConstructorInfo, FieldInfo, ParameterInfo, TypeInfo,
    Visibility,
};
use crate::value::Value;

/// Registry of all known classes
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            name_to_id: FxHashMap::default(),
        }
    }

    /// Define a new class from a builder
    ///
    /// Instance slots of the new class follow all inherited slots. Enum
    /// constants are allocated here and stored as static fields.
    pub fn define(&mut self, builder: ClassBuilder) -> Result<ClassId, RegistryError> {
        if self.name_to_id.contains_key(&builder.name) {
            return Err(RegistryError::DuplicateClass(builder.name));
        }
        if let Some(parent) = builder.parent {
            if self.get_class(parent).is_none() {
                return Err(RegistryError::UnknownParent {
                    class: builder.name,
                    parent,
                });
            }
        }
        let mut seen = FxHashSet::default();
        for field in &builder.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(RegistryError::DuplicateField {
                    class: builder.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        Ok(self.insert_class(builder))
    }

    /// Lay out and store an already validated class
    pub(crate) fn insert_class(&mut self, builder: ClassBuilder) -> ClassId {
        let id = self.next_class_id();

        let (mut field_indices, mut slot_types) = match builder.parent.and_then(|p| self.get_class(p)) {
            Some(parent) => (parent.field_indices.clone(), parent.slot_types.clone()),
            None => (FxHashMap::default(), Vec::new()),
        };

        let mut fields = Vec::new();
        let mut static_fields = Vec::new();
        let mut static_values = Vec::new();

        for def in builder.fields {
            if def.is_static {
                let value = def
                    .initial_value
                    .unwrap_or_else(|| def.type_info.zero_value());
                static_fields.push(FieldInfo {
                    name: def.name,
                    type_info: def.type_info,
                    declaring_class_id: id,
                    field_index: static_values.len(),
                    visibility: def.visibility,
                    is_static: true,
                });
                static_values.push(value);
            } else {
                let index = slot_types.len();
                slot_types.push(def.type_info.clone());
                field_indices.insert(def.name.clone(), index);
                fields.push(FieldInfo {
                    name: def.name,
                    type_info: def.type_info,
                    declaring_class_id: id,
                    field_index: index,
                    visibility: def.visibility,
                    is_static: false,
                });
            }
        }

        let constructors = builder
            .constructors
            .into_iter()
            .map(|def| ConstructorInfo {
                parameters: def
                    .parameters
                    .into_iter()
                    .enumerate()
                    .map(|(index, p)| ParameterInfo {
                        name: p.name,
                        type_info: p.type_info,
                        index,
                    })
                    .collect(),
                declaring_class_id: id,
                visibility: def.visibility,
                body: def.body,
            })
            .collect();

        // Enum constants: one shared instance per name, carrying name/ordinal
        // in the slots inherited from the Enum base when present.
        for (ordinal, constant) in builder.enum_constants.iter().enumerate() {
            let mut slots: Vec<Value> = slot_types.iter().map(|t| t.zero_value()).collect();
            if let Some(&index) = field_indices.get("name") {
                slots[index] = Value::str(constant);
            }
            if let Some(&index) = field_indices.get("ordinal") {
                slots[index] = Value::i32(ordinal as i32);
            }
            static_fields.push(FieldInfo {
                name: constant.clone(),
                type_info: TypeInfo::Class(id),
                declaring_class_id: id,
                field_index: static_values.len(),
                visibility: Visibility::Public,
                is_static: true,
            });
            static_values.push(Value::Ref(ObjRef::instance(id, slots)));
        }

        let class = Class {
            id,
            name: builder.name,
            parent_id: builder.parent,
            kind: builder.kind,
            is_abstract: builder.is_abstract,
            field_count: slot_types.len(),
            fields,
            static_fields,
            constructors,
            static_values,
            field_indices,
            slot_types,
        };

        self.name_to_id.insert(class.name.clone(), id);
        self.classes.push(class);
        id
    }

    /// Get class by ID
    pub fn get_class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Class> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(*id))
    }

    /// Get class ID by name
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.name_to_id.get(name).copied()
    }

    /// Class name for diagnostics (falls back to a placeholder for unknown IDs)
    pub fn class_name(&self, id: ClassId) -> String {
        self.get_class(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("<class #{}>", id))
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> ClassId {
        self.classes.len()
    }

    /// Get number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate()
    }

    /// Get the class hierarchy (inheritance chain) for a class
    ///
    /// The first element is the class itself, the last is the root ancestor.
    pub fn hierarchy(&self, class_id: ClassId) -> Vec<&Class> {
        let mut hierarchy = Vec::new();
        let mut current_id = Some(class_id);

        while let Some(id) = current_id {
            if let Some(class) = self.get_class(id) {
                hierarchy.push(class);
                current_id = class.parent_id;
            } else {
                break;
            }
        }

        hierarchy
    }

    /// Check if a class is a subclass of (or equal to) another class
    pub fn is_subclass_of(&self, sub_class_id: ClassId, super_class_id: ClassId) -> bool {
        self.hierarchy(sub_class_id)
            .iter()
            .any(|class| class.id == super_class_id)
    }

    /// Structural kind of a class, taking inheritance into account
    ///
    /// Walks from the class toward the root and returns the first kind that
    /// is not `Object`. `Boxed` only counts on the class itself: a subclass
    /// of a wrapper is not a wrapper. Unknown IDs are plain objects.
    pub fn effective_kind(&self, class_id: ClassId) -> ClassKind {
        for (depth, class) in self.hierarchy(class_id).into_iter().enumerate() {
            match class.kind {
                ClassKind::Object => {}
                ClassKind::Boxed if depth > 0 => {}
                kind => return kind,
            }
        }
        ClassKind::Object
    }

    /// Look up an enum constant by class and name
    pub fn enum_constant(&self, class_id: ClassId, name: &str) -> Option<ObjRef> {
        self.get_class(class_id)
            .and_then(|c| c.static_value(name))
            .and_then(|v| v.as_object().cloned())
    }
}
