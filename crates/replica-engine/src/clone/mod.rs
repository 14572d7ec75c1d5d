//! Deep clone engine
//!
//! Produces an independent copy of an object graph. Aliasing inside the
//! source graph is preserved: two references to one source object become
//! two references to one clone. Self references resolve to the new object.
//!
//! Copy strategy per runtime category:
//!
//! | Category     | Strategy                                         |
//! |--------------|--------------------------------------------------|
//! | Primitive    | copied by value                                  |
//! | Enumeration  | shared (constants are singletons)                |
//! | BoxedScalar  | `value` slot rewrapped through a constructor     |
//! | Array        | new array, elements cloned                       |
//! | Collection   | new instance of the same class, elements cloned  |
//! | Map          | new instance of the same class, entries cloned   |
//! | PlainObject  | new instance, every instance slot cloned         |
//!
//! Each `clone()` call owns a fresh [`MemoizationTable`]. Boxed scalars are
//! never memoized.

mod memo;

pub use memo::MemoizationTable;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{AccessError, CloneError};
use crate::object::ObjRef;
use crate::reflect::{
    Accessor, ClassRegistry, FieldEnumerator, InstanceFactory, TypeCategory, TypeClassifier,
};
use crate::value::Value;

/// When a source object is recorded in the memoization table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoPolicy {
    /// Record as soon as the empty copy exists, before its slots are cloned.
    /// Indirect cycles resolve to the copy under construction.
    #[default]
    OnEntry,
    /// Record only after a slot value's clone completes. Indirect cycles
    /// recurse until `max_depth` is exceeded.
    OnField,
}

/// Default recursion limit
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Largest recursion limit a configuration may ask for
///
/// Recursion runs on the calling thread's stack. Limits near this value
/// need a main-thread sized stack (8 MiB); spawned threads default to 2 MiB.
pub const MAX_DEPTH_LIMIT: usize = 4096;

/// Engine options
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Memoization policy
    pub memo_policy: MemoPolicy,
    /// Maximum nesting of copied objects below the root
    pub max_depth: usize,
    /// Capability used for slot access and constructor invocation
    pub accessor: Accessor,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            memo_policy: MemoPolicy::OnEntry,
            max_depth: DEFAULT_MAX_DEPTH,
            accessor: Accessor::privileged(),
        }
    }
}

/// Deep clone engine bound to a class registry
///
/// The engine holds no per-call state and may be shared across threads.
#[derive(Debug)]
pub struct CloneEngine<'r> {
    registry: &'r ClassRegistry,
    options: CloneOptions,
}

impl<'r> CloneEngine<'r> {
    /// Create an engine with default options
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self::with_options(registry, CloneOptions::default())
    }

    /// Create an engine with explicit options
    pub fn with_options(registry: &'r ClassRegistry, options: CloneOptions) -> Self {
        Self { registry, options }
    }

    /// Registry the engine resolves classes against
    pub fn registry(&self) -> &'r ClassRegistry {
        self.registry
    }

    /// Engine options
    pub fn options(&self) -> &CloneOptions {
        &self.options
    }

    /// Deep-clone a value
    ///
    /// Fails on the first construction or access error; no partial result
    /// is returned.
    pub fn clone(&self, value: &Value) -> Result<Value, CloneError> {
        let mut session = CloneSession::new(self.registry, &self.options);
        if let Some(source) = value.as_object() {
            debug!(
                type_name = %session.type_name(source),
                policy = ?self.options.memo_policy,
                "cloning object graph"
            );
        }
        let result = session.clone_value(value);
        debug!(
            memoized = session.memo.len(),
            ok = result.is_ok(),
            "clone finished"
        );
        result
    }
}

/// State of one `clone()` call
struct CloneSession<'a> {
    registry: &'a ClassRegistry,
    options: &'a CloneOptions,
    classifier: TypeClassifier<'a>,
    fields: FieldEnumerator<'a>,
    factory: InstanceFactory<'a>,
    memo: MemoizationTable,
}

impl<'a> CloneSession<'a> {
    fn new(registry: &'a ClassRegistry, options: &'a CloneOptions) -> Self {
        Self {
            registry,
            options,
            classifier: TypeClassifier::new(registry),
            fields: FieldEnumerator::new(registry),
            factory: InstanceFactory::new(registry, &options.accessor),
            memo: MemoizationTable::new(),
        }
    }

    fn type_name(&self, source: &ObjRef) -> String {
        source.runtime_type().name(self.registry)
    }

    fn shape_mismatch(&self, source: &ObjRef, expected: &'static str) -> CloneError {
        let found = source.read().shape_name();
        CloneError::access(
            self.type_name(source),
            AccessError::ShapeMismatch { expected, found },
        )
    }

    fn clone_value(&mut self, value: &Value) -> Result<Value, CloneError> {
        match value {
            Value::Null | Value::Primitive(_) => Ok(value.clone()),
            Value::Ref(source) => {
                if let Some(hit) = self.memo.get(source) {
                    return Ok(Value::Ref(hit.clone()));
                }
                let category = self.classifier.classify(&source.runtime_type());
                self.copy(source, category, 0).map(Value::Ref)
            }
        }
    }

    /// Clone a value held by `owner` (slot, element, key or entry value)
    fn clone_slot(
        &mut self,
        owner: &ObjRef,
        owner_copy: &ObjRef,
        value: &Value,
        depth: usize,
    ) -> Result<Value, CloneError> {
        let source = match value {
            Value::Null | Value::Primitive(_) => return Ok(value.clone()),
            Value::Ref(source) => source,
        };
        if source.ptr_eq(owner) {
            return Ok(Value::Ref(owner_copy.clone()));
        }
        if let Some(hit) = self.memo.get(source) {
            trace!(type_name = %self.type_name(source), "memo hit");
            return Ok(Value::Ref(hit.clone()));
        }

        let category = self.classifier.classify(&source.runtime_type());
        let copy = self.copy(source, category, depth + 1)?;
        if is_copied_structurally(category) {
            self.memo.insert(source, &copy);
        }
        Ok(Value::Ref(copy))
    }

    fn copy(&mut self, source: &ObjRef, category: TypeCategory, depth: usize) -> Result<ObjRef, CloneError> {
        if is_copied_structurally(category) && depth > self.options.max_depth {
            return Err(CloneError::DepthExceeded {
                limit: self.options.max_depth,
                type_name: self.type_name(source),
            });
        }
        match category {
            TypeCategory::Primitive | TypeCategory::Enumeration => Ok(source.clone()),
            TypeCategory::BoxedScalar => self.rebox(source),
            TypeCategory::Array => self.clone_array(source, depth),
            TypeCategory::Collection => self.clone_collection(source, depth),
            TypeCategory::Map => self.clone_map(source, depth),
            TypeCategory::PlainObject => self.clone_object(source, depth),
        }
    }

    fn on_entry(&mut self, source: &ObjRef, copy: &ObjRef) {
        if self.options.memo_policy == MemoPolicy::OnEntry {
            self.memo.insert(source, copy);
        }
    }

    /// New wrapper of the same class around the source's `value` slot
    fn rebox(&mut self, source: &ObjRef) -> Result<ObjRef, CloneError> {
        let type_name = self.type_name(source);
        let class_id = source
            .class_id()
            .ok_or_else(|| self.shape_mismatch(source, "instance"))?;
        let slot = self
            .fields
            .find(class_id, "value")
            .ok_or_else(|| {
                CloneError::access(
                    &type_name,
                    AccessError::MissingValueSlot {
                        class: type_name.clone(),
                    },
                )
            })?;
        let value = slot
            .read(self.registry, &self.options.accessor, source)
            .map_err(|e| CloneError::access(&type_name, e))?;
        self.factory
            .new_boxed(class_id, &slot.declared_type, value)
            .map_err(|e| CloneError::construction(&type_name, e))
    }

    fn clone_object(&mut self, source: &ObjRef, depth: usize) -> Result<ObjRef, CloneError> {
        let type_name = self.type_name(source);
        let class_id = source
            .class_id()
            .ok_or_else(|| self.shape_mismatch(source, "instance"))?;
        let copy = self
            .factory
            .new_instance(class_id)
            .map_err(|e| CloneError::construction(&type_name, e))?;
        trace!(type_name = %type_name, depth, "copying object");
        self.on_entry(source, &copy);

        let options = self.options;
        let accessor = &options.accessor;
        for slot in self.fields.fields_of(class_id) {
            let value = slot
                .read(self.registry, accessor, source)
                .map_err(|e| CloneError::access(&type_name, e))?;
            let cloned = self.clone_slot(source, &copy, &value, depth)?;
            slot.write(self.registry, accessor, &copy, cloned)
                .map_err(|e| CloneError::access(&type_name, e))?;
        }
        Ok(copy)
    }

    fn clone_array(&mut self, source: &ObjRef, depth: usize) -> Result<ObjRef, CloneError> {
        let snapshot = source
            .read()
            .as_array()
            .map(|array| (array.component.clone(), array.elements.clone()));
        let (component, elements) = snapshot.ok_or_else(|| self.shape_mismatch(source, "array"))?;
        let copy = self.factory.new_array(component, elements.len());
        self.on_entry(source, &copy);

        let mut cloned = Vec::with_capacity(elements.len());
        for element in &elements {
            cloned.push(self.clone_slot(source, &copy, element, depth)?);
        }
        if let Some(array) = copy.write().as_array_mut() {
            array.elements = cloned;
        }
        Ok(copy)
    }

    fn clone_collection(&mut self, source: &ObjRef, depth: usize) -> Result<ObjRef, CloneError> {
        let snapshot = source
            .read()
            .as_collection()
            .map(|collection| (collection.class_id, collection.elements.clone()));
        let (class_id, elements) =
            snapshot.ok_or_else(|| self.shape_mismatch(source, "collection"))?;
        let type_name = self.type_name(source);
        let copy = self
            .factory
            .new_instance(class_id)
            .map_err(|e| CloneError::construction(&type_name, e))?;
        self.on_entry(source, &copy);

        let mut cloned = Vec::with_capacity(elements.len());
        for element in &elements {
            cloned.push(self.clone_slot(source, &copy, element, depth)?);
        }

        // Storage shape follows the class kind, same as the classification
        if let Some(collection) = copy.write().as_collection_mut() {
            for element in cloned {
                collection.add(element);
            }
        }
        Ok(copy)
    }

    fn clone_map(&mut self, source: &ObjRef, depth: usize) -> Result<ObjRef, CloneError> {
        let snapshot = source
            .read()
            .as_map()
            .map(|map| (map.class_id, map.entries.clone()));
        let (class_id, entries) = snapshot.ok_or_else(|| self.shape_mismatch(source, "map"))?;
        let type_name = self.type_name(source);
        let copy = self
            .factory
            .new_instance(class_id)
            .map_err(|e| CloneError::construction(&type_name, e))?;
        self.on_entry(source, &copy);

        let mut cloned = Vec::with_capacity(entries.len());
        for (key, value) in &entries {
            let key = self.clone_slot(source, &copy, key, depth)?;
            let value = self.clone_slot(source, &copy, value, depth)?;
            cloned.push((key, value));
        }

        if let Some(map) = copy.write().as_map_mut() {
            for (key, value) in cloned {
                map.put(key, value);
            }
        }
        Ok(copy)
    }
}

/// Categories that produce a fresh copy with children
fn is_copied_structurally(category: TypeCategory) -> bool {
    matches!(
        category,
        TypeCategory::Array | TypeCategory::Collection | TypeCategory::Map | TypeCategory::PlainObject
    )
}
