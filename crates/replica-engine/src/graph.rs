//! Graph utilities: structural equality and rendering
//!
//! Both walks tolerate cycles. Neither holds an object lock while
//! descending into children.

use rustc_hash::FxHashSet;
use std::fmt;

use crate::object::{HeapObject, ObjRef};
use crate::reflect::{ClassId, ClassKind, ClassRegistry};
use crate::value::Value;

/// Structural equality of two values
///
/// Primitives compare by value. References are equal when they are the same
/// object, or when they have the same runtime type and structurally equal
/// contents. A pair already under comparison is assumed equal, so cyclic
/// graphs of the same shape compare equal.
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    let mut assumed = FxHashSet::default();
    values_equal(a, b, &mut assumed)
}

fn values_equal(a: &Value, b: &Value, assumed: &mut FxHashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Primitive(x), Value::Primitive(y)) => x == y,
        (Value::Ref(x), Value::Ref(y)) => objects_equal(x, y, assumed),
        _ => false,
    }
}

fn all_equal<'v>(
    pairs: impl Iterator<Item = (&'v Value, &'v Value)>,
    assumed: &mut FxHashSet<(usize, usize)>,
) -> bool {
    for (x, y) in pairs {
        if !values_equal(x, y, assumed) {
            return false;
        }
    }
    true
}

fn objects_equal(a: &ObjRef, b: &ObjRef, assumed: &mut FxHashSet<(usize, usize)>) -> bool {
    if a.ptr_eq(b) || !assumed.insert((a.identity(), b.identity())) {
        return true;
    }
    // Snapshots: no lock is held while recursing
    let left = a.read().clone();
    let right = b.read().clone();

    match (&left, &right) {
        (HeapObject::Instance(x), HeapObject::Instance(y)) => {
            x.class_id == y.class_id
                && x.fields.len() == y.fields.len()
                && all_equal(x.fields.iter().zip(&y.fields), assumed)
        }
        (HeapObject::Array(x), HeapObject::Array(y)) => {
            x.component == y.component
                && x.len() == y.len()
                && all_equal(x.elements.iter().zip(&y.elements), assumed)
        }
        (HeapObject::Collection(x), HeapObject::Collection(y)) => {
            x.class_id == y.class_id
                && x.len() == y.len()
                && all_equal(x.elements.iter().zip(&y.elements), assumed)
        }
        (HeapObject::Map(x), HeapObject::Map(y)) => {
            x.class_id == y.class_id
                && x.size() == y.size()
                && x.entries.iter().zip(&y.entries).all(|((xk, xv), (yk, yv))| {
                    values_equal(xk, yk, assumed) && values_equal(xv, yv, assumed)
                })
        }
        _ => false,
    }
}

/// Render a value as text
///
/// Objects render as `Name{field=value, ...}` with inherited fields first,
/// arrays and collections as `[a, b]`, maps as `{k=v}`. Boxed scalars show
/// their wrapped value and enum constants their name. A reference back into
/// an object still being rendered shows as `<cycle Name>`.
pub fn render(registry: &ClassRegistry, value: &Value) -> String {
    display(registry, value).to_string()
}

/// `Display` adapter for a value
pub fn display<'a>(registry: &'a ClassRegistry, value: &'a Value) -> Rendered<'a> {
    Rendered { registry, value }
}

/// Displayable view of a value, see [`render`]
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    registry: &'a ClassRegistry,
    value: &'a Value,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer {
            registry: self.registry,
            path: Vec::new(),
        };
        renderer.value(f, self.value)
    }
}

struct Renderer<'a> {
    registry: &'a ClassRegistry,
    /// Identities of objects on the current path
    path: Vec<usize>,
}

impl Renderer<'_> {
    fn value(&mut self, f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::Null => write!(f, "null"),
            Value::Primitive(p) => write!(f, "{}", p),
            Value::Ref(obj) => self.object(f, obj),
        }
    }

    fn list(&mut self, f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.value(f, item)?;
        }
        write!(f, "]")
    }

    fn entries(&mut self, f: &mut fmt::Formatter<'_>, entries: &[(Value, Value)]) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.value(f, key)?;
            write!(f, "=")?;
            self.value(f, value)?;
        }
        write!(f, "}}")
    }

    fn object(&mut self, f: &mut fmt::Formatter<'_>, obj: &ObjRef) -> fmt::Result {
        let name = obj.runtime_type().name(self.registry);
        if self.path.contains(&obj.identity()) {
            return write!(f, "<cycle {}>", name);
        }
        let snapshot = obj.read().clone();

        self.path.push(obj.identity());
        let result = match &snapshot {
            HeapObject::Instance(instance) => self.instance(f, &name, instance.class_id, &instance.fields),
            HeapObject::Array(array) => self.list(f, &array.elements),
            HeapObject::Collection(collection) => self.list(f, &collection.elements),
            HeapObject::Map(map) => self.entries(f, &map.entries),
        };
        self.path.pop();
        result
    }

    fn instance(
        &mut self,
        f: &mut fmt::Formatter<'_>,
        name: &str,
        class_id: ClassId,
        slots: &[Value],
    ) -> fmt::Result {
        let registry = self.registry;
        let Some(class) = registry.get_class(class_id) else {
            return write!(f, "{}", name);
        };
        let slot = |field: &str| class.field_index(field).and_then(|i| slots.get(i));

        match registry.effective_kind(class_id) {
            ClassKind::Boxed => {
                if let Some(value) = slot("value") {
                    return self.value(f, value);
                }
            }
            ClassKind::Enum => {
                if let Some(Value::Primitive(constant)) = slot("name") {
                    return write!(f, "{}", constant);
                }
            }
            _ => {}
        }

        write!(f, "{}{{", name)?;
        let mut first = true;
        for level in registry.hierarchy(class_id).into_iter().rev() {
            for field in &level.fields {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{}=", field.name)?;
                match slots.get(field.field_index) {
                    Some(value) => self.value(f, value)?,
                    None => write!(f, "?")?,
                }
            }
        }
        write!(f, "}}")
    }
}
