//! Sample class and object graph used by the demo

use anyhow::Context;
use replica_engine::object::ObjRef;
use replica_engine::reflect::{
    bootstrap, core_class_ids, ClassBuilder, ClassId, ClassRegistry, FieldDefinition, TypeInfo,
};
use replica_engine::{PrimitiveType, Value};

/// Standard library plus the `Man` class
pub fn registry() -> anyhow::Result<(ClassRegistry, ClassId)> {
    let mut registry = ClassRegistry::with_standard_library();
    let man = registry
        .define(
            ClassBuilder::new("Man")
                .field(FieldDefinition::new("name", TypeInfo::class(core_class_ids::STRING)))
                .field(FieldDefinition::new("id", TypeInfo::primitive(PrimitiveType::Int)))
                .field(FieldDefinition::new("books", TypeInfo::class(core_class_ids::LIST)))
                .field(FieldDefinition::new("favorite", TypeInfo::class(core_class_ids::OBJECT)))
                .default_constructor(),
        )
        .context("failed to define sample class Man")?;
    Ok((registry, man))
}

/// `Man{name=Man, id=1, books=[book1, book2, book3]}`
///
/// `favorite` aliases the first book. With `cyclic`, the books list also
/// holds the man himself.
pub fn man(class: ClassId, cyclic: bool) -> ObjRef {
    let books: Vec<Value> = ["book1", "book2", "book3"]
        .iter()
        .map(|title| Value::Ref(bootstrap::string(title)))
        .collect();
    let favorite = books[0].clone();
    let list = bootstrap::array_list(books);
    let man = ObjRef::instance(
        class,
        vec![
            Value::Ref(bootstrap::string("Man")),
            Value::i32(1),
            Value::Ref(list.clone()),
            favorite,
        ],
    );
    if cyclic {
        if let Some(collection) = list.write().as_collection_mut() {
            collection.add(Value::Ref(man.clone()));
        }
    }
    man
}
