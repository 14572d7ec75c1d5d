//! Integration tests for the deep clone engine
//!
//! Covers the sample scenario, aliasing, cycles under both memo policies,
//! boxed scalars, containers, construction and access failures, statics,
//! configuration and concurrent use.

use replica_engine::clone::{CloneEngine, CloneOptions, MemoPolicy};
use replica_engine::error::{AccessError, CloneError, ConstructionError};
use replica_engine::graph::{deep_equals, render};
use replica_engine::object::ObjRef;
use replica_engine::reflect::{
    bootstrap, core_class_ids, Accessor, ClassBuilder, ClassId, ClassRegistry,
    ConstructorDefinition, FieldDefinition, ParameterDefinition, TypeInfo,
};
use replica_engine::value::{PrimitiveType, Value};

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    registry: ClassRegistry,
    man: ClassId,
    node: ClassId,
    pair: ClassId,
}

fn int() -> TypeInfo {
    TypeInfo::primitive(PrimitiveType::Int)
}

fn object() -> TypeInfo {
    TypeInfo::class(core_class_ids::OBJECT)
}

fn fixture() -> Fixture {
    let mut registry = ClassRegistry::with_standard_library();
    let man = registry
        .define(
            ClassBuilder::new("Man")
                .field(FieldDefinition::new("name", TypeInfo::class(core_class_ids::STRING)))
                .field(FieldDefinition::new("id", int()))
                .field(FieldDefinition::new("books", TypeInfo::class(core_class_ids::LIST)))
                .default_constructor(),
        )
        .unwrap();
    let node = registry
        .define(
            ClassBuilder::new("Node")
                .field(FieldDefinition::new("value", int()))
                .field(FieldDefinition::new("next", object()))
                .default_constructor(),
        )
        .unwrap();
    let pair = registry
        .define(
            ClassBuilder::new("Pair")
                .field(FieldDefinition::new("left", object()))
                .field(FieldDefinition::new("right", object()))
                .default_constructor(),
        )
        .unwrap();
    Fixture {
        registry,
        man,
        node,
        pair,
    }
}

fn sample_man(fx: &Fixture) -> ObjRef {
    let books = bootstrap::array_list(
        ["book1", "book2", "book3"]
            .iter()
            .map(|b| Value::Ref(bootstrap::string(b)))
            .collect(),
    );
    ObjRef::instance(
        fx.man,
        vec![Value::Ref(bootstrap::string("Man")), Value::i32(1), Value::Ref(books)],
    )
}

fn node(fx: &Fixture, value: i32) -> ObjRef {
    ObjRef::instance(fx.node, vec![Value::i32(value), Value::null()])
}

fn obj(value: &Value) -> &ObjRef {
    value.as_object().expect("expected a reference")
}

fn engine_with(registry: &ClassRegistry, policy: MemoPolicy, max_depth: usize) -> CloneEngine<'_> {
    CloneEngine::with_options(
        registry,
        CloneOptions {
            memo_policy: policy,
            max_depth,
            ..CloneOptions::default()
        },
    )
}

// ============================================================================
// Scenario Tests
// ============================================================================

mod scenario {
    use super::*;

    #[test]
    fn test_man_clone_is_distinct_and_equal() {
        let fx = fixture();
        let source = Value::Ref(sample_man(&fx));
        let copy = replica_engine::clone(&fx.registry, &source).unwrap();

        assert!(!copy.same_reference(&source));
        assert!(deep_equals(&source, &copy));
        assert_eq!(
            render(&fx.registry, &copy),
            "Man{name=Man, id=1, books=[book1, book2, book3]}"
        );

        let source_books = obj(&source).get_field(2).unwrap();
        let copy_books = obj(&copy).get_field(2).unwrap();
        assert!(!copy_books.same_reference(&source_books));
        assert_eq!(obj(&copy_books).class_id(), Some(core_class_ids::ARRAY_LIST));
    }

    #[test]
    fn test_clone_is_independent() {
        let fx = fixture();
        let source = sample_man(&fx);
        let copy = replica_engine::clone(&fx.registry, &Value::Ref(source.clone())).unwrap();
        let copy = obj(&copy);

        copy.set_field(1, Value::i32(99)).unwrap();
        let books = copy.get_field(2).unwrap();
        obj(&books)
            .write()
            .as_collection_mut()
            .unwrap()
            .add(Value::Ref(bootstrap::string("book4")));

        assert_eq!(source.get_field(1), Some(Value::i32(1)));
        let source_books = source.get_field(2).unwrap();
        assert_eq!(obj(&source_books).read().as_collection().unwrap().len(), 3);

        // And the other way round
        source.set_field(1, Value::i32(7)).unwrap();
        assert_eq!(copy.get_field(1), Some(Value::i32(99)));
    }

    #[test]
    fn test_runtime_subclass_is_preserved() {
        let mut fx = fixture();
        let special = fx
            .registry
            .define(
                ClassBuilder::new("SpecialNode")
                    .extends(fx.node)
                    .field(FieldDefinition::new("tag", TypeInfo::primitive(PrimitiveType::Str)))
                    .default_constructor(),
            )
            .unwrap();
        let child = ObjRef::instance(special, vec![Value::i32(2), Value::null(), Value::str("x")]);
        let root = ObjRef::instance(fx.node, vec![Value::i32(1), Value::Ref(child)]);

        let copy = replica_engine::clone(&fx.registry, &Value::Ref(root.clone())).unwrap();
        let copied_child = obj(&copy).get_field(1).unwrap();
        assert_eq!(obj(&copied_child).class_id(), Some(special));
        assert_eq!(obj(&copied_child).get_field(2), Some(Value::str("x")));
        assert!(deep_equals(&Value::Ref(root), &copy));
    }
}

// ============================================================================
// Identity Sharing Tests
// ============================================================================

mod sharing {
    use super::*;

    #[test]
    fn test_shared_child_cloned_once() {
        let fx = fixture();
        let shared = node(&fx, 5);
        let pair = ObjRef::instance(fx.pair, vec![Value::Ref(shared.clone()), Value::Ref(shared.clone())]);

        for policy in [MemoPolicy::OnEntry, MemoPolicy::OnField] {
            let engine = engine_with(&fx.registry, policy, 64);
            let copy = engine.clone(&Value::Ref(pair.clone())).unwrap();
            let left = obj(&copy).get_field(0).unwrap();
            let right = obj(&copy).get_field(1).unwrap();

            assert!(left.same_reference(&right));
            assert!(!left.same_reference(&Value::Ref(shared.clone())));
        }
    }

    #[test]
    fn test_equal_but_distinct_objects_stay_distinct() {
        let fx = fixture();
        let pair = ObjRef::instance(
            fx.pair,
            vec![Value::Ref(node(&fx, 1)), Value::Ref(node(&fx, 1))],
        );
        let copy = replica_engine::clone(&fx.registry, &Value::Ref(pair)).unwrap();
        let left = obj(&copy).get_field(0).unwrap();
        let right = obj(&copy).get_field(1).unwrap();

        assert!(!left.same_reference(&right));
        assert!(deep_equals(&left, &right));
    }

    #[test]
    fn test_repeated_list_elements() {
        let fx = fixture();
        let a = node(&fx, 1);
        let b = node(&fx, 2);
        let list = bootstrap::array_list(vec![
            Value::Ref(a.clone()),
            Value::Ref(b),
            Value::Ref(a.clone()),
        ]);

        let copy = replica_engine::clone(&fx.registry, &Value::Ref(list)).unwrap();
        let guard = obj(&copy).read();
        let elements = &guard.as_collection().unwrap().elements;
        assert_eq!(elements.len(), 3);
        assert!(elements[0].same_reference(&elements[2]));
        assert!(!elements[0].same_reference(&elements[1]));
        assert!(!elements[0].same_reference(&Value::Ref(a)));
    }
}

// ============================================================================
// Cycle Tests
// ============================================================================

mod cycles {
    use super::*;

    #[test]
    fn test_self_reference_terminates() {
        let fx = fixture();
        let a = node(&fx, 1);
        a.set_field(1, Value::Ref(a.clone())).unwrap();

        for policy in [MemoPolicy::OnEntry, MemoPolicy::OnField] {
            let copy = engine_with(&fx.registry, policy, 16)
                .clone(&Value::Ref(a.clone()))
                .unwrap();
            let next = obj(&copy).get_field(1).unwrap();
            assert!(next.same_reference(&copy));
            assert!(!copy.same_reference(&Value::Ref(a.clone())));
        }
    }

    #[test]
    fn test_indirect_cycle_on_entry() {
        let fx = fixture();
        let a = node(&fx, 1);
        let b = node(&fx, 2);
        a.set_field(1, Value::Ref(b.clone())).unwrap();
        b.set_field(1, Value::Ref(a.clone())).unwrap();

        let copy = engine_with(&fx.registry, MemoPolicy::OnEntry, 16)
            .clone(&Value::Ref(a.clone()))
            .unwrap();
        let b_copy = obj(&copy).get_field(1).unwrap();
        let back = obj(&b_copy).get_field(1).unwrap();

        assert!(back.same_reference(&copy));
        assert!(!b_copy.same_reference(&Value::Ref(b)));
        assert!(deep_equals(&Value::Ref(a), &copy));
    }

    #[test]
    fn test_indirect_cycle_on_field_hits_depth_limit() {
        let fx = fixture();
        let a = node(&fx, 1);
        let b = node(&fx, 2);
        a.set_field(1, Value::Ref(b.clone())).unwrap();
        b.set_field(1, Value::Ref(a.clone())).unwrap();

        let err = engine_with(&fx.registry, MemoPolicy::OnField, 32)
            .clone(&Value::Ref(a))
            .unwrap_err();
        assert_eq!(
            err,
            CloneError::DepthExceeded {
                limit: 32,
                type_name: "Node".to_string()
            }
        );
    }

    #[test]
    fn test_container_holding_itself() {
        let fx = fixture();
        let list = bootstrap::array_list(vec![Value::i32(1)]);
        list.write()
            .as_collection_mut()
            .unwrap()
            .add(Value::Ref(list.clone()));

        let copy = replica_engine::clone(&fx.registry, &Value::Ref(list.clone())).unwrap();
        let guard = obj(&copy).read();
        let elements = &guard.as_collection().unwrap().elements;
        assert_eq!(elements[0], Value::i32(1));
        assert!(elements[1].same_reference(&copy));
    }
}

// ============================================================================
// Boxed Scalar Tests
// ============================================================================

mod boxed {
    use super::*;

    #[test]
    fn test_boxed_values_rewrapped() {
        let fx = fixture();
        let sources = [
            bootstrap::integer(42),
            bootstrap::long(1 << 40),
            bootstrap::double(2.5),
            bootstrap::boolean(true),
            bootstrap::character('z'),
            bootstrap::string("text"),
        ];
        for source in sources {
            let source = Value::Ref(source);
            let copy = replica_engine::clone(&fx.registry, &source).unwrap();
            assert!(!copy.same_reference(&source));
            assert_eq!(obj(&copy).class_id(), obj(&source).class_id());
            assert_eq!(obj(&copy).get_field(0), obj(&source).get_field(0));
        }
    }

    #[test]
    fn test_shared_boxed_slot_not_memoized() {
        let fx = fixture();
        let text = bootstrap::string("same");
        let pair = ObjRef::instance(
            fx.pair,
            vec![Value::Ref(text.clone()), Value::Ref(text)],
        );
        let copy = replica_engine::clone(&fx.registry, &Value::Ref(pair)).unwrap();
        let left = obj(&copy).get_field(0).unwrap();
        let right = obj(&copy).get_field(1).unwrap();

        // Each occurrence is rewrapped on its own
        assert!(!left.same_reference(&right));
        assert!(deep_equals(&left, &right));
    }

    #[test]
    fn test_user_boxed_class_without_boxing_constructor() {
        let mut fx = fixture();
        let meters = fx
            .registry
            .define(
                ClassBuilder::new("Meters")
                    .kind(replica_engine::reflect::ClassKind::Boxed)
                    .field(FieldDefinition::new("value", int()).private())
                    .default_constructor(),
            )
            .unwrap();
        let source = ObjRef::instance(meters, vec![Value::i32(3)]);
        let err = replica_engine::clone(&fx.registry, &Value::Ref(source)).unwrap_err();
        assert_eq!(
            err,
            CloneError::construction(
                "Meters",
                ConstructionError::NoBoxingConstructor {
                    class: "Meters".to_string()
                }
            )
        );
    }
}

// ============================================================================
// Container Tests
// ============================================================================

mod containers {
    use super::*;

    #[test]
    fn test_array_elements_cloned() {
        let fx = fixture();
        let a = node(&fx, 1);
        let array = ObjRef::array(
            TypeInfo::class(fx.node),
            vec![Value::Ref(a.clone()), Value::null(), Value::Ref(a.clone())],
        );

        let copy = replica_engine::clone(&fx.registry, &Value::Ref(array.clone())).unwrap();
        let guard = obj(&copy).read();
        let copied = guard.as_array().unwrap();
        assert_eq!(copied.component, TypeInfo::class(fx.node));
        assert_eq!(copied.len(), 3);
        assert!(copied.elements[1].is_null());
        assert!(copied.elements[0].same_reference(&copied.elements[2]));
        assert!(!copied.elements[0].same_reference(&Value::Ref(a)));
    }

    #[test]
    fn test_primitive_array() {
        let fx = fixture();
        let array = ObjRef::array(int(), vec![Value::i32(1), Value::i32(2)]);
        let copy = replica_engine::clone(&fx.registry, &Value::Ref(array.clone())).unwrap();
        assert!(!copy.same_reference(&Value::Ref(array.clone())));
        assert!(deep_equals(&Value::Ref(array), &copy));
        assert_eq!(render(&fx.registry, &copy), "[1, 2]");
    }

    #[test]
    fn test_set_keeps_class_and_members() {
        let fx = fixture();
        let set = bootstrap::hash_set(vec![
            Value::Ref(node(&fx, 1)),
            Value::Ref(node(&fx, 2)),
            Value::str("plain"),
        ]);
        let copy = replica_engine::clone(&fx.registry, &Value::Ref(set.clone())).unwrap();
        assert_eq!(obj(&copy).class_id(), Some(core_class_ids::HASH_SET));
        assert_eq!(obj(&copy).read().as_collection().unwrap().len(), 3);
        assert!(deep_equals(&Value::Ref(set), &copy));
    }

    #[test]
    fn test_map_keys_and_values_memoized() {
        let fx = fixture();
        let k = node(&fx, 1);
        let map = bootstrap::hash_map(vec![
            (Value::Ref(k.clone()), Value::Ref(k.clone())),
            (Value::str("two"), Value::Ref(bootstrap::integer(2))),
        ]);

        let copy = replica_engine::clone(&fx.registry, &Value::Ref(map.clone())).unwrap();
        let guard = obj(&copy).read();
        let entries = &guard.as_map().unwrap().entries;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].0.same_reference(&entries[0].1));
        assert!(!entries[0].0.same_reference(&Value::Ref(k)));
        assert_eq!(entries[1].0, Value::str("two"));
        drop(guard);
        assert!(deep_equals(&Value::Ref(map), &copy));
    }

    #[test]
    fn test_enum_constants_shared() {
        let mut fx = fixture();
        let color = fx
            .registry
            .define(
                ClassBuilder::new("Color")
                    .extends(core_class_ids::ENUM)
                    .enum_constant("RED")
                    .enum_constant("BLUE"),
            )
            .unwrap();
        let red = fx.registry.enum_constant(color, "RED").unwrap();
        let pair = ObjRef::instance(fx.pair, vec![Value::Ref(red.clone()), Value::null()]);

        let copy = replica_engine::clone(&fx.registry, &Value::Ref(pair)).unwrap();
        let left = obj(&copy).get_field(0).unwrap();
        assert!(left.same_reference(&Value::Ref(red.clone())));

        let direct = replica_engine::clone(&fx.registry, &Value::Ref(red.clone())).unwrap();
        assert!(direct.same_reference(&Value::Ref(red)));
    }
}

// ============================================================================
// Construction Tests
// ============================================================================

mod construction {
    use super::*;

    #[test]
    fn test_no_construction_path_fails() {
        let mut fx = fixture();
        let widget = fx
            .registry
            .define(ClassBuilder::new("Widget").field(FieldDefinition::new("size", int())))
            .unwrap();
        let holder = ObjRef::instance(
            fx.pair,
            vec![Value::Ref(ObjRef::instance(widget, vec![Value::i32(3)])), Value::null()],
        );

        let err = replica_engine::clone(&fx.registry, &Value::Ref(holder)).unwrap_err();
        assert_eq!(err.type_name(), "Widget");
        assert_eq!(
            err.to_string(),
            "Failed to clone Widget: No usable constructor found for class Widget"
        );
        assert!(matches!(
            err,
            CloneError::Construction {
                source: ConstructionError::NoConstructor { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_constructor_rejecting_placeholder_fails() {
        let mut fx = fixture();
        let strict = fx
            .registry
            .define(
                ClassBuilder::new("Strict")
                    .field(FieldDefinition::new("inner", object()))
                    .constructor(
                        ConstructorDefinition::new(|init, args| {
                            if args[0].is_null() {
                                return Err("inner must not be null".to_string());
                            }
                            init.set("inner", args[0].clone())
                        })
                        .with_param(ParameterDefinition::new("inner", TypeInfo::class(fx.node))),
                    ),
            )
            .unwrap();
        let source = ObjRef::instance(strict, vec![Value::Ref(node(&fx, 1))]);

        // Node has a zero-arg constructor, so the placeholder is a fresh Node
        let copy = replica_engine::clone(&fx.registry, &Value::Ref(source.clone())).unwrap();
        assert!(deep_equals(&Value::Ref(source), &copy));

        let picky = fx
            .registry
            .define(
                ClassBuilder::new("Picky")
                    .constructor(
                        ConstructorDefinition::new(|_, args| {
                            if args[0].is_null() {
                                Err("array required".to_string())
                            } else {
                                Ok(())
                            }
                        })
                        .with_param(ParameterDefinition::new("items", TypeInfo::array(int()))),
                    ),
            )
            .unwrap();
        let err = replica_engine::clone(&fx.registry, &Value::Ref(ObjRef::instance(picky, vec![])))
            .unwrap_err();
        assert_eq!(
            err,
            CloneError::construction(
                "Picky",
                ConstructionError::InitFailed {
                    class: "Picky".to_string(),
                    message: "array required".to_string(),
                }
            )
        );
    }

    #[test]
    fn test_fallback_constructor_values_overwritten() {
        let mut fx = fixture();
        let point = fx
            .registry
            .define(
                ClassBuilder::new("Point")
                    .field(FieldDefinition::new("x", int()))
                    .field(FieldDefinition::new("y", int()))
                    .constructor(ConstructorDefinition::assigning(vec![
                        ParameterDefinition::new("x", int()),
                        ParameterDefinition::new("y", int()),
                    ])),
            )
            .unwrap();
        let source = ObjRef::instance(point, vec![Value::i32(3), Value::i32(4)]);
        let copy = replica_engine::clone(&fx.registry, &Value::Ref(source)).unwrap();
        assert_eq!(obj(&copy).get_field(0), Some(Value::i32(3)));
        assert_eq!(obj(&copy).get_field(1), Some(Value::i32(4)));
    }
}

// ============================================================================
// Access Tests
// ============================================================================

mod access {
    use super::*;

    fn secret_registry() -> (ClassRegistry, ClassId) {
        let mut registry = ClassRegistry::with_standard_library();
        let secret = registry
            .define(
                ClassBuilder::new("Secret")
                    .field(FieldDefinition::new("label", int()))
                    .field(FieldDefinition::new("code", int()).private())
                    .default_constructor(),
            )
            .unwrap();
        (registry, secret)
    }

    #[test]
    fn test_private_fields_copied_with_default_accessor() {
        let (registry, secret) = secret_registry();
        let source = ObjRef::instance(secret, vec![Value::i32(1), Value::i32(1234)]);
        let copy = replica_engine::clone(&registry, &Value::Ref(source)).unwrap();
        assert_eq!(obj(&copy).get_field(1), Some(Value::i32(1234)));
    }

    #[test]
    fn test_public_only_accessor_denied() {
        let (registry, secret) = secret_registry();
        let source = ObjRef::instance(secret, vec![Value::i32(1), Value::i32(1234)]);
        let engine = CloneEngine::with_options(
            &registry,
            CloneOptions {
                accessor: Accessor::public_only(),
                ..CloneOptions::default()
            },
        );

        let err = engine.clone(&Value::Ref(source)).unwrap_err();
        assert_eq!(
            err,
            CloneError::access(
                "Secret",
                AccessError::Denied {
                    class: "Secret".to_string(),
                    field: "code".to_string(),
                    operation: "read",
                }
            )
        );
    }

    #[test]
    fn test_private_constructor() {
        let mut registry = ClassRegistry::with_standard_library();
        let singleton = registry
            .define(
                ClassBuilder::new("Hidden")
                    .field(FieldDefinition::new("n", int()))
                    .constructor(ConstructorDefinition::empty().private()),
            )
            .unwrap();
        let source = Value::Ref(ObjRef::instance(singleton, vec![Value::i32(8)]));

        assert!(replica_engine::clone(&registry, &source).is_ok());

        let engine = CloneEngine::with_options(
            &registry,
            CloneOptions {
                accessor: Accessor::public_only(),
                ..CloneOptions::default()
            },
        );
        assert!(matches!(
            engine.clone(&source),
            Err(CloneError::Construction {
                source: ConstructionError::NoConstructor { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_inherited_private_fields_copied() {
        let (mut registry, secret) = secret_registry();
        let agent = registry
            .define(
                ClassBuilder::new("Agent")
                    .extends(secret)
                    .field(FieldDefinition::new("alias", TypeInfo::primitive(PrimitiveType::Str)))
                    .default_constructor(),
            )
            .unwrap();
        let source = ObjRef::instance(agent, vec![Value::i32(1), Value::i32(7), Value::str("bond")]);
        let copy = replica_engine::clone(&registry, &Value::Ref(source.clone())).unwrap();
        assert_eq!(obj(&copy).get_field(1), Some(Value::i32(7)));
        assert!(deep_equals(&Value::Ref(source), &copy));
    }
}

// ============================================================================
// Static Field Tests
// ============================================================================

mod statics {
    use super::*;

    #[test]
    fn test_static_fields_not_copied() {
        let mut registry = ClassRegistry::with_standard_library();
        let shared = bootstrap::array_list(vec![]);
        let registry_entry = registry
            .define(
                ClassBuilder::new("Entry")
                    .field(FieldDefinition::new("id", int()))
                    .field(
                        FieldDefinition::new("ALL", TypeInfo::class(core_class_ids::LIST))
                            .as_static()
                            .initial_value(Value::Ref(shared.clone())),
                    )
                    .default_constructor(),
            )
            .unwrap();
        let source = ObjRef::instance(registry_entry, vec![Value::i32(4)]);

        let copy = replica_engine::clone(&registry, &Value::Ref(source)).unwrap();
        assert_eq!(obj(&copy).read().as_instance().unwrap().field_count(), 1);

        let class = registry.get_class(registry_entry).unwrap();
        assert!(class.static_value("ALL").unwrap().same_reference(&Value::Ref(shared)));
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config {
    use super::*;
    use replica_engine::config::{CloneConfig, ConfigError};
    use std::io::Write;

    #[test]
    fn test_engine_from_config_file() {
        let fx = fixture();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[clone]\nmemo_policy = \"on-field\"\nmax_depth = 8").unwrap();

        let config = CloneConfig::from_file(file.path()).unwrap();
        let engine = config.engine(&fx.registry);

        let a = node(&fx, 1);
        let b = node(&fx, 2);
        a.set_field(1, Value::Ref(b.clone())).unwrap();
        b.set_field(1, Value::Ref(a.clone())).unwrap();

        assert!(matches!(
            engine.clone(&Value::Ref(a)),
            Err(CloneError::DepthExceeded { limit: 8, .. })
        ));
    }

    #[test]
    fn test_config_rejects_unenforceable_depth() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[clone]\nmemo_policy = \"on-field\"\nmax_depth = 10000000").unwrap();

        assert!(matches!(
            CloneConfig::from_file(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_public_only_from_config() {
        let registry = ClassRegistry::with_standard_library();
        let config = CloneConfig::from_toml_str(
            "[clone]\npermissions = \"READ_PUBLIC|WRITE_PUBLIC|INVOKE_PUBLIC\"\n",
        )
        .unwrap();

        // Boxed values keep their payload in a private slot
        let err = config
            .engine(&registry)
            .clone(&Value::Ref(bootstrap::integer(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            CloneError::Access {
                source: AccessError::Denied { .. },
                ..
            }
        ));
    }
}

// ============================================================================
// Concurrency Tests
// ============================================================================

mod concurrency {
    use super::*;

    #[test]
    fn test_parallel_clones_of_shared_graph() {
        let fx = fixture();
        let source = Value::Ref(sample_man(&fx));
        let engine = CloneEngine::new(&fx.registry);

        let (first, second) = std::thread::scope(|s| {
            let one = s.spawn(|| engine.clone(&source));
            let two = s.spawn(|| engine.clone(&source));
            (one.join().unwrap(), two.join().unwrap())
        });
        let first = first.unwrap();
        let second = second.unwrap();

        assert!(!first.same_reference(&second));
        assert!(deep_equals(&first, &source));
        assert!(deep_equals(&second, &source));
        let books_one = obj(&first).get_field(2).unwrap();
        let books_two = obj(&second).get_field(2).unwrap();
        assert!(!books_one.same_reference(&books_two));
    }
}
