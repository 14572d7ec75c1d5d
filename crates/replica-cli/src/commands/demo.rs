//! `replica demo`: clone the sample graph and report on the copy.

use anyhow::Context;
use replica_engine::{graph, CloneConfig, MemoPolicy, Value};
use std::path::PathBuf;
use tracing::info;

use crate::sample;

pub struct DemoArgs {
    pub config: Option<PathBuf>,
    pub policy: Option<MemoPolicy>,
    pub max_depth: Option<usize>,
    pub cyclic: bool,
    pub json: bool,
}

pub fn execute(args: DemoArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => CloneConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => CloneConfig::default(),
    };
    if let Some(policy) = args.policy {
        config.clone.memo_policy = policy;
    }
    if let Some(max_depth) = args.max_depth {
        config.clone.max_depth = max_depth;
    }
    config.validate()?;

    let (registry, man) = sample::registry()?;
    let source = Value::Ref(sample::man(man, args.cyclic));
    info!(policy = ?config.clone.memo_policy, max_depth = config.clone.max_depth, "cloning sample graph");

    let copy = config
        .engine(&registry)
        .clone(&source)
        .context("clone failed")?;

    let field = |value: &Value, index: usize| value.as_object().and_then(|obj| obj.get_field(index));
    let books_distinct = match (field(&source, 2), field(&copy, 2)) {
        (Some(a), Some(b)) => !a.same_reference(&b),
        _ => false,
    };

    let distinct = !copy.same_reference(&source);
    let equal = graph::deep_equals(&source, &copy);

    if args.json {
        let report = serde_json::json!({
            "source": graph::render(&registry, &source),
            "clone": graph::render(&registry, &copy),
            "distinct": distinct,
            "deep_equal": equal,
            "books_distinct": books_distinct,
            "memo_policy": format!("{:?}", config.clone.memo_policy),
            "max_depth": config.clone.max_depth,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("source: {}", graph::display(&registry, &source));
        println!("clone: {}", graph::display(&registry, &copy));
        println!("distinct: {}", distinct);
        println!("deep equal: {}", equal);
        println!("books distinct: {}", books_distinct);
    }

    if !distinct || !equal {
        anyhow::bail!("clone does not match its source");
    }
    Ok(())
}
