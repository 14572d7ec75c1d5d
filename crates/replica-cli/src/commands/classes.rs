//! `replica classes`: list the sample registry.

use replica_engine::reflect::TypeClassifier;
use replica_engine::TypeInfo;

use crate::sample;

pub fn execute() -> anyhow::Result<()> {
    let (registry, _) = sample::registry()?;
    let classifier = TypeClassifier::new(&registry);

    for (id, class) in registry.iter() {
        let parent = class
            .parent_id
            .map(|p| registry.class_name(p))
            .unwrap_or_else(|| "-".to_string());
        let category = classifier.classify(&TypeInfo::class(id));
        println!(
            "{:>3}  {:<16} {:<16} {:?}{}",
            id,
            class.name,
            parent,
            category,
            if class.is_abstract { " (abstract)" } else { "" }
        );
    }
    Ok(())
}
