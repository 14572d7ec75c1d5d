//! `replica init`: write a default engine configuration.

use replica_engine::CloneConfig;
use std::path::Path;

pub fn execute(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    CloneConfig::default().to_file(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
