//! `schemac clean` — remove generated sources and the working directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Remove the output and working directories if they exist.
pub fn run(output_dir: &Path, work_dir: &Path) -> Result<()> {
    for dir in [output_dir, work_dir] {
        if dir.is_dir() {
            fs::remove_dir_all(dir).with_context(|| format!("removing {}", dir.display()))?;
            println!("Removed {}", dir.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_removes_existing_dirs_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("nested")).unwrap();

        run(&out, &dir.path().join("never-created")).unwrap();
        assert!(!out.exists());
    }
}
