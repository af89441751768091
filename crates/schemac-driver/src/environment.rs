//! Work environment staging.
//!
//! The native compiler resolves relative imports against its own working
//! directory, so the full schema source tree is mirrored under one
//! controlled working directory before compilation. Import resolution then
//! behaves the same no matter where the invoking tool was started from or
//! how the schemas were named.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{DriverError, Result};

/// A prepared, read-only compilation environment.
#[derive(Debug, Clone)]
pub struct WorkEnvironment {
    /// Directory receiving generated sources.
    pub output_dir: PathBuf,
    /// Working directory holding the mirrored schema tree and staged natives.
    pub work_dir: PathBuf,
    /// Root of the original schema sources.
    pub schema_root: PathBuf,
    /// Import directories in command order: plugin schema dir, schema root,
    /// then caller-supplied extras. Never deduplicated.
    pub import_dirs: Vec<PathBuf>,
}

impl WorkEnvironment {
    /// Validate the directory arguments, create the output and working
    /// directories, mirror the schema tree, and fix the import order.
    ///
    /// Validation happens before any filesystem mutation: a regular file
    /// where a directory belongs is a configuration error and leaves the
    /// filesystem untouched.
    pub fn prepare(
        schema_root: &Path,
        work_dir: &Path,
        output_dir: &Path,
        plugin_schema_dir: &Path,
        extra_import_dirs: &[PathBuf],
    ) -> Result<WorkEnvironment> {
        validate(schema_root, work_dir, output_dir, extra_import_dirs)?;

        for dir in [output_dir, work_dir] {
            fs::create_dir_all(dir).map_err(|e| DriverError::Mirror {
                dir: dir.to_path_buf(),
                detail: format!("creating directory: {e}"),
            })?;
        }

        mirror_tree(schema_root, work_dir)?;
        debug!(
            "mirrored {} into {}",
            schema_root.display(),
            work_dir.display()
        );

        let mut import_dirs = vec![plugin_schema_dir.to_path_buf(), schema_root.to_path_buf()];
        import_dirs.extend(extra_import_dirs.iter().cloned());

        Ok(WorkEnvironment {
            output_dir: output_dir.to_path_buf(),
            work_dir: work_dir.to_path_buf(),
            schema_root: schema_root.to_path_buf(),
            import_dirs,
        })
    }
}

/// Check the directory arguments without touching the filesystem.
///
/// The schema root must be an existing directory; the work and output
/// directories and every extra import directory may be absent, but must not
/// be existing regular files.
pub(crate) fn validate(
    schema_root: &Path,
    work_dir: &Path,
    output_dir: &Path,
    extra_import_dirs: &[PathBuf],
) -> Result<()> {
    if !schema_root.is_dir() {
        return Err(DriverError::Config {
            detail: format!("schema root is not a directory: {}", schema_root.display()),
        });
    }
    for (name, dir) in [("output directory", output_dir), ("work directory", work_dir)] {
        if dir.is_file() {
            return Err(DriverError::Config {
                detail: format!("{name} is a regular file: {}", dir.display()),
            });
        }
    }
    for dir in extra_import_dirs {
        if dir.is_file() {
            return Err(DriverError::Config {
                detail: format!("import directory is a regular file: {}", dir.display()),
            });
        }
    }
    Ok(())
}

/// Recursively copy the directory structure and files of `src` into `dst`.
/// Existing files are overwritten, so re-running over a used working
/// directory refreshes the mirror.
fn mirror_tree(src: &Path, dst: &Path) -> Result<()> {
    let entries = fs::read_dir(src).map_err(|e| DriverError::Mirror {
        dir: src.to_path_buf(),
        detail: format!("reading directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| DriverError::Mirror {
            dir: src.to_path_buf(),
            detail: format!("reading entry: {e}"),
        })?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if from.is_dir() {
            fs::create_dir_all(&to).map_err(|e| DriverError::Mirror {
                dir: to.clone(),
                detail: format!("creating directory: {e}"),
            })?;
            mirror_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| DriverError::Mirror {
                dir: src.to_path_buf(),
                detail: format!("copying {}: {e}", from.display()),
            })?;
        }
    }

    Ok(())
}
