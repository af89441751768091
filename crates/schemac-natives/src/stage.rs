//! Resource staging into a run-local working directory.
//!
//! Staging copies a native resource out of its packaged location into the
//! working directory and marks it executable. A destination that already
//! exists is left untouched, so repeated runs over the same working
//! directory do not re-copy. Copies go through a temp name and are renamed
//! into place; a failed copy never leaves an executable-looking partial
//! file behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{NativesError, Result};
use crate::platform::Platform;

/// Stages native resources into one working directory.
#[derive(Debug, Clone)]
pub struct ResourceStager {
    work_dir: PathBuf,
}

impl ResourceStager {
    /// Create a stager rooted at the given working directory.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        ResourceStager {
            work_dir: work_dir.into(),
        }
    }

    /// The working directory this stager writes into.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Copy `source` to `<work_dir>/<relative>` and mark it executable.
    ///
    /// Returns the destination path. Skips the copy if the destination
    /// already exists from a prior stage call.
    pub fn stage(&self, source: &Path, relative: &str) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(NativesError::MissingResource {
                path: source.to_path_buf(),
            });
        }

        let dest = self.work_dir.join(relative);
        if dest.is_file() {
            debug!("already staged, skipping: {}", dest.display());
            return Ok(dest);
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| NativesError::Staging {
                path: parent.to_path_buf(),
                detail: format!("creating destination directory: {e}"),
            })?;
        }

        // Appended suffix, not a substituted extension: siblings differing
        // only in extension must not share a temp name.
        let mut tmp = dest.clone().into_os_string();
        tmp.push(".partial");
        let tmp = PathBuf::from(tmp);
        if let Err(e) = copy_and_finalize(source, &tmp, &dest) {
            let _ = fs::remove_file(&tmp);
            return Err(NativesError::Staging {
                path: dest,
                detail: e.to_string(),
            });
        }

        debug!("staged {} -> {}", source.display(), dest.display());
        Ok(dest)
    }
}

fn copy_and_finalize(source: &Path, tmp: &Path, dest: &Path) -> std::io::Result<()> {
    fs::copy(source, tmp)?;
    mark_executable(tmp)?;
    fs::rename(tmp, dest)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
    // Windows derives executability from the file extension.
    Ok(())
}

/// The three staged native resources an orchestration run needs.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    /// Absolute path of the schema compiler executable.
    pub compiler: PathBuf,
    /// Absolute path of the codegen plugin executable.
    pub plugin: PathBuf,
    /// Absolute path of the plugin's support schema.
    pub plugin_schema: PathBuf,
}

impl ResourceBundle {
    /// Build a bundle from paths the caller has already resolved and made
    /// executable. Each path must be an existing regular file.
    pub fn from_resolved(
        compiler: impl Into<PathBuf>,
        plugin: impl Into<PathBuf>,
        plugin_schema: impl Into<PathBuf>,
    ) -> Result<ResourceBundle> {
        let bundle = ResourceBundle {
            compiler: compiler.into(),
            plugin: plugin.into(),
            plugin_schema: plugin_schema.into(),
        };
        for path in [&bundle.compiler, &bundle.plugin, &bundle.plugin_schema] {
            if !path.is_file() {
                return Err(NativesError::MissingResource { path: path.clone() });
            }
        }
        Ok(bundle)
    }

    /// Stage all three resources out of an unpacked natives package laid
    /// out by the platform's relative resource paths.
    pub fn stage(
        stager: &ResourceStager,
        platform: Platform,
        package_root: &Path,
    ) -> Result<ResourceBundle> {
        let compiler = stager.stage(
            &package_root.join(platform.compiler_resource()),
            platform.compiler_resource(),
        )?;
        let plugin = stager.stage(
            &package_root.join(platform.plugin_resource()),
            platform.plugin_resource(),
        )?;
        let plugin_schema = stager.stage(
            &package_root.join(platform.schema_resource()),
            platform.schema_resource(),
        )?;

        Ok(ResourceBundle {
            compiler,
            plugin,
            plugin_schema,
        })
    }

    /// Directory holding the plugin's support schema. Always an implicit
    /// import path for compilation.
    pub fn plugin_schema_dir(&self) -> &Path {
        self.plugin_schema
            .parent()
            .unwrap_or_else(|| Path::new("."))
    }
}
