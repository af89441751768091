//! Compile jobs.
//!
//! A job is one schema file, held as its path relative to the schema root
//! with forward slashes. The native compiler's path parser does not accept
//! the Windows separator, so normalization happens here, once, before any
//! command is constructed.

use std::path::Path;

use crate::error::{DriverError, Result};

/// One schema file to compile, canonicalized relative to the schema root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    relative: String,
}

impl CompileJob {
    /// Normalize a schema path against the schema root.
    ///
    /// Absolute paths must lie under the schema root and are relativized;
    /// relative paths are taken as already root-relative. Host path
    /// separators are replaced with forward slashes.
    pub fn new(path: impl AsRef<Path>, schema_root: &Path) -> Result<CompileJob> {
        let path = path.as_ref();

        let relative = if path.is_absolute() {
            path.strip_prefix(schema_root)
                .map_err(|_| DriverError::Config {
                    detail: format!(
                        "schema {} is outside the schema root {}",
                        path.display(),
                        schema_root.display()
                    ),
                })?
        } else {
            path
        };

        let mut normalized = relative.display().to_string().replace('\\', "/");
        while normalized.ends_with('/') {
            normalized.pop();
        }
        if normalized.is_empty() {
            return Err(DriverError::Config {
                detail: "empty schema path".into(),
            });
        }

        Ok(CompileJob {
            relative: normalized,
        })
    }

    /// The canonical relative path, forward-slash separated.
    pub fn relative_path(&self) -> &str {
        &self.relative
    }
}

impl std::fmt::Display for CompileJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn relative_path_kept_as_is() {
        let root = PathBuf::from("/project/schema");
        let job = CompileJob::new("alpha/alpha.capnp", &root).unwrap();
        assert_eq!(job.relative_path(), "alpha/alpha.capnp");
    }

    #[test]
    fn absolute_path_relativized() {
        let root = PathBuf::from("/project/schema");
        let job = CompileJob::new("/project/schema/beta/beta.capnp", &root).unwrap();
        assert_eq!(job.relative_path(), "beta/beta.capnp");
    }

    #[test]
    fn absolute_path_outside_root_rejected() {
        let root = PathBuf::from("/project/schema");
        let err = CompileJob::new("/elsewhere/beta.capnp", &root).unwrap_err();
        assert!(matches!(err, DriverError::Config { .. }));
    }

    #[test]
    fn backslashes_normalized() {
        let root = PathBuf::from("/project/schema");
        let job = CompileJob::new(r"alpha\alpha.capnp", &root).unwrap();
        assert_eq!(job.relative_path(), "alpha/alpha.capnp");
    }

    #[test]
    fn empty_path_rejected() {
        let root = PathBuf::from("/project/schema");
        assert!(CompileJob::new("", &root).is_err());
    }
}
