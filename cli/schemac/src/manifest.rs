//! `schemac.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The top-level manifest structure for a schemac project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemacManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Compilation configuration.
    #[serde(default)]
    pub compile: Option<CompileConfig>,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required).
    pub name: String,
    /// Project version.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Compilation section, mirroring the `compile` subcommand flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompileConfig {
    /// Base directory of schema sources.
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
    /// Directory receiving generated sources.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Run-local working directory.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    /// Schema file extension (without the dot).
    #[serde(default)]
    pub ext: Option<String>,
    /// Extra import directories, in order.
    #[serde(default)]
    pub import_dirs: Vec<PathBuf>,
    /// Explicit schema list, relative to the schema dir. When empty, all
    /// files with the schema extension are discovered.
    #[serde(default)]
    pub schemas: Vec<PathBuf>,
}

impl SchemacManifest {
    /// Find `schemac.toml` by walking up from `start_dir`, and parse it.
    ///
    /// Returns the manifest and the directory containing it, or `None` if
    /// no manifest exists on the path to the filesystem root.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join("schemac.toml");
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: SchemacManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing schemac.toml")
    }

    /// The compile section, or defaults when absent.
    pub fn compile(&self) -> CompileConfig {
        self.compile.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let manifest = SchemacManifest::from_str(
            r#"
[project]
name = "telemetry-schemas"

[compile]
schema-dir = "schema"
output-dir = "target/generated"
ext = "capnp"
import-dirs = ["vendor/schemas", "shared"]
schemas = ["core/frame.capnp"]
"#,
        )
        .unwrap();

        assert_eq!(manifest.project.name, "telemetry-schemas");
        assert_eq!(manifest.project.version, "0.1.0");
        let compile = manifest.compile();
        assert_eq!(compile.schema_dir.as_deref(), Some(Path::new("schema")));
        assert_eq!(compile.import_dirs.len(), 2);
        assert_eq!(compile.schemas, vec![PathBuf::from("core/frame.capnp")]);
    }

    #[test]
    fn compile_section_optional() {
        let manifest = SchemacManifest::from_str("[project]\nname = \"bare\"\n").unwrap();
        let compile = manifest.compile();
        assert!(compile.schema_dir.is_none());
        assert!(compile.schemas.is_empty());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("schemac.toml"),
            "[project]\nname = \"parent\"\n",
        )
        .unwrap();

        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = SchemacManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.project.name, "parent");
        assert_eq!(found_dir, dir.path());
    }
}
