//! `schemac compile` — stage the toolchain and compile schemas.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use schemac_driver::{run, DriverConfig, ResourceSpec};
use schemac_natives::ResourceBundle;

use crate::manifest::CompileConfig;

/// Flag values for the compile subcommand, before merging with the manifest.
#[derive(Debug, Default)]
pub struct CompileFlags {
    pub schema_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub ext: Option<String>,
    pub import_dirs: Vec<PathBuf>,
    pub schemas: Vec<PathBuf>,
    pub natives_dir: Option<PathBuf>,
    pub compiler: Option<PathBuf>,
    pub plugin: Option<PathBuf>,
    pub plugin_schema: Option<PathBuf>,
    pub verbose: bool,
    pub report: Option<String>,
}

/// Run a compilation from merged flag and manifest configuration.
pub fn run_compile(
    project_dir: &Path,
    manifest_compile: &CompileConfig,
    flags: CompileFlags,
) -> Result<()> {
    let schema_root = resolve_dir(
        project_dir,
        flags.schema_dir.or_else(|| manifest_compile.schema_dir.clone()),
        "schema",
    );
    let output_dir = resolve_dir(
        project_dir,
        flags.output_dir.or_else(|| manifest_compile.output_dir.clone()),
        "target/generated",
    );
    let work_dir = resolve_dir(
        project_dir,
        flags.work_dir.or_else(|| manifest_compile.work_dir.clone()),
        "target/schemac-work",
    );
    let ext = flags
        .ext
        .or_else(|| manifest_compile.ext.clone())
        .unwrap_or_else(|| "capnp".to_string());

    // Flags replace manifest lists entirely; they are not merged.
    let extra_import_dirs =
        merge_import_dirs(project_dir, &flags.import_dirs, &manifest_compile.import_dirs);

    let schemas = if flags.schemas.is_empty() {
        if manifest_compile.schemas.is_empty() {
            discover_schemas(&schema_root, &ext)
                .with_context(|| format!("scanning {}", schema_root.display()))?
        } else {
            manifest_compile.schemas.clone()
        }
    } else {
        flags.schemas
    };

    if schemas.is_empty() {
        bail!(
            "no .{ext} schema files found under {}",
            schema_root.display()
        );
    }

    let resources = resolve_resources(
        flags.natives_dir,
        flags.compiler,
        flags.plugin,
        flags.plugin_schema,
    )?;

    let report = run(DriverConfig {
        resources,
        schema_root,
        work_dir,
        output_dir,
        extra_import_dirs,
        schemas,
        verbose: flags.verbose,
    })?;

    match flags.report.as_deref() {
        Some("json") => println!("{}", serde_json::to_string_pretty(&report)?),
        Some("human") | None => print!("{report}"),
        Some(other) => bail!("unknown report format: '{other}'. Choose: human, json"),
    }

    Ok(())
}

/// Flags win over the manifest; either way, relative import directories
/// resolve against the project directory, not the process cwd.
fn merge_import_dirs(
    project_dir: &Path,
    flag_dirs: &[PathBuf],
    manifest_dirs: &[PathBuf],
) -> Vec<PathBuf> {
    let chosen = if flag_dirs.is_empty() {
        manifest_dirs
    } else {
        flag_dirs
    };
    chosen.iter().map(|d| resolve_path(project_dir, d)).collect()
}

fn resolve_dir(project_dir: &Path, configured: Option<PathBuf>, default: &str) -> PathBuf {
    resolve_path(project_dir, &configured.unwrap_or_else(|| default.into()))
}

fn resolve_path(project_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

fn resolve_resources(
    natives_dir: Option<PathBuf>,
    compiler: Option<PathBuf>,
    plugin: Option<PathBuf>,
    plugin_schema: Option<PathBuf>,
) -> Result<ResourceSpec> {
    if let Some(root) = natives_dir {
        if compiler.is_some() || plugin.is_some() || plugin_schema.is_some() {
            bail!("--natives-dir cannot be combined with --compiler/--plugin/--plugin-schema");
        }
        return Ok(ResourceSpec::Package {
            root,
            platform: None,
        });
    }

    match (compiler, plugin, plugin_schema) {
        (Some(compiler), Some(plugin), Some(plugin_schema)) => {
            let bundle = ResourceBundle::from_resolved(compiler, plugin, plugin_schema)?;
            Ok(ResourceSpec::Resolved(bundle))
        }
        (None, None, None) => {
            bail!("specify --natives-dir, or all of --compiler, --plugin and --plugin-schema")
        }
        _ => bail!("--compiler, --plugin and --plugin-schema must be given together"),
    }
}

/// Recursively collect every `.{ext}` file under the schema root, as paths
/// relative to it.
fn discover_schemas(schema_root: &Path, ext: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if schema_root.is_dir() {
        walk(schema_root, schema_root, ext, &mut found)?;
    }
    found.sort();
    Ok(found)
}

fn walk(root: &Path, dir: &Path, ext: &str, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(root, &path, ext, found)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(ext) {
            if let Ok(relative) = path.strip_prefix(root) {
                found.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}
