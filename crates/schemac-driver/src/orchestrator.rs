//! Top-level compilation driver.
//!
//! One run progresses through validation, resource staging, environment
//! preparation, and then one external compiler process per schema, strictly
//! in caller order. The first non-zero exit aborts the run; already
//! completed schemas keep their outputs, so a re-run from scratch is safe.
//! At most one child process exists at a time; the working directory and its
//! staged resources belong to this run alone.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use log::{debug, info};
use schemac_natives::{NativesError, Platform, ResourceBundle, ResourceStager};

use crate::command::CommandPrefix;
use crate::environment::{self, WorkEnvironment};
use crate::error::{DriverError, Result};
use crate::job::CompileJob;
use crate::report::CompileReport;

/// How the child compiler's standard streams are wired, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Child streams connect to this process's console.
    Inherit,
    /// Child streams are discarded.
    Discard,
}

impl StdioMode {
    /// Verbose runs show compiler diagnostics; quiet runs suppress them.
    pub fn from_verbose(verbose: bool) -> StdioMode {
        if verbose {
            StdioMode::Inherit
        } else {
            StdioMode::Discard
        }
    }
}

/// Where the native toolchain comes from.
#[derive(Debug, Clone)]
pub enum ResourceSpec {
    /// Paths the collaborator already resolved and made executable.
    Resolved(ResourceBundle),
    /// An unpacked natives package to stage from. `platform` forces a
    /// specific layout; `None` detects the host platform at run time.
    Package {
        /// Root of the unpacked package.
        root: PathBuf,
        /// Forced platform, or `None` to detect.
        platform: Option<Platform>,
    },
}

/// Configuration for one compilation run.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Native toolchain source.
    pub resources: ResourceSpec,
    /// Root directory of the schema sources.
    pub schema_root: PathBuf,
    /// Run-local working directory.
    pub work_dir: PathBuf,
    /// Directory receiving generated sources.
    pub output_dir: PathBuf,
    /// Caller-supplied extra import directories, in order.
    pub extra_import_dirs: Vec<PathBuf>,
    /// Schema files to compile, in order. Relative to the schema root or
    /// absolute under it.
    pub schemas: Vec<PathBuf>,
    /// Show compiler diagnostics and pass `--verbose` to the compiler.
    pub verbose: bool,
}

/// Run the full compilation: validate, stage, prepare, then compile every
/// schema in order, stopping at the first failure.
pub fn run(config: DriverConfig) -> Result<CompileReport> {
    let start = Instant::now();

    // Stage 1: Validation. Nothing on disk is touched past this point
    // unless every check holds.
    if config.schemas.is_empty() {
        return Err(DriverError::Config {
            detail: "at least one schema file must be specified".into(),
        });
    }
    environment::validate(
        &config.schema_root,
        &config.work_dir,
        &config.output_dir,
        &config.extra_import_dirs,
    )?;

    let jobs: Vec<CompileJob> = config
        .schemas
        .iter()
        .map(|s| CompileJob::new(s, &config.schema_root))
        .collect::<Result<_>>()?;

    // Every job must name an existing regular file under the schema root;
    // anything else is a configuration error, not a compiler failure.
    for job in &jobs {
        let source = config.schema_root.join(job.relative_path());
        if !source.is_file() {
            return Err(DriverError::Config {
                detail: format!("schema is not a regular file: {}", source.display()),
            });
        }
    }

    // Stage 2: Resource staging.
    let (bundle, platform) = resolve_resources(&config.resources, &config.work_dir)?;

    // Stage 3: Environment preparation.
    let env = WorkEnvironment::prepare(
        &config.schema_root,
        &config.work_dir,
        &config.output_dir,
        bundle.plugin_schema_dir(),
        &config.extra_import_dirs,
    )?;

    // Stage 4: Compilation, sequential and fail-fast.
    let prefix = CommandPrefix::new(&bundle, &env, config.verbose)?;
    let stdio = StdioMode::from_verbose(config.verbose);

    for job in &jobs {
        info!("compiling {job}");
        run_job(&prefix, job, &env.work_dir, stdio)?;
    }

    Ok(CompileReport {
        platform: platform.map(|p| p.name().to_string()),
        schemas: jobs.iter().map(|j| j.to_string()).collect(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Map host OS/architecture strings to a platform, or fail with a
/// descriptive error naming the unsupported pair.
pub fn resolve_platform(os: &str, arch: &str) -> Result<Platform> {
    Platform::classify(os, arch).ok_or_else(|| {
        DriverError::Natives(NativesError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
            supported: Platform::all()
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
    })
}

fn resolve_resources(
    spec: &ResourceSpec,
    work_dir: &Path,
) -> Result<(ResourceBundle, Option<Platform>)> {
    match spec {
        ResourceSpec::Resolved(bundle) => Ok((bundle.clone(), None)),
        ResourceSpec::Package { root, platform } => {
            let platform = match platform {
                Some(p) => *p,
                None => resolve_platform(std::env::consts::OS, std::env::consts::ARCH)?,
            };
            debug!("staging {platform} natives from {}", root.display());
            let stager = ResourceStager::new(work_dir);
            let bundle = ResourceBundle::stage(&stager, platform, root)?;
            Ok((bundle, Some(platform)))
        }
    }
}

fn run_job(
    prefix: &CommandPrefix,
    job: &CompileJob,
    work_dir: &Path,
    stdio: StdioMode,
) -> Result<()> {
    let mut command = Command::new(prefix.compiler());
    command.args(prefix.for_job(job)).current_dir(work_dir);

    match stdio {
        StdioMode::Inherit => {
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
        StdioMode::Discard => {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
    }

    let status = command.status().map_err(|e| DriverError::Spawn {
        schema: job.to_string(),
        source: e,
    })?;

    if !status.success() {
        return Err(DriverError::ExitStatus {
            schema: job.to_string(),
            code: status.code(),
        });
    }

    Ok(())
}
