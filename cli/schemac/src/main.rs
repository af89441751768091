//! Schemac CLI — command-line driver for native schema compilation.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::compile::CompileFlags;
use manifest::SchemacManifest;

#[derive(Parser)]
#[command(name = "schemac", version, about = "Native schema compilation driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile schema files into generated sources
    Compile {
        /// Base directory of schema sources (default: schema)
        #[arg(long)]
        schema_dir: Option<PathBuf>,
        /// Output directory for generated sources (default: target/generated)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Working directory for staging (default: target/schemac-work)
        #[arg(long)]
        work_dir: Option<PathBuf>,
        /// Schema file extension without the dot (default: capnp)
        #[arg(long)]
        ext: Option<String>,
        /// Extra import directory (repeatable, order preserved)
        #[arg(long = "import-dir")]
        import_dirs: Vec<PathBuf>,
        /// Schema file relative to the schema dir (repeatable; all schemas
        /// under the schema dir when omitted)
        #[arg(long = "schema")]
        schemas: Vec<PathBuf>,
        /// Root of an unpacked natives package to stage the toolchain from
        #[arg(long)]
        natives_dir: Option<PathBuf>,
        /// Resolved compiler executable (with --plugin and --plugin-schema)
        #[arg(long)]
        compiler: Option<PathBuf>,
        /// Resolved codegen plugin executable
        #[arg(long)]
        plugin: Option<PathBuf>,
        /// Resolved plugin support schema
        #[arg(long)]
        plugin_schema: Option<PathBuf>,
        /// Show compiler diagnostics
        #[arg(long, short)]
        verbose: bool,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
    },
    /// Check toolchain and project status
    Doctor {
        /// Probe a specific compiler executable
        #[arg(long)]
        compiler: Option<PathBuf>,
    },
    /// Remove build artifacts
    Clean {
        /// Output directory to remove (default: target/generated)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Working directory to remove (default: target/schemac-work)
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Compile {
            schema_dir,
            output_dir,
            work_dir,
            ext,
            import_dirs,
            schemas,
            natives_dir,
            compiler,
            plugin,
            plugin_schema,
            verbose,
            report,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            let manifest_compile = manifest
                .map(|m| m.compile())
                .unwrap_or_default();
            commands::compile::run_compile(
                &project_dir,
                &manifest_compile,
                CompileFlags {
                    schema_dir,
                    output_dir,
                    work_dir,
                    ext,
                    import_dirs,
                    schemas,
                    natives_dir,
                    compiler,
                    plugin,
                    plugin_schema,
                    verbose,
                    report,
                },
            )
        }

        Commands::Doctor { compiler } => {
            let (_, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::doctor::run(&project_dir, compiler.as_deref())
        }

        Commands::Clean {
            output_dir,
            work_dir,
        } => {
            let (_, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            let output_dir =
                output_dir.unwrap_or_else(|| project_dir.join("target/generated"));
            let work_dir = work_dir.unwrap_or_else(|| project_dir.join("target/schemac-work"));
            commands::clean::run(&output_dir, &work_dir)
        }
    }
}

fn load_manifest_optional(
    cwd: &std::path::Path,
) -> anyhow::Result<(Option<SchemacManifest>, Option<PathBuf>)> {
    match SchemacManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
