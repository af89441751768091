//! `schemac doctor` — toolchain diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use schemac_natives::Platform;

use crate::manifest::SchemacManifest;

/// Print toolchain diagnostic information.
pub fn run(project_dir: &Path, compiler: Option<&Path>) -> Result<()> {
    println!("=== Schemac Doctor ===");
    println!();

    println!("Schemac version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Platform ---");
    match Platform::detect() {
        Some(platform) => {
            println!("  Detected: {platform}");
            println!("  Compiler resource: {}", platform.compiler_resource());
            println!("  Plugin resource:   {}", platform.plugin_resource());
        }
        None => {
            println!(
                "  Unsupported host: {}/{}",
                std::env::consts::OS,
                std::env::consts::ARCH
            );
            let supported: Vec<&str> = Platform::all().iter().map(|p| p.name()).collect();
            println!("  Supported platforms: {}", supported.join(", "));
        }
    }
    println!();

    if let Some(compiler) = compiler {
        println!("--- Compiler ---");
        print_tool_status(compiler);
        println!();
    }

    println!("--- Project Status ---");
    match SchemacManifest::find_and_load(project_dir) {
        Ok(Some((manifest, dir))) => {
            println!("  schemac.toml: found at {}", dir.display());
            println!("  Project:      {}", manifest.project.name);
            println!("  Version:      {}", manifest.project.version);
        }
        Ok(None) => {
            println!("  schemac.toml: not found");
        }
        Err(e) => {
            println!("  schemac.toml: error - {e}");
        }
    }

    Ok(())
}

fn print_tool_status(path: &Path) {
    match Command::new(path).arg("--version").output() {
        Ok(output) => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or("(unknown version)");
            println!("  {}: {first_line}", path.display());
        }
        Err(_) => {
            println!("  {}: not runnable", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn doctor_runs_without_error() {
        let dir = tempfile::tempdir().unwrap();
        super::run(dir.path(), None).unwrap();
    }
}
