//! Compiler command construction.
//!
//! The invariant prefix of the invocation depends only on the staged
//! resources and the prepared environment, so it is computed once per run
//! and never mutated afterwards. The child process runs with its working
//! directory set to the staged work dir, so every path token (compiler,
//! plugin, output directory, import directories) is absolutized here;
//! a relative directory passed through verbatim would be re-resolved by
//! the compiler against the work dir instead of the caller's cwd. Per
//! schema, the full argument vector is the prefix plus that schema's
//! relative path as the final token. Tokens are passed as discrete process
//! arguments; no shell is involved.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use schemac_natives::ResourceBundle;

use crate::environment::WorkEnvironment;
use crate::error::{DriverError, Result};
use crate::job::CompileJob;

/// The immutable invariant portion of a compiler invocation:
/// `compile [--verbose] -o<plugin>:<output_dir> (-I<dir>)*`.
#[derive(Debug, Clone)]
pub struct CommandPrefix {
    compiler: PathBuf,
    args: Vec<OsString>,
}

impl CommandPrefix {
    /// Build the prefix from fully-resolved inputs, absolutizing every
    /// path token against the caller's cwd.
    pub fn new(
        bundle: &ResourceBundle,
        env: &WorkEnvironment,
        verbose: bool,
    ) -> Result<CommandPrefix> {
        let mut args: Vec<OsString> = vec!["compile".into()];

        if verbose {
            args.push("--verbose".into());
        }

        let mut output = OsString::from("-o");
        output.push(absolute(&bundle.plugin)?);
        output.push(":");
        output.push(absolute(&env.output_dir)?);
        args.push(output);

        for dir in &env.import_dirs {
            let mut flag = OsString::from("-I");
            flag.push(absolute(dir)?);
            args.push(flag);
        }

        Ok(CommandPrefix {
            compiler: absolute(&bundle.compiler)?,
            args,
        })
    }

    /// Path of the compiler executable.
    pub fn compiler(&self) -> &PathBuf {
        &self.compiler
    }

    /// The invariant arguments, without the schema token.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Full argument vector for one schema.
    pub fn for_job(&self, job: &CompileJob) -> Vec<OsString> {
        let mut full = self.args.clone();
        full.push(job.relative_path().into());
        full
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| DriverError::Config {
        detail: format!("cannot resolve {} to an absolute path: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture(dir: &Path, verbose: bool, extras: Vec<PathBuf>) -> (ResourceBundle, CommandPrefix) {
        let lib = dir.join("lib");
        std::fs::create_dir_all(&lib).unwrap();
        for f in ["capnp", "capnpc-gen"] {
            std::fs::write(dir.join(f), b"x").unwrap();
        }
        std::fs::write(lib.join("gen.capnp"), b"s").unwrap();
        let bundle = ResourceBundle::from_resolved(
            dir.join("capnp"),
            dir.join("capnpc-gen"),
            lib.join("gen.capnp"),
        )
        .unwrap();

        let schema_root = dir.join("schema");
        std::fs::create_dir_all(&schema_root).unwrap();
        let env = WorkEnvironment::prepare(
            &schema_root,
            &dir.join("work"),
            &dir.join("out"),
            bundle.plugin_schema_dir(),
            &extras,
        )
        .unwrap();

        let prefix = CommandPrefix::new(&bundle, &env, verbose).unwrap();
        (bundle, prefix)
    }

    #[test]
    fn prefix_token_order() {
        let dir = tempfile::tempdir().unwrap();
        let (bundle, prefix) = fixture(dir.path(), true, vec![]);

        assert_eq!(prefix.compiler(), &bundle.compiler);
        assert_eq!(prefix.args()[0], "compile");
        assert_eq!(prefix.args()[1], "--verbose");

        let output = prefix.args()[2].to_string_lossy().into_owned();
        assert!(output.starts_with("-o"));
        assert!(output.contains("capnpc-gen"));
        assert!(output.ends_with(&dir.path().join("out").to_string_lossy().into_owned()));
    }

    #[test]
    fn quiet_prefix_omits_verbose() {
        let dir = tempfile::tempdir().unwrap();
        let (_, prefix) = fixture(dir.path(), false, vec![]);
        assert!(!prefix.args().iter().any(|a| a == "--verbose"));
    }

    #[test]
    fn one_import_flag_per_directory_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let (_, prefix) = fixture(dir.path(), false, vec![a.clone(), b.clone(), a.clone()]);

        let imports: Vec<String> = prefix
            .args()
            .iter()
            .filter_map(|arg| {
                let s = arg.to_string_lossy();
                s.strip_prefix("-I").map(str::to_owned)
            })
            .collect();

        let lib = dir.path().join("lib").to_string_lossy().into_owned();
        let root = dir.path().join("schema").to_string_lossy().into_owned();
        let a = a.to_string_lossy().into_owned();
        let b = b.to_string_lossy().into_owned();
        assert_eq!(imports, vec![lib, root, a.clone(), b, a]);
    }

    #[test]
    fn relative_directories_absolutized_against_caller_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("lib");
        std::fs::create_dir_all(&lib).unwrap();
        for f in ["capnp", "capnpc-gen"] {
            std::fs::write(dir.path().join(f), b"x").unwrap();
        }
        std::fs::write(lib.join("gen.capnp"), b"s").unwrap();
        let bundle = ResourceBundle::from_resolved(
            dir.path().join("capnp"),
            dir.path().join("capnpc-gen"),
            lib.join("gen.capnp"),
        )
        .unwrap();

        // The child runs inside the work dir; relative directories from the
        // caller must not be re-resolved against it.
        let env = WorkEnvironment {
            output_dir: PathBuf::from("gen_out"),
            work_dir: PathBuf::from("work"),
            schema_root: PathBuf::from("schema"),
            import_dirs: vec![lib.clone(), PathBuf::from("shared")],
        };

        let prefix = CommandPrefix::new(&bundle, &env, false).unwrap();
        let cwd = std::env::current_dir().unwrap();

        let output = prefix.args()[1].to_string_lossy().into_owned();
        assert!(output.ends_with(&cwd.join("gen_out").to_string_lossy().into_owned()));

        let imports: Vec<String> = prefix
            .args()
            .iter()
            .filter_map(|arg| {
                let s = arg.to_string_lossy();
                s.strip_prefix("-I").map(str::to_owned)
            })
            .collect();
        assert_eq!(imports[0], lib.to_string_lossy());
        assert_eq!(imports[1], cwd.join("shared").to_string_lossy());
    }

    #[test]
    fn schema_path_is_final_token() {
        let dir = tempfile::tempdir().unwrap();
        let (_, prefix) = fixture(dir.path(), true, vec![]);

        let job = CompileJob::new("alpha/alpha.capnp", &dir.path().join("schema")).unwrap();
        let full = prefix.for_job(&job);

        assert_eq!(full.last().unwrap(), "alpha/alpha.capnp");
        assert_eq!(full.len(), prefix.args().len() + 1);
        // The prefix itself is untouched by per-job construction.
        assert!(!prefix.args().iter().any(|a| a == "alpha/alpha.capnp"));
    }
}
