//! Compiler driver for schemac.
//!
//! Turns a set of schema files into generated sources by staging a working
//! environment, constructing the native compiler invocation, and driving one
//! external compiler process per schema to completion: validate -> stage ->
//! build environment -> compile each schema in order, failing fast on the
//! first non-zero exit.

pub mod command;
pub mod environment;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod report;

pub use command::CommandPrefix;
pub use environment::WorkEnvironment;
pub use error::{DriverError, Result};
pub use job::CompileJob;
pub use orchestrator::{run, DriverConfig, ResourceSpec, StdioMode};
pub use report::CompileReport;
