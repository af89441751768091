//! Native toolchain support for the schemac compiler driver.
//!
//! Maps the host OS/architecture to a supported platform and stages the
//! platform's native binaries (the schema compiler, the codegen plugin, and
//! the plugin's support schema) into a run-local working directory.

pub mod error;
pub mod platform;
pub mod stage;

pub use error::{NativesError, Result};
pub use platform::Platform;
pub use stage::{ResourceBundle, ResourceStager};
