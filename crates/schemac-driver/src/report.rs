//! Run report.

use serde::Serialize;

/// Summary of a successful compilation run.
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    /// Platform classifier, when the run staged from a natives package.
    pub platform: Option<String>,
    /// Schemas compiled, in execution order.
    pub schemas: Vec<String>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl std::fmt::Display for CompileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Compiled {} schema(s) in {} ms", self.schemas.len(), self.duration_ms)?;
        if let Some(ref platform) = self.platform {
            writeln!(f, "Platform: {platform}")?;
        }
        for schema in &self.schemas {
            writeln!(f, "  {schema}")?;
        }
        Ok(())
    }
}
