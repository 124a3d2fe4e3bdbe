use tracing::warn;

use crate::model::{RunWarning, WarningKind};

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<RunWarning>,
}

impl Diagnostics {
    pub fn warn(&mut self, kind: WarningKind, component: &'static str, message: impl Into<String>) {
        let message = message.into();
        warn!(kind = ?kind, component, message = %message, "run warning");
        self.warnings.push(RunWarning {
            kind,
            component,
            message,
        });
    }

    pub fn warnings(&self) -> &[RunWarning] {
        &self.warnings
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings
            .iter()
            .filter(|warning| warning.kind == kind)
            .count()
    }

    pub fn into_warnings(self) -> Vec<RunWarning> {
        self.warnings
    }
}
