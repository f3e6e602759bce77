use std::path::Path;

use shared::{DomainError, DomainResult};

use crate::diagnostics::DiagnosticReport;

/// Writes `diagnostic_report_YYYYMM.json` per §6.
pub fn write_diagnostic_report(path: &Path, report: &DiagnosticReport) -> DomainResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| DomainError::ExternalServiceError(format!("cannot serialize report: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| DomainError::ExternalServiceError(format!("cannot write {}: {e}", path.display())))
}
