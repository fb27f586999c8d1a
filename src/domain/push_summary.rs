use serde::Serialize;

/// Why a report clone did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CloneFailure {
    /// The service refused to clone against this dataset mode (push datasets).
    Unsupported { status: u16, body: String },
    /// Any other failed response or transport error.
    Http { status: Option<u16>, body: String },
}

impl CloneFailure {
    /// Classify a non-200 clone response.
    ///
    /// Push datasets cannot back a cloned report on some tenants; the service
    /// answers with a 4xx whose body names the dataset type or says the
    /// operation is not supported.
    pub fn from_response(status: u16, body: &str) -> Self {
        let lower = body.to_lowercase();
        let unsupported = (400..500).contains(&status)
            && (lower.contains("push")
                || lower.contains("not supported")
                || lower.contains("notsupported")
                || lower.contains("unsupported"));

        if unsupported {
            CloneFailure::Unsupported {
                status,
                body: body.to_string(),
            }
        } else {
            CloneFailure::Http {
                status: Some(status),
                body: body.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// No template configured or cloning disabled
    Skipped,
    Cloned { report_id: String, rebound: bool },
    /// The clone call succeeded but returned no usable report id, so the
    /// report may exist in the workspace without having been rebound.
    CloneUnconfirmed { detail: String },
    CloneFailed(CloneFailure),
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushSummary {
    pub dataset_id: String,
    pub rows_pushed: usize,
    pub batches: usize,
    pub report: ReportOutcome,
}

impl std::fmt::Display for PushSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pipeline completed")?;
        writeln!(f, "  dataset:  {}", self.dataset_id)?;
        writeln!(
            f,
            "  rows:     {} ({} request{})",
            self.rows_pushed,
            self.batches,
            if self.batches == 1 { "" } else { "s" }
        )?;
        match &self.report {
            ReportOutcome::Skipped => write!(f, "  report:   skipped"),
            ReportOutcome::Cloned { report_id, rebound } => write!(
                f,
                "  report:   {} ({})",
                report_id,
                if *rebound { "rebound" } else { "rebind failed" }
            ),
            ReportOutcome::CloneUnconfirmed { .. } => write!(
                f,
                "  report:   clone accepted but no report id returned (not rebound)"
            ),
            ReportOutcome::CloneFailed(CloneFailure::Unsupported { status, .. }) => write!(
                f,
                "  report:   not cloned, unsupported for this dataset ({})",
                status
            ),
            ReportOutcome::CloneFailed(CloneFailure::Http { status, .. }) => match status {
                Some(code) => write!(f, "  report:   clone failed ({})", code),
                None => write!(f, "  report:   clone failed"),
            },
        }
    }
}
