use tracing::error;

/// A single problem found while validating a route table.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

pub fn log_issues(issues: &[ValidationIssue]) {
    error!(count = issues.len(), "route table validation failed");
    for issue in issues {
        error!(kind = %issue.kind, location = %issue.location, "{}", issue.message);
    }
}

/// Fail with every issue listed when any were collected.
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> anyhow::Result<()> {
    if issues.is_empty() {
        return Ok(());
    }
    log_issues(&issues);
    let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
    anyhow::bail!(
        "route table validation failed, {} issue(s) found:\n{}",
        issues.len(),
        listed.join("\n")
    )
}
