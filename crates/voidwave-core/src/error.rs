//! Closed error taxonomy shared across the core (spec §7).

/// A single error kind from the closed taxonomy. Every failure the core
/// produces maps to exactly one of these variants; callers match on kind
/// rather than string-matching messages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("tool '{0}' not found on PATH and AUTO-INSTALL could not resolve it")]
    ToolMissing(String),

    #[error("privilege required for '{0}' and AUTO-PRIV declined or is unavailable")]
    PermissionDenied(String),

    #[error("validation rejected {kind} input '{value}': {reason}")]
    TargetValidation {
        kind: String,
        value: String,
        reason: String,
    },

    #[error("required binding '{source_step}.{source_path}' resolved to null with no default")]
    BindingResolution {
        source_step: String,
        source_path: String,
    },

    #[error("step '{step_id}' failed: {message}")]
    StepExecution { step_id: String, message: String },

    #[error("step '{step_id}' timed out after {seconds}s")]
    Timeout { step_id: String, seconds: u64 },

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("primary tool '{primary}' and fallback '{fallback}' both failed")]
    FallbackExhausted { primary: String, fallback: String },

    #[error("malformed chain '{chain_id}': {reason}")]
    Configuration { chain_id: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_tool_missing() {
        let err = CoreError::ToolMissing("nmap".into());
        assert_eq!(
            err.to_string(),
            "tool 'nmap' not found on PATH and AUTO-INSTALL could not resolve it"
        );
    }

    #[test]
    fn display_binding_resolution() {
        let err = CoreError::BindingResolution {
            source_step: "fast_scan".into(),
            source_path: "hosts[*].ip".into(),
        };
        assert!(err.to_string().contains("fast_scan.hosts[*].ip"));
    }

    #[test]
    fn display_fallback_exhausted() {
        let err = CoreError::FallbackExhausted {
            primary: "hashcat".into(),
            fallback: "john".into(),
        };
        assert_eq!(
            err.to_string(),
            "primary tool 'hashcat' and fallback 'john' both failed"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }
}
