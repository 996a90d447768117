//! Error reporting capability injected into the I/O and CLI layers.
//!
//! Failures that must be surfaced without aborting the current step (temp
//! file cleanup, directory sync) and failures whose detail belongs in the log
//! (invalid date patterns) go through an [`ErrorReporter`] rather than a
//! process-wide logger, so tests can observe them.

use std::error::Error;

use tracing::error;

/// Receives errors that should be logged.
pub trait ErrorReporter {
    /// Records a single error.
    fn report_error(&self, error: &dyn Error);
}

/// Reporter that emits `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report_error(&self, err: &dyn Error) {
        let chain = source_chain(err);
        if chain.is_empty() {
            error!(error = %err, "mass-data failure");
        } else {
            error!(error = %err, caused_by = %chain, "mass-data failure");
        }
    }
}

/// Joins the `source()` chain below `err` into one line.
fn source_chain(err: &dyn Error) -> String {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(": ")
}

#[cfg(test)]
mod tests {
    use thiserror::Error;

    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer {
        #[source]
        source: Inner,
    }

    #[derive(Debug, Error)]
    #[error("inner")]
    struct Inner;

    #[test]
    fn source_chain_is_empty_without_causes() {
        assert_eq!(source_chain(&Inner), "");
    }

    #[test]
    fn source_chain_lists_causes() {
        let err = Outer { source: Inner };
        assert_eq!(source_chain(&err), "inner");
    }

    #[test]
    fn tracing_reporter_accepts_errors_without_subscriber() {
        TracingErrorReporter.report_error(&Outer { source: Inner });
    }
}
