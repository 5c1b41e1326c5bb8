//! Read loop that feeds input lines through a notifier.

use notifier::{HandleResult, MessageSender, Notifier, NotifierError};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

use crate::input::{parse_line, InputFormat};

/// Errors that stop the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Reading the input failed.
    #[error("input error: {0}")]
    Io(#[from] std::io::Error),

    /// The notifier hit an error it cannot recover from.
    #[error("notifier error: {0}")]
    Notifier(#[from] NotifierError),
}

/// Counters for one relay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Events parsed from the input.
    pub received: u64,
    /// Notifications delivered.
    pub dispatched: u64,
    /// Events dropped by the suppression gate.
    pub suppressed: u64,
    /// Events whose notification could not be delivered.
    pub failed: u64,
    /// Lines that could not be parsed.
    pub skipped: u64,
}

/// Feeds events from a line-oriented reader through a [`Notifier`].
pub struct Relay<S: MessageSender> {
    notifier: Notifier<S>,
    format: InputFormat,
}

impl<S: MessageSender> Relay<S> {
    /// Create a relay for the given notifier and input format.
    pub fn new(notifier: Notifier<S>, format: InputFormat) -> Self {
        Self { notifier, format }
    }

    /// Get a reference to the notifier.
    pub fn notifier(&self) -> &Notifier<S> {
        &self.notifier
    }

    /// Process lines until the input ends.
    pub async fn run<R>(&self, reader: R) -> Result<RelayStats, RelayError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.run_with_shutdown(reader, std::future::pending()).await
    }

    /// Process lines until the input ends or `shutdown_signal` completes.
    ///
    /// Unparseable lines and failed deliveries are logged and counted.
    /// Fatal notifier errors (a template that cannot render) stop the run.
    pub async fn run_with_shutdown<R, F>(
        &self,
        reader: R,
        shutdown_signal: F,
    ) -> Result<RelayStats, RelayError>
    where
        R: AsyncBufRead + Unpin,
        F: std::future::Future<Output = ()> + Send,
    {
        info!(
            format = ?self.format,
            sender = self.notifier.sender().name(),
            "Starting relay"
        );

        let mut lines = reader.lines();
        let mut stats = RelayStats::default();
        let mut line_no: u64 = 0;

        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping relay");
                    return Ok(stats);
                }

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!(?stats, "Input ended");
                        return Ok(stats);
                    };
                    line_no += 1;

                    let event = match parse_line(&line, self.format) {
                        Ok(Some(event)) => event,
                        Ok(None) => continue,
                        Err(e) => {
                            warn!(line = line_no, "Skipping unreadable event: {}", e);
                            stats.skipped += 1;
                            continue;
                        }
                    };
                    stats.received += 1;

                    // Shutdown abandons an in-flight send.
                    let result = tokio::select! {
                        biased;

                        () = &mut shutdown_signal => {
                            info!(line = line_no, "Shutdown signal received, abandoning in-flight send");
                            return Ok(stats);
                        }

                        result = self.notifier.handle(&event) => result,
                    };

                    match result {
                        HandleResult::Dispatched { .. } => stats.dispatched += 1,
                        HandleResult::Suppressed { event_type } => {
                            debug!(line = line_no, event_type = %event_type, "Suppressed");
                            stats.suppressed += 1;
                        }
                        HandleResult::Failed(e) if e.is_fatal() => {
                            error!(line = line_no, "Stopping relay: {}", e);
                            return Err(e.into());
                        }
                        HandleResult::Failed(_) => stats.failed += 1,
                    }
                }
            }
        }
    }
}
