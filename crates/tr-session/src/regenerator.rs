//! Debounced regeneration of the declaration file.
//!
//! Renaming a folder reaches the session as an `Added` for the new path
//! followed by a `Deleted` for the old one. Generating between the two sees
//! both files and fails on the duplicate route, so regeneration only runs
//! once events have been quiet for a full interval.
//!
//! ```text
//! schedule ──► [timer armed, deadline = now + interval]
//!                  │
//! schedule ──► [deadline pushed back, arguments replaced]
//!                  │
//!          (interval passes)
//!                  │
//!                  ▼
//!   ready() resolves ──► fire(&context) ──► generator ──► router.d.ts
//! ```

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use tokio::time::{Instant, Sleep, sleep_until};
use tr_core::{DECLARATION_FILE_NAME, FileContext, GenerateOptions};
use tr_typegen::DeclarationGenerator;
use tracing::{debug, error, info, trace};

use crate::error::RegenerateError;

/// What a regeneration did.
#[derive(Debug)]
pub enum RegenerationOutcome {
    /// The declaration file was overwritten.
    Written {
        /// Path of the declaration file.
        path: Utf8PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// The generator had nothing to declare; no file was touched.
    Skipped,
    /// Generation or writing failed. The error has already been logged.
    Failed {
        /// What went wrong.
        error: RegenerateError,
    },
}

impl RegenerationOutcome {
    /// Returns `true` for [`RegenerationOutcome::Written`].
    #[inline]
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Arguments of the most recent [`schedule`](DebouncedRegenerator::schedule).
#[derive(Debug, Clone)]
struct PendingRequest {
    output_dir: Utf8PathBuf,
    options: GenerateOptions,
}

/// Runs a [`DeclarationGenerator`] once requests stop arriving.
///
/// Each [`schedule`](Self::schedule) call replaces the pending request and
/// pushes the deadline back to a full interval from now. Nothing is queued:
/// at most one request is ever pending.
///
/// The timer is polled through [`ready`](Self::ready), which makes the
/// regenerator a `tokio::select!` branch next to the event stream. The file
/// context is only borrowed when the request fires, so the output always
/// reflects the latest state.
///
/// Scheduling requires a tokio runtime with the time driver enabled.
pub struct DebouncedRegenerator<G> {
    generator: G,
    interval: Duration,
    timer: Option<Pin<Box<Sleep>>>,
    pending: Option<PendingRequest>,
}

impl<G> fmt::Debug for DebouncedRegenerator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedRegenerator")
            .field("interval", &self.interval)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<G: DeclarationGenerator> DebouncedRegenerator<G> {
    /// Creates an idle regenerator with the given quiescence interval.
    #[must_use]
    pub const fn new(generator: G, interval: Duration) -> Self {
        Self {
            generator,
            interval,
            timer: None,
            pending: None,
        }
    }

    /// Returns the quiescence interval.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the wrapped generator.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// Requests a regeneration into `output_dir`.
    ///
    /// Supersedes any pending request and restarts the interval.
    pub fn schedule(&mut self, output_dir: Utf8PathBuf, options: GenerateOptions) {
        let deadline = Instant::now() + self.interval;
        if let Some(timer) = self.timer.as_mut() {
            timer.as_mut().reset(deadline);
        } else {
            self.timer = Some(Box::pin(sleep_until(deadline)));
        }

        let superseded = self
            .pending
            .replace(PendingRequest {
                output_dir,
                options,
            })
            .is_some();
        trace!(superseded, "Scheduled regeneration");
    }

    /// Returns `true` if a request is waiting to fire.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns when the pending request fires, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.timer.as_ref().map(|timer| timer.deadline())
    }

    /// Resolves once the pending request's deadline has passed.
    ///
    /// Never resolves while idle. Cancel safe.
    pub async fn ready(&mut self) {
        match (self.timer.as_mut(), &self.pending) {
            (Some(timer), Some(_)) => timer.as_mut().await,
            _ => std::future::pending().await,
        }
    }

    /// Runs the pending request against `context`.
    ///
    /// Returns `None` if nothing was pending. Errors are logged and reported
    /// in the outcome, never returned.
    pub fn fire(&mut self, context: &FileContext) -> Option<RegenerationOutcome> {
        let request = self.pending.take()?;
        Some(self.run(context, &request.output_dir, &request.options))
    }

    /// Runs the pending request now, without waiting for its deadline.
    pub fn flush(&mut self, context: &FileContext) -> Option<RegenerationOutcome> {
        if self.is_pending() {
            debug!("Flushing pending regeneration");
        }
        self.fire(context)
    }

    /// Drops the pending request, returning `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Regenerates immediately, leaving any pending request in place.
    pub fn run(
        &self,
        context: &FileContext,
        output_dir: &Utf8Path,
        options: &GenerateOptions,
    ) -> RegenerationOutcome {
        match self.regenerate(context, output_dir, options) {
            Ok(Some((path, bytes))) => {
                info!(path = %path, bytes, "Wrote typed routes");
                RegenerationOutcome::Written { path, bytes }
            }
            Ok(None) => {
                debug!("No routes to declare, leaving declaration file untouched");
                RegenerationOutcome::Skipped
            }
            Err(error) => {
                error!(error = %error, "Failed to regenerate typed routes");
                RegenerationOutcome::Failed { error }
            }
        }
    }

    fn regenerate(
        &self,
        context: &FileContext,
        output_dir: &Utf8Path,
        options: &GenerateOptions,
    ) -> Result<Option<(Utf8PathBuf, usize)>, RegenerateError> {
        let Some(text) = self.generator.generate(context, options)? else {
            return Ok(None);
        };

        let path = output_dir.join(DECLARATION_FILE_NAME);
        std::fs::write(&path, &text).map_err(|source| RegenerateError::write(&path, source))?;
        Ok(Some((path, text.len())))
    }
}
