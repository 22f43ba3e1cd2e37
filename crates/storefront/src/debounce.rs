//! Search-input debouncing.
//!
//! Keystrokes are buffered and only handed to the filter once the input has
//! been quiet for a fixed window. Each keystroke cancels the pending timer
//! and starts a new one. The timer is a single `tokio` task that is aborted
//! on cancellation, so nothing fires after a newer value has been typed.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Quiet period before a search value is propagated.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Receives the settled search text.
pub type SearchSink = Arc<dyn Fn(String) + Send + Sync>;

/// Cancelable, restartable timer in front of a search sink.
///
/// Must be used from within a `tokio` runtime. Dropping the debouncer
/// cancels any pending value.
pub struct SearchDebouncer {
    window: Duration,
    sink: SearchSink,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(window: Duration, sink: SearchSink) -> Self {
        Self {
            window,
            sink,
            pending: None,
        }
    }

    /// Buffer a new raw input value, restarting the quiet window.
    pub fn input(&mut self, text: impl Into<String>) {
        self.cancel();

        let text = text.into();
        let sink = Arc::clone(&self.sink);
        // The deadline is fixed now, not when the task is first polled.
        let deadline = tokio::time::Instant::now() + self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            sink(text);
        }));
    }

    /// Propagate `text` immediately, dropping any pending value.
    ///
    /// Used by the search box's clear button.
    pub fn flush_now(&mut self, text: impl Into<String>) {
        self.cancel();
        (self.sink)(text.into());
    }

    /// Drop the pending value, if any, without propagating it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a value is waiting for the window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SearchDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDebouncer")
            .field("window", &self.window)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}
