//! Autocomplete coordinator
//!
//! Debounces rapid input changes, consults the suggestion cache, and runs
//! at most one generation call per settled input value. Every newer
//! keystroke cancels the previous debounce task outright (cancel-and-
//! replace, never queued); aborting a task mid-generation drops the
//! in-flight future, and results that arrive for an input the user has
//! since changed are discarded by value equality, not task identity.
//!
//! Events are delivered on an unbounded channel: `Show` carries the input
//! the suggestions belong to, `Clear` hides any visible suggestions.

use crate::error::GeneratorError;
use crate::generative::SuggestionGenerator;
use crate::structured_log::{log_event, LogLevel};
use crate::suggest_cache::SuggestionCache;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Autocomplete output delivered to the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuggestionEvent {
    /// Suggestions for the given input value, relevance-ordered.
    Show {
        input: String,
        suggestions: Vec<String>,
    },
    /// Hide any displayed suggestions.
    Clear,
}

/// Tuning for the coordinator.
#[derive(Clone, Debug)]
pub struct AutocompleteConfig {
    /// Quiet period after the last keystroke before generation is attempted.
    pub debounce: Duration,
    /// Upper bound on suggestions emitted per input.
    pub max_suggestions: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            max_suggestions: 6,
        }
    }
}

struct FieldState {
    /// The field's current value; the authority for staleness checks.
    current: String,
    /// The single outstanding debounce/generation task, if any.
    pending: Option<JoinHandle<()>>,
}

struct Inner {
    generator: Arc<dyn SuggestionGenerator>,
    cache: Arc<SuggestionCache>,
    config: AutocompleteConfig,
    events: mpsc::UnboundedSender<SuggestionEvent>,
    state: Mutex<FieldState>,
}

/// Debounced, cancellable suggestion coordinator for one input field.
pub struct AutocompleteCoordinator {
    inner: Arc<Inner>,
}

impl AutocompleteCoordinator {
    /// Create a coordinator and the receiver the UI drains events from.
    pub fn new(
        generator: Arc<dyn SuggestionGenerator>,
        cache: Arc<SuggestionCache>,
        config: AutocompleteConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            generator,
            cache,
            config,
            events,
            state: Mutex::new(FieldState {
                current: String::new(),
                pending: None,
            }),
        });
        (Self { inner }, receiver)
    }

    /// Record a new field value and (re)start the debounce window.
    ///
    /// Empty/whitespace input takes priority over everything else: it
    /// cancels pending and in-flight work and clears the display.
    pub fn on_input_changed(&self, raw: &str) {
        let mut state = self.inner.state.lock().unwrap();
        state.current = raw.to_string();

        if let Some(handle) = state.pending.take() {
            handle.abort();
        }

        if raw.trim().is_empty() {
            let _ = self.inner.events.send(SuggestionEvent::Clear);
            return;
        }

        let inner = Arc::clone(&self.inner);
        let snapshot = raw.to_string();
        state.pending = Some(tokio::spawn(async move {
            Inner::settle(inner, snapshot).await;
        }));
    }

    /// Cancel all pending/in-flight work and hide suggestions.
    ///
    /// Called on explicit submission: resolving the command must not wait
    /// on, or be raced by, autocomplete work for the same field.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock().unwrap();
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        let _ = self.inner.events.send(SuggestionEvent::Clear);
    }
}

impl Inner {
    /// The debounce body: wait out the quiet period, then serve from cache
    /// or generate. Runs inside the abortable task, so a newer keystroke
    /// kills it at whichever await it is parked on.
    async fn settle(inner: Arc<Inner>, snapshot: String) {
        tokio::time::sleep(inner.config.debounce).await;

        // The value may have changed while this event was already in
        // flight; re-check before doing any work.
        if !inner.still_current(&snapshot) {
            return;
        }

        if let Some(cached) = inner.cache.get(&snapshot) {
            let _ = inner.events.send(SuggestionEvent::Show {
                input: snapshot,
                suggestions: cached,
            });
            return;
        }

        let result = inner
            .generator
            .suggest(&snapshot, inner.config.max_suggestions)
            .await;

        match result {
            Ok(raw) => {
                let suggestions = dedupe_keep_order(raw, inner.config.max_suggestions);
                // Stale arrival: the transport may not have been abortable,
                // so discard by value equality.
                if !inner.still_current(&snapshot) {
                    return;
                }
                inner.cache.put(&snapshot, suggestions.clone());
                let _ = inner.events.send(SuggestionEvent::Show {
                    input: snapshot,
                    suggestions,
                });
            }
            Err(e) => {
                // Suggestions stay hidden/unchanged on generation failure.
                log_generation_error(&snapshot, &e);
            }
        }
    }

    fn still_current(&self, snapshot: &str) -> bool {
        self.state.lock().unwrap().current == snapshot
    }
}

fn log_generation_error(input: &str, error: &GeneratorError) {
    log_event(
        LogLevel::Warn,
        "AUTOCOMPLETE",
        "generation_failed",
        json!({"input": input, "error": error.to_string()}),
    );
}

/// Drop empty entries and duplicates, preserving first-seen order.
fn dedupe_keep_order(items: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .take(limit)
        .collect()
}
