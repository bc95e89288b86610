//! Debounced search driver for the gif and sticker panels.
//!
//! Typing is coalesced over a 500 ms quiet window. Each settled query gets a
//! ticket; only the response holding the latest ticket may update the panel.
//! Superseded requests run to completion and are discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::giphy::{GifResult, GifSearch, MediaKind, SearchRequest};

/// Quiet window before a query is searched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// What a search panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    /// Query of the latest settled search.
    pub query: String,
    /// A search is in flight.
    pub loading: bool,
    /// Message for the last failed search.
    pub error: Option<String>,
    /// Results of the last successful search.
    pub results: Vec<GifResult>,
}

/// Runs debounced searches for one panel.
///
/// Dropping the driver stops debouncing; in-flight requests finish but
/// their results go nowhere.
pub struct SearchDriver {
    kind: MediaKind,
    input: mpsc::UnboundedSender<String>,
    state: watch::Receiver<PanelState>,
    task: JoinHandle<()>,
}

impl SearchDriver {
    /// Spawn a driver and immediately search the kind's initial query.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(client: Arc<dyn GifSearch>, kind: MediaKind) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let (tx, state) = watch::channel(PanelState::default());
        let searcher = Searcher {
            client,
            kind,
            state: Arc::new(tx),
            latest: Arc::new(AtomicU64::new(0)),
        };
        searcher.settle(kind.initial_query().to_string());
        let task = tokio::spawn(debounce(searcher, rx));
        Self {
            kind,
            input,
            state,
            task,
        }
    }

    /// Panel kind.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Record a keystroke. Restarts the quiet window.
    pub fn set_query(&self, query: impl Into<String>) {
        if self.input.send(query.into()).is_err() {
            tracing::debug!("Search driver stopped, ignoring query");
        }
    }

    /// Subscribe to panel state.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<PanelState> {
        self.state.clone()
    }

    /// Current panel state.
    #[must_use]
    pub fn snapshot(&self) -> PanelState {
        self.state.borrow().clone()
    }
}

impl Drop for SearchDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for SearchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDriver")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

async fn debounce(searcher: Searcher, mut input: mpsc::UnboundedReceiver<String>) {
    let mut pending: Option<String> = None;
    loop {
        match pending.take() {
            None => match input.recv().await {
                Some(query) => pending = Some(query),
                None => break,
            },
            Some(query) => {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => break,
                    },
                    () = tokio::time::sleep(SEARCH_DEBOUNCE) => searcher.settle(query),
                }
            }
        }
    }
}

struct Searcher {
    client: Arc<dyn GifSearch>,
    kind: MediaKind,
    state: Arc<watch::Sender<PanelState>>,
    latest: Arc<AtomicU64>,
}

impl Searcher {
    fn settle(&self, query: String) {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().is_empty() && self.kind == MediaKind::Gif {
            self.state.send_modify(|state| {
                state.query = query;
                state.loading = false;
                state.error = None;
                state.results.clear();
            });
            return;
        }

        self.state.send_modify(|state| {
            state.query.clone_from(&query);
            state.loading = true;
            state.error = None;
        });

        let request = SearchRequest::new(self.kind, query);
        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.latest);
        tokio::spawn(async move {
            let outcome = client.search(&request).await;
            state.send_if_modified(|panel| {
                if latest.load(Ordering::SeqCst) != ticket {
                    tracing::debug!(query = %request.query, "Discarding stale search results");
                    return false;
                }
                panel.loading = false;
                match outcome {
                    Ok(results) => {
                        panel.results = results;
                        panel.error = None;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Search failed");
                        panel.error = Some(err.to_string());
                    }
                }
                true
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{ServiceError, ServiceResult};

    /// Answers each query with one result named after it, after a per-query
    /// delay.
    #[derive(Default)]
    struct FakeSearch {
        calls: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
        failing: Vec<String>,
    }

    impl FakeSearch {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl GifSearch for FakeSearch {
        async fn search(&self, request: &SearchRequest) -> ServiceResult<Vec<GifResult>> {
            self.calls.lock().expect("lock").push(request.query.clone());
            if let Some(delay) = self.delays.get(&request.query) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing.contains(&request.query) {
                return Err(ServiceError::Upstream {
                    status: 500,
                    message: "Failed to fetch GIFs from Giphy.".into(),
                });
            }
            Ok(vec![GifResult {
                id: request.query.clone(),
                preview_url: format!("{}.webp", request.query),
                full_url: format!("{}.gif", request.query),
            }])
        }
    }

    fn ids(state: &PanelState) -> Vec<String> {
        state.results.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn initial_query_searched_immediately() {
        let fake = Arc::new(FakeSearch::default());
        let driver = SearchDriver::spawn(fake.clone(), MediaKind::Gif);
        let mut state = driver.state();

        let settled = state
            .wait_for(|s| !s.loading && !s.results.is_empty())
            .await
            .expect("state")
            .clone();
        assert_eq!(ids(&settled), vec!["trending gifs"]);
        assert_eq!(fake.calls(), vec!["trending gifs"]);
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_coalesce_into_one_search() {
        let fake = Arc::new(FakeSearch::default());
        let driver = SearchDriver::spawn(fake.clone(), MediaKind::Sticker);
        tokio::time::sleep(Duration::from_millis(10)).await;

        driver.set_query("c");
        tokio::time::sleep(Duration::from_millis(200)).await;
        driver.set_query("ca");
        tokio::time::sleep(Duration::from_millis(200)).await;
        driver.set_query("cat");
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fake.calls(), vec![""]);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fake.calls(), vec!["", "cat"]);
        assert_eq!(ids(&driver.snapshot()), vec!["cat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let fake = Arc::new(FakeSearch {
            delays: [("slow".to_string(), Duration::from_secs(2))].into_iter().collect(),
            ..FakeSearch::default()
        });
        let driver = SearchDriver::spawn(fake.clone(), MediaKind::Gif);

        driver.set_query("slow");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(driver.snapshot().loading);

        driver.set_query("fast");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(ids(&driver.snapshot()), vec!["fast"]);

        // The slow response lands after the fast one and must not win.
        tokio::time::sleep(Duration::from_secs(3)).await;
        let state = driver.snapshot();
        assert_eq!(ids(&state), vec!["fast"]);
        assert!(!state.loading);
        assert_eq!(fake.calls(), vec!["trending gifs", "slow", "fast"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_sets_error_and_keeps_results() {
        let fake = Arc::new(FakeSearch {
            failing: vec!["broken".to_string()],
            ..FakeSearch::default()
        });
        let driver = SearchDriver::spawn(fake.clone(), MediaKind::Gif);
        tokio::time::sleep(Duration::from_millis(10)).await;

        driver.set_query("broken");
        tokio::time::sleep(Duration::from_millis(600)).await;

        let state = driver.snapshot();
        assert_eq!(state.error.as_deref(), Some("Failed to fetch GIFs from Giphy."));
        assert_eq!(ids(&state), vec!["trending gifs"]);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_gif_query_clears_without_request() {
        let fake = Arc::new(FakeSearch::default());
        let driver = SearchDriver::spawn(fake.clone(), MediaKind::Gif);
        tokio::time::sleep(Duration::from_millis(10)).await;

        driver.set_query("");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(driver.snapshot().results.is_empty());
        assert_eq!(fake.calls(), vec!["trending gifs"]);
    }
}
