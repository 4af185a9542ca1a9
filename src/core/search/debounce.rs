//! Debounced search-to-URL synchronization
//!
//! A [`Debouncer`] is a cancellable delayed task: each call replaces the
//! pending task, so only the last value of a burst is acted on, once the
//! quiet period has elapsed. [`SearchBox`] uses one to rewrite the current
//! URL's query string after the user stops typing.
//!
//! Both must be used from inside a tokio runtime.

use super::params::SearchParams;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Quiet period used by search boxes unless configured otherwise
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debouncer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

/// Delays an action until calls stop arriving for `delay`
pub struct Debouncer<T> {
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            action: Arc::new(action),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending run and schedule `value` for `now + delay`
    pub fn call(&mut self, value: T) {
        self.cancel();
        let deadline = Instant::now() + self.delay;
        let action = self.action.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            action(value);
        }));
    }

    /// Drop the pending run, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn state(&self) -> DebounceState {
        match &self.pending {
            Some(handle) if !handle.is_finished() => DebounceState::Pending,
            _ => DebounceState::Idle,
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// The page location a search box reads from and rewrites
pub trait Location: Send + Sync {
    fn pathname(&self) -> String;

    /// Current query string, without the leading `?`
    fn search(&self) -> String;

    /// Client-side navigation that replaces the current history entry
    fn replace(&self, url: &str);
}

#[derive(Debug, Default)]
struct LocationState {
    pathname: String,
    search: String,
    history_len: usize,
    replacements: Vec<String>,
}

/// A [`Location`] held in memory, recording every replace
#[derive(Debug, Clone)]
pub struct InMemoryLocation {
    state: Arc<Mutex<LocationState>>,
}

impl InMemoryLocation {
    /// Start at `url` (`/path` or `/path?query`)
    pub fn new(url: &str) -> Self {
        let location = Self {
            state: Arc::new(Mutex::new(LocationState {
                history_len: 1,
                ..Default::default()
            })),
        };
        location.set_url(url);
        location
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LocationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_url(&self, url: &str) {
        let (pathname, search) = url.split_once('?').unwrap_or((url, ""));
        let mut state = self.lock();
        state.pathname = pathname.to_string();
        state.search = search.to_string();
    }

    /// Full-page navigation: pushes a history entry
    pub fn push(&self, url: &str) {
        self.set_url(url);
        self.lock().history_len += 1;
    }

    /// Current `path?query`
    pub fn url(&self) -> String {
        let state = self.lock();
        if state.search.is_empty() {
            state.pathname.clone()
        } else {
            format!("{}?{}", state.pathname, state.search)
        }
    }

    pub fn replacements(&self) -> Vec<String> {
        self.lock().replacements.clone()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history_len
    }
}

impl Location for InMemoryLocation {
    fn pathname(&self) -> String {
        self.lock().pathname.clone()
    }

    fn search(&self) -> String {
        self.lock().search.clone()
    }

    fn replace(&self, url: &str) {
        self.set_url(url);
        self.lock().replacements.push(url.to_string());
    }
}

/// Search input bound to a location
///
/// Keystrokes go through [`SearchBox::input`]. When typing pauses for the
/// debounce delay, the box reads the location's *current* parameters,
/// applies the latest term and replaces the URL. Dropping the box cancels a
/// pending navigation.
pub struct SearchBox<L: Location + 'static> {
    location: Arc<L>,
    debouncer: Debouncer<String>,
}

impl<L: Location + 'static> SearchBox<L> {
    pub fn new(location: Arc<L>, delay: Duration) -> Self {
        let target = location.clone();
        let debouncer = Debouncer::new(delay, move |term: String| {
            let mut params = SearchParams::parse(&target.search());
            params.apply_term(&term);
            let url = format!("{}?{}", target.pathname(), params.to_query_string());
            tracing::debug!(%url, "search navigation");
            target.replace(&url);
        });
        Self {
            location,
            debouncer,
        }
    }

    /// Text the box should show on first render
    pub fn default_value(&self) -> Option<String> {
        SearchParams::parse(&self.location.search())
            .get(super::params::QUERY)
            .map(str::to_string)
    }

    /// Input change event
    pub fn input(&mut self, term: impl Into<String>) {
        self.debouncer.call(term.into());
    }

    pub fn state(&self) -> DebounceState {
        self.debouncer.state()
    }

    /// Teardown without dropping
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
