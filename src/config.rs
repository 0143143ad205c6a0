//! Parameters for a [`ListController`](crate::ListController).

use std::{fmt, sync::Arc, time::Duration};

use crate::api::ListParams;

/// How often the console refreshed its tables.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

type ExcludeFn<R> = dyn Fn(&R) -> bool + Send + Sync;

/// Settings for one polled list.
///
/// ```
/// # use std::time::Duration;
/// # use sg_console::{ListConfig, resource::Node};
/// let config = ListConfig::<Node>::default()
///     .interval(Duration::from_secs(10))
///     .filter("kube_name", "prod");
/// assert_eq!(config.poll_interval(), Duration::from_secs(10));
/// ```
pub struct ListConfig<R> {
    interval: Duration,
    params: ListParams,
    warn_on_fetch_error: bool,
    exclude: Option<Arc<ExcludeFn<R>>>,
}

impl<R> Default for ListConfig<R> {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            params: ListParams::default(),
            warn_on_fetch_error: true,
            exclude: None,
        }
    }
}

impl<R> Clone for ListConfig<R> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            params: self.params.clone(),
            warn_on_fetch_error: self.warn_on_fetch_error,
            exclude: self.exclude.clone(),
        }
    }
}

impl<R> fmt::Debug for ListConfig<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfig")
            .field("interval", &self.interval)
            .field("params", &self.params)
            .field("warn_on_fetch_error", &self.warn_on_fetch_error)
            .field("exclude", &self.exclude.is_some())
            .finish()
    }
}

impl<R> ListConfig<R> {
    /// Sets the period between ticks, measured from the start of each cycle.
    ///
    /// A zero interval is raised to one millisecond.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Sets the page size requested on every fetch.
    pub fn limit(mut self, limit: u32) -> Self {
        self.params.limit = limit;
        self
    }

    /// Adds a server-side `filter.<field>=<value>` query parameter.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.filters.push((field.into(), value.into()));
        self
    }

    /// Whether a failed tick is surfaced as a "Connection Issue." warning.
    /// Failures are always logged.
    pub fn warn_on_fetch_error(mut self, warn: bool) -> Self {
        self.warn_on_fetch_error = warn;
        self
    }

    /// Hides items matching `f` from every fetched page.
    pub fn exclude(mut self, f: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.exclude = Some(Arc::new(f));
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.interval
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn warns_on_fetch_error(&self) -> bool {
        self.warn_on_fetch_error
    }

    /// Applies the exclusion predicate to a freshly fetched page.
    pub(crate) fn retain(&self, mut items: Vec<R>) -> Vec<R> {
        if let Some(exclude) = &self.exclude {
            items.retain(|item| !exclude(item));
        }
        items
    }
}
