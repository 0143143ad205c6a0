//! View-model of one polled table: the last snapshot, the filtered subset
//! and the selection.

use std::sync::Arc;

use crate::resource::Resource;

pub mod filter;
pub use filter::filter;
pub mod selection;
pub use selection::Selection;

/// Sequence number of a fetch, increasing in issue order.
pub type Seq = u64;

/// State owned by a single list.
///
/// The displayed set is always derived from the unfiltered set and the
/// filter text, so it is a subset of the unfiltered set at all times.
#[derive(Debug, Clone)]
pub struct ListState<R: Resource> {
    unfiltered: Arc<Vec<R>>,
    displayed: Arc<Vec<R>>,
    filter_text: String,
    selection: Selection<R>,
    applied: Option<Seq>,
}

impl<R: Resource> Default for ListState<R> {
    fn default() -> Self {
        let empty = Arc::new(Vec::new());
        Self {
            unfiltered: Arc::clone(&empty),
            displayed: empty,
            filter_text: String::new(),
            selection: Selection::default(),
            applied: None,
        }
    }
}

impl<R: Resource> ListState<R> {
    /// The last fetched snapshot.
    pub fn unfiltered(&self) -> &Arc<Vec<R>> {
        &self.unfiltered
    }

    /// The snapshot after applying the filter text.
    pub fn displayed(&self) -> &Arc<Vec<R>> {
        &self.displayed
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn selection(&self) -> &Selection<R> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection<R> {
        &mut self.selection
    }

    /// Sequence number of the last applied snapshot.
    pub fn applied_seq(&self) -> Option<Seq> {
        self.applied
    }

    /// Changes the filter and recomputes the displayed set right away.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.refilter();
    }

    /// Reconciles a fresh snapshot: store it, re-resolve the selection
    /// against it, then recompute the displayed set.
    pub fn replace(&mut self, items: Vec<R>) {
        self.unfiltered = Arc::new(items);
        let dropped = self.selection.reconcile(&self.unfiltered);
        if dropped > 0 {
            log::debug!("{dropped} selected {} item(s) no longer exist", R::KIND);
        }
        self.refilter();
    }

    /// Like [`replace`](Self::replace), but ignores snapshots issued before
    /// the last applied one. Returns whether the snapshot was applied.
    pub fn apply(&mut self, seq: Seq, items: Vec<R>) -> bool {
        if self.applied.is_some_and(|applied| seq <= applied) {
            log::warn!(
                "discarding stale {} snapshot #{seq} (already at #{:?})",
                R::KIND,
                self.applied
            );
            return false;
        }
        self.applied = Some(seq);
        self.replace(items);
        true
    }

    fn refilter(&mut self) {
        self.displayed = match filter(&self.unfiltered, &self.filter_text) {
            std::borrow::Cow::Borrowed(_) => Arc::clone(&self.unfiltered),
            std::borrow::Cow::Owned(items) => Arc::new(items),
        };
    }
}
