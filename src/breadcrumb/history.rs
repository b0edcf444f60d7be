use super::listener::{Listeners, SharedListener};
use crate::error::{BreadcrumbError, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{vec_deque, VecDeque};
use std::fmt;
use std::sync::Arc;

/// One recorded step: a state and the value shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<S, V> {
    pub state: S,
    pub value: Option<V>,
}

impl<S, V> Entry<S, V> {
    pub fn new(state: S, value: impl Into<Option<V>>) -> Self {
        Self {
            state,
            value: value.into(),
        }
    }
}

impl<S, V> From<(S, V)> for Entry<S, V> {
    fn from((state, value): (S, V)) -> Self {
        Self::new(state, value)
    }
}

fn out_of_range(index: usize, len: usize) -> BreadcrumbError {
    BreadcrumbError::IndexOutOfRange {
        index: isize::try_from(index).unwrap_or(isize::MAX),
        len,
    }
}

/// Read-only view of a breadcrumb, newest entry first.
pub struct Trail<'a, S, V> {
    entries: &'a VecDeque<Entry<S, V>>,
}

impl<S, V> Clone for Trail<'_, S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for Trail<'_, S, V> {}

impl<'a, S, V> Trail<'a, S, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_state(&self) -> Option<&'a S> {
        self.entries.front().map(|e| &e.state)
    }

    pub fn current_value(&self) -> Option<&'a V> {
        self.entries.front().and_then(|e| e.value.as_ref())
    }

    /// State `index` steps back from the current one (0 is current).
    pub fn peek_state(&self, index: usize) -> Result<&'a S> {
        self.entries
            .get(index)
            .map(|e| &e.state)
            .ok_or_else(|| out_of_range(index, self.entries.len()))
    }

    pub fn peek_value(&self, index: usize) -> Result<Option<&'a V>> {
        self.entries
            .get(index)
            .map(|e| e.value.as_ref())
            .ok_or_else(|| out_of_range(index, self.entries.len()))
    }

    pub fn iter(&self) -> Iter<'a, S, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn states(&self) -> Vec<&'a S> {
        self.entries.iter().map(|e| &e.state).collect()
    }

    pub fn values(&self) -> Vec<Option<&'a V>> {
        self.entries.iter().map(|e| e.value.as_ref()).collect()
    }
}

impl<'a, S: PartialEq, V> Trail<'a, S, V> {
    /// Depth of `state` from the current entry, if present.
    pub fn position(&self, state: &S) -> Option<usize> {
        self.entries.iter().position(|e| e.state == *state)
    }

    pub fn contains_state(&self, state: &S) -> bool {
        self.position(state).is_some()
    }
}

impl<'a, S, V> IntoIterator for Trail<'a, S, V> {
    type Item = (&'a S, Option<&'a V>);
    type IntoIter = Iter<'a, S, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(state, value)` pairs, newest first.
pub struct Iter<'a, S, V> {
    inner: vec_deque::Iter<'a, Entry<S, V>>,
}

impl<S, V> Clone for Iter<'_, S, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, S, V> Iterator for Iter<'a, S, V> {
    type Item = (&'a S, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.state, e.value.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S, V> DoubleEndedIterator for Iter<'_, S, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| (&e.state, e.value.as_ref()))
    }
}

impl<S, V> ExactSizeIterator for Iter<'_, S, V> {}

/// A linear navigation history.
///
/// The front entry is the current state. Adding a state pushes it in front;
/// going to an older state drops everything newer than it. Listeners hear
/// about every change synchronously, in registration order.
///
/// States are located with `PartialEq`, which is taken to be the identity of
/// a state. Use [`Handle`](super::Handle) when equal payloads must remain
/// distinct entries.
pub struct Breadcrumb<S, V> {
    entries: VecDeque<Entry<S, V>>,
    listeners: Arc<Listeners<S, V>>,
}

impl<S, V> Breadcrumb<S, V> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            listeners: Arc::new(Listeners::new()),
        }
    }

    pub fn trail(&self) -> Trail<'_, S, V> {
        Trail {
            entries: &self.entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn current_state(&self) -> Option<&S> {
        self.trail().current_state()
    }

    pub fn current_value(&self) -> Option<&V> {
        self.trail().current_value()
    }

    pub fn peek_state(&self, index: usize) -> Result<&S> {
        self.trail().peek_state(index)
    }

    fn checked_index(&self, index: isize) -> Result<usize> {
        match usize::try_from(index) {
            Ok(i) if i < self.entries.len() => Ok(i),
            _ => Err(BreadcrumbError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            }),
        }
    }

    pub fn peek_state_signed(&self, index: isize) -> Result<&S> {
        self.peek_state(self.checked_index(index)?)
    }

    pub fn peek_value(&self, index: usize) -> Result<Option<&V>> {
        self.trail().peek_value(index)
    }

    pub fn peek_value_signed(&self, index: isize) -> Result<Option<&V>> {
        self.peek_value(self.checked_index(index)?)
    }

    pub fn iter(&self) -> Iter<'_, S, V> {
        self.trail().iter()
    }

    pub fn states(&self) -> Vec<&S> {
        self.trail().states()
    }

    pub fn values(&self) -> Vec<Option<&V>> {
        self.trail().values()
    }

    /// Makes `state` current, keeping everything before it.
    pub fn add_state(&mut self, state: S, value: impl Into<Option<V>>) {
        self.entries.push_front(Entry::new(state, value));
        debug!("state added, breadcrumb size {}", self.entries.len());

        let added = &self.entries[0];
        let old = self.entries.get(1).map(|e| &e.state);
        self.listeners
            .fire_state_added(&added.state, added.value.as_ref());
        self.listeners
            .fire_state_changed(self.trail(), old, Some(&added.state));
    }

    /// Drops the current entry, making the previous one current.
    pub fn pop_state(&mut self) {
        let Some(old) = self.entries.pop_front() else {
            trace!("pop on empty breadcrumb ignored");
            return;
        };
        debug!("state popped, breadcrumb size {}", self.entries.len());
        self.listeners
            .fire_state_changed(self.trail(), Some(&old.state), self.current_state());
    }

    /// Replaces the whole history. `entries` run oldest to newest, so the
    /// last one becomes current. Every entry is announced before the single
    /// state change.
    pub fn set(&mut self, entries: impl IntoIterator<Item = Entry<S, V>>) {
        let previous = std::mem::take(&mut self.entries);

        for entry in entries {
            self.entries.push_front(entry);
            let added = &self.entries[0];
            self.listeners
                .fire_state_added(&added.state, added.value.as_ref());
        }
        debug!("breadcrumb replaced, size {}", self.entries.len());

        let old = previous.front().map(|e| &e.state);
        self.listeners
            .fire_state_changed(self.trail(), old, self.current_state());
    }

    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            trace!("clear on empty breadcrumb ignored");
            return;
        }
        let previous = std::mem::take(&mut self.entries);
        debug!("breadcrumb cleared ({} entries dropped)", previous.len());

        let old = previous.front().map(|e| &e.state);
        self.listeners.fire_state_changed(self.trail(), old, None);
    }

    pub fn add_listener(&self, listener: SharedListener<S, V>) -> bool {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&self, listener: &SharedListener<S, V>) -> bool {
        self.listeners.remove(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Registry handle that other threads can use while the owner mutates.
    pub fn listeners(&self) -> Arc<Listeners<S, V>> {
        Arc::clone(&self.listeners)
    }
}

impl<S: PartialEq, V> Breadcrumb<S, V> {
    pub fn contains_state(&self, state: &S) -> bool {
        self.trail().contains_state(state)
    }

    pub fn position(&self, state: &S) -> Option<usize> {
        self.trail().position(state)
    }

    /// Goes back to `state`, dropping every newer entry. Nothing happens if
    /// `state` is already current or not in the history.
    pub fn goto_state(&mut self, state: &S) {
        let index = match self.position(state) {
            Some(i) if i > 0 => i,
            Some(_) => {
                trace!("goto current state ignored");
                return;
            }
            None => {
                trace!("goto unknown state ignored");
                return;
            }
        };

        let dropped: Vec<Entry<S, V>> = self.entries.drain(..index).collect();
        debug!(
            "went back {} step(s), breadcrumb size {}",
            dropped.len(),
            self.entries.len()
        );

        let old = dropped.first().map(|e| &e.state);
        self.listeners
            .fire_state_changed(self.trail(), old, self.current_state());
    }
}

impl<S, V> Default for Breadcrumb<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: fmt::Debug, V: fmt::Debug> fmt::Debug for Breadcrumb<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breadcrumb")
            .field("entries", &self.entries)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<'a, S, V> IntoIterator for &'a Breadcrumb<S, V> {
    type Item = (&'a S, Option<&'a V>);
    type IntoIter = Iter<'a, S, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
