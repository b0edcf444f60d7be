use super::history::Trail;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receives breadcrumb events synchronously on the mutating thread.
///
/// For a single mutation every `state_added` call precedes the one
/// `state_changed` call. The trail handed to `state_changed` already reflects
/// the mutation.
pub trait BreadcrumbListener<S, V>: Send + Sync {
    fn state_added(&self, _state: &S, _value: Option<&V>) {}

    fn state_changed(&self, _trail: Trail<'_, S, V>, _old: Option<&S>, _new: Option<&S>) {}
}

pub type SharedListener<S, V> = Arc<dyn BreadcrumbListener<S, V>>;

type AddedFn<S, V> = Box<dyn Fn(&S, Option<&V>) + Send + Sync>;
type ChangedFn<S> = Box<dyn Fn(Option<&S>, Option<&S>) + Send + Sync>;

/// Listener assembled from closures.
pub struct FnListener<S, V> {
    added: Option<AddedFn<S, V>>,
    changed: Option<ChangedFn<S>>,
}

impl<S, V> FnListener<S, V> {
    pub fn new() -> Self {
        Self {
            added: None,
            changed: None,
        }
    }

    pub fn on_added(mut self, f: impl Fn(&S, Option<&V>) + Send + Sync + 'static) -> Self {
        self.added = Some(Box::new(f));
        self
    }

    pub fn on_changed(mut self, f: impl Fn(Option<&S>, Option<&S>) + Send + Sync + 'static) -> Self {
        self.changed = Some(Box::new(f));
        self
    }
}

impl<S, V> Default for FnListener<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, V> BreadcrumbListener<S, V> for FnListener<S, V> {
    fn state_added(&self, state: &S, value: Option<&V>) {
        if let Some(f) = &self.added {
            f(state, value);
        }
    }

    fn state_changed(&self, _trail: Trail<'_, S, V>, old: Option<&S>, new: Option<&S>) {
        if let Some(f) = &self.changed {
            f(old, new);
        }
    }
}

/// Ordered listener registry guarded by a single mutex.
///
/// Dispatch iterates over a snapshot taken under the lock, so listeners may
/// register or unregister from inside a callback; such changes apply from the
/// next event on.
pub struct Listeners<S, V> {
    inner: Mutex<Vec<SharedListener<S, V>>>,
}

fn same_listener<S, V>(a: &SharedListener<S, V>, b: &SharedListener<S, V>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl<S, V> Listeners<S, V> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    // The list is only ever pushed to or retained, so a poisoned lock still
    // guards a consistent vector.
    fn lock(&self) -> MutexGuard<'_, Vec<SharedListener<S, V>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `listener`. Returns false if it was already registered.
    pub fn add(&self, listener: SharedListener<S, V>) -> bool {
        let mut listeners = self.lock();
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            log::trace!("listener already registered");
            return false;
        }
        listeners.push(listener);
        log::trace!("listener registered ({} total)", listeners.len());
        true
    }

    /// Unregisters `listener`. Returns false if it was not registered.
    pub fn remove(&self, listener: &SharedListener<S, V>) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        let removed = listeners.len() != before;
        if removed {
            log::trace!("listener removed ({} left)", listeners.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn snapshot(&self) -> Vec<SharedListener<S, V>> {
        self.lock().clone()
    }

    pub(crate) fn fire_state_added(&self, state: &S, value: Option<&V>) {
        for listener in self.snapshot() {
            listener.state_added(state, value);
        }
    }

    pub(crate) fn fire_state_changed(&self, trail: Trail<'_, S, V>, old: Option<&S>, new: Option<&S>) {
        let listeners = self.snapshot();
        log::trace!("dispatching state change to {} listener(s)", listeners.len());
        for listener in listeners {
            listener.state_changed(trail, old, new);
        }
    }
}

impl<S, V> Default for Listeners<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    impl BreadcrumbListener<&'static str, i32> for Counter {
        fn state_added(&self, _state: &&'static str, _value: Option<&i32>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let listeners: Listeners<&'static str, i32> = Listeners::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let shared: SharedListener<&'static str, i32> = counter.clone();

        assert!(listeners.add(shared.clone()));
        assert!(!listeners.add(shared.clone()));
        assert_eq!(listeners.len(), 1);

        listeners.fire_state_added(&"a", Some(&1));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let listeners: Listeners<&'static str, i32> = Listeners::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let shared: SharedListener<&'static str, i32> = counter.clone();

        listeners.add(shared.clone());
        assert!(listeners.remove(&shared));
        assert!(!listeners.remove(&shared));
        assert!(listeners.is_empty());

        listeners.fire_state_added(&"a", None);
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fn_listener_forwards_to_closures() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in = seen.clone();
        let listeners: Listeners<&'static str, i32> = Listeners::new();
        listeners.add(Arc::new(FnListener::<&'static str, i32>::new().on_added(move |_, value| {
            seen_in.fetch_add(*value.unwrap_or(&0) as usize, Ordering::SeqCst);
        })));

        listeners.fire_state_added(&"a", Some(&5));
        listeners.fire_state_added(&"b", None);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }
}
