use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Identity token for a breadcrumb state.
///
/// Equality is pointer identity: two handles are the same state only if one
/// was cloned from the other. Handles built from equal payloads stay distinct,
/// so pushing the same label twice records two separate entries.
pub struct Handle<T> {
    inner: Arc<T>,
}

impl<T> Handle<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    pub fn same(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::same(self, other)
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&*self.inner).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl<T: Serialize> Serialize for Handle<T> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        T::serialize(&self.inner, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_payloads_are_distinct_states() {
        let a = Handle::new("home".to_string());
        let b = Handle::new("home".to_string());
        assert_ne!(a, b);
        assert_eq!(*a, *b);
    }

    #[test]
    fn clones_share_identity() {
        let a = Handle::new(3);
        let b = a.clone();
        assert_eq!(a, b);
        assert!(Handle::same(&a, &b));
    }

    #[test]
    fn serializes_payload() {
        let a = Handle::new("docs".to_string());
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"docs\"");
        assert_eq!(a.to_string(), "docs");
    }
}
