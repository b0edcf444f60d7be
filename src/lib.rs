//! Linear navigation history ("breadcrumb") with change listeners.
//!
//! A [`Breadcrumb`] records the states a user has visited, newest first, and
//! can jump back to any of them, dropping everything newer. Registered
//! [`BreadcrumbListener`]s are told about every added entry and every change
//! of the current state.

pub mod breadcrumb;
pub mod error;

pub use breadcrumb::{
    Breadcrumb, BreadcrumbListener, Entry, FnListener, Handle, Iter, Listeners, SharedListener,
    Trail,
};
pub use error::{BreadcrumbError, Result};
