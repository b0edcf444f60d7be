mod handle;
mod history;
mod listener;

pub use handle::Handle;
pub use history::{Breadcrumb, Entry, Iter, Trail};
pub use listener::{BreadcrumbListener, FnListener, Listeners, SharedListener};
