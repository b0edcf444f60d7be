mod command;
mod engine;
mod renderer;

pub use engine::Session;

use breadcrumb::Handle;

/// Shell states are labels with identity, so repeated labels stay distinct.
pub type Label = Handle<String>;
