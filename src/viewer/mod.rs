pub mod event;
pub mod state;

pub use event::ViewerEvent;
pub use state::{Dialog, ViewerState};
