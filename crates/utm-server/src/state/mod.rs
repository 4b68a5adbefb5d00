mod store;

pub use store::{AppState, ServerEvent};
