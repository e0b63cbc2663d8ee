//! Abstract interfaces consumed by the search client.

pub mod dispatcher;

pub use dispatcher::{HttpMethod, RequestDispatcher};
