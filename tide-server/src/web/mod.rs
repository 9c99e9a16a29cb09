//! Web layer for the tide server.
//!
//! Query parameters name a station by name or reference; handlers check it
//! against the station directory, query the tide store and answer with
//! JSON, an HTML table or a PNG graph. User mistakes come back as plain
//! text with status 200.

mod dto;
mod routes;
mod state;
pub mod templates;


pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
