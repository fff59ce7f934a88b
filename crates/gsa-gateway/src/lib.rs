pub mod server;
pub mod types;
pub mod usage;

pub use server::{create_router, start_server, AppState, AuthCookieSettings, SearchDefaults};
