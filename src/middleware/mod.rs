pub mod auth;
pub mod no_cache;

pub use auth::CurrentUser;
pub use no_cache::no_cache;
