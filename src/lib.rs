pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session;
pub mod types;
pub mod views;

pub use config::Config;
pub use error::TrackerError;
pub use router::{TrackerState, tracker_router};
