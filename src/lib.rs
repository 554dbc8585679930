pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod snapshot;
pub mod tracker;
pub mod watcher;

pub use config::*;
pub use dispatcher::*;
pub use error::*;
pub use listener::*;
pub use snapshot::*;
pub use tracker::*;
pub use watcher::*;
