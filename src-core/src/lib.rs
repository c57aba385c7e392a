pub mod db;

pub mod expenses;
pub mod stats;
pub mod trackables;
pub mod users;

pub mod constants;
pub mod dates;
pub mod errors;
pub mod metrics;
pub mod pagination;
pub mod schema;

pub use errors::{Error, Result};
