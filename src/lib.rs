pub mod config;
pub mod error;
pub mod observability;
pub mod probe;
pub mod protocol;
pub mod stream;
