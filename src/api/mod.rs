pub mod client;
pub mod config;
pub mod transport;
pub mod types;


pub use client::*;
pub use config::ClientConfig;
pub use transport::*;
pub use types::*;
