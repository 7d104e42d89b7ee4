mod client;
mod config;
mod endpoint;

pub use client::Publisher;
pub use config::PublishConfig;
pub use endpoint::Endpoint;
