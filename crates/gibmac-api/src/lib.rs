// gibmac-api: Async fetcher for the upstream macrecovery resource files

pub mod client;
pub mod error;
pub mod transport;

pub use client::{FetchedFile, ResourceClient};
pub use error::Error;
pub use transport::TransportConfig;
