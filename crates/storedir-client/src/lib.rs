pub mod client;
pub mod error;
pub mod params;
pub mod types;

pub use client::StoreApiClient;
pub use error::ClientError;
pub use params::store_query;
pub use types::ApiResponse;
