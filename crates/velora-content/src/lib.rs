pub mod client;
pub mod error;
mod fields;
pub mod normalize;
mod retry;
pub mod types;

pub use client::ContentClient;
pub use error::ContentError;
pub use normalize::{normalize_service, normalize_services};
pub use types::extract_records;
