//! Email gateway implementations.

pub mod mock_email;

pub use mock_email::{MockEmailGateway, SentEmail};
