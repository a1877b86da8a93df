pub(crate) mod client;
pub mod error;
