pub mod error;
pub(crate) mod files;
pub mod token;
