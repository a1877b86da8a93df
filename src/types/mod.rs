pub mod config;
pub mod file;
pub mod job;
pub mod region;
pub mod request;
pub mod station;
