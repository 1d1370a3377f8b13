/// Types shared by every Vidfetch crate.
pub mod config;
pub mod errors;
pub mod models;
