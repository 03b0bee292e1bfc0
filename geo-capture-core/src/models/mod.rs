pub mod config;
pub mod error;
pub mod geo;
pub mod image;
pub mod permission;
pub mod state;
