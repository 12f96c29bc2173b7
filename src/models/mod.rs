pub mod catalog;
pub mod config;
pub mod recognition;
pub mod region;
