pub mod bounty;
pub mod clock;
pub mod config;
pub mod floor;
pub mod pipeline;
pub mod rift;
pub mod search;
pub mod shop;
pub mod vision;
pub mod wish_selector;
