// src/services/mod.rs
pub mod aggregator;
pub mod calculations;
pub mod consistency;
pub mod input;
pub mod pipeline;
pub mod projection;
pub mod report;
