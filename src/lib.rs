// src/lib.rs

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::EngineError;
pub use models::{
    CompanyRecord, ConsistencyResult, PayoutEvent, ProjectionResult, YearKey, YearlyDividends,
    YieldEntry,
};
