// src/error.rs
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Yields and projections divide by the share price.
    #[error("invalid stock price {price}: must be a finite value greater than zero")]
    InvalidPrice { price: f64 },
}

impl EngineError {
    pub fn invalid_price(price: f64) -> Self {
        EngineError::InvalidPrice { price }
    }
}

pub(crate) fn ensure_valid_price(price: f64) -> Result<f64, EngineError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(EngineError::invalid_price(price))
    }
}
