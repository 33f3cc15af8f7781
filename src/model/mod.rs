pub mod hits;
pub mod overlap;
pub mod thresholds;
pub mod validation;
