pub mod logger;
pub mod tips;
