pub mod buffer;
pub mod decoder;
pub mod estimator;
pub mod filter;
pub mod intervals;
pub mod peaks;
pub mod source;
