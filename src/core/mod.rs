pub mod charmap;
pub mod correction;
pub mod engine;
pub mod types;
