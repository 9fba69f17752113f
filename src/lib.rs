pub mod config;
pub mod filter;
pub mod pipeline;
pub mod publish;
pub mod table;
