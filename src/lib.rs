pub mod analyzer;
pub mod cli;
pub mod config;
pub mod drift;
pub mod entities;
pub mod errors;
pub mod guard;
pub mod inspector;
pub mod postgres;
pub mod repo;
pub mod services;
pub mod types;
pub mod utils;
