pub mod combat;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod monte_carlo;
pub mod output;
pub mod skills;
pub mod state;
pub mod stats;
pub mod validation;
