pub mod chain;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod identity;
pub mod leaderboard;
pub mod server;
