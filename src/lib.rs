pub mod config;
pub mod db;
pub mod enricher;
pub mod entities;
pub mod error;
pub mod limiter;
pub mod loader;
pub mod models;
pub mod omdb;
pub mod pipeline;
pub mod source;
pub mod title;
pub mod verify;
