pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod harvest;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod util;
pub mod worksheet;
