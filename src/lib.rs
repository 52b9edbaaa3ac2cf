pub mod ai;
pub mod client;
pub mod config;
pub mod controllers;
pub mod db;
pub mod models;
pub mod server;
pub mod state;
pub mod store;
