pub mod auth;
pub mod errors;
pub mod models;
pub mod runner;
pub mod server;
pub mod service;
pub mod storage;
