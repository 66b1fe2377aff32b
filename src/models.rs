pub mod auth;
pub mod consumer;
pub mod dashboard;
pub mod generator;
pub mod representative;
