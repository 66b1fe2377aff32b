pub mod auth;
pub mod consumers;
pub mod dashboard;
pub mod generators;
pub mod representatives;
