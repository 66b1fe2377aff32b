pub mod auth_service;
pub mod consumer_service;
pub mod dashboard_service;
pub mod filters;
pub mod generator_service;
pub mod representative_service;
pub mod resource;
