pub mod api;
pub use api::{ApiClient, ClientError};
pub mod session;
pub use session::Session;
