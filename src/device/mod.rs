pub mod manager;
pub mod models;

pub use manager::PtzManager;
pub use models::*;
