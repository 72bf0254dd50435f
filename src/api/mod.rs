pub mod catalog;
pub mod details;
pub mod error;
pub mod types;
pub mod vote;

pub use details::generate_person_details;
pub use error::ApiError;
pub use types::*;
pub use vote::submit_vote;
