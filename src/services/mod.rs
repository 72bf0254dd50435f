pub mod details;
pub mod rating;
pub mod rich_text;

pub use details::{generate_details, DetailRequest, DetailsError, GeneratedDetails};
pub use rating::{submit_rating, RatingError, RatingUpdate};
