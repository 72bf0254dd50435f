pub mod model;
pub mod queries;
pub mod repo;
pub mod sanity;

#[cfg(test)]
pub mod memory;

pub use model::*;
pub use repo::*;
pub use sanity::SanityClient;
