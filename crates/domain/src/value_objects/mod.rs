//! Value objects and small pure helpers.

pub mod confirmation;
pub mod resource;

pub use confirmation::Confirmation;
