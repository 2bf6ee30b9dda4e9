// Car domain module
// Contains the car entity, its write-side value objects, and search matching

#![allow(clippy::module_inception)]

pub mod car;
pub mod search;
pub mod value_objects;

pub use car::{Car, CarValidationError, CARS_COLLECTION};
pub use search::SearchTerm;
pub use value_objects::CarDetails;
