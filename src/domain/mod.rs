pub mod commands;
pub mod errors;
pub mod expiry_policy;
pub mod loan;
pub mod rental;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
