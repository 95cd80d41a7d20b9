pub mod book_service;
pub mod clock;
pub mod identity_provider;
pub mod loan_store;
pub mod user_service;

pub use book_service::*;
pub use clock::*;
pub use identity_provider::*;
pub use loan_store::*;
pub use user_service::*;
