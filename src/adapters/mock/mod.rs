pub mod book_service;
pub mod clock;
pub mod identity_provider;
pub mod user_service;

pub use book_service::BookService;
pub use clock::Clock;
pub use identity_provider::IdentityProvider;
pub use user_service::UserService;
