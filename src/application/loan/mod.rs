mod errors;
mod loan_service;
mod rental_locks;

pub use errors::{LoanApplicationError, Result};
pub use loan_service::{
    ServiceDependencies, get_all_active_loans, get_loan_history, get_my_active_loans,
    is_book_rented_by_user, rent_book,
};
pub use rental_locks::RentalLocks;
