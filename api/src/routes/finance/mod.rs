pub mod finance_error;
pub mod finance_route;
