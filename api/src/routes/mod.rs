pub mod chat;
pub mod finance;
pub mod health_route;
