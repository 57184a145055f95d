pub mod admin;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod employees;
pub mod financial_requests;
pub mod health;
pub mod leaves;
pub mod medical_claims;
pub mod reminders;
pub mod resources;
pub mod salaries;
pub mod trainings;
