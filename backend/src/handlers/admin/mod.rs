pub mod attendance;
pub mod employees;
pub mod financial_requests;
pub mod leaves;
pub mod medical_claims;
pub mod resources;
pub mod salaries;
pub mod trainings;

pub use attendance::*;
pub use employees::*;
pub use financial_requests::*;
pub use leaves::*;
pub use medical_claims::*;
pub use resources::*;
pub use salaries::*;
pub use trainings::*;
