pub mod attendance;
pub mod common;
pub mod employee;
pub mod financial_request;
pub mod leave_request;
pub mod medical_claim;
pub mod reminder;
pub mod resource;
pub mod salary;
pub mod training;
pub mod transaction;

pub use common::*;
pub use transaction::*;

pub use attendance::{AttendanceRepository, AttendanceRepositoryTrait};
pub use employee::{EmployeeRepository, EmployeeRepositoryTrait};
pub use financial_request::{FinancialRequestRepository, FinancialRequestRepositoryTrait};
pub use leave_request::{
    LeaveDeleteOutcome, LeaveListFilters, LeaveRequestRepository, LeaveRequestRepositoryTrait,
};
pub use medical_claim::{MedicalClaimRepository, MedicalClaimRepositoryTrait};
pub use reminder::{ReminderRepository, ReminderRepositoryTrait};
pub use resource::{ResourceRepository, ResourceRepositoryTrait};
pub use salary::{AmountColumn, SalaryRepository, SalaryRepositoryTrait};
pub use training::{TrainingRepository, TrainingRepositoryTrait};
