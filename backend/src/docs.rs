#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    handlers::{
        admin::{
            AllocationListQuery, FinancialRequestListQuery, LeaveListQuery,
            TrainingAllocationListQuery,
        },
        financial_requests::FinancialRequestQuery,
    },
    models::{
        attendance::{
            AttendanceAnalysis, AttendanceAnalysisQuery, AttendanceRangeQuery, AttendanceRecord,
            AttendanceResponse, MonthHours, PunchKind, PunchRequest, PunchResponse,
            TodayAttendance, WeekdayHours,
        },
        employee::{CreateEmployee, EmployeeResponse, LoginRequest, LoginResponse, Role},
        financial_request::{
            CreateFinancialRequest, FinancialRequest, FinancialRequestType, FinancialStatus,
            UpdateFinancialRequest,
        },
        leave_request::{CreateLeaveRequest, LeaveRequest, LeaveStatus, LeaveType, LeaveTypeSummary},
        medical_claim::{
            AcceptedClaim, ClaimLimit, ClaimOverview, ClaimStatus, ClaimSummary,
            CreateMedicalClaim, EmployeeClaimSpend, MedicalClaim, UpdateClaimLimit,
        },
        reminder::{
            AllocationAlert, CreateReminder, NotificationFeed, Reminder, ReminderQuery,
            TrainingReminder,
        },
        resource::{
            AlertPayload, AllocateResource, AllocationStatus, AllocationView, CreateResource,
            Resource, ResourceAllocation, ReturnOutcome, UpdateResourceQuantity,
        },
        salary::{CreateSalary, SalaryResponse, UpdateDeductions, UpdateEarnings},
        training::{
            AllocateTraining, CreateTraining, ReminderFlagPayload, Training, TrainingAllocation,
            TrainingAllocationView, TrainingStatus,
        },
        PaginatedResponse, PaginationQuery, StatusChange,
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        me_doc,
        health_doc,
        admin_create_employee_doc,
        admin_list_employees_doc,
        my_reports_doc,
        create_leave_doc,
        my_leaves_doc,
        my_leave_analysis_doc,
        delete_leave_doc,
        admin_list_leaves_doc,
        admin_update_leave_status_doc,
        admin_create_resource_doc,
        list_resources_doc,
        admin_update_resource_quantity_doc,
        admin_allocate_resource_doc,
        my_allocations_doc,
        admin_list_allocations_doc,
        admin_return_allocation_doc,
        admin_set_allocation_alert_doc,
        admin_create_training_doc,
        list_trainings_doc,
        admin_allocate_training_doc,
        my_training_allocations_doc,
        admin_list_training_allocations_doc,
        admin_update_training_status_doc,
        admin_set_training_reminder_doc,
        create_financial_request_doc,
        my_financial_requests_doc,
        update_financial_request_doc,
        admin_list_financial_requests_doc,
        admin_update_financial_request_status_doc,
        create_medical_claim_doc,
        my_medical_claims_doc,
        my_claim_summary_doc,
        admin_list_pending_claims_doc,
        admin_update_claim_status_doc,
        admin_set_claim_limit_doc,
        admin_claim_overview_doc,
        admin_create_salary_doc,
        my_salaries_doc,
        admin_employee_salaries_doc,
        admin_update_earnings_doc,
        admin_update_deductions_doc,
        create_reminder_doc,
        my_reminders_doc,
        my_notifications_doc,
        punch_doc,
        my_attendance_doc,
        my_attendance_today_doc,
        my_attendance_analysis_doc,
        admin_employee_attendance_doc
    ),
    components(
        schemas(
            // auth & employees
            LoginRequest,
            LoginResponse,
            CreateEmployee,
            EmployeeResponse,
            Role,
            StatusChange,
            // leaves
            CreateLeaveRequest,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            LeaveTypeSummary,
            // resources
            CreateResource,
            Resource,
            UpdateResourceQuantity,
            AllocateResource,
            ResourceAllocation,
            AllocationStatus,
            AllocationView,
            AlertPayload,
            ReturnOutcome,
            // trainings
            CreateTraining,
            Training,
            AllocateTraining,
            TrainingAllocation,
            TrainingAllocationView,
            TrainingStatus,
            ReminderFlagPayload,
            // financial requests
            CreateFinancialRequest,
            UpdateFinancialRequest,
            FinancialRequest,
            FinancialRequestType,
            FinancialStatus,
            // medical claims
            CreateMedicalClaim,
            MedicalClaim,
            ClaimStatus,
            UpdateClaimLimit,
            ClaimLimit,
            ClaimSummary,
            AcceptedClaim,
            EmployeeClaimSpend,
            ClaimOverview,
            // salaries
            CreateSalary,
            SalaryResponse,
            UpdateEarnings,
            UpdateDeductions,
            // reminders & notifications
            CreateReminder,
            Reminder,
            AllocationAlert,
            TrainingReminder,
            NotificationFeed,
            // attendance
            PunchRequest,
            PunchKind,
            PunchResponse,
            AttendanceRecord,
            AttendanceResponse,
            TodayAttendance,
            WeekdayHours,
            MonthHours,
            AttendanceAnalysis
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Login and current employee"),
        (name = "Employees", description = "Employee records and reporting lines"),
        (name = "Leaves", description = "Leave requests and approvals"),
        (name = "Resources", description = "Resource stock and allocations"),
        (name = "Trainings", description = "Training catalogue and assignments"),
        (name = "Financial", description = "Loans and salary advances"),
        (name = "Medical", description = "Medical claims and the claim cap"),
        (name = "Salaries", description = "Payslips"),
        (name = "Reminders", description = "Personal reminders and notification feed"),
        (name = "Attendance", description = "Daily punches and worked hours"),
        (name = "System", description = "Health checks")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, body = EmployeeResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, body = serde_json::Value)),
    tag = "System",
    security(())
)]
fn health_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, body = EmployeeResponse),
        (status = 400, description = "Unknown supervisor"),
        (status = 409, description = "Employee already exists")
    ),
    tag = "Employees"
)]
fn admin_create_employee_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/employees",
    params(PaginationQuery),
    responses((status = 200, body = PaginatedResponse<EmployeeResponse>)),
    tag = "Employees"
)]
fn admin_list_employees_doc() {}

#[utoipa::path(
    get,
    path = "/api/employees/me/reports",
    responses((status = 200, body = Vec<EmployeeResponse>)),
    tag = "Employees"
)]
fn my_reports_doc() {}

#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveRequest,
    responses(
        (status = 200, body = LeaveRequest),
        (status = 400, description = "Invalid leave window")
    ),
    tag = "Leaves"
)]
fn create_leave_doc() {}

#[utoipa::path(
    get,
    path = "/api/leaves/me",
    responses((status = 200, body = Vec<LeaveRequest>)),
    tag = "Leaves"
)]
fn my_leaves_doc() {}

#[utoipa::path(
    get,
    path = "/api/leaves/me/analysis",
    responses((status = 200, body = Vec<LeaveTypeSummary>)),
    tag = "Leaves"
)]
fn my_leave_analysis_doc() {}

#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = serde_json::Value),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request is no longer pending")
    ),
    tag = "Leaves"
)]
fn delete_leave_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/leaves",
    params(LeaveListQuery),
    responses(
        (status = 200, body = PaginatedResponse<LeaveRequest>),
        (status = 400, description = "Unknown status filter")
    ),
    tag = "Leaves"
)]
fn admin_list_leaves_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/leaves/{id}/status",
    request_body = StatusChange,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = LeaveRequest),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "Leaves"
)]
fn admin_update_leave_status_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/resources",
    request_body = CreateResource,
    responses((status = 200, body = Resource)),
    tag = "Resources"
)]
fn admin_create_resource_doc() {}

#[utoipa::path(
    get,
    path = "/api/resources",
    responses((status = 200, body = Vec<Resource>)),
    tag = "Resources"
)]
fn list_resources_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/resources/{id}/quantity",
    request_body = UpdateResourceQuantity,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = Resource),
        (status = 404, description = "Resource not found"),
        (status = 409, description = "Total below outstanding allocations")
    ),
    tag = "Resources"
)]
fn admin_update_resource_quantity_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/resources/{id}/allocations",
    request_body = AllocateResource,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = ResourceAllocation),
        (status = 404, description = "Resource or employee not found"),
        (status = 409, description = "Insufficient quantity")
    ),
    tag = "Resources"
)]
fn admin_allocate_resource_doc() {}

#[utoipa::path(
    get,
    path = "/api/resources/allocations/me",
    responses((status = 200, body = Vec<AllocationView>)),
    tag = "Resources"
)]
fn my_allocations_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/allocations",
    params(AllocationListQuery),
    responses((status = 200, body = PaginatedResponse<AllocationView>)),
    tag = "Resources"
)]
fn admin_list_allocations_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/allocations/{id}/return",
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = ReturnOutcome),
        (status = 404, description = "Allocation not found"),
        (status = 409, description = "Already returned")
    ),
    tag = "Resources"
)]
fn admin_return_allocation_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/allocations/{id}/alert",
    request_body = AlertPayload,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = ResourceAllocation),
        (status = 404, description = "Allocation not found")
    ),
    tag = "Resources"
)]
fn admin_set_allocation_alert_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/trainings",
    request_body = CreateTraining,
    responses((status = 200, body = Training)),
    tag = "Trainings"
)]
fn admin_create_training_doc() {}

#[utoipa::path(
    get,
    path = "/api/trainings",
    responses((status = 200, body = Vec<Training>)),
    tag = "Trainings"
)]
fn list_trainings_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/trainings/{id}/allocations",
    request_body = AllocateTraining,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = TrainingAllocation),
        (status = 404, description = "Training or employee not found")
    ),
    tag = "Trainings"
)]
fn admin_allocate_training_doc() {}

#[utoipa::path(
    get,
    path = "/api/trainings/allocations/me",
    responses((status = 200, body = Vec<TrainingAllocationView>)),
    tag = "Trainings"
)]
fn my_training_allocations_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/training-allocations",
    params(TrainingAllocationListQuery),
    responses((status = 200, body = PaginatedResponse<TrainingAllocationView>)),
    tag = "Trainings"
)]
fn admin_list_training_allocations_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/training-allocations/{id}/status",
    request_body = StatusChange,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = TrainingAllocation),
        (status = 400, description = "Unknown status"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "Trainings"
)]
fn admin_update_training_status_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/training-allocations/{id}/reminder",
    request_body = ReminderFlagPayload,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = TrainingAllocation),
        (status = 404, description = "Training allocation not found")
    ),
    tag = "Trainings"
)]
fn admin_set_training_reminder_doc() {}

#[utoipa::path(
    post,
    path = "/api/financial-requests",
    request_body = CreateFinancialRequest,
    responses((status = 200, body = FinancialRequest)),
    tag = "Financial"
)]
fn create_financial_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/financial-requests/me",
    params(FinancialRequestQuery),
    responses(
        (status = 200, body = Vec<FinancialRequest>),
        (status = 400, description = "Unknown request type")
    ),
    tag = "Financial"
)]
fn my_financial_requests_doc() {}

#[utoipa::path(
    put,
    path = "/api/financial-requests/{id}",
    request_body = UpdateFinancialRequest,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = FinancialRequest),
        (status = 404, description = "Financial request not found"),
        (status = 409, description = "Only pending requests can be edited")
    ),
    tag = "Financial"
)]
fn update_financial_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/financial-requests",
    params(FinancialRequestListQuery),
    responses((status = 200, body = PaginatedResponse<FinancialRequest>)),
    tag = "Financial"
)]
fn admin_list_financial_requests_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/financial-requests/{id}/status",
    request_body = StatusChange,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = FinancialRequest),
        (status = 400, description = "Unknown status"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "Financial"
)]
fn admin_update_financial_request_status_doc() {}

#[utoipa::path(
    post,
    path = "/api/medical-claims",
    request_body = CreateMedicalClaim,
    responses((status = 200, body = MedicalClaim)),
    tag = "Medical"
)]
fn create_medical_claim_doc() {}

#[utoipa::path(
    get,
    path = "/api/medical-claims/me",
    responses((status = 200, body = Vec<MedicalClaim>)),
    tag = "Medical"
)]
fn my_medical_claims_doc() {}

#[utoipa::path(
    get,
    path = "/api/medical-claims/me/summary",
    responses((status = 200, body = ClaimSummary)),
    tag = "Medical"
)]
fn my_claim_summary_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/medical-claims",
    responses((status = 200, body = Vec<MedicalClaim>)),
    tag = "Medical"
)]
fn admin_list_pending_claims_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/medical-claims/{id}/status",
    request_body = StatusChange,
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, body = MedicalClaim),
        (status = 400, description = "Unknown status"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "Medical"
)]
fn admin_update_claim_status_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/medical-claims/limit",
    request_body = UpdateClaimLimit,
    responses((status = 200, body = ClaimLimit)),
    tag = "Medical"
)]
fn admin_set_claim_limit_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/medical-claims/summary",
    responses((status = 200, body = ClaimOverview)),
    tag = "Medical"
)]
fn admin_claim_overview_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/salaries/{emp_id}",
    request_body = CreateSalary,
    params(("emp_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, body = SalaryResponse),
        (status = 404, description = "Employee not found")
    ),
    tag = "Salaries"
)]
fn admin_create_salary_doc() {}

#[utoipa::path(
    get,
    path = "/api/salaries/me",
    responses((status = 200, body = Vec<SalaryResponse>)),
    tag = "Salaries"
)]
fn my_salaries_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/salaries/{emp_id}",
    params(("emp_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, body = Vec<SalaryResponse>),
        (status = 404, description = "Employee not found")
    ),
    tag = "Salaries"
)]
fn admin_employee_salaries_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/salaries/{emp_id}/earnings",
    request_body = UpdateEarnings,
    params(("emp_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, body = SalaryResponse),
        (status = 400, description = "No amounts to update"),
        (status = 404, description = "No salary record for employee")
    ),
    tag = "Salaries"
)]
fn admin_update_earnings_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/salaries/{emp_id}/deductions",
    request_body = UpdateDeductions,
    params(("emp_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, body = SalaryResponse),
        (status = 400, description = "No amounts to update"),
        (status = 404, description = "No salary record for employee")
    ),
    tag = "Salaries"
)]
fn admin_update_deductions_doc() {}

#[utoipa::path(
    post,
    path = "/api/reminders",
    request_body = CreateReminder,
    responses((status = 200, body = Reminder)),
    tag = "Reminders"
)]
fn create_reminder_doc() {}

#[utoipa::path(
    get,
    path = "/api/reminders/me",
    params(ReminderQuery),
    responses((status = 200, body = Vec<Reminder>)),
    tag = "Reminders"
)]
fn my_reminders_doc() {}

#[utoipa::path(
    get,
    path = "/api/notifications/me",
    responses((status = 200, body = NotificationFeed)),
    tag = "Reminders"
)]
fn my_notifications_doc() {}

#[utoipa::path(
    post,
    path = "/api/attendance/punch",
    request_body = PunchRequest,
    responses(
        (status = 201, body = PunchResponse, description = "First punch of the day"),
        (status = 200, body = PunchResponse, description = "Punch-out updated"),
        (status = 400, description = "Punch-out earlier than punch-in")
    ),
    tag = "Attendance"
)]
fn punch_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance/me",
    params(AttendanceRangeQuery),
    responses(
        (status = 200, body = Vec<AttendanceResponse>),
        (status = 400, description = "Inverted date range")
    ),
    tag = "Attendance"
)]
fn my_attendance_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance/me/today",
    responses((status = 200, body = TodayAttendance)),
    tag = "Attendance"
)]
fn my_attendance_today_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance/me/analysis",
    params(AttendanceAnalysisQuery),
    responses(
        (status = 200, body = AttendanceAnalysis),
        (status = 400, description = "Year out of range")
    ),
    tag = "Attendance"
)]
fn my_attendance_analysis_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/attendance/{emp_id}",
    params(("emp_id" = String, Path, description = "Employee ID"), AttendanceRangeQuery),
    responses(
        (status = 200, body = Vec<AttendanceResponse>),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
fn admin_employee_attendance_doc() {}
