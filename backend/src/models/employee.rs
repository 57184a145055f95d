//! Employees, their roles, and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::rules::validate_emp_id;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of an employee login.
pub struct Employee {
    /// HR-assigned employee number, also the login subject.
    pub emp_id: String,
    pub email: String,
    /// Argon2 hash of the employee's password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub designation: Option<String>,
    /// Employee this person reports to.
    pub supervisor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
/// Organisational roles. Every role above `Employee` may decide requests.
pub enum Role {
    #[default]
    Employee,
    TeamLeader,
    Hr,
    MidLevelManager,
    TopLevelManager,
    Ceo,
}

const ROLE_NAMES: &[&str] = &[
    "employee",
    "team_leader",
    "hr",
    "mid_level_manager",
    "top_level_manager",
    "ceo",
];

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Employee,
        Role::TeamLeader,
        Role::Hr,
        Role::MidLevelManager,
        Role::TopLevelManager,
        Role::Ceo,
    ];

    /// Returns the canonical snake_case representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::TeamLeader => "team_leader",
            Role::Hr => "hr",
            Role::MidLevelManager => "mid_level_manager",
            Role::TopLevelManager => "top_level_manager",
            Role::Ceo => "ceo",
        }
    }

    pub fn can_approve(&self) -> bool {
        !matches!(self, Role::Employee)
    }

    /// Accepts canonical values plus the display labels used by older clients
    /// ("Team Leader", "Mid Lvl Manager", ...).
    pub fn parse(raw: &str) -> Option<Role> {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match normalized.as_str() {
            "employee" => Some(Role::Employee),
            "team_leader" => Some(Role::TeamLeader),
            "hr" => Some(Role::Hr),
            "mid_level_manager" | "mid_lvl_manager" => Some(Role::MidLevelManager),
            "top_level_manager" | "top_lvl_manager" => Some(Role::TopLevelManager),
            "ceo" => Some(Role::Ceo),
            _ => None,
        }
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Role::parse(&s).ok_or_else(|| serde::de::Error::unknown_variant(&s, ROLE_NAMES))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Payload for creating login credentials for an employee.
pub struct CreateEmployee {
    #[validate(custom(function = "validate_emp_id"))]
    pub emp_id: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub supervisor_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Credentials submitted by an employee attempting to authenticate.
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Access token returned after a successful login.
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub employee: EmployeeResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of an employee returned by the API.
pub struct EmployeeResponse {
    pub emp_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub can_approve: bool,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub supervisor_id: Option<String>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        EmployeeResponse {
            can_approve: employee.role.can_approve(),
            emp_id: employee.emp_id,
            email: employee.email,
            full_name: employee.full_name,
            role: employee.role,
            department: employee.department,
            designation: employee.designation,
            supervisor_id: employee.supervisor_id,
        }
    }
}

impl Employee {
    pub fn new(
        emp_id: String,
        email: String,
        password_hash: String,
        full_name: String,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            emp_id,
            email,
            password_hash,
            full_name,
            role,
            department: None,
            designation: None,
            supervisor_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_approve(&self) -> bool {
        self.role.can_approve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_canonical_and_display_labels() {
        let role: Role = serde_json::from_str("\"team_leader\"").unwrap();
        assert_eq!(role, Role::TeamLeader);
        let role: Role = serde_json::from_str("\"Mid Lvl Manager\"").unwrap();
        assert_eq!(role, Role::MidLevelManager);
        let role: Role = serde_json::from_str("\"Top Lvl Manager\"").unwrap();
        assert_eq!(role, Role::TopLevelManager);
        let role: Role = serde_json::from_str("\"HR\"").unwrap();
        assert_eq!(role, Role::Hr);
        assert!(serde_json::from_str::<Role>("\"intern\"").is_err());
    }

    #[test]
    fn role_serializes_snake_case() {
        let value = serde_json::to_value(Role::TopLevelManager).unwrap();
        assert_eq!(value, serde_json::json!("top_level_manager"));
    }

    #[test]
    fn only_employee_role_cannot_approve() {
        for role in Role::ALL {
            assert_eq!(role.can_approve(), role != Role::Employee);
        }
    }

    #[test]
    fn employee_response_hides_password_hash() {
        let employee = Employee::new(
            "E-1".into(),
            "a@example.com".into(),
            "secret-hash".into(),
            "Ann".into(),
            Role::Hr,
        );
        let json = serde_json::to_value(&employee).unwrap();
        assert!(json.get("password_hash").is_none());
        let response = EmployeeResponse::from(employee);
        assert!(response.can_approve);
    }
}
