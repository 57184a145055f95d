//! Payslips. Earnings and deductions are free-form maps of named amounts
//! (`basic`, `allowance`, `bonus`, `overtime`; `leave`, `loan`, `tax`, ...)
//! persisted as JSON and returned exactly as stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::types::SalaryId;
use crate::validation::rules::validate_positive_amount;

pub type AmountMap = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Salary {
    pub id: SalaryId,
    pub emp_id: String,
    pub pay_date: NaiveDate,
    pub total_days_worked: i32,
    pub total_hours_worked: f64,
    pub earnings: Json<AmountMap>,
    pub deductions: Json<AmountMap>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Salary {
    pub fn new(emp_id: String, payload: CreateSalary) -> Self {
        let now = Utc::now();
        Self {
            id: SalaryId::new(),
            emp_id,
            pay_date: payload.pay_date,
            total_days_worked: payload.total_days_worked,
            total_hours_worked: payload.total_hours_worked,
            earnings: Json(payload.earnings),
            deductions: Json(payload.deductions),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sum of the named amounts, rounded to cents.
pub fn total_of(amounts: &AmountMap) -> f64 {
    round_cents(amounts.values().sum())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryResponse {
    pub id: String,
    pub emp_id: String,
    pub pay_date: NaiveDate,
    pub total_days_worked: i32,
    pub total_hours_worked: f64,
    pub earnings: AmountMap,
    pub deductions: AmountMap,
    pub total_earnings: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Salary> for SalaryResponse {
    fn from(salary: Salary) -> Self {
        let total_earnings = total_of(&salary.earnings);
        let total_deductions = total_of(&salary.deductions);
        SalaryResponse {
            id: salary.id.to_string(),
            emp_id: salary.emp_id,
            pay_date: salary.pay_date,
            total_days_worked: salary.total_days_worked,
            total_hours_worked: salary.total_hours_worked,
            earnings: salary.earnings.0,
            deductions: salary.deductions.0,
            total_earnings,
            total_deductions,
            net_pay: round_cents(total_earnings - total_deductions),
            created_at: salary.created_at,
            updated_at: salary.updated_at,
        }
    }
}

fn validate_amount_map(amounts: &AmountMap) -> Result<(), ValidationError> {
    for (name, amount) in amounts {
        if name.trim().is_empty() {
            return Err(ValidationError::new("amount_name_required"));
        }
        if *amount != 0.0 {
            validate_positive_amount(*amount)?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSalary {
    pub pay_date: NaiveDate,
    #[validate(range(min = 0, max = 31))]
    #[serde(default)]
    pub total_days_worked: i32,
    #[validate(range(min = 0.0, max = 744.0))]
    #[serde(default)]
    pub total_hours_worked: f64,
    #[validate(custom(function = "validate_amount_map"))]
    #[serde(default)]
    pub earnings: AmountMap,
    #[validate(custom(function = "validate_amount_map"))]
    #[serde(default)]
    pub deductions: AmountMap,
}

/// Adjusts bonus and allowance on the latest payslip.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEarnings {
    #[validate(range(min = 0.0))]
    pub bonus: Option<f64>,
    #[validate(range(min = 0.0))]
    pub allowance: Option<f64>,
}

impl UpdateEarnings {
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [("bonus", self.bonus), ("allowance", self.allowance)]
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

/// Adjusts loan and leave deductions on the latest payslip.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDeductions {
    #[validate(range(min = 0.0))]
    pub loan: Option<f64>,
    #[validate(range(min = 0.0))]
    pub leave: Option<f64>,
}

impl UpdateDeductions {
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [("loan", self.loan), ("leave", self.leave)]
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

/// Writes the given named amounts into the map, keeping every other entry.
pub fn merge_amounts(target: &mut AmountMap, entries: &[(&str, f64)]) {
    for (name, value) in entries {
        target.insert((*name).to_string(), *value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(pairs: &[(&str, f64)]) -> AmountMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn response_computes_totals_and_net_pay() {
        let salary = Salary::new(
            "E-9".into(),
            CreateSalary {
                pay_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
                total_days_worked: 21,
                total_hours_worked: 168.0,
                earnings: amounts(&[("basic", 1000.10), ("allowance", 200.20), ("bonus", 50.0)]),
                deductions: amounts(&[("tax", 100.05), ("loan", 50.0)]),
            },
        );
        let response = SalaryResponse::from(salary);
        assert_eq!(response.total_earnings, 1250.3);
        assert_eq!(response.total_deductions, 150.05);
        assert_eq!(response.net_pay, 1100.25);
    }

    #[test]
    fn earnings_map_survives_json_round_trip() {
        let original = amounts(&[("basic", 1500.0), ("overtime", 12.75), ("custom_perk", 3.5)]);
        let encoded = serde_json::to_string(&Json(original.clone())).unwrap();
        let decoded: Json<AmountMap> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.0, original);
    }

    #[test]
    fn merge_overwrites_named_entries_only() {
        let mut earnings = amounts(&[("basic", 1000.0), ("bonus", 10.0)]);
        let update = UpdateEarnings {
            bonus: Some(75.0),
            allowance: None,
        };
        merge_amounts(&mut earnings, &update.entries());
        assert_eq!(earnings, amounts(&[("basic", 1000.0), ("bonus", 75.0)]));
    }

    #[test]
    fn amount_map_rejects_negative_values() {
        let payload = CreateSalary {
            pay_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            total_days_worked: 20,
            total_hours_worked: 160.0,
            earnings: amounts(&[("basic", -5.0)]),
            deductions: AmountMap::new(),
        };
        assert!(payload.validate().is_err());
    }
}
