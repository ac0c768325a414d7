use serde::{Deserialize, Serialize};

use crate::error::PlanError;

pub const LUMP_SUM_CAP: f64 = 268_275.0;
pub const LUMP_SUM_SHARE: f64 = 0.25;
/// A year counts as "full income" when it delivers at least this share of the target.
pub const FULL_INCOME_RATIO: f64 = 0.99;
pub const MAX_AGE: u32 = 120;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthRate {
    Careful,
    #[default]
    Balanced,
    Optimistic,
}

impl GrowthRate {
    pub fn nominal_pct(self) -> f64 {
        match self {
            GrowthRate::Careful => 2.0,
            GrowthRate::Balanced => 5.0,
            GrowthRate::Optimistic => 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalPot {
    pub id: u32,
    pub name: String,
    pub value: f64,
    pub monthly_contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbPension {
    pub id: u32,
    #[serde(default)]
    pub provider: String,
    pub annual_income: f64,
    pub start_age: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanParameters {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub annual_salary: f64,
    pub current_pot_value: f64,
    pub employee_contrib_pct: f64,
    pub employer_contrib_pct: f64,
    pub additional_pots: Vec<AdditionalPot>,
    pub db_pensions: Vec<DbPension>,
    pub growth_rate: GrowthRate,
    pub inflation_rate: f64,
    pub state_pension_age: u32,
    pub state_pension_amount: f64,
    pub include_state_pension: bool,
    pub take_lump_sum: bool,
    pub desired_income: Option<f64>,
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self {
            current_age: 30,
            retirement_age: 67,
            life_expectancy: 92,
            annual_salary: 35_000.0,
            current_pot_value: 15_000.0,
            employee_contrib_pct: 5.0,
            employer_contrib_pct: 3.0,
            additional_pots: Vec::new(),
            db_pensions: Vec::new(),
            growth_rate: GrowthRate::Balanced,
            inflation_rate: 2.5,
            state_pension_age: 67,
            state_pension_amount: 11_502.0,
            include_state_pension: true,
            take_lump_sum: false,
            desired_income: None,
        }
    }
}

impl PlanParameters {
    pub fn check_ages(&self) -> Result<(), PlanError> {
        if self.retirement_age <= self.current_age {
            return Err(PlanError::RetirementNotAfterCurrentAge {
                current_age: self.current_age,
                retirement_age: self.retirement_age,
            });
        }
        if self.life_expectancy <= self.retirement_age {
            return Err(PlanError::LifeExpectancyNotAfterRetirement {
                retirement_age: self.retirement_age,
                life_expectancy: self.life_expectancy,
            });
        }
        Ok(())
    }

    /// The engine itself only requires [`PlanParameters::check_ages`].
    pub fn validate(&self) -> Result<(), PlanError> {
        for (field, age) in [
            ("currentAge", self.current_age),
            ("retirementAge", self.retirement_age),
            ("lifeExpectancy", self.life_expectancy),
            ("statePensionAge", self.state_pension_age),
        ] {
            within_age_range(field, age)?;
        }
        for db in &self.db_pensions {
            within_age_range("dbPensions.startAge", db.start_age)?;
        }
        self.check_ages()?;

        for (field, value) in [
            ("annualSalary", self.annual_salary),
            ("currentPotValue", self.current_pot_value),
            ("employeeContrib", self.employee_contrib_pct),
            ("employerContrib", self.employer_contrib_pct),
            ("statePensionAmount", self.state_pension_amount),
        ] {
            non_negative(field, value)?;
        }

        if !self.inflation_rate.is_finite() || self.inflation_rate <= -100.0 {
            return Err(PlanError::InvalidRate {
                field: "inflationRate",
                value: self.inflation_rate,
            });
        }

        for pot in &self.additional_pots {
            non_negative("additionalPots.value", pot.value)?;
            non_negative("additionalPots.monthlyContribution", pot.monthly_contribution)?;
        }
        for db in &self.db_pensions {
            non_negative("dbPensions.annualIncome", db.annual_income)?;
        }
        if let Some(income) = self.desired_income {
            non_negative("desiredIncome", income)?;
        }
        Ok(())
    }

    pub fn workplace_monthly_contribution(&self) -> f64 {
        (self.employee_contrib_pct + self.employer_contrib_pct) / 100.0 * self.annual_salary
            / 12.0
    }

    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }
}

fn within_age_range(field: &'static str, age: u32) -> Result<(), PlanError> {
    if age > MAX_AGE {
        return Err(PlanError::AgeOutOfRange {
            field,
            age,
            max: MAX_AGE,
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), PlanError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlanError::NegativeAmount { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PotPoint {
    pub age: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PotDetail {
    pub id: u32,
    pub name: String,
    pub projected_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeYear {
    pub age: u32,
    pub personal_withdrawal: f64,
    pub state_amount: f64,
    pub db_amount: f64,
    pub total_income: f64,
    pub remaining_pot: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub pot_history: Vec<PotPoint>,
    pub workplace_projected: f64,
    pub additional_pots: Vec<PotDetail>,
    pub additional_total: f64,
    pub total_pot_at_retirement: f64,
    pub lump_sum_available: f64,
    pub lump_sum: f64,
    pub drawdown_pot: f64,
    pub db_income_total: f64,
    pub sustainable_income: f64,
    pub display_income: f64,
    pub income_by_year: Vec<IncomeYear>,
    pub full_income_last_age: u32,
    pub real_growth: f64,
    pub monthly_contribution: f64,
}
