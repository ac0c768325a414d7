use super::income::{GuaranteedIncome, compose_year};
use super::types::{FULL_INCOME_RATIO, IncomeYear};

/// Balances below this after a withdrawal count as depleted.
pub const DEPLETION_TOLERANCE: f64 = -0.01;

#[derive(Debug, Clone, Copy)]
pub struct DrawdownPlan<'a> {
    pub pot: f64,
    pub real_annual_growth: f64,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub guaranteed: GuaranteedIncome<'a>,
}

impl DrawdownPlan<'_> {
    pub fn withdrawal_years(&self) -> u32 {
        self.life_expectancy
            .saturating_sub(self.retirement_age)
            .saturating_add(1)
    }

    fn grow(&self, balance: f64) -> f64 {
        (balance * (1.0 + self.real_annual_growth)).max(0.0)
    }
}

pub fn pot_depletes(plan: &DrawdownPlan<'_>, target_income: f64) -> bool {
    let mut remaining = plan.pot;
    for age in plan.retirement_age..=plan.life_expectancy {
        let year = compose_year(&plan.guaranteed, age, target_income, remaining);
        remaining -= year.needed_from_pot;
        if remaining < DEPLETION_TOLERANCE {
            return true;
        }
        remaining = plan.grow(remaining);
    }
    false
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownSchedule {
    pub years: Vec<IncomeYear>,
    pub full_income_last_age: u32,
}

pub fn drawdown_schedule(plan: &DrawdownPlan<'_>, target_income: f64) -> DrawdownSchedule {
    let mut remaining = plan.pot;
    let mut years = Vec::with_capacity(plan.withdrawal_years() as usize);
    let mut full_income_last_age = plan.retirement_age;

    for age in plan.retirement_age..=plan.life_expectancy {
        let year = compose_year(&plan.guaranteed, age, target_income, remaining);
        remaining = plan.grow(remaining - year.personal_withdrawal);
        let total_income = year.total();

        years.push(IncomeYear {
            age,
            personal_withdrawal: year.personal_withdrawal,
            state_amount: year.state_amount,
            db_amount: year.db_amount,
            total_income,
            remaining_pot: remaining,
        });

        if target_income > 0.0 && total_income >= target_income * FULL_INCOME_RATIO {
            full_income_last_age = age;
        }
    }

    if target_income <= 0.0 {
        full_income_last_age = plan.life_expectancy;
    }

    DrawdownSchedule {
        years,
        full_income_last_age,
    }
}
