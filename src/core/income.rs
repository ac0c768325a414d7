use super::types::{DbPension, PlanParameters};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatePension {
    pub start_age: u32,
    pub annual_amount: f64,
    pub included: bool,
}

impl StatePension {
    pub fn amount_at(&self, age: u32) -> f64 {
        if self.included && age >= self.start_age {
            self.annual_amount
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GuaranteedIncome<'a> {
    pub state_pension: StatePension,
    pub db_pensions: &'a [DbPension],
}

impl<'a> GuaranteedIncome<'a> {
    pub fn from_params(params: &'a PlanParameters) -> Self {
        Self {
            state_pension: StatePension {
                start_age: params.state_pension_age,
                annual_amount: params.state_pension_amount,
                included: params.include_state_pension,
            },
            db_pensions: &params.db_pensions,
        }
    }

    pub fn state_pension_at(&self, age: u32) -> f64 {
        self.state_pension.amount_at(age)
    }

    pub fn db_income_at(&self, age: u32) -> f64 {
        self.db_pensions
            .iter()
            .filter(|db| age >= db.start_age)
            .map(|db| db.annual_income)
            .sum()
    }

    pub fn total_at(&self, age: u32) -> f64 {
        self.state_pension_at(age) + self.db_income_at(age)
    }

    pub fn max_db_income_between(&self, from: u32, to: u32) -> f64 {
        (from..=to)
            .map(|age| self.db_income_at(age))
            .fold(0.0, f64::max)
    }

    pub fn state_pension_ceiling(&self) -> f64 {
        if self.state_pension.included {
            self.state_pension.annual_amount
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeBreakdown {
    pub state_amount: f64,
    pub db_amount: f64,
    /// What the pot would have to pay to hit the target, ignoring its balance.
    pub needed_from_pot: f64,
    /// What the pot actually pays, never more than its balance.
    pub personal_withdrawal: f64,
}

impl IncomeBreakdown {
    pub fn total(&self) -> f64 {
        self.state_amount + self.db_amount + self.personal_withdrawal
    }
}

pub fn compose_year(
    guaranteed: &GuaranteedIncome<'_>,
    age: u32,
    target: f64,
    pot_balance: f64,
) -> IncomeBreakdown {
    let state_amount = guaranteed.state_pension_at(age);
    let db_amount = guaranteed.db_income_at(age);
    let needed_from_pot = (target - state_amount - db_amount).max(0.0);
    let personal_withdrawal = needed_from_pot.min(pot_balance.max(0.0));
    IncomeBreakdown {
        state_amount,
        db_amount,
        needed_from_pot,
        personal_withdrawal,
    }
}
