use log::{debug, warn};

use super::drawdown::{DrawdownPlan, pot_depletes};

pub const SEARCH_ROUNDS: u32 = 60;
const CEILING_MULTIPLIER: f64 = 3.0;
const MAX_CEILING_WIDENINGS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeSolve {
    pub income: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub ceiling_widenings: u32,
}

/// Relies on depletion being monotone in the income target: if a target empties the
/// pot, every larger target does too.
pub fn solve_sustainable_income(plan: &DrawdownPlan<'_>) -> IncomeSolve {
    if plan.pot <= 0.0 {
        let income = plan.guaranteed.total_at(plan.retirement_age);
        return IncomeSolve {
            income,
            lower_bound: income,
            upper_bound: income,
            ceiling_widenings: 0,
        };
    }

    let lower_bound = plan.guaranteed.db_income_at(plan.retirement_age);
    let years = plan.life_expectancy.saturating_sub(plan.retirement_age).max(1) as f64;
    let ceiling = plan.pot / years * CEILING_MULTIPLIER
        + plan
            .guaranteed
            .max_db_income_between(plan.retirement_age, plan.life_expectancy)
        + plan.guaranteed.state_pension_ceiling();
    let (upper_bound, ceiling_widenings) =
        verified_ceiling(plan, ceiling.max(lower_bound + 1.0));

    debug!(
        "solving sustainable income: pot={:.2} bounds=[{:.2}, {:.2}]",
        plan.pot, lower_bound, upper_bound
    );

    let mut lo = lower_bound;
    let mut hi = upper_bound;
    for _ in 0..SEARCH_ROUNDS {
        let mid = (lo + hi) * 0.5;
        if pot_depletes(plan, mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    IncomeSolve {
        income: ((lo + hi) * 0.5).round(),
        lower_bound,
        upper_bound,
        ceiling_widenings,
    }
}

fn verified_ceiling(plan: &DrawdownPlan<'_>, mut ceiling: f64) -> (f64, u32) {
    let mut widenings = 0;
    while widenings < MAX_CEILING_WIDENINGS && !pot_depletes(plan, ceiling) {
        ceiling *= 2.0;
        widenings += 1;
    }
    if widenings > 0 {
        warn!(
            "income search ceiling was sustainable; widened {widenings}x to {ceiling:.2}"
        );
    }
    (ceiling, widenings)
}
