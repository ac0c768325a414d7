use log::debug;

use super::drawdown::{DrawdownPlan, drawdown_schedule};
use super::growth::real_growth;
use super::income::GuaranteedIncome;
use super::projector::project_pot;
use super::solver::solve_sustainable_income;
use super::types::{LUMP_SUM_CAP, LUMP_SUM_SHARE, PlanParameters, PotDetail, ProjectionResult};
use crate::error::PlanError;

pub fn lump_sum_entitlement(total_pot: f64) -> f64 {
    (total_pot * LUMP_SUM_SHARE).min(LUMP_SUM_CAP).max(0.0)
}

/// Returns `None` when the ages are out of order.
pub fn project(params: &PlanParameters) -> Option<ProjectionResult> {
    try_project(params)
        .map_err(|err| debug!("skipping projection: {err}"))
        .ok()
}

pub fn try_project(params: &PlanParameters) -> Result<ProjectionResult, PlanError> {
    params.check_ages()?;

    let growth = real_growth(params.growth_rate.nominal_pct(), params.inflation_rate);
    let years = params.years_to_retirement();
    let monthly_contribution = params.workplace_monthly_contribution();

    let workplace = project_pot(
        params.current_pot_value,
        monthly_contribution,
        growth.monthly,
        years,
        params.current_age,
    );
    let mut additional_pots = Vec::with_capacity(params.additional_pots.len());
    let mut additional_total = 0.0;
    for pot in &params.additional_pots {
        let projected = project_pot(
            pot.value,
            pot.monthly_contribution,
            growth.monthly,
            years,
            params.current_age,
        );
        additional_total += projected.final_value;
        additional_pots.push(PotDetail {
            id: pot.id,
            name: pot.name.clone(),
            projected_value: projected.final_value,
        });
    }

    let total_pot_at_retirement = (workplace.final_value + additional_total).max(0.0);
    let lump_sum_available = lump_sum_entitlement(total_pot_at_retirement);
    let lump_sum = if params.take_lump_sum {
        lump_sum_available
    } else {
        0.0
    };
    let drawdown_pot = (total_pot_at_retirement - lump_sum).max(0.0);

    let plan = DrawdownPlan {
        pot: drawdown_pot,
        real_annual_growth: growth.annual,
        retirement_age: params.retirement_age,
        life_expectancy: params.life_expectancy,
        guaranteed: GuaranteedIncome::from_params(params),
    };
    let sustainable_income = solve_sustainable_income(&plan).income;
    let display_income = params.desired_income.unwrap_or(sustainable_income);
    let schedule = drawdown_schedule(&plan, display_income);

    debug!(
        "projected pot {total_pot_at_retirement:.2} at age {}; sustainable income {sustainable_income:.0}, full income to age {}",
        params.retirement_age, schedule.full_income_last_age
    );

    Ok(ProjectionResult {
        pot_history: workplace.history,
        workplace_projected: workplace.final_value,
        additional_pots,
        additional_total,
        total_pot_at_retirement,
        lump_sum_available,
        lump_sum,
        drawdown_pot,
        db_income_total: params.db_pensions.iter().map(|db| db.annual_income).sum(),
        sustainable_income,
        display_income,
        income_by_year: schedule.years,
        full_income_last_age: schedule.full_income_last_age,
        real_growth: growth.annual,
        monthly_contribution,
    })
}
