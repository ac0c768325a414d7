mod drawdown;
mod engine;
mod growth;
mod income;
mod projector;
mod solver;
mod targets;
mod types;

pub use drawdown::{
    DEPLETION_TOLERANCE, DrawdownPlan, DrawdownSchedule, drawdown_schedule, pot_depletes,
};
pub use engine::{lump_sum_entitlement, project, try_project};
pub use growth::{RealGrowth, real_growth};
pub use income::{GuaranteedIncome, IncomeBreakdown, StatePension, compose_year};
pub use projector::{PotProjection, project_pot};
pub use solver::{IncomeSolve, SEARCH_ROUNDS, solve_sustainable_income};
pub use targets::{IncomeSuggestion, suggested_incomes};
pub use types::{
    AdditionalPot, DbPension, FULL_INCOME_RATIO, GrowthRate, IncomeYear, LUMP_SUM_CAP,
    LUMP_SUM_SHARE, MAX_AGE, PlanParameters, PotDetail, PotPoint, ProjectionResult,
};
