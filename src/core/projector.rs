use super::types::PotPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct PotProjection {
    pub final_value: f64,
    pub history: Vec<PotPoint>,
}

// Only recorded values are floored at zero, never the running balance.
pub fn project_pot(
    start_value: f64,
    monthly_contribution: f64,
    real_monthly_growth: f64,
    years: u32,
    start_age: u32,
) -> PotProjection {
    let mut balance = start_value;
    let mut history = Vec::with_capacity(years as usize + 1);
    history.push(PotPoint {
        age: start_age,
        value: balance.max(0.0),
    });

    for year in 0..years {
        for _ in 0..12 {
            balance = balance * (1.0 + real_monthly_growth) + monthly_contribution;
        }
        history.push(PotPoint {
            age: start_age + year + 1,
            value: balance.max(0.0),
        });
    }

    PotProjection {
        final_value: balance.max(0.0),
        history,
    }
}
