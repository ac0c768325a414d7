#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealGrowth {
    pub annual: f64,
    pub monthly: f64,
}

/// Both inputs are percentages.
pub fn real_growth(nominal_annual_pct: f64, inflation_annual_pct: f64) -> RealGrowth {
    let annual = (1.0 + nominal_annual_pct / 100.0) / (1.0 + inflation_annual_pct / 100.0) - 1.0;
    let monthly = (1.0 + annual).powf(1.0 / 12.0) - 1.0;
    RealGrowth { annual, monthly }
}
