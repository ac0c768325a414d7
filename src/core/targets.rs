use serde::Serialize;

struct SalaryBand {
    min: f64,
    max: f64,
    label: &'static str,
    pct: u32,
}

// Replacement ratios by pre-retirement salary.
const SALARY_BANDS: [SalaryBand; 5] = [
    SalaryBand {
        min: 0.0,
        max: 12_199.0,
        label: "Up to 12,199",
        pct: 80,
    },
    SalaryBand {
        min: 12_200.0,
        max: 22_399.0,
        label: "12,200 to 22,399",
        pct: 70,
    },
    SalaryBand {
        min: 22_400.0,
        max: 31_999.0,
        label: "22,400 to 31,999",
        pct: 67,
    },
    SalaryBand {
        min: 32_000.0,
        max: 51_299.0,
        label: "32,000 to 51,299",
        pct: 67,
    },
    SalaryBand {
        min: 51_300.0,
        max: f64::INFINITY,
        label: "51,300 and above",
        pct: 50,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSuggestion {
    pub label: &'static str,
    pub replacement_pct: u32,
    pub suggested_income: f64,
    pub active: bool,
}

/// A salary between two bands (e.g. 12,199.50) activates none.
pub fn suggested_incomes(salary: f64) -> Vec<IncomeSuggestion> {
    SALARY_BANDS
        .iter()
        .map(|band| IncomeSuggestion {
            label: band.label,
            replacement_pct: band.pct,
            suggested_income: (salary * band.pct as f64 / 100.0).round(),
            active: salary >= band.min && salary <= band.max,
        })
        .collect()
}
