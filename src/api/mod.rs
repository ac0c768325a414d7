use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;

use crate::core::{
    AdditionalPot, DbPension, GrowthRate, IncomeSuggestion, PlanParameters, ProjectionResult,
    suggested_incomes, try_project,
};
use crate::error::PlanError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliGrowthRate {
    Careful,
    Balanced,
    Optimistic,
}

impl From<CliGrowthRate> for GrowthRate {
    fn from(value: CliGrowthRate) -> Self {
        match value {
            CliGrowthRate::Careful => GrowthRate::Careful,
            CliGrowthRate::Balanced => GrowthRate::Balanced,
            CliGrowthRate::Optimistic => GrowthRate::Optimistic,
        }
    }
}

impl From<GrowthRate> for CliGrowthRate {
    fn from(value: GrowthRate) -> Self {
        match value {
            GrowthRate::Careful => CliGrowthRate::Careful,
            GrowthRate::Balanced => CliGrowthRate::Balanced,
            GrowthRate::Optimistic => CliGrowthRate::Optimistic,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PotArg {
    value: f64,
    monthly_contribution: f64,
    name: Option<String>,
}

impl FromStr for PotArg {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let value = parse_amount("--pot", s, parts.next())?;
        let monthly_contribution = parse_amount("--pot", s, parts.next())?;
        let name = parts.next().filter(|n| !n.is_empty()).map(str::to_string);
        Ok(Self {
            value,
            monthly_contribution,
            name,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DbArg {
    annual_income: f64,
    start_age: u32,
    provider: Option<String>,
}

impl FromStr for DbArg {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let annual_income = parse_amount("--db", s, parts.next())?;
        let start_age = parts
            .next()
            .ok_or_else(|| invalid_flag("--db", s, "expected INCOME:START_AGE[:PROVIDER]"))?
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid_flag("--db", s, &e.to_string()))?;
        let provider = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
        Ok(Self {
            annual_income,
            start_age,
            provider,
        })
    }
}

fn parse_amount(flag: &'static str, raw: &str, part: Option<&str>) -> Result<f64, PlanError> {
    let part = part.ok_or_else(|| invalid_flag(flag, raw, "missing amount"))?;
    part.trim()
        .parse::<f64>()
        .map_err(|e| invalid_flag(flag, raw, &e.to_string()))
}

fn invalid_flag(flag: &'static str, value: &str, reason: &str) -> PlanError {
    PlanError::InvalidFlag {
        flag,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Args, Debug, Clone)]
pub struct Cli {
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 67)]
    retirement_age: u32,
    #[arg(long, default_value_t = 92, help = "Age to fund income through")]
    life_expectancy: u32,
    #[arg(long, default_value_t = 35_000.0)]
    annual_salary: f64,
    #[arg(
        long,
        default_value_t = 15_000.0,
        help = "Current value of the workplace pension pot"
    )]
    current_pot_value: f64,
    #[arg(long, default_value_t = 5.0, help = "Employee contribution in percent of salary")]
    employee_contrib: f64,
    #[arg(long, default_value_t = 3.0, help = "Employer contribution in percent of salary")]
    employer_contrib: f64,
    #[arg(
        long = "pot",
        value_name = "VALUE:MONTHLY[:NAME]",
        help = "Additional pension pot; repeat for several"
    )]
    pots: Vec<PotArg>,
    #[arg(
        long = "db",
        value_name = "INCOME:START_AGE[:PROVIDER]",
        help = "Defined benefit pension; repeat for several"
    )]
    db_pensions: Vec<DbArg>,
    #[arg(long, value_enum, default_value_t = CliGrowthRate::Balanced)]
    growth_rate: CliGrowthRate,
    #[arg(long, default_value_t = 2.5, help = "Expected annual inflation in percent")]
    inflation_rate: f64,
    #[arg(long, default_value_t = 67)]
    state_pension_age: u32,
    #[arg(long, default_value_t = 11_502.0, help = "Annual state pension in today's money")]
    state_pension_amount: f64,
    #[arg(long, help = "Leave the state pension out of the plan")]
    exclude_state_pension: bool,
    #[arg(long, help = "Take the tax-free lump sum at retirement")]
    take_lump_sum: bool,
    #[arg(
        long,
        help = "Total annual income to test; defaults to the sustainable income"
    )]
    desired_income: Option<f64>,
}

impl Default for Cli {
    fn default() -> Self {
        let params = PlanParameters::default();
        Self {
            current_age: params.current_age,
            retirement_age: params.retirement_age,
            life_expectancy: params.life_expectancy,
            annual_salary: params.annual_salary,
            current_pot_value: params.current_pot_value,
            employee_contrib: params.employee_contrib_pct,
            employer_contrib: params.employer_contrib_pct,
            pots: Vec::new(),
            db_pensions: Vec::new(),
            growth_rate: params.growth_rate.into(),
            inflation_rate: params.inflation_rate,
            state_pension_age: params.state_pension_age,
            state_pension_amount: params.state_pension_amount,
            exclude_state_pension: !params.include_state_pension,
            take_lump_sum: params.take_lump_sum,
            desired_income: params.desired_income,
        }
    }
}

pub fn build_inputs(cli: Cli) -> Result<PlanParameters, PlanError> {
    let additional_pots = cli
        .pots
        .into_iter()
        .zip(1u32..)
        .map(|(pot, id)| AdditionalPot {
            id,
            name: pot.name.unwrap_or_else(|| format!("Pension pot {id}")),
            value: pot.value,
            monthly_contribution: pot.monthly_contribution,
        })
        .collect();
    let db_pensions = cli
        .db_pensions
        .into_iter()
        .zip(1u32..)
        .map(|(db, id)| DbPension {
            id,
            provider: db.provider.unwrap_or_default(),
            annual_income: db.annual_income,
            start_age: db.start_age,
        })
        .collect();

    let params = PlanParameters {
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        life_expectancy: cli.life_expectancy,
        annual_salary: cli.annual_salary,
        current_pot_value: cli.current_pot_value,
        employee_contrib_pct: cli.employee_contrib,
        employer_contrib_pct: cli.employer_contrib,
        additional_pots,
        db_pensions,
        growth_rate: cli.growth_rate.into(),
        inflation_rate: cli.inflation_rate,
        state_pension_age: cli.state_pension_age,
        state_pension_amount: cli.state_pension_amount,
        include_state_pension: !cli.exclude_state_pension,
        take_lump_sum: cli.take_lump_sum,
        desired_income: cli.desired_income,
    };
    params.validate()?;
    Ok(params)
}

pub fn run_cli_projection(cli: Cli) -> Result<String, PlanError> {
    let params = build_inputs(cli)?;
    let response = build_project_response(&params)?;
    Ok(serde_json::to_string_pretty(&response)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    life_expectancy: Option<u32>,
    annual_salary: Option<f64>,
    current_pot_value: Option<f64>,
    employee_contrib: Option<f64>,
    employer_contrib: Option<f64>,
    additional_pots: Option<Vec<AdditionalPot>>,
    db_pensions: Option<Vec<DbPension>>,
    growth_rate: Option<GrowthRate>,
    inflation_rate: Option<f64>,
    state_pension_age: Option<u32>,
    state_pension_amount: Option<f64>,
    include_state_pension: Option<bool>,
    take_lump_sum: Option<bool>,
    desired_income: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TargetsQuery {
    salary: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    growth_rate: GrowthRate,
    nominal_growth_pct: f64,
    inflation_rate: f64,
    retirement_age: u32,
    life_expectancy: u32,
    income_override: bool,
    #[serde(flatten)]
    result: ProjectionResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetsResponse {
    salary: f64,
    suggestions: Vec<IncomeSuggestion>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn build_project_response(params: &PlanParameters) -> Result<ProjectResponse, PlanError> {
    let result = try_project(params)?;
    Ok(ProjectResponse {
        growth_rate: params.growth_rate,
        nominal_growth_pct: params.growth_rate.nominal_pct(),
        inflation_rate: params.inflation_rate,
        retirement_age: params.retirement_age,
        life_expectancy: params.life_expectancy,
        income_override: params.desired_income.is_some(),
        result,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/targets", get(targets_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("drawdown HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let params = match params_from_payload(payload) {
        Ok(params) => params,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    debug!(
        "projecting ages {}..{}..{} with {} extra pots and {} DB pensions",
        params.current_age,
        params.retirement_age,
        params.life_expectancy,
        params.additional_pots.len(),
        params.db_pensions.len()
    );
    match build_project_response(&params) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

async fn targets_handler(Query(query): Query<TargetsQuery>) -> Response {
    let salary = query
        .salary
        .unwrap_or_else(|| PlanParameters::default().annual_salary);
    if !salary.is_finite() || salary < 0.0 {
        let err = PlanError::NegativeAmount {
            field: "salary",
            value: salary,
        };
        return error_response(StatusCode::BAD_REQUEST, &err.to_string());
    }
    json_response(
        StatusCode::OK,
        TargetsResponse {
            salary,
            suggestions: suggested_incomes(salary),
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn params_from_json(json: &str) -> Result<PlanParameters, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    params_from_payload(payload).map_err(|e| e.to_string())
}

fn params_from_payload(payload: ProjectPayload) -> Result<PlanParameters, PlanError> {
    let mut params = PlanParameters::default();

    if let Some(v) = payload.current_age {
        params.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        params.retirement_age = v;
    }
    if let Some(v) = payload.life_expectancy {
        params.life_expectancy = v;
    }
    if let Some(v) = payload.annual_salary {
        params.annual_salary = v;
    }
    if let Some(v) = payload.current_pot_value {
        params.current_pot_value = v;
    }
    if let Some(v) = payload.employee_contrib {
        params.employee_contrib_pct = v;
    }
    if let Some(v) = payload.employer_contrib {
        params.employer_contrib_pct = v;
    }
    if let Some(v) = payload.additional_pots {
        params.additional_pots = v;
    }
    if let Some(v) = payload.db_pensions {
        params.db_pensions = v;
    }
    if let Some(v) = payload.growth_rate {
        params.growth_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        params.inflation_rate = v;
    }
    if let Some(v) = payload.state_pension_age {
        params.state_pension_age = v;
    }
    if let Some(v) = payload.state_pension_amount {
        params.state_pension_amount = v;
    }
    if let Some(v) = payload.include_state_pension {
        params.include_state_pension = v;
    }
    if let Some(v) = payload.take_lump_sum {
        params.take_lump_sum = v;
    }
    params.desired_income = payload.desired_income;

    params.validate()?;
    Ok(params)
}
