use napi::Result as NapiResult;
use napi_derive::napi;
use payoff_core::PayoffError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine errors carry their kind tag ahead of the message, e.g.
/// `target_not_in_future: Target year 2025 is not after ...`, so the
/// presentation layer can pick its own wording.
fn engine_error(e: PayoffError) -> napi::Error {
    let kind = serde_json::to_value(e.kind())
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default();
    napi::Error::from_reason(format!("{kind}: {e}"))
}

// ---------------------------------------------------------------------------
// Federal
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_federal_plans(input_json: String) -> NapiResult<String> {
    let input: payoff_core::federal::repayment::FederalPlansInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        payoff_core::federal::repayment::calculate_federal_plans(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn check_eligibility(input_json: String) -> NapiResult<String> {
    let input: payoff_core::federal::repayment::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payoff_core::federal::repayment::check_eligibility(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn build_amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: payoff_core::amortization::schedule::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payoff_core::amortization::schedule::build_amortization_schedule(&input)
        .map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Private loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_avalanche(input_json: String) -> NapiResult<String> {
    let input: payoff_core::private::AvalancheInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payoff_core::private::calculate_avalanche(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Acceleration
// ---------------------------------------------------------------------------

#[napi]
pub fn accelerate_federal(input_json: String) -> NapiResult<String> {
    let input: payoff_core::acceleration::FederalAccelerationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payoff_core::acceleration::accelerate_federal(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn accelerate_private(input_json: String) -> NapiResult<String> {
    let input: payoff_core::acceleration::PrivateAccelerationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payoff_core::acceleration::accelerate_private(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Refinance
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_refinance(input_json: String) -> NapiResult<String> {
    let input: payoff_core::refinance::RefinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payoff_core::refinance::compare_refinance(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
