//! Lambda entry point exposing a distribution preview endpoint
//!
//! POST a JSON body with a waterfall structure (or built-in template name),
//! a distribution amount, capital accounts, and the event dates; the
//! response is the computed `WaterfallDistribution` as JSON. Validation
//! failures return 400 with an error message.

use chrono::NaiveDate;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::Deserialize;
use waterfall_engine::structure::structure_by_name;
use waterfall_engine::{InvestorCapitalAccount, WaterfallEngine, WaterfallStructure};

#[derive(Debug, Deserialize)]
struct DistributionRequest {
    /// Inline structure document; takes precedence over `template`.
    #[serde(default)]
    structure: Option<WaterfallStructure>,
    /// Built-in template name (`standard` or `american`).
    #[serde(default)]
    template: Option<String>,
    distribution_amount: f64,
    #[serde(default)]
    capital_accounts: Vec<InvestorCapitalAccount>,
    fund_start_date: NaiveDate,
    distribution_date: NaiveDate,
}

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let request: DistributionRequest = match serde_json::from_slice(event.body()) {
        Ok(req) => req,
        Err(e) => return bad_request(format!("invalid request body: {e}")),
    };

    let structure = match resolve_structure(&request) {
        Some(structure) => structure,
        None => return bad_request("request must name a template or include a structure".into()),
    };

    let engine = match WaterfallEngine::new(structure) {
        Ok(engine) => engine,
        Err(e) => return bad_request(e.to_string()),
    };

    match engine.distribute(
        request.distribution_amount,
        &request.capital_accounts,
        request.fund_start_date,
        request.distribution_date,
    ) {
        Ok(distribution) => {
            let body = serde_json::to_string(&distribution)?;
            Ok(Response::builder()
                .status(200)
                .header("content-type", "application/json")
                .body(Body::from(body))?)
        }
        Err(e) => bad_request(e.to_string()),
    }
}

fn resolve_structure(request: &DistributionRequest) -> Option<WaterfallStructure> {
    if let Some(structure) = &request.structure {
        return Some(structure.clone());
    }
    request
        .template
        .as_deref()
        .and_then(structure_by_name)
}

fn bad_request(message: String) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message }).to_string();
    Ok(Response::builder()
        .status(400)
        .header("content-type", "application/json")
        .body(Body::from(body))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
