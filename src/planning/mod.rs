//! Newbro Mining Plan Module
//!
//! Turns a player profile into a cited Markdown onboarding plan: the profile
//! is validated first, then wiki context is gathered fresh, then the plan is
//! rendered from both.

pub mod compose;
pub mod gather;
pub mod profile;
pub mod ranker;
pub mod types;

use serde_json::Value;
use tracing::debug;

use crate::validation::ValidationResult;
use crate::wiki::WikiApi;

pub use compose::compose_plan;
pub use gather::gather_mining_context;
pub use profile::{ExperienceLevel, PlannerProfile, RiskPreference};
pub use ranker::{rank_candidates, score_candidate, CandidateSet};
pub use types::{Candidate, GatherFailure, GatheredContext, PlanSection};

/// Validate `arguments` and render a plan. Nothing is fetched when
/// validation fails.
pub async fn generate_plan(api: &dyn WikiApi, arguments: &Value) -> ValidationResult<String> {
    let (plan, _) = generate_plan_with_context(api, arguments).await?;
    Ok(plan)
}

/// Like [`generate_plan`], also handing back the context the plan was
/// rendered from.
pub async fn generate_plan_with_context(
    api: &dyn WikiApi,
    arguments: &Value,
) -> ValidationResult<(String, GatheredContext)> {
    let profile = PlannerProfile::from_arguments(arguments)?;
    debug!(?profile, "Planning for validated profile");

    let context = gather_mining_context(api).await;
    let plan = compose_plan(&profile, &context);
    Ok((plan, context))
}
