use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{error_text, Tool, ToolContext};
use crate::planning::generate_plan;
use crate::planning::profile::{
    ExperienceLevel, RiskPreference, MAX_FREEFORM_LENGTH, MAX_STARTING_ISK,
};

pub struct MiningPlanTool;

#[async_trait]
impl Tool for MiningPlanTool {
    fn name(&self) -> &str {
        "generate_newbro_mining_plan"
    }

    fn description(&self) -> &str {
        "Generate a cited, conservative mining onboarding plan for a brand-new EVE Online player, \
         grounded in fresh EVE University Wiki lookups"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "hours_per_session": {
                    "type": "number",
                    "description": "Hours available per play session (0.5-8.0, default: 1.5)",
                    "default": 1.5,
                    "minimum": 0.5,
                    "maximum": 8.0
                },
                "sessions_per_week": {
                    "type": "integer",
                    "description": "Play sessions per week (1-14, default: 4)",
                    "default": 4,
                    "minimum": 1,
                    "maximum": 14
                },
                "starting_isk": {
                    "type": "integer",
                    "description": "Liquid ISK available right now (default: 0)",
                    "default": 0,
                    "minimum": 0,
                    "maximum": MAX_STARTING_ISK
                },
                "experience_level": {
                    "type": "string",
                    "enum": ExperienceLevel::ALLOWED,
                    "default": ExperienceLevel::BrandNew.as_str()
                },
                "risk_preference": {
                    "type": "string",
                    "enum": RiskPreference::ALLOWED,
                    "default": RiskPreference::Conservative.as_str()
                },
                "current_assets": {
                    "type": "string",
                    "description": "Ships, modules and skills already owned",
                    "maxLength": MAX_FREEFORM_LENGTH
                },
                "recent_outcome": {
                    "type": "string",
                    "description": "What happened last session (e.g. 'lost my Venture', 'low isk', 'confused')",
                    "maxLength": MAX_FREEFORM_LENGTH
                },
                "questions": {
                    "type": "string",
                    "description": "Anything else the player wants answered",
                    "maxLength": MAX_FREEFORM_LENGTH
                }
            }
        })
    }

    async fn execute(&self, params: serde_json::Value, ctx: &ToolContext<'_>) -> Result<String> {
        match generate_plan(ctx.wiki, &params).await {
            Ok(plan) => {
                info!("Generated mining plan ({} bytes)", plan.len());
                Ok(plan)
            }
            Err(e) => Ok(error_text(e)),
        }
    }
}
