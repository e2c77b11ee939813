//! Planner input: defaults, validation and normalization

use serde_json::{Map, Value};

use crate::validation::{
    validate_enum, validate_integer, validate_number, validate_optional_text_input,
    ValidationError, ValidationResult,
};

pub const MAX_FREEFORM_LENGTH: usize = 1200;
pub const MAX_STARTING_ISK: i64 = 10_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExperienceLevel {
    #[default]
    BrandNew,
}

impl ExperienceLevel {
    pub const ALLOWED: [&'static str; 1] = ["brand_new"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::BrandNew => "brand_new",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskPreference {
    #[default]
    Conservative,
}

impl RiskPreference {
    pub const ALLOWED: [&'static str; 1] = ["conservative"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskPreference::Conservative => "conservative",
        }
    }
}

/// A validated planner request. Only [`PlannerProfile::from_arguments`]
/// builds one from untrusted input, so the composer never sees bad values.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerProfile {
    pub hours_per_session: f64,
    pub sessions_per_week: u8,
    pub starting_isk: u64,
    pub experience_level: ExperienceLevel,
    pub risk_preference: RiskPreference,
    pub current_assets: String,
    pub recent_outcome: String,
    pub questions: String,
}

impl Default for PlannerProfile {
    fn default() -> Self {
        Self {
            hours_per_session: 1.5,
            sessions_per_week: 4,
            starting_isk: 0,
            experience_level: ExperienceLevel::default(),
            risk_preference: RiskPreference::default(),
            current_assets: String::new(),
            recent_outcome: String::new(),
            questions: String::new(),
        }
    }
}

impl PlannerProfile {
    /// Apply defaults to an untyped argument bag and validate every field.
    /// The first invalid field stops validation.
    pub fn from_arguments(arguments: &Value) -> ValidationResult<Self> {
        let empty = Map::new();
        let args = match arguments {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => return Err(ValidationError::new("arguments must be an object")),
        };
        let field = |name: &str| args.get(name);

        let mut profile = Self::default();

        if let Some(v) = field("hours_per_session") {
            profile.hours_per_session = validate_number(v, 0.5, 8.0, "hours_per_session")?;
        }
        if let Some(v) = field("sessions_per_week") {
            profile.sessions_per_week = validate_integer(v, 1, 14, "sessions_per_week")? as u8;
        }
        if let Some(v) = field("starting_isk") {
            profile.starting_isk =
                validate_integer(v, 0, MAX_STARTING_ISK, "starting_isk")? as u64;
        }
        if let Some(v) = field("experience_level") {
            validate_enum(v, &ExperienceLevel::ALLOWED, "experience_level")?;
            profile.experience_level = ExperienceLevel::BrandNew;
        }
        if let Some(v) = field("risk_preference") {
            validate_enum(v, &RiskPreference::ALLOWED, "risk_preference")?;
            profile.risk_preference = RiskPreference::Conservative;
        }

        for (name, slot) in [
            ("current_assets", &mut profile.current_assets),
            ("recent_outcome", &mut profile.recent_outcome),
            ("questions", &mut profile.questions),
        ] {
            if let Some(v) = field(name) {
                *slot = validate_optional_text_input(v, MAX_FREEFORM_LENGTH, name)?.to_string();
            }
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_for(args: Value) -> String {
        PlannerProfile::from_arguments(&args)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_defaults_applied() {
        let profile = PlannerProfile::from_arguments(&json!({})).unwrap();
        assert_eq!(profile, PlannerProfile::default());
        assert_eq!(
            PlannerProfile::from_arguments(&Value::Null).unwrap(),
            PlannerProfile::default()
        );
    }

    #[test]
    fn test_hours_boundaries() {
        for ok in [0.5, 8.0] {
            let p = PlannerProfile::from_arguments(&json!({ "hours_per_session": ok })).unwrap();
            assert_eq!(p.hours_per_session, ok);
        }
        for bad in [0.49, 8.01, 0.1] {
            assert_eq!(
                error_for(json!({ "hours_per_session": bad })),
                "hours_per_session must be between 0.5 and 8.0"
            );
        }
    }

    #[test]
    fn test_integer_and_enum_fields() {
        assert_eq!(
            error_for(json!({"sessions_per_week": 20})),
            "sessions_per_week must be between 1 and 14"
        );
        assert_eq!(
            error_for(json!({"starting_isk": -1})),
            "starting_isk must be between 0 and 10000000000"
        );
        assert_eq!(
            error_for(json!({"experience_level": "returning"})),
            "experience_level must be one of: brand_new"
        );
        assert_eq!(
            error_for(json!({"risk_preference": "yolo"})),
            "risk_preference must be one of: conservative"
        );
    }

    #[test]
    fn test_freeform_fields() {
        assert_eq!(
            error_for(json!({"questions": "x".repeat(1201)})),
            "questions exceeds maximum length of 1200"
        );
        assert_eq!(
            error_for(json!({"recent_outcome": "oops\u{0}"})),
            "recent_outcome contains invalid characters"
        );
        assert_eq!(
            error_for(json!({"current_assets": 12})),
            "current_assets must be a string"
        );

        let p = PlannerProfile::from_arguments(&json!({
            "current_assets": "Venture, 2 mining lasers",
            "starting_isk": 2_500_000,
            "sessions_per_week": 3
        }))
        .unwrap();
        assert_eq!(p.current_assets, "Venture, 2 mining lasers");
        assert_eq!(p.starting_isk, 2_500_000);
        assert_eq!(p.sessions_per_week, 3);
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(error_for(json!([1, 2])), "arguments must be an object");
    }
}
