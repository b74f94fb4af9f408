use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::decode::decode_plan;
use crate::error::PlanError;
use crate::llm::{CompletionProvider, CompletionRequest};
use crate::plan::{ErrorResult, PlanResult};
use crate::profile::ProfileInput;
use crate::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use crate::schema::{plan_schema, validate_object};

pub const DEFAULT_MAX_TOKENS: u32 = 800;

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    /// Reject decoded plans that do not match the plan schema instead of
    /// only logging the mismatch.
    pub strict_schema: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            strict_schema: false,
        }
    }
}

/// Profile in, plan (or error result) out. Holds no per-request state.
#[derive(Clone)]
pub struct PlanGenerator {
    provider: Arc<dyn CompletionProvider>,
    settings: GenerationSettings,
}

impl PlanGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Validate, prompt, call the provider once, decode.
    ///
    /// Invalid profiles are rejected before the provider is contacted.
    #[instrument(skip_all, fields(goal = %profile.goal, location = %profile.location, diet = %profile.diet))]
    pub async fn generate(&self, profile: &ProfileInput) -> Result<PlanResult, PlanError> {
        profile.validate().map_err(PlanError::InvalidProfile)?;

        let prompt = build_prompt(profile);
        let raw = self
            .provider
            .complete(CompletionRequest {
                system: SYSTEM_INSTRUCTION,
                user: &prompt,
                max_tokens: self.settings.max_tokens,
            })
            .await?;
        debug!(len = raw.len(), "received completion");

        Ok(self.shape(raw))
    }

    fn shape(&self, raw: String) -> PlanResult {
        let plan = match decode_plan(&raw) {
            PlanResult::Plan(plan) => plan,
            PlanResult::Error(err) => {
                warn!(kind = err.kind.as_str(), len = raw.len(), "model output could not be decoded");
                return PlanResult::Error(err);
            }
        };

        if let Err(violations) = validate_object(&plan_schema(), &plan) {
            if self.settings.strict_schema {
                warn!(violations = violations.len(), "plan rejected by schema");
                return PlanResult::Error(ErrorResult::schema_mismatch(raw, violations));
            }
            for v in &violations {
                debug!(violation = %v, "plan deviates from schema");
            }
            info!(violations = violations.len(), "returning plan with schema deviations");
        }

        PlanResult::Plan(plan)
    }
}
