//! Typed, schema-checked wrappers around the four planning calls.
//!
//! Each call validates its input, sends a fixed prompt, and validates the
//! reply before anything downstream sees it. Failures are logged in full and
//! surfaced to callers only as a fixed per-stage message.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::errors::PlannerError;
use crate::planner::Stage;
use crate::prompt;
use crate::provider::DynProvider;
use crate::transcript::Transcript;
use crate::wire::{
    output_schema, BlueprintOutput, EnvironmentalInput, EnvironmentalReport, FinalBlueprintInput,
    InitialBlueprintInput, Instruction, LlmRequest, OptimizeCostInput, OptimizeCostOutput, Tx,
    Validate,
};

pub const INITIAL_PLAN_FAILED: &str = "Failed to generate the initial plan from AI.";
pub const OPTIMIZATION_FAILED: &str = "Failed to generate the optimized cost plan.";
pub const ENVIRONMENT_FAILED: &str = "Failed to generate the environmental report.";
pub const FINAL_BLUEPRINT_FAILED: &str = "Failed to generate the final blueprint.";

const BUILDER_ROLE: &str = "You are a Builder Bot that plans cities: materials, costs in Indian Rupees, and ASCII blueprints.";
const FINANCE_ROLE: &str = "You are a cost optimization AI for city planning.";
const ANALYST_ROLE: &str = "You are an environmental analyst for city plans.";

pub struct PlanClient {
    provider: DynProvider,
    tx: Uuid,
    transcript: Option<Transcript>,
}

impl PlanClient {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider, tx: Uuid::new_v4(), transcript: None }
    }

    pub fn with_transaction(mut self, tx: Uuid) -> Self {
        self.tx = tx;
        self
    }

    pub fn with_transcript(mut self, transcript: Option<Transcript>) -> Self {
        self.transcript = transcript;
        self
    }

    /// `prompt` already has the city description embedded.
    pub async fn generate_initial_blueprint(&self, prompt: &str) -> Result<String, PlannerError> {
        let input = InitialBlueprintInput { city_description: prompt.to_string() };
        let out: BlueprintOutput = self
            .call(Stage::Materials, BUILDER_ROLE, &input, prompt.to_string(), INITIAL_PLAN_FAILED)
            .await?;
        Ok(out.blueprint)
    }

    pub async fn optimize_plan_cost(
        &self,
        original_plan_costing: &str,
        budget_limit: f64,
    ) -> Result<OptimizeCostOutput, PlannerError> {
        let input = OptimizeCostInput {
            original_plan_costing: original_plan_costing.to_string(),
            budget_limit,
        };
        let user = prompt::optimize_prompt(&input);
        self.call(Stage::Optimizing, FINANCE_ROLE, &input, user, OPTIMIZATION_FAILED)
            .await
    }

    pub async fn assess_environmental_impact(
        &self,
        input: &EnvironmentalInput,
    ) -> Result<EnvironmentalReport, PlannerError> {
        let user = prompt::environmental_prompt(input);
        self.call(Stage::Environment, ANALYST_ROLE, input, user, ENVIRONMENT_FAILED)
            .await
    }

    /// Markdown with `## Final Blueprint` and `## Plan Comparison` sections.
    pub async fn generate_final_blueprint(
        &self,
        original_description: &str,
        optimization_explanation: &str,
    ) -> Result<String, PlannerError> {
        let input = FinalBlueprintInput {
            original_description: original_description.to_string(),
            optimization_explanation: optimization_explanation.to_string(),
        };
        let user = prompt::final_blueprint_prompt(&input);
        let out: BlueprintOutput = self
            .call(Stage::Blueprint, BUILDER_ROLE, &input, user, FINAL_BLUEPRINT_FAILED)
            .await?;
        Ok(out.blueprint)
    }

    async fn call<I, O>(
        &self,
        stage: Stage,
        role: &str,
        input: &I,
        user: String,
        failure: &str,
    ) -> Result<O, PlannerError>
    where
        I: Serialize + Validate,
        O: DeserializeOwned + JsonSchema + Validate,
    {
        match self.try_call(stage, role, input, user).await {
            Ok(out) => Ok(out),
            Err(e) => {
                error!(%stage, tx = %self.tx, error = %format!("{e:#}"), "planning call failed");
                Err(PlannerError::Stage { step: stage, message: failure.to_string() })
            }
        }
    }

    async fn try_call<I, O>(&self, stage: Stage, role: &str, input: &I, user: String) -> anyhow::Result<O>
    where
        I: Serialize + Validate,
        O: DeserializeOwned + JsonSchema + Validate,
    {
        input.validate()?;

        let schema = output_schema::<O>();
        let req = LlmRequest {
            schema_version: "v1".into(),
            stage,
            transaction: Tx { id: self.tx, timestamp: Utc::now() },
            instruction: Instruction { system: prompt::system_prompt(role, &schema), user },
            input: serde_json::to_value(input)?,
            output_schema: schema,
        };

        debug!(%stage, tx = %self.tx, "sending planning request");
        let reply = self.provider.send(&req).await;

        if let Some(t) = &self.transcript {
            match t.save_stage(&req, reply.as_ref().ok()) {
                Ok(saved) => debug!(%stage, request = ?saved.request, response = ?saved.response, "transcript saved"),
                Err(e) => warn!(%stage, error = %e, "could not save transcript"),
            }
        }

        let out: O = serde_json::from_value(reply?).map_err(|e| PlannerError::Schema(e.to_string()))?;
        out.validate()?;
        Ok(out)
    }
}
