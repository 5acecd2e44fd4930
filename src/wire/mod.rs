use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::PlannerError;
use crate::planner::Stage;

/// ========================================
/// Request envelope sent to a provider
/// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub schema_version: String,
    pub stage: Stage,
    pub transaction: Tx,
    pub instruction: Instruction,
    /// The validated input record, for transcripts.
    pub input: Value,
    /// JSON Schema the model's reply must satisfy.
    pub output_schema: Value,
}

/// ========================================
/// Shape checks beyond what serde enforces
/// ========================================

pub trait Validate {
    fn validate(&self) -> Result<(), PlannerError>;
}

fn required(field: &str, value: &str) -> Result<(), PlannerError> {
    if value.trim().is_empty() {
        return Err(PlannerError::Schema(format!("{field} must not be empty")));
    }
    Ok(())
}

fn optional(field: &str, value: Option<&str>) -> Result<(), PlannerError> {
    match value {
        Some(v) => required(field, v),
        None => Ok(()),
    }
}

/// ========================================
/// Per-operation records (camelCase on the wire)
/// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitialBlueprintInput {
    /// Full instructional prompt with the city description embedded.
    pub city_description: String,
}

impl Validate for InitialBlueprintInput {
    fn validate(&self) -> Result<(), PlannerError> {
        required("cityDescription", &self.city_description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlueprintOutput {
    /// The complete Markdown answer, with the requested `##` sections.
    pub blueprint: String,
}

impl Validate for BlueprintOutput {
    fn validate(&self) -> Result<(), PlannerError> {
        required("blueprint", &self.blueprint)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeCostInput {
    pub original_plan_costing: String,
    /// Budget ceiling in INR.
    pub budget_limit: f64,
}

impl Validate for OptimizeCostInput {
    fn validate(&self) -> Result<(), PlannerError> {
        required("originalPlanCosting", &self.original_plan_costing)?;
        if !self.budget_limit.is_finite() || self.budget_limit <= 0.0 {
            return Err(PlannerError::Schema(format!(
                "budgetLimit must be a positive amount, got {}",
                self.budget_limit
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptimizeCostOutput {
    /// Full optimized costing table plus recalculated summary.
    pub optimized_plan_costing: String,
    /// What was changed to fit the budget.
    pub explanation: String,
}

impl Validate for OptimizeCostOutput {
    fn validate(&self) -> Result<(), PlannerError> {
        required("optimizedPlanCosting", &self.optimized_plan_costing)?;
        required("explanation", &self.explanation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalInput {
    pub city_plan_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_costing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_costing: Option<String>,
}

impl Validate for EnvironmentalInput {
    fn validate(&self) -> Result<(), PlannerError> {
        required("cityPlanDescription", &self.city_plan_description)?;
        optional("originalCosting", self.original_costing.as_deref())?;
        optional("optimizedCosting", self.optimized_costing.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlanAnalysis {
    /// Identified environmental risks.
    pub environmental_risks: String,
    /// Green Score from 0 to 100.
    pub green_score: f64,
    /// Eco-friendly alternatives.
    pub greener_alternatives: String,
}

impl PlanAnalysis {
    fn validate_as(&self, prefix: &str) -> Result<(), PlannerError> {
        required(&format!("{prefix}.environmentalRisks"), &self.environmental_risks)?;
        required(&format!("{prefix}.greenerAlternatives"), &self.greener_alternatives)?;
        if !(0.0..=100.0).contains(&self.green_score) {
            return Err(PlannerError::Schema(format!(
                "{prefix}.greenScore must be within 0..=100, got {}",
                self.green_score
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentalReport {
    pub original_plan_analysis: PlanAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_plan_analysis: Option<PlanAnalysis>,
    /// Original, Optimized or Hybrid, with reasoning.
    pub final_recommendation: String,
}

impl Validate for EnvironmentalReport {
    fn validate(&self) -> Result<(), PlannerError> {
        self.original_plan_analysis.validate_as("originalPlanAnalysis")?;
        if let Some(a) = &self.optimized_plan_analysis {
            a.validate_as("optimizedPlanAnalysis")?;
        }
        required("finalRecommendation", &self.final_recommendation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalBlueprintInput {
    pub original_description: String,
    pub optimization_explanation: String,
}

impl Validate for FinalBlueprintInput {
    fn validate(&self) -> Result<(), PlannerError> {
        required("originalDescription", &self.original_description)?;
        required("optimizationExplanation", &self.optimization_explanation)
    }
}

/// JSON Schema for an output record, as sent to the model.
pub fn output_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null)
}
