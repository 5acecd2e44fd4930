//! The planning state machine.
//!
//! ```text
//! initial -> materials -> costing -+-> optimizing -> environment -> blueprint -> done
//!                                  +----------------> environment -----------> done
//! ```
//!
//! Any call failure moves the run to `error`. Stages run strictly one after
//! another; the only suspension points are the four model calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::PlanClient;
use crate::description::CityDescription;
use crate::errors::PlannerError;
use crate::parse;
use crate::prompt;
use crate::wire::{EnvironmentalInput, EnvironmentalReport};

mod notify;

pub use notify::{Notification, Notifier, Tone};

/// Over this grand total (strictly) the plan goes through optimization.
/// Also the ceiling handed to the optimizer.
pub const BUDGET_LIMIT: f64 = 1_000_000.0;

pub const WITHIN_BUDGET: &str = "The plan is within the budget.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Initial,
    Materials,
    Costing,
    Optimizing,
    Environment,
    Blueprint,
    Done,
    Error,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initial => "initial",
            Stage::Materials => "materials",
            Stage::Costing => "costing",
            Stage::Optimizing => "optimizing",
            Stage::Environment => "environment",
            Stage::Blueprint => "blueprint",
            Stage::Done => "done",
            Stage::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Error)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Initial,
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFailure {
    pub step: Stage,
    pub message: String,
}

/// Everything one submission has produced so far.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningRun {
    pub city_description: CityDescription,
    pub stage: Stage,
    /// Every stage entered, in order, starting with `initial`.
    pub trail: Vec<Stage>,
    pub initial_response: Option<String>,
    pub raw_materials: Option<String>,
    pub original_costing: Option<String>,
    pub initial_blueprint: Option<String>,
    pub grand_total: f64,
    pub is_over_budget: bool,
    pub optimized_costing: Option<String>,
    pub optimized_grand_total: Option<f64>,
    pub optimization_explanation: Option<String>,
    pub environmental_report: Option<EnvironmentalReport>,
    pub final_blueprint: Option<String>,
    pub plan_comparison: Option<String>,
    pub error: Option<StageFailure>,
}

impl PlanningRun {
    pub fn new(city_description: CityDescription) -> Self {
        Self {
            city_description,
            stage: Stage::Initial,
            trail: vec![Stage::Initial],
            initial_response: None,
            raw_materials: None,
            original_costing: None,
            initial_blueprint: None,
            grand_total: 0.0,
            is_over_budget: false,
            optimized_costing: None,
            optimized_grand_total: None,
            optimization_explanation: None,
            environmental_report: None,
            final_blueprint: None,
            plan_comparison: None,
            error: None,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self.stage {
            Stage::Initial => RunStatus::Initial,
            Stage::Done => RunStatus::Done,
            Stage::Error => RunStatus::Error,
            _ => RunStatus::Running,
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.trail.push(stage);
    }
}

/// Owns the single active run and drives it forward.
pub struct Orchestrator {
    steps: Steps,
    run: Option<PlanningRun>,
}

/// The stage bodies. Kept apart from the run so a step can borrow both.
struct Steps {
    client: PlanClient,
    notifier: Arc<dyn Notifier>,
}

impl Orchestrator {
    pub fn new(client: PlanClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { steps: Steps { client, notifier }, run: None }
    }

    /// Begin a fresh run, dropping whatever the previous one held.
    pub fn start(&mut self, description: CityDescription) {
        if let Some(old) = self.run.take() {
            info!(stage = %old.stage, "discarding previous run");
        }
        self.run = Some(PlanningRun::new(description));
    }

    pub fn snapshot(&self) -> Option<&PlanningRun> {
        self.run.as_ref()
    }

    /// Perform one transition. Returns the stage the run is in afterwards,
    /// or `None` when no run has been started.
    ///
    /// The run stays in place while a model call is pending, so dropping
    /// the future leaves the last completed stage readable.
    pub async fn advance(&mut self) -> Option<Stage> {
        let run = self.run.as_mut()?;
        let steps = &self.steps;
        let before = run.stage;
        let result = match before {
            Stage::Initial => {
                steps.progress("Generating Initial Plan...", "Our AI crew is building your city blueprint.");
                run.enter(Stage::Materials);
                Ok(())
            }
            Stage::Materials => steps.materials(run).await,
            Stage::Costing => {
                steps.costing(run);
                Ok(())
            }
            Stage::Optimizing => steps.optimizing(run).await,
            Stage::Environment => steps.environment(run).await,
            Stage::Blueprint => steps.blueprint(run).await,
            Stage::Done | Stage::Error => Ok(()),
        };

        match result {
            Err(e) => steps.fail(run, e),
            Ok(()) if before != Stage::Done && run.stage == Stage::Done => {
                steps.notifier.notify(Notification::success(
                    "City Plan Complete!",
                    "Review the materials, costs, environmental report and layout.",
                ));
            }
            Ok(()) => {}
        }

        Some(run.stage)
    }

    /// Drive the run until it reaches `done` or `error`.
    pub async fn run_to_end(&mut self) -> Option<&PlanningRun> {
        while let Some(stage) = self.advance().await {
            if stage.is_terminal() {
                break;
            }
        }
        self.snapshot()
    }
}

// Stage bodies. Each one stores its artifacts and enters the next stage,
// touching the run only after its model call has returned.
impl Steps {
    async fn materials(&self, run: &mut PlanningRun) -> Result<(), PlannerError> {
        let request = prompt::initial_plan_prompt(run.city_description.as_str());
        let markdown = self.client.generate_initial_blueprint(&request).await?;

        let plan = parse::parse_initial_plan(&markdown);
        run.initial_response = Some(markdown);
        run.raw_materials = Some(plan.raw_materials);
        run.original_costing = Some(plan.original_costing);
        run.initial_blueprint = Some(plan.initial_blueprint);

        self.progress("Initial Plan Generated!", "Estimating the grand total.");
        run.enter(Stage::Costing);
        Ok(())
    }

    fn costing(&self, run: &mut PlanningRun) {
        let costing = run.original_costing.as_deref().unwrap_or_default();
        run.grand_total = parse::parse_grand_total(costing);
        run.is_over_budget = run.grand_total > BUDGET_LIMIT;
        info!(grand_total = run.grand_total, over_budget = run.is_over_budget, "costing parsed");

        if run.is_over_budget {
            self.progress("Optimizing Plan...", "Our AI Finance Manager is working on the budget.");
            run.enter(Stage::Optimizing);
        } else {
            run.optimization_explanation = Some(WITHIN_BUDGET.to_string());
            self.progress("Assessing Environmental Impact...", "The plan is within budget; analysing its footprint.");
            run.enter(Stage::Environment);
        }
    }

    async fn optimizing(&self, run: &mut PlanningRun) -> Result<(), PlannerError> {
        let costing = run.original_costing.clone().unwrap_or_default();
        let optimized = self.client.optimize_plan_cost(&costing, BUDGET_LIMIT).await?;

        let new_total = parse::parse_grand_total(&optimized.optimized_plan_costing);
        if new_total > BUDGET_LIMIT {
            warn!(grand_total = new_total, "optimized plan is still over budget");
        }
        run.optimized_grand_total = Some(new_total);
        run.optimized_costing = Some(optimized.optimized_plan_costing);
        run.optimization_explanation = Some(optimized.explanation);

        self.progress("Plan Optimized!", "Assessing the environmental impact of both plans.");
        run.enter(Stage::Environment);
        Ok(())
    }

    async fn environment(&self, run: &mut PlanningRun) -> Result<(), PlannerError> {
        let input = EnvironmentalInput {
            city_plan_description: run.city_description.as_str().to_string(),
            original_costing: run.original_costing.clone(),
            optimized_costing: if run.is_over_budget { run.optimized_costing.clone() } else { None },
        };
        let report = self.client.assess_environmental_impact(&input).await?;
        run.environmental_report = Some(report);

        if run.is_over_budget {
            self.progress("Drawing Final Blueprint...", "Our Builder Bot is redrawing the optimized layout.");
            run.enter(Stage::Blueprint);
        } else {
            run.enter(Stage::Done);
        }
        Ok(())
    }

    async fn blueprint(&self, run: &mut PlanningRun) -> Result<(), PlannerError> {
        let explanation = run.optimization_explanation.clone().unwrap_or_default();
        let markdown = self
            .client
            .generate_final_blueprint(run.city_description.as_str(), &explanation)
            .await?;

        let plan = parse::parse_final_blueprint(&markdown);
        run.final_blueprint = Some(plan.final_blueprint);
        run.plan_comparison = Some(plan.plan_comparison);
        run.enter(Stage::Done);
        Ok(())
    }

    fn fail(&self, run: &mut PlanningRun, err: PlannerError) {
        let step = err.step().unwrap_or(run.stage);
        let message = err.to_string();
        warn!(%step, %message, "planning run failed");
        run.error = Some(StageFailure { step, message: message.clone() });
        run.enter(Stage::Error);
        self.notifier.notify(Notification::destructive("An Error Occurred", &message));
    }

    fn progress(&self, title: &str, description: &str) {
        self.notifier.notify(Notification::progress(title, description));
    }
}
