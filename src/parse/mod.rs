//! Best-effort extraction of sections and totals from model Markdown.
//!
//! Nothing in here fails: a missing heading becomes a fixed placeholder and a
//! missing or unreadable total becomes `0.0`.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const RAW_MATERIALS: &str = "## Raw Materials";
pub const COST_ESTIMATE: &str = "## Cost Estimate";
pub const INITIAL_BLUEPRINT: &str = "## Initial Blueprint";
pub const FINAL_BLUEPRINT: &str = "## Final Blueprint";
pub const PLAN_COMPARISON: &str = "## Plan Comparison";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialPlan {
    pub raw_materials: String,
    pub original_costing: String,
    pub initial_blueprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalPlan {
    pub final_blueprint: String,
    pub plan_comparison: String,
}

/// Body between `heading` and the first `next` heading after it. With no
/// `next`, runs to the end of the text. `None` if either heading is absent.
fn section<'a>(markdown: &'a str, heading: &str, next: Option<&str>) -> Option<&'a str> {
    let start = markdown.find(heading)? + heading.len();
    let rest = &markdown[start..];
    match next {
        Some(n) => rest.find(n).map(|end| &rest[..end]),
        None => Some(rest),
    }
}

fn section_or(markdown: &str, heading: &str, next: Option<&str>, placeholder: &str) -> String {
    section(markdown, heading, next)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| placeholder.to_string())
}

pub fn parse_initial_plan(markdown: &str) -> InitialPlan {
    InitialPlan {
        raw_materials: section_or(
            markdown,
            RAW_MATERIALS,
            Some(COST_ESTIMATE),
            "Could not parse raw materials.",
        ),
        original_costing: section_or(
            markdown,
            COST_ESTIMATE,
            Some(INITIAL_BLUEPRINT),
            "Could not parse cost estimate.",
        ),
        initial_blueprint: section_or(
            markdown,
            INITIAL_BLUEPRINT,
            None,
            "Could not parse initial blueprint.",
        ),
    }
}

pub fn parse_final_blueprint(markdown: &str) -> FinalPlan {
    FinalPlan {
        final_blueprint: section_or(
            markdown,
            FINAL_BLUEPRINT,
            Some(PLAN_COMPARISON),
            "Could not parse final blueprint.",
        ),
        plan_comparison: section_or(
            markdown,
            PLAN_COMPARISON,
            None,
            "Could not parse plan comparison.",
        ),
    }
}

fn amount_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // Leading digit required so a stray comma never counts as a number.
    RE.get_or_init(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").ok())
        .as_ref()
}

/// First amount on the first line mentioning "grand total" (any case).
/// Thousands separators are dropped whatever the grouping convention.
/// Always finite: an amount too large for `f64` counts as unreadable.
pub fn parse_grand_total(costing_text: &str) -> f64 {
    let Some(line) = costing_text
        .lines()
        .find(|l| l.to_lowercase().contains("grand total"))
    else {
        return 0.0;
    };

    amount_re()
        .and_then(|re| re.find(line))
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
