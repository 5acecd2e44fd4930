use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::time::Duration;

use crate::planner::{Notification, Notifier, PlanningRun, Tone, BUDGET_LIMIT};
use crate::wire::PlanAnalysis;

/// Spinner for progress notifications, coloured lines for the rest.
#[derive(Default)]
pub struct TerminalNotifier {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn spin(&self, message: String) {
        let mut slot = self.spinner.lock();
        let bar = slot.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        bar.set_message(message);
    }

    fn stop(&self) {
        if let Some(pb) = self.spinner.lock().take() {
            pb.finish_and_clear();
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, n: Notification) {
        match n.tone {
            Tone::Progress => self.spin(format!("{} {}", n.title.bold(), n.description.dimmed())),
            Tone::Success => {
                self.stop();
                println!("{} {}", format!("✔ {}", n.title).green().bold(), n.description);
            }
            Tone::Destructive => {
                self.stop();
                eprintln!("{} {}", format!("✖ {}", n.title).red().bold(), n.description);
            }
        }
    }
}

/// Indian digit grouping: last three digits, then pairs (12,34,567.50).
pub fn format_rupees(amount: f64) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut groups: Vec<&str> = Vec::new();
    let (mut head, tail) = whole.split_at(whole.len().saturating_sub(3));
    while head.len() > 2 {
        let (h, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = h;
    }
    if !head.is_empty() {
        groups.push(head);
    }
    groups.reverse();
    groups.push(tail);

    let sign = if negative { "-" } else { "" };
    let digits = groups.join(",");
    if frac == "00" {
        format!("{sign}₹{digits}")
    } else {
        format!("{sign}₹{digits}.{frac}")
    }
}

fn section(title: &str, body: Option<&str>) {
    println!("\n{}", title.bold().underline());
    println!("{}", body.unwrap_or("(not generated)"));
}

fn analysis(label: &str, a: &PlanAnalysis) {
    println!("\n{} {}", label.bold(), format!("Green Score: {:.0}/100", a.green_score).green());
    println!("{}\n{}", "Risks:".yellow(), a.environmental_risks);
    println!("{}\n{}", "Greener alternatives:".cyan(), a.greener_alternatives);
}

/// Render a finished (or failed) run as a terminal report.
pub fn show_run(run: &PlanningRun) {
    println!("\n{}", "═════════════ YOUR CITY PLAN ═════════════".bold());

    if run.raw_materials.is_some() {
        println!("\n{}", "=== INITIAL PLAN ===".bold());
        section("Raw Material Supplies", run.raw_materials.as_deref());
        section("Financial Requirements", run.original_costing.as_deref());
        let total = format_rupees(run.grand_total);
        if run.is_over_budget {
            println!("Grand total: {} (over the {} budget)", total.red().bold(), format_rupees(BUDGET_LIMIT));
        } else {
            println!("Grand total: {} (within budget)", total.green().bold());
        }
        section("City Layout Plan", run.initial_blueprint.as_deref());
    }

    if let Some(costing) = run.optimized_costing.as_deref() {
        println!("\n{}", "=== OPTIMIZED PLAN ===".bold());
        if let Some(exp) = run.optimization_explanation.as_deref() {
            println!("{} {}", "✦".cyan(), exp);
        }
        section("Financial Requirements", Some(costing));
        if let Some(t) = run.optimized_grand_total {
            println!("Grand total: {}", format_rupees(t).bold());
        }
    }

    if let Some(report) = &run.environmental_report {
        println!("\n{}", "=== ENVIRONMENTAL REPORT ===".bold());
        analysis("Original plan", &report.original_plan_analysis);
        if let Some(opt) = &report.optimized_plan_analysis {
            analysis("Optimized plan", opt);
        }
        println!("\n{} {}", "Recommendation:".bold(), report.final_recommendation);
    }

    if run.final_blueprint.is_some() {
        println!("\n{}", "=== FINAL PLAN ===".bold());
        section("Final Blueprint", run.final_blueprint.as_deref());
        section("Plan Comparison", run.plan_comparison.as_deref());
    }

    if let Some(err) = &run.error {
        println!(
            "\n{}\n{}\n{}",
            "┏━━━━━━━━━━━━━━━━━ An Error Occurred ━━━━━━━━━━━━━━━━━┓".red().bold(),
            format!("  [{}] {}", err.step, err.message).red(),
            "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".red().bold(),
        );
        println!("Start a new plan to try again.");
    }
    println!();
}
