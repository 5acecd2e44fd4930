use serde_json::Value;

use crate::wire::{EnvironmentalInput, FinalBlueprintInput, OptimizeCostInput};

/// System prompt shared by every stage: answer with one JSON object
/// matching `schema`.
pub fn system_prompt(role: &str, schema: &Value) -> String {
    let schema = serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".into());
    format!(
        r#"{role}

Return EXACTLY ONE JSON object (no prose around it, no code fences) that conforms to this JSON Schema:

{schema}

Every required field must be present. Strings may contain Markdown. Numbers must be plain JSON numbers."#
    )
}

/// Instructional prompt for the first call. The user's description is
/// embedded verbatim at the end.
pub fn initial_plan_prompt(city_description: &str) -> String {
    format!(
        r#"Analyze the following city plan description to produce a raw material list, a cost estimate, and an ASCII art blueprint.

**Function 1: Raw Material Supply**
- Identify infrastructure (buildings, roads, parks).
- List all raw materials with estimated quantities.
- Categorize materials as 'Essential' or 'Optional/Luxury'.
- State each material's purpose.

**Function 2: Initial Financial Analysis**
- Assign realistic per-unit costs in Indian Rupees (₹).
- Create a costing table (Material, Quantity, Unit Cost, Total Cost).
- Calculate Subtotal, a 10% contingency fee, and Grand Total.
- State if the budget exceeds ₹10,00,000.

**Output Format**:
Put the whole answer in the `blueprint` field, using this exact Markdown structure:
## Raw Materials
[Material list]
## Cost Estimate
[Cost table and summary, with the Grand Total on its own line]
## Initial Blueprint
[ASCII art blueprint]

**City Description**:
{city_description}"#
    )
}

pub fn optimize_prompt(input: &OptimizeCostInput) -> String {
    format!(
        r#"Reduce the cost of this city plan to be under the budget.

**Budget Limit**: ₹{budget}

**Original Plan Costing**:
{costing}

---

**Step 1: Identify Expensive Items**
Find 2-3 of the most expensive materials or features in the original table that can be reduced or replaced.

**Step 2: Create an "Optimized Cost Estimate" Table**
- The table MUST include EVERY item from the original plan.
- For the items from Step 1, reduce their quantity or replace them with a cheaper alternative and compute a new Total Cost.
- Copy all other items exactly as they were.
- Columns: | Material | Quantity | Unit Cost (INR) | Total Cost (INR) |

**Step 3: Calculate the New Summary**
- **Subtotal**: the sum of every Total Cost in the new table.
- **Contingency (10%)**: 10% of the new Subtotal.
- **Grand Total**: the new Subtotal + Contingency.
- The new Grand Total MUST be LESS than the Budget Limit.

**Step 4: Write the Explanation**
Briefly state the exact changes made to meet the budget, e.g. "Reduced the amount of marble and replaced decorative statues with public gardens."

**Step 5: Format the Output**
`optimizedPlanCosting` holds the full table and summary. `explanation` holds the summary of changes."#,
        budget = input.budget_limit,
        costing = input.original_plan_costing,
    )
}

pub fn environmental_prompt(input: &EnvironmentalInput) -> String {
    let optimized = match &input.optimized_costing {
        Some(c) => c.as_str(),
        None => "(none: the plan was within budget, omit optimizedPlanAnalysis)",
    };
    format!(
        r#"Evaluate the city plan based on its description and costing.

**Task**:
1.  **Analyze Original Plan**:
    -   Identify environmental risks.
    -   Suggest eco-friendly alternatives.
    -   Provide a Green Score (0-100).
2.  **Analyze Optimized Plan (if provided)**:
    -   Do the same analysis as the original plan.
3.  **Final Recommendation**:
    -   Recommend the best path forward (Original, Optimized, or Hybrid).

**City Plan**: {description}
**Original Cost**: {original}
**Optimized Cost**: {optimized}

Provide a structured analysis based on the inputs."#,
        description = input.city_plan_description,
        original = input.original_costing.as_deref().unwrap_or("(not provided)"),
        optimized = optimized,
    )
}

pub fn final_blueprint_prompt(input: &FinalBlueprintInput) -> String {
    format!(
        r#"Create the final city layout blueprint and a comparison summary.

The original city plan was described as:
---
{description}
---

It was over budget and has been optimized. The following changes were made:
---
{explanation}
---

1.  **Generate Final Blueprint**: a new, final ASCII art blueprint that reflects the optimizations.
2.  **Provide Comparison**: a short summary comparing the original plan to the optimized plan, explaining the differences (e.g., fewer commercial blocks, smaller stadium, different materials).

**Output Format**:
Put a single Markdown string in the `blueprint` field with these headings:

## Final Blueprint

[New ASCII art blueprint]

## Plan Comparison

[Comparison summary]"#,
        description = input.original_description,
        explanation = input.optimization_explanation,
    )
}
