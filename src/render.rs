use std::fmt::Write;

use serde_json::Value;

use crate::image::{image_url, EXERCISE_THUMBNAIL, MEAL_BANNER};
use crate::plan::Plan;

/// Plain-text view of a plan for terminals. Every field is optional; missing
/// or oddly typed parts are skipped.
pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();

    if let Some(summary) = plan.get("user_profile").and_then(|p| text(p.get("summary"))) {
        let _ = writeln!(out, "Profile: {summary}\n");
    }

    if let Some(days) = plan.get("workout").and_then(Value::as_array) {
        let _ = writeln!(out, "WORKOUT");
        for (idx, day) in days.iter().enumerate() {
            let label = text(day.get("day")).unwrap_or_else(|| format!("Day {}", idx + 1));
            match text(day.get("focus")) {
                Some(focus) => {
                    let _ = writeln!(out, "  {label}: {focus}");
                }
                None => {
                    let _ = writeln!(out, "  {label}");
                }
            }
            for exercise in day.get("exercises").and_then(Value::as_array).into_iter().flatten() {
                let name = text(exercise.get("name")).unwrap_or_else(|| "Exercise".into());
                match text(exercise.get("sets")) {
                    Some(sets) => {
                        let _ = writeln!(out, "    - {name} ({sets})");
                    }
                    None => {
                        let _ = writeln!(out, "    - {name}");
                    }
                }
                if let Some(prompt) = text(exercise.get("visual_prompt")) {
                    let _ = writeln!(out, "      {}", image_url(&prompt, EXERCISE_THUMBNAIL));
                }
            }
        }
        out.push('\n');
    }

    if let Some(meals) = plan
        .get("diet")
        .and_then(|d| d.get("meals"))
        .and_then(Value::as_array)
    {
        let _ = writeln!(out, "DIET");
        for meal in meals {
            let name = text(meal.get("name")).unwrap_or_else(|| "Meal".into());
            match text(meal.get("calories")) {
                Some(kcal) => {
                    let _ = writeln!(out, "  - {name}: {kcal} kcal");
                }
                None => {
                    let _ = writeln!(out, "  - {name}");
                }
            }
            if let Some(prompt) = text(meal.get("visual_prompt")) {
                let _ = writeln!(out, "    {}", image_url(&prompt, MEAL_BANNER));
            }
        }
        out.push('\n');
    }

    if let Some(motivation) = text(plan.get("motivation")) {
        let _ = writeln!(out, "\"{motivation}\"");
    }

    out
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
