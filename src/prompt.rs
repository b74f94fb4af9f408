use crate::profile::ProfileInput;

/// Fixed system message sent with every completion.
pub const SYSTEM_INSTRUCTION: &str = "You are a JSON-only fitness API. Return ONLY JSON.";

const PLAN_EXAMPLE: &str = r#"{
  "user_profile": { "summary": "..." },
  "workout": [
    {
      "day": "Day 1",
      "focus": "...",
      "exercises": [
        { "name": "...", "sets": "3 x 12", "visual_prompt": "..." }
      ]
    }
  ],
  "diet": {
    "meals": [
      { "name": "...", "calories": 450, "visual_prompt": "..." }
    ]
  },
  "motivation": "..."
}"#;

/// Render the user instruction for a profile. Same profile, same text.
pub fn build_prompt(profile: &ProfileInput) -> String {
    let mut s = String::new();

    s.push_str("Act as an elite fitness coach. Create a JSON plan for ");
    s.push_str(&format!(
        "{}, {}, {} yrs, {}kg, {}cm.\n",
        profile.name, profile.gender, profile.age, profile.weight, profile.height
    ));
    s.push_str(&format!(
        "Goal: {}. Location: {}. Diet: {}.\n\n",
        profile.goal, profile.location, profile.diet
    ));

    s.push_str("Requirements:\n");
    s.push_str("1. Create a 3-day workout split.\n");
    s.push_str("2. Create a full day meal plan.\n");
    s.push_str(
        "3. For every exercise and meal, provide a short \"visual_prompt\" field describing it for an image generator.\n\n",
    );

    s.push_str("Return STRICT JSON using the structure:\n");
    s.push_str(PLAN_EXAMPLE);
    s.push('\n');
    s.push_str("Do not wrap it in markdown code fences or add any explanation.\n");

    s
}
