//! Instruction text sent to the completions provider.

/// Characters of user text embedded in the prompt.
pub const MAX_PROMPT_TEXT_CHARS: usize = 1000;

/// Builds the instruction asking for a JSON object with `userResponse`,
/// `adminSummary` and `adminAction`. Inputs are assumed already validated.
pub fn build_feedback_prompt(rating: i32, text: &str) -> String {
    let excerpt: String = text.chars().take(MAX_PROMPT_TEXT_CHARS).collect();

    format!(
        r#"
You are an AI assistant helping a product team process user feedback
in a production web application.

IMPORTANT RULES (STRICT):
- Be professional, calm, and human.
- Do NOT mention internal analysis, policies, or AI reasoning.
- Do NOT repeat the user's exact words.
- Do NOT promise fixes, refunds, or compensation.
- Do NOT assume user intent or history beyond the given text.
- Keep all outputs concise and factual.

CONTEXT:
A real user has submitted feedback about a web product.

INPUT:
User Rating: {rating}/5
User Feedback: "{excerpt}"

TASKS:

1. userResponse
Write a short message addressed directly to the user.
- Match tone to rating:
  - 1–2 stars: acknowledge concerns politely.
  - 3 stars: thank the user and acknowledge mixed feedback.
  - 4–5 stars: appreciate the positive experience.
- Be empathetic but neutral.
- 1–2 sentences maximum.

2. adminSummary
Write ONE short factual sentence for internal use.
- Describe the core sentiment or issue.
- No emotions, no explanations, no recommendations.
- Maximum 15 words.

3. adminAction
Suggest ONE clear internal action.
- Use professional, standardized language.
- Keep it realistic and low-assumption.
- Maximum 10 words.

ACTION GUIDELINES:
- Positive feedback → tracking or monitoring actions.
- Neutral feedback → review or observe patterns.
- Negative feedback → investigate or follow up.
- Vague or empty feedback → request clarification.

RETURN FORMAT (MANDATORY):
Return ONLY valid JSON.
Do not include markdown, comments, or extra text.

JSON STRUCTURE:
{{
  "userResponse": "string",
  "adminSummary": "string",
  "adminAction": "string"
}}
  "#
    )
}
