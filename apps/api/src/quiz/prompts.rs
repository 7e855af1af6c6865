// Prompt text for question generation.

/// Question generation prompt. Replace `{count}` and `{assignments}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate EXACTLY {count} UNIQUE student-life scenario questions with equal weight options.

Each question must follow the assigned intent.

Assigned intents:
{assignments}
Rules:
- Do NOT mention psychology or RIASEC
- Real-life student situations
- Exactly 4 options each
- All questions MUST be different
- Simple English
- RETURN ONLY JSON ARRAY
- Each item must have ONLY: question, options

Example item:
{"question": "Your class is planning a fundraiser. What do you volunteer for?", "options": ["...", "...", "...", "..."]}
"#;
