// Cross-cutting prompt fragments shared by every text-service call.
// Feature-specific prompts live next to the feature (see quiz/prompts.rs).

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
