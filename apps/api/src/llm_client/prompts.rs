// Cross-cutting prompt fragments shared by every model call.
// Task-specific prompts live next to the module that sends them.

/// Appended to every system prompt that expects a fenced JSON answer.
pub const FENCED_JSON_INSTRUCTION: &str = "\
    Return exactly one JSON object inside a single Markdown code block opened with ```json \
    on its own line and closed with ``` on its own line. \
    Do NOT emit any other ```json block. \
    Use true/false for flags and non-negative integers for counts.";

/// Appended to every system prompt: the model reports facts, never verdicts.
pub const NO_SCORES_INSTRUCTION: &str = "\
    CRITICAL: Do NOT calculate scores, percentages, pass/fail verdicts or ratings. \
    Scores are computed downstream from the facts you report. \
    Any score you include will be discarded.";
