//! System prompts and request templates for workflow sessions
//!
//! Chat sessions send no system instruction. Workflow sessions use one of two
//! fixed instructions and embed the serialized document in a single user
//! message ahead of the user's request.

/// System instruction for analysis requests
pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert workflow analyst. \
You will be given a workflow as a JSON document followed by a question or \
instruction about it. Explain the workflow's structure, behavior, and any \
problems you notice in clear prose. Do not rewrite the workflow unless asked.";

/// System instruction for modification requests
pub const MODIFIER_SYSTEM_PROMPT: &str = "You are an expert workflow modifier. \
You will be given a workflow as a JSON document followed by a requested change. \
Apply the change and return the complete modified workflow. \
Respond with JSON only: no explanations, no markdown, no code fences.";

/// Build the user message for an analysis request
///
/// # Examples
///
/// ```
/// use chatflow::prompts::build_analysis_request;
///
/// let message = build_analysis_request("{\"steps\": []}", "What does this do?");
/// assert!(message.starts_with("Here is the workflow"));
/// assert!(message.ends_with("What does this do?"));
/// ```
pub fn build_analysis_request(workflow_json: &str, prompt: &str) -> String {
    format!(
        "Here is the workflow JSON:\n\n{}\n\n{}",
        workflow_json,
        prompt.trim()
    )
}

/// Build the user message for a modification request
///
/// # Examples
///
/// ```
/// use chatflow::prompts::build_modification_request;
///
/// let message = build_modification_request("{\"steps\": []}", "Add a step");
/// assert!(message.contains("{\"steps\": []}"));
/// assert!(message.contains("Modification request: Add a step"));
/// ```
pub fn build_modification_request(workflow_json: &str, prompt: &str) -> String {
    format!(
        "Here is the current workflow JSON:\n\n{}\n\nModification request: {}\n\n\
         Return the full modified workflow as JSON only.",
        workflow_json,
        prompt.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompts_framing() {
        assert!(ANALYST_SYSTEM_PROMPT.contains("expert workflow analyst"));
        assert!(MODIFIER_SYSTEM_PROMPT.contains("expert workflow modifier"));
        assert!(MODIFIER_SYSTEM_PROMPT.contains("JSON only"));
    }

    #[test]
    fn test_analysis_request_puts_document_before_prompt() {
        let message = build_analysis_request("{\"a\":1}", "  why?  ");
        let doc_pos = message.find("{\"a\":1}").unwrap();
        let prompt_pos = message.find("why?").unwrap();
        assert!(doc_pos < prompt_pos);
        assert!(message.ends_with("why?"));
    }

    #[test]
    fn test_modification_request_contains_document_and_request() {
        let message = build_modification_request("[1,2]", "append 3");
        assert!(message.contains("[1,2]"));
        assert!(message.contains("append 3"));
        assert!(message.contains("JSON only"));
    }
}
