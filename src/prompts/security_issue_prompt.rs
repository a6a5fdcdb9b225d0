/// Slot replaced verbatim with the issue description.
pub const ISSUE_PLACEHOLDER: &str = "{{ISSUE}}";

pub const SECURITY_ISSUE_PROMPT: &str = r#"You are an AI Security Copilot.

Analyze this security issue:
{{ISSUE}}

Answer with exactly these three sections, in this order, each starting with its heading on its own line:

Risk Explanation:
Explain why the issue is dangerous and what could be exposed.

Attack Scenario:
Describe step by step how an attacker could exploit it.

Secure Fix:
Give a concrete remediation, with a short code or configuration example where relevant.
"#;

/// Build the prompt for one issue. The description is inserted as-is, so equal
/// descriptions always give equal prompts.
pub fn build_security_prompt(description: &str) -> String {
    SECURITY_ISSUE_PROMPT.replacen(ISSUE_PLACEHOLDER, description, 1)
}
