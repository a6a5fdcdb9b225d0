pub mod security_issue_prompt;
