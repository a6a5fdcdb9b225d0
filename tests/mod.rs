mod support;

mod gemini_tests;
mod orchestrator_tests;
