use crate::structs::analysis_sections::AnalysisSections;

const RISK_ALIASES: &[&str] = &["risk explanation", "risks", "risk"];
const ATTACK_ALIASES: &[&str] = &["attack scenarios", "attack scenario", "attack"];
const FIX_ALIASES: &[&str] = &["secure fixes", "secure fix", "remediation", "mitigation", "fix"];
const SECTION_ORDER: [&[&str]; 3] = [RISK_ALIASES, ATTACK_ALIASES, FIX_ALIASES];

const DECORATION: &[char] = &['#', '*', '_', '>', '-', '+', '`', ' ', '\t'];
const EMPHASIS: &[char] = &['*', '_', '`', ' ', '\t'];
const NUMBERING_SUFFIX: &[char] = &['.', ')'];

/// A heading found in the answer: its line and any text after the colon.
#[derive(Debug)]
struct Heading {
    line: usize,
    inline: String,
}

/// Best-effort splitter for model answers into the three requested sections.
///
/// Headings are matched in order (risk, attack, fix); markdown emphasis, `#`
/// prefixes and list numbering around them are ignored. Anything that does not
/// yield three non-empty sections is reported as unstructured (`None`).
pub struct AnalysisParser {
    lines: Vec<String>,
    current: usize,
}

impl AnalysisParser {
    pub fn new(input: &str) -> Self {
        Self {
            lines: input.lines().map(ToString::to_string).collect(),
            current: 0,
        }
    }

    pub fn parse(&mut self) -> Option<AnalysisSections> {
        let mut headings = Vec::with_capacity(SECTION_ORDER.len());
        for aliases in SECTION_ORDER {
            let heading = self.find_heading(aliases)?;
            self.current = heading.line + 1;
            headings.push(heading);
        }

        let mut bodies = Vec::with_capacity(headings.len());
        for (i, heading) in headings.iter().enumerate() {
            let end = headings.get(i + 1).map_or(self.lines.len(), |next| next.line);
            let body = self.section_body(heading, end);
            if body.is_empty() {
                log::debug!("🧩 Section {} is empty, treating answer as unstructured", i + 1);
                return None;
            }
            bodies.push(body);
        }

        let secure_fix = bodies.pop()?;
        let attack_scenario = bodies.pop()?;
        let risk_explanation = bodies.pop()?;
        Some(AnalysisSections {
            risk_explanation,
            attack_scenario,
            secure_fix,
        })
    }

    fn find_heading(&self, aliases: &[&str]) -> Option<Heading> {
        (self.current..self.lines.len()).find_map(|line| {
            Self::match_heading(&self.lines[line], aliases).map(|inline| Heading { line, inline })
        })
    }

    fn section_body(&self, heading: &Heading, end: usize) -> String {
        let mut body: Vec<&str> = Vec::new();
        if !heading.inline.is_empty() {
            body.push(&heading.inline);
        }
        body.extend(self.lines[heading.line + 1..end].iter().map(String::as_str));
        body.join("\n").trim().to_string()
    }

    /// Returns the inline content if `line` is a heading for one of `aliases`.
    fn match_heading(line: &str, aliases: &[&str]) -> Option<String> {
        let stripped = Self::strip_numbering(line.trim().trim_start_matches(DECORATION))
            .trim_start_matches(EMPHASIS);

        aliases.iter().find_map(|alias| {
            let prefix = stripped.get(..alias.len())?;
            if !prefix.eq_ignore_ascii_case(alias) {
                return None;
            }

            let rest = stripped[alias.len()..].trim_start_matches(EMPHASIS);
            if rest.is_empty() {
                return Some(String::new());
            }

            // a dash only separates when followed by a space, so "Risk-wise" stays prose
            let inline = rest.strip_prefix(':').or_else(|| {
                rest.strip_prefix('-').filter(|after| after.is_empty() || after.starts_with(char::is_whitespace))
            })?;
            Some(inline.trim_matches(EMPHASIS).trim().to_string())
        })
    }

    fn strip_numbering(text: &str) -> &str {
        let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return text;
        }
        text[digits..]
            .strip_prefix(NUMBERING_SUFFIX)
            .map_or(text, str::trim_start)
    }
}
