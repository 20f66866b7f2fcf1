//! Best-effort interpretation of the model's answer.
//!
//! Order of attempts: JSON document → labelled prose sections → raw text.
//! Never fails; the worst case is `ParsedReport::Raw`.

use crate::domain::{ParsedReport, ReportSection, SolarReport};

/// Heading keywords that mark a prose section as part of the expected report.
const SECTION_KEYWORDS: &[&str] = &[
    "roof",
    "solar",
    "financ",
    "cost",
    "saving",
    "install",
    "recommend",
    "next step",
    "summary",
];

/// Longest line still treated as a heading.
const MAX_HEADING_LEN: usize = 80;

pub fn parse_report(text: &str) -> ParsedReport {
    if let Some(report) = parse_structured(text) {
        return ParsedReport::Structured(report);
    }
    let sections = split_sections(text);
    if sections.len() >= 2 {
        return ParsedReport::Sections(sections);
    }
    ParsedReport::Raw(text.to_string())
}

fn parse_structured(text: &str) -> Option<SolarReport> {
    let json = extract_json(text)?;
    let report: SolarReport = serde_json::from_str(json).ok()?;
    (!report.is_empty()).then_some(report)
}

/// Strip a Markdown code fence, then take the outermost `{ … }` span.
///
/// Models often wrap JSON in ```json fences or add a sentence before it.
pub fn extract_json(raw_text: &str) -> Option<&str> {
    let mut trimmed = raw_text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        trimmed = match rest.rfind("```") {
            Some(end_idx) => rest[..end_idx].trim(),
            None => rest.trim(),
        };
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (start < end).then(|| &trimmed[start..=end])
}

/// Split prose on recognised heading lines. Text before the first heading becomes "Overview".
fn split_sections(text: &str) -> Vec<ReportSection> {
    let mut sections = Vec::new();
    let mut title: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();
    let mut headings = 0;

    for line in text.lines() {
        if let Some(heading) = heading_title(line) {
            push_section(&mut sections, title.take(), &body);
            body.clear();
            title = Some(heading);
            headings += 1;
        } else {
            body.push(line);
        }
    }
    push_section(&mut sections, title, &body);

    // A lone heading is not structure.
    if headings < 2 {
        return Vec::new();
    }
    sections
}

fn push_section(sections: &mut Vec<ReportSection>, title: Option<String>, body: &[&str]) {
    let text = body.join("\n").trim().to_string();
    match title {
        Some(title) => sections.push(ReportSection { title, body: text }),
        None if !text.is_empty() => sections.push(ReportSection {
            title: "Overview".to_string(),
            body: text,
        }),
        None => {}
    }
}

/// Recognise `## Heading`, `**Heading**` and `Heading:` lines.
fn heading_title(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > MAX_HEADING_LEN {
        return None;
    }

    if line.starts_with('#') {
        let title = clean_title(line.trim_start_matches('#'));
        return (!title.is_empty()).then_some(title);
    }

    let candidate = if line.starts_with("**") && line.ends_with("**") && line.len() > 4 {
        &line[2..line.len() - 2]
    } else if let Some(stripped) = line.strip_suffix(':') {
        stripped
    } else {
        return None;
    };

    let title = clean_title(candidate);
    let lower = title.to_lowercase();
    let recognised = SECTION_KEYWORDS.iter().any(|k| lower.contains(k));
    (recognised && !title.is_empty()).then_some(title)
}

fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_matches('*')
        .trim_end_matches(':')
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
        .trim()
        .to_string()
}
