//! Markdown export of a rendered report. Offered as a download; never written to disk.

use crate::adapters::ui::web::views::{ReportView, SectionView};

/// Render the report view as a Markdown document.
pub fn render(view: &ReportView) -> String {
    let mut md = String::new();

    md.push_str("# Solar Rooftop Assessment\n\n");
    let meta: Vec<String> = view
        .meta
        .iter()
        .map(|r| format!("**{}:** {}", r.label, r.value))
        .collect();
    md.push_str(&meta.join(" | "));
    md.push_str("\n\n---\n\n");

    if !view.metrics.is_empty() {
        md.push_str("## Key Metrics\n\n");
        md.push_str("| Metric | Value |\n|---|---|\n");
        for m in &view.metrics {
            md.push_str(&format!("| {} | {} |\n", m.label, m.value));
        }
        md.push('\n');
    }

    for section in &view.sections {
        push_section(&mut md, section);
    }

    if let Some(verdict) = &view.verdict {
        md.push_str("## Recommendations\n\n");
        md.push_str(&format!("> {}\n\n", verdict.text));
    } else if !view.lists.is_empty() {
        md.push_str("## Recommendations\n\n");
    }
    for list in &view.lists {
        md.push_str(&format!("**{}:**\n\n", list.title));
        for item in &list.items {
            md.push_str(&format!("- {}\n", item));
        }
        md.push('\n');
    }

    if view.fallback_note.is_some() {
        md.push_str("## Response\n\n");
        md.push_str(&view.raw_text);
        md.push_str("\n\n");
    }

    md.push_str("---\n");
    md.push_str("*Generated by solar-assist. Figures are model estimates, not a quote.*\n");
    md
}

fn push_section(md: &mut String, section: &SectionView) {
    md.push_str(&format!("## {}\n\n", section.title));
    for r in &section.rows {
        md.push_str(&format!("- **{}:** {}\n", r.label, r.value));
    }
    if !section.rows.is_empty() {
        md.push('\n');
    }
    if !section.items.is_empty() {
        if let Some(title) = &section.items_title {
            md.push_str(&format!("**{}:**\n\n", title));
        }
        for item in &section.items {
            md.push_str(&format!("- {}\n", item));
        }
        md.push('\n');
    }
    if let Some(body) = &section.body {
        md.push_str(body);
        md.push_str("\n\n");
    }
}
