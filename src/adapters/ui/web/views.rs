//! Page templates and the view models they render.
//!
//! All formatting happens here so templates only loop and print.

use crate::adapters::ai::budget_label;
use crate::adapters::ui::markdown;
use crate::domain::report::{
    FinancialAnalysis, InstallationConsiderations, Recommendations, RoofAnalysis, SolarPotential,
};
use crate::domain::{AnalysisResult, DomainError, ErrorKind, ParsedReport, SolarReport};
use crate::shared::format::{group_thousands, money, title_case};
use crate::usecases::SubmissionForm;
use askama::Template;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

const DEFAULT_BUDGET_MIN: &str = "15000";
const DEFAULT_BUDGET_MAX: &str = "25000";
const NOT_AVAILABLE: &str = "n/a";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub form: FormState,
    pub model: String,
    pub notice: Option<NoticeView>,
    pub report: Option<ReportView>,
}

/// What the form shows. Rebuilt from the last submission so a failed click can be retried.
#[derive(Debug, Clone)]
pub struct FormState {
    pub api_key: String,
    pub location: String,
    pub budget_min: String,
    pub budget_max: String,
    /// A fallback key is configured; the key field becomes optional.
    pub env_key_loaded: bool,
}

impl FormState {
    pub fn blank(env_key_loaded: bool) -> Self {
        Self {
            api_key: String::new(),
            location: String::new(),
            budget_min: DEFAULT_BUDGET_MIN.to_string(),
            budget_max: DEFAULT_BUDGET_MAX.to_string(),
            env_key_loaded,
        }
    }

    pub fn from_submission(form: &SubmissionForm, env_key_loaded: bool) -> Self {
        Self {
            api_key: form.api_key.clone(),
            location: form.location.clone(),
            budget_min: form.budget_min.clone(),
            budget_max: form.budget_max.clone(),
            env_key_loaded,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoticeView {
    pub title: String,
    pub message: String,
    pub hint: Option<String>,
    /// Body shown verbatim when the provider sent something unreadable.
    pub raw: Option<String>,
}

impl NoticeView {
    pub fn from_error(err: &DomainError) -> Self {
        let title = match err.kind() {
            ErrorKind::Input => "Please check the form",
            ErrorKind::Transport => "Analysis failed",
            ErrorKind::MalformedResponse => "Unexpected response from the AI provider",
        };
        let raw = match err {
            DomainError::MalformedResponse { raw, .. } if !raw.is_empty() => Some(raw.clone()),
            _ => None,
        };
        Self {
            title: title.to_string(),
            message: err.to_string(),
            hint: err.hint().map(str::to_string),
            raw,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowView {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct SectionView {
    pub title: String,
    pub rows: Vec<RowView>,
    pub items_title: Option<String>,
    pub items: Vec<String>,
    pub body: Option<String>,
}

impl SectionView {
    fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.items.is_empty() && self.body.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct VerdictView {
    pub positive: bool,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ReportView {
    pub meta: Vec<RowView>,
    pub metrics: Vec<RowView>,
    pub sections: Vec<SectionView>,
    pub verdict: Option<VerdictView>,
    pub lists: Vec<SectionView>,
    /// Set when nothing could be structured; the raw text is then the report.
    pub fallback_note: Option<String>,
    pub raw_text: String,
    pub markdown_href: String,
    pub markdown_file: String,
}

impl ReportView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let analyzed = DateTime::<Utc>::from_timestamp(result.analyzed_at, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let mut view = Self {
            meta: vec![
                row("Location", result.location.clone()),
                row("Budget", budget_label(&result.budget)),
                row("Model", result.model.clone()),
                row("Analyzed", analyzed),
            ],
            metrics: Vec::new(),
            sections: Vec::new(),
            verdict: None,
            lists: Vec::new(),
            fallback_note: None,
            raw_text: result.raw_text.clone(),
            markdown_href: String::new(),
            markdown_file: format!("solar-report-{}.md", result.analyzed_at),
        };

        match &result.report {
            ParsedReport::Structured(report) => view.fill_structured(report),
            ParsedReport::Sections(sections) => {
                view.sections = sections
                    .iter()
                    .map(|s| SectionView {
                        title: s.title.clone(),
                        rows: Vec::new(),
                        items_title: None,
                        items: Vec::new(),
                        body: (!s.body.is_empty()).then(|| s.body.clone()),
                    })
                    .collect();
            }
            ParsedReport::Raw(_) => {
                view.fallback_note = Some(
                    "The response did not follow the expected structure, so it is shown as received."
                        .to_string(),
                );
            }
        }

        let md = markdown::render(&view);
        view.markdown_href = format!(
            "data:text/markdown;charset=utf-8;base64,{}",
            STANDARD.encode(md.as_bytes())
        );
        view
    }

    fn fill_structured(&mut self, report: &SolarReport) {
        let solar = report.solar_potential.as_ref();
        let fin = report.financial_analysis.as_ref();
        self.metrics = vec![
            row(
                "System Size",
                or_na(solar.and_then(|s| s.recommended_system_size_kw), |v| {
                    format!("{:.1} kW", v)
                }),
            ),
            row(
                "Annual Production",
                or_na(solar.and_then(|s| s.annual_energy_production_kwh), |v| {
                    format!("{} kWh", group_thousands(v, 0))
                }),
            ),
            row(
                "Payback Period",
                or_na(fin.and_then(|f| f.payback_period_years), |v| {
                    format!("{:.1} years", v)
                }),
            ),
            row(
                "ROI",
                or_na(fin.and_then(|f| f.roi_percentage), |v| format!("{:.1}%", v)),
            ),
        ];

        self.sections = [
            report.roof_analysis.as_ref().map(roof_section),
            solar.map(solar_section),
            fin.map(financial_section),
            report
                .installation_considerations
                .as_ref()
                .map(installation_section),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        if let Some(rec) = &report.recommendations {
            self.verdict = verdict(rec);
            self.lists = recommendation_lists(rec);
        }
    }
}

impl IndexPage {
    pub fn new(form: FormState, model: impl Into<String>) -> Self {
        Self {
            form,
            model: model.into(),
            notice: None,
            report: None,
        }
    }

    pub fn with_notice(mut self, notice: NoticeView) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn with_report(mut self, report: ReportView) -> Self {
        self.report = Some(report);
        self
    }
}

fn row(label: &str, value: String) -> RowView {
    RowView {
        label: label.to_string(),
        value,
    }
}

fn or_na(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn push_text(rows: &mut Vec<RowView>, label: &str, value: Option<&String>, fmt: fn(&str) -> String) {
    if let Some(v) = value {
        rows.push(row(label, fmt(v)));
    }
}

fn push_number(rows: &mut Vec<RowView>, label: &str, value: Option<f64>, fmt: impl Fn(f64) -> String) {
    if let Some(v) = value {
        rows.push(row(label, fmt(v)));
    }
}

fn as_is(s: &str) -> String {
    s.to_string()
}

fn degrees(s: &str) -> String {
    if s.parse::<f64>().is_ok() {
        format!("{}°", s)
    } else {
        s.to_string()
    }
}

fn roof_section(roof: &RoofAnalysis) -> SectionView {
    let mut rows = Vec::new();
    push_text(&mut rows, "Roof Type", roof.roof_type.as_ref(), title_case);
    push_number(&mut rows, "Total Area", roof.roof_area_sqft, |v| {
        format!("{} sq ft", group_thousands(v, 0))
    });
    push_number(&mut rows, "Usable Area", roof.usable_area_sqft, |v| {
        format!("{} sq ft", group_thousands(v, 0))
    });
    push_text(&mut rows, "Orientation", roof.orientation.as_ref(), as_is);
    push_text(&mut rows, "Tilt Angle", roof.tilt_angle.as_ref(), degrees);
    push_text(&mut rows, "Shading", roof.shading_assessment.as_ref(), title_case);
    SectionView {
        title: "Roof Analysis".to_string(),
        rows,
        items_title: Some("Obstacles Identified".to_string()),
        items: roof.obstacles.clone(),
        body: None,
    }
}

fn solar_section(solar: &SolarPotential) -> SectionView {
    let mut rows = Vec::new();
    push_number(&mut rows, "Recommended System Size", solar.recommended_system_size_kw, |v| {
        format!("{:.1} kW", v)
    });
    push_number(&mut rows, "Number of Panels", solar.estimated_panels_count, |v| {
        format!("{:.0}", v)
    });
    push_text(&mut rows, "Panel Type", solar.optimal_panel_type.as_ref(), title_case);
    push_number(&mut rows, "Annual Production", solar.annual_energy_production_kwh, |v| {
        format!("{} kWh", group_thousands(v, 0))
    });
    push_number(&mut rows, "Capacity Factor", solar.capacity_factor, |v| {
        format!("{:.1}%", v)
    });
    SectionView {
        title: "Solar Potential".to_string(),
        rows,
        items_title: None,
        items: Vec::new(),
        body: None,
    }
}

fn financial_section(fin: &FinancialAnalysis) -> SectionView {
    let mut rows = Vec::new();
    push_number(&mut rows, "System Cost", fin.estimated_system_cost, |v| money(v, 0));
    push_number(&mut rows, "Cost per Watt", fin.cost_per_watt, |v| money(v, 2));
    push_number(&mut rows, "Annual Savings", fin.annual_savings, |v| money(v, 0));
    push_number(&mut rows, "Payback Period", fin.payback_period_years, |v| {
        format!("{:.1} years", v)
    });
    push_number(&mut rows, "ROI", fin.roi_percentage, |v| format!("{:.1}%", v));
    push_number(&mut rows, "Net Present Value", fin.net_present_value, |v| money(v, 0));
    SectionView {
        title: "Financial Analysis".to_string(),
        rows,
        items_title: None,
        items: Vec::new(),
        body: None,
    }
}

fn installation_section(inst: &InstallationConsiderations) -> SectionView {
    let mut rows = Vec::new();
    push_text(&mut rows, "Structural Assessment", inst.structural_assessment.as_ref(), title_case);
    push_text(&mut rows, "Electrical Requirements", inst.electrical_requirements.as_ref(), as_is);
    push_text(&mut rows, "Permit Complexity", inst.permit_complexity.as_ref(), title_case);
    push_text(&mut rows, "Installation Timeline", inst.installation_timeline.as_ref(), as_is);
    SectionView {
        title: "Installation".to_string(),
        rows,
        items_title: None,
        items: Vec::new(),
        body: None,
    }
}

fn verdict(rec: &Recommendations) -> Option<VerdictView> {
    rec.proceed_with_installation.map(|proceed| VerdictView {
        positive: proceed,
        text: if proceed {
            "Recommended: this property is suitable for solar installation".to_string()
        } else {
            "Caution: additional evaluation recommended before proceeding".to_string()
        },
    })
}

fn recommendation_lists(rec: &Recommendations) -> Vec<SectionView> {
    [
        ("Priority Improvements", &rec.priority_improvements),
        ("Alternative Solutions", &rec.alternative_solutions),
        ("Next Steps", &rec.next_steps),
    ]
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(title, items)| SectionView {
        title: title.to_string(),
        rows: Vec::new(),
        items_title: None,
        items: items.clone(),
        body: None,
    })
    .collect()
}
