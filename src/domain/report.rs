//! Report shapes recovered from the model's free text.
//!
//! The model is asked for a JSON document but nothing about its answer is a contract:
//! every field is optional and scalar fields accept numbers, numeric strings or text.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Structured answer matching the JSON layout requested in the prompt.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolarReport {
    #[serde(deserialize_with = "lenient_section")]
    pub roof_analysis: Option<RoofAnalysis>,
    #[serde(deserialize_with = "lenient_section")]
    pub solar_potential: Option<SolarPotential>,
    #[serde(deserialize_with = "lenient_section")]
    pub financial_analysis: Option<FinancialAnalysis>,
    #[serde(deserialize_with = "lenient_section")]
    pub installation_considerations: Option<InstallationConsiderations>,
    #[serde(deserialize_with = "lenient_section")]
    pub recommendations: Option<Recommendations>,
}

impl SolarReport {
    /// True when none of the expected sections were found.
    pub fn is_empty(&self) -> bool {
        self.roof_analysis.is_none()
            && self.solar_potential.is_none()
            && self.financial_analysis.is_none()
            && self.installation_considerations.is_none()
            && self.recommendations.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RoofAnalysis {
    #[serde(default, deserialize_with = "lenient_text")]
    pub roof_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub roof_area_sqft: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub usable_area_sqft: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub orientation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tilt_angle: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub shading_assessment: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub obstacles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SolarPotential {
    #[serde(default, deserialize_with = "lenient_number")]
    pub recommended_system_size_kw: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub estimated_panels_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub annual_energy_production_kwh: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub capacity_factor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub optimal_panel_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinancialAnalysis {
    #[serde(default, deserialize_with = "lenient_number")]
    pub estimated_system_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cost_per_watt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub annual_savings: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub payback_period_years: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub roi_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub net_present_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstallationConsiderations {
    #[serde(default, deserialize_with = "lenient_text")]
    pub structural_assessment: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub electrical_requirements: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub permit_complexity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub installation_timeline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Recommendations {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub proceed_with_installation: Option<bool>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub priority_improvements: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub alternative_solutions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub next_steps: Vec<String>,
}

/// A labelled block of prose split out of a non-JSON answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    pub body: String,
}

/// What the renderer could make of the answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReport {
    Structured(SolarReport),
    Sections(Vec<ReportSection>),
    Raw(String),
}

/// A section that is not a JSON object is dropped instead of failing the whole report.
fn lenient_section<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(text_from_value))
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" => Some(true),
            "false" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(text_from_value).collect(),
        Some(other) => text_from_value(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Accepts `12.5`, `"12.5"`, `"$25,000"`, `"18%"`. Ranges and prose yield `None`.
fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
                .collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mistyped_section_keeps_the_others() {
        let json = r#"{
            "roof_analysis": "Gable roof",
            "solar_potential": {"recommended_system_size_kw": 6.4},
            "financial_analysis": {"annual_savings": 1900},
            "recommendations": ["get quotes"]
        }"#;
        let report: SolarReport = serde_json::from_str(json).unwrap();

        assert!(report.roof_analysis.is_none());
        assert!(report.recommendations.is_none());
        assert_eq!(
            report.solar_potential.unwrap().recommended_system_size_kw,
            Some(6.4)
        );
        assert_eq!(report.financial_analysis.unwrap().annual_savings, Some(1900.0));
    }

    #[test]
    fn test_lenient_fields() {
        let json = r#"{
            "solar_potential": {"recommended_system_size_kw": "7.2", "estimated_panels_count": 18},
            "financial_analysis": {"estimated_system_cost": "$21,600", "roi_percentage": "11%"},
            "roof_analysis": {"tilt_angle": 25, "obstacles": "chimney"},
            "recommendations": {"proceed_with_installation": "yes", "next_steps": ["Get quotes", 3]}
        }"#;
        let report: SolarReport = serde_json::from_str(json).unwrap();

        let solar = report.solar_potential.unwrap();
        assert_eq!(solar.recommended_system_size_kw, Some(7.2));
        assert_eq!(solar.estimated_panels_count, Some(18.0));
        let fin = report.financial_analysis.unwrap();
        assert_eq!(fin.estimated_system_cost, Some(21_600.0));
        assert_eq!(fin.roi_percentage, Some(11.0));
        let roof = report.roof_analysis.unwrap();
        assert_eq!(roof.tilt_angle.as_deref(), Some("25"));
        assert_eq!(roof.obstacles, vec!["chimney".to_string()]);
        let rec = report.recommendations.unwrap();
        assert_eq!(rec.proceed_with_installation, Some(true));
        assert_eq!(rec.next_steps, vec!["Get quotes".to_string(), "3".to_string()]);
        assert!(report.installation_considerations.is_none());
    }

    #[test]
    fn test_prose_numbers_are_dropped() {
        let json = r#"{"financial_analysis": {"payback_period_years": "8-10 years", "net_present_value": null}}"#;
        let report: SolarReport = serde_json::from_str(json).unwrap();
        let fin = report.financial_analysis.unwrap();
        assert_eq!(fin.payback_period_years, None);
        assert_eq!(fin.net_present_value, None);
    }

    #[test]
    fn test_unrelated_json_is_empty() {
        let report: SolarReport = serde_json::from_str(r#"{"answer": 42}"#).unwrap();
        assert!(report.is_empty());
    }
}
