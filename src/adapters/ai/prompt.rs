//! Prompt for the rooftop assessment. The JSON layout here is what `SolarReport` parses.

use crate::domain::BudgetRange;
use crate::shared::format::money;

const RESPONSE_LAYOUT: &str = r#"{
    "roof_analysis": {
        "roof_type": "flat/pitched/hip/gable",
        "roof_area_sqft": estimated_total_area,
        "usable_area_sqft": area_suitable_for_panels,
        "orientation": "primary_roof_direction",
        "tilt_angle": estimated_degrees,
        "shading_assessment": "minimal/moderate/significant",
        "obstacles": ["list", "of", "obstacles"]
    },
    "solar_potential": {
        "recommended_system_size_kw": calculated_size,
        "estimated_panels_count": number_of_panels,
        "annual_energy_production_kwh": estimated_production,
        "capacity_factor": percentage,
        "optimal_panel_type": "monocrystalline/polycrystalline/thin_film"
    },
    "financial_analysis": {
        "estimated_system_cost": total_cost,
        "cost_per_watt": cost_per_watt,
        "annual_savings": estimated_annual_savings,
        "payback_period_years": calculated_payback,
        "roi_percentage": return_on_investment,
        "net_present_value": npv_calculation
    },
    "installation_considerations": {
        "structural_assessment": "suitable/needs_evaluation/not_suitable",
        "electrical_requirements": "description",
        "permit_complexity": "simple/moderate/complex",
        "installation_timeline": "estimated_weeks"
    },
    "recommendations": {
        "proceed_with_installation": true_or_false,
        "priority_improvements": ["list", "of", "suggestions"],
        "alternative_solutions": ["if", "applicable"],
        "next_steps": ["recommended", "actions"]
    }
}"#;

/// `$15,000.00` for a single amount, `$15,000.00 - $25,000.00` for a range.
pub fn budget_label(budget: &BudgetRange) -> String {
    if budget.min() == budget.max() {
        money(budget.min(), 2)
    } else {
        format!("{} - {}", money(budget.min(), 2), money(budget.max(), 2))
    }
}

/// Build the user prompt sent with the image.
pub fn rooftop_prompt(location: &str, budget: &BudgetRange) -> String {
    format!(
        "You are an expert solar energy consultant analyzing a rooftop for solar panel installation potential.

Location: {location}
Budget: {budget}

Analyze this satellite/aerial image and provide a comprehensive assessment in the following JSON format:

{layout}

Respond with the JSON document only.
Base your analysis on visible roof characteristics, estimated dimensions, shading from trees/buildings, \
roof condition, and typical solar installation parameters for the given location and budget.",
        location = location,
        budget = budget_label(budget),
        layout = RESPONSE_LAYOUT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_interpolates_location_and_budget() {
        let budget = BudgetRange::new(15_000.0, 25_000.0).unwrap();
        let prompt = rooftop_prompt("San Francisco, CA", &budget);
        assert!(prompt.contains("Location: San Francisco, CA\n"));
        assert!(prompt.contains("Budget: $15,000.00 - $25,000.00\n"));
        assert!(prompt.contains("\"financial_analysis\""));
    }

    #[test]
    fn test_single_amount_budget() {
        let budget = BudgetRange::new(25_000.0, 25_000.0).unwrap();
        assert_eq!(budget_label(&budget), "$25,000.00");
    }
}
