use super::body::{ideal_weight, Gender};
use super::MacroTotals;

/// Share of base calories assigned to each macronutrient and the energy
/// density used to convert that share into grams.
const PROTEIN_SHARE: f64 = 0.14;
const PROTEIN_KCAL_PER_G: f64 = 3.8;
const FAT_SHARE: f64 = 0.3;
const FAT_KCAL_PER_G: f64 = 9.3;
const CARB_SHARE: f64 = 0.56;
const CARB_KCAL_PER_G: f64 = 4.1;

/// Uplift applied to base calories before the activity multiplier.
const THERMIC_UPLIFT: f64 = 0.1;

/// Daily water in millilitres per kilogram of measured body weight.
const WATER_ML_PER_KG: f64 = 30.0;

/// Mean of four BMR-style estimates (Mifflin-St Jeor, a flat per-kilogram
/// rate, a height-free linear form, and Harris-Benedict), all computed
/// against the ideal rather than the measured weight.
pub fn base_calories(gender: Gender, age: f64, height_cm: f64, ideal_weight_kg: f64) -> f64 {
    let estimates = match gender {
        Gender::Male => [
            10.0 * ideal_weight_kg + 6.25 * height_cm - 5.0 * age + 5.0,
            ideal_weight_kg * 24.0,
            21.3 * ideal_weight_kg + 370.0,
            66.5 + 13.7 * ideal_weight_kg + 5.0 * height_cm - 6.8 * age,
        ],
        Gender::Female => [
            10.0 * ideal_weight_kg + 6.25 * height_cm - 5.0 * age - 161.0,
            ideal_weight_kg * 24.0,
            21.3 * ideal_weight_kg + 370.0,
            447.6 + 9.2 * ideal_weight_kg + 3.1 * height_cm - 4.3 * age,
        ],
    };
    estimates.iter().sum::<f64>() / estimates.len() as f64
}

/// Daily targets for a profile snapshot. Calories get the thermic uplift and
/// the activity multiplier; macro grams are split from the unscaled base;
/// water scales with the measured weight.
pub fn standard_targets(
    gender: Gender,
    age: f64,
    height_cm: f64,
    wrist_cm: f64,
    weight_kg: f64,
    activity: f64,
) -> MacroTotals {
    let ideal = ideal_weight(gender, height_cm, wrist_cm);
    let base = base_calories(gender, age, height_cm, ideal);
    let total = (base + base * THERMIC_UPLIFT) * activity;

    MacroTotals {
        calories: total.round() as i64,
        proteins: (base * PROTEIN_SHARE / PROTEIN_KCAL_PER_G).round() as i64,
        fats: (base * FAT_SHARE / FAT_KCAL_PER_G).round() as i64,
        carbohydrates: (base * CARB_SHARE / CARB_KCAL_PER_G).round() as i64,
        water: (weight_kg * WATER_ML_PER_KG).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_reference_scenario() {
        // 30 years, 175 cm, wrist 16 cm, 80 kg, minimal activity.
        let totals = standard_targets(Gender::Male, 30.0, 175.0, 16.0, 80.0, 1.2);
        assert_eq!(
            totals,
            MacroTotals {
                calories: 2173,
                proteins: 61,
                fats: 53,
                carbohydrates: 225,
                water: 2400,
            }
        );
    }

    #[test]
    fn female_reference_scenario() {
        // 25 years, 165 cm, wrist 16 cm, 80 kg, minimal activity.
        let totals = standard_targets(Gender::Female, 25.0, 165.0, 16.0, 80.0, 1.2);
        assert_eq!(
            totals,
            MacroTotals {
                calories: 1843,
                proteins: 51,
                fats: 45,
                carbohydrates: 191,
                water: 2400,
            }
        );
    }

    #[test]
    fn base_is_the_mean_of_the_four_estimates() {
        let ideal = ideal_weight(Gender::Male, 175.0, 16.0);
        assert!((ideal - 65.625).abs() < 1e-9);
        let base = base_calories(Gender::Male, 30.0, 175.0, ideal);
        assert!((base - 1646.09375).abs() < 1e-9);
    }

    #[test]
    fn activity_scales_calories_but_not_macros() {
        let low = standard_targets(Gender::Male, 30.0, 175.0, 16.0, 80.0, 1.2);
        let high = standard_targets(Gender::Male, 30.0, 175.0, 16.0, 80.0, 1.9);
        assert!(high.calories > low.calories);
        assert_eq!(high.proteins, low.proteins);
        assert_eq!(high.fats, low.fats);
        assert_eq!(high.carbohydrates, low.carbohydrates);
        assert_eq!(high.water, low.water);
    }

    #[test]
    fn water_follows_measured_weight() {
        let totals = standard_targets(Gender::Female, 25.0, 165.0, 16.0, 62.5, 1.2);
        assert_eq!(totals.water, 1875);
    }
}
