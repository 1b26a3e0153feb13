use sqlx::FromRow;

use super::MacroTotals;

/// One eaten portion: the food's per-gram values with the portion weight.
/// Rows come either from meals logged directly or fanned out from the
/// composition of an eaten recipe.
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct PortionMacros {
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub calories: f64,
    pub water: f64,
    pub weight_g: f64,
}

/// Aggregates one day's intake. Food-borne water is summed together with the
/// standalone water entries (millilitres); every total is integer-rounded.
pub fn sum_intake(portions: &[PortionMacros], water_ml: i64) -> MacroTotals {
    let mut proteins = 0.0;
    let mut fats = 0.0;
    let mut carbohydrates = 0.0;
    let mut calories = 0.0;
    let mut food_water = 0.0;

    for portion in portions {
        proteins += portion.proteins * portion.weight_g;
        fats += portion.fats * portion.weight_g;
        carbohydrates += portion.carbohydrates * portion.weight_g;
        calories += portion.calories * portion.weight_g;
        food_water += portion.water * portion.weight_g;
    }

    MacroTotals {
        calories: calories.round() as i64,
        proteins: proteins.round() as i64,
        fats: fats.round() as i64,
        carbohydrates: carbohydrates.round() as i64,
        water: (food_water + water_ml as f64).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken(weight_g: f64) -> PortionMacros {
        PortionMacros {
            proteins: 0.182,
            fats: 0.184,
            carbohydrates: 0.0,
            calories: 2.38,
            water: 0.626,
            weight_g,
        }
    }

    fn wheat_loaf(weight_g: f64) -> PortionMacros {
        PortionMacros {
            proteins: 0.077,
            fats: 0.03,
            carbohydrates: 0.501,
            calories: 2.59,
            water: 0.341,
            weight_g,
        }
    }

    #[test]
    fn sums_portions_and_standalone_water() {
        let portions = [chicken(100.0), wheat_loaf(100.0)];
        let totals = sum_intake(&portions, 100);
        assert_eq!(
            totals,
            MacroTotals {
                calories: 497,
                proteins: 26,
                fats: 21,
                carbohydrates: 50,
                water: 197,
            }
        );
    }

    #[test]
    fn empty_day_is_all_zeroes() {
        let totals = sum_intake(&[], 0);
        assert_eq!(
            totals,
            MacroTotals {
                calories: 0,
                proteins: 0,
                fats: 0,
                carbohydrates: 0,
                water: 0,
            }
        );
    }

    #[test]
    fn water_only_day_counts_just_water() {
        let totals = sum_intake(&[], 500);
        assert_eq!(totals.water, 500);
        assert_eq!(totals.calories, 0);
    }

    #[test]
    fn repeated_portions_accumulate() {
        // The same food eaten twice counts twice.
        let portions = [chicken(100.0), chicken(100.0)];
        let totals = sum_intake(&portions, 0);
        assert_eq!(totals.calories, 476);
        assert_eq!(totals.proteins, 36);
    }
}
