use tracing::debug;

use super::MacroTotals;
use crate::error::ApiError;
use crate::products::repo::ProductRow;

/// Window growth per widening pass.
const TOLERANCE_STEP: f64 = 0.1;
/// Hard cap on widening passes.
const MAX_WIDENINGS: usize = 100;
/// Stop widening once this many candidates fit.
const WANTED_MATCHES: usize = 4;
/// The day must contain at least this many distinct foods.
const MIN_DISTINCT_FOODS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    Proteins,
    Fats,
    Carbohydrates,
}

/// Outcome of the daily comparison: foods to add when every macro is short,
/// or the single worst source to cut when some macro is exceeded.
#[derive(Debug)]
pub enum Recommendation {
    Include(Vec<ProductRow>),
    Exclude(Vec<ProductRow>),
}

pub fn ensure_enough_distinct(eaten: &[ProductRow]) -> Result<(), ApiError> {
    if eaten.len() < MIN_DISTINCT_FOODS {
        return Err(ApiError::InsufficientData(
            "not enough distinct foods logged today for a recommendation".into(),
        ));
    }
    Ok(())
}

/// Per-macro gaps when the day is short on all three macros, normalized by
/// the smallest gap and rounded to two decimals. `None` as soon as any macro
/// has been met or exceeded.
pub fn deficit_fingerprint(target: &MacroTotals, current: &MacroTotals) -> Option<[f64; 3]> {
    let proteins = target.proteins - current.proteins;
    let fats = target.fats - current.fats;
    let carbohydrates = target.carbohydrates - current.carbohydrates;
    if proteins <= 0 || fats <= 0 || carbohydrates <= 0 {
        return None;
    }

    let smallest = proteins.min(fats).min(carbohydrates) as f64;
    Some([
        round2(proteins as f64 / smallest),
        round2(fats as f64 / smallest),
        round2(carbohydrates as f64 / smallest),
    ])
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Strict symmetric window on all three proportion components at once.
fn within_window(product: &ProductRow, fingerprint: [f64; 3], tolerance: f64) -> bool {
    (product.proteins_proportion - fingerprint[0]).abs() < tolerance
        && (product.fats_proportion - fingerprint[1]).abs() < tolerance
        && (product.carbohydrates_proportion - fingerprint[2]).abs() < tolerance
}

/// Scans the candidate set with a widening window until enough foods match
/// or the pass cap is reached. Returns at most [`WANTED_MATCHES`] foods in
/// candidate order; fewer (even zero) when the cap runs out first.
pub fn find_matches<'a>(candidates: &'a [ProductRow], fingerprint: [f64; 3]) -> Vec<&'a ProductRow> {
    let mut matches: Vec<&ProductRow> = Vec::new();
    let mut tolerance = TOLERANCE_STEP;
    let mut passes = 0;

    while matches.len() < WANTED_MATCHES && passes < MAX_WIDENINGS {
        matches.clear();
        for candidate in candidates {
            if within_window(candidate, fingerprint, tolerance) {
                matches.push(candidate);
                if matches.len() == WANTED_MATCHES {
                    break;
                }
            }
        }
        tolerance += TOLERANCE_STEP;
        passes += 1;
    }

    matches
}

/// The macro most exceeded today, if any. Deltas keep their sign: the branch
/// only applies when at least one is positive, so an under-consumed macro can
/// never win the argmax.
pub fn worst_overage(target: &MacroTotals, current: &MacroTotals) -> Option<MacroKind> {
    let overages = [
        (MacroKind::Proteins, current.proteins - target.proteins),
        (MacroKind::Fats, current.fats - target.fats),
        (
            MacroKind::Carbohydrates,
            current.carbohydrates - target.carbohydrates,
        ),
    ];

    if overages.iter().all(|(_, delta)| *delta <= 0) {
        return None;
    }

    let mut best = overages[0];
    for candidate in &overages[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    Some(best.0)
}

/// The eaten food richest in the given macro per gram. Ties resolve to the
/// earliest food in the (stable) input order.
pub fn top_source(eaten: &[ProductRow], kind: MacroKind) -> Option<&ProductRow> {
    let value = |p: &ProductRow| match kind {
        MacroKind::Proteins => p.proteins,
        MacroKind::Fats => p.fats,
        MacroKind::Carbohydrates => p.carbohydrates,
    };

    let mut best: Option<&ProductRow> = None;
    for product in eaten {
        match best {
            Some(current) if value(product) <= value(current) => {}
            _ => best = Some(product),
        }
    }
    best
}

/// Full decision over one day's data.
///
/// `eaten` is the distinct set of foods consumed that day, `candidates` the
/// catalog minus the card's blacklists and category-less foods, both in
/// stable title order.
pub fn decide(
    eaten: &[ProductRow],
    candidates: &[ProductRow],
    target: &MacroTotals,
    current: &MacroTotals,
) -> Result<Recommendation, ApiError> {
    ensure_enough_distinct(eaten)?;

    if let Some(fingerprint) = deficit_fingerprint(target, current) {
        let matches = find_matches(candidates, fingerprint);
        debug!(?fingerprint, matched = matches.len(), "deficit search finished");
        return Ok(Recommendation::Include(
            matches.into_iter().cloned().collect(),
        ));
    }

    if let Some(kind) = worst_overage(target, current) {
        let product = top_source(eaten, kind)
            .ok_or_else(|| ApiError::NoRecommendation("nothing eaten to exclude".into()))?;
        debug!(macro_kind = ?kind, product = %product.title, "surplus source picked");
        return Ok(Recommendation::Exclude(vec![product.clone()]));
    }

    Err(ApiError::NoRecommendation(
        "intake already matches the daily targets".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn totals(calories: i64, proteins: i64, fats: i64, carbohydrates: i64) -> MacroTotals {
        MacroTotals {
            calories,
            proteins,
            fats,
            carbohydrates,
            water: 2000,
        }
    }

    fn candidate(title: &str, proportions: (f64, f64, f64)) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            title: title.into(),
            proteins: 0.1,
            fats: 0.1,
            carbohydrates: 0.1,
            calories: 1.0,
            water: 0.5,
            proteins_proportion: proportions.0,
            fats_proportion: proportions.1,
            carbohydrates_proportion: proportions.2,
        }
    }

    fn eaten(title: &str, macros: (f64, f64, f64)) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            title: title.into(),
            proteins: macros.0,
            fats: macros.1,
            carbohydrates: macros.2,
            calories: 2.0,
            water: 0.5,
            proteins_proportion: 1.0,
            fats_proportion: 1.0,
            carbohydrates_proportion: 1.0,
        }
    }

    fn three_eaten() -> Vec<ProductRow> {
        vec![
            eaten("buckwheat", (0.13, 0.03, 0.62)),
            eaten("chicken", (0.18, 0.18, 0.0)),
            eaten("cottage cheese", (0.16, 0.05, 0.03)),
        ]
    }

    #[test]
    fn too_few_distinct_foods_is_insufficient_data() {
        let eaten = vec![
            eaten("chicken", (0.18, 0.18, 0.0)),
            eaten("rice", (0.07, 0.01, 0.78)),
        ];
        let err = decide(&eaten, &[], &totals(2000, 90, 60, 250), &totals(600, 30, 20, 80))
            .unwrap_err();
        assert!(matches!(err, ApiError::InsufficientData(_)));
    }

    #[test]
    fn fingerprint_normalizes_by_the_smallest_gap() {
        let target = totals(2000, 90, 60, 250);
        let current = totals(500, 30, 30, 160);
        // Gaps: proteins 60, fats 30, carbohydrates 90.
        assert_eq!(
            deficit_fingerprint(&target, &current),
            Some([2.0, 1.0, 3.0])
        );
    }

    #[test]
    fn fingerprint_requires_every_macro_short() {
        let target = totals(2000, 90, 60, 250);
        let met_fats = totals(800, 30, 60, 160);
        assert_eq!(deficit_fingerprint(&target, &met_fats), None);
        let over_proteins = totals(800, 95, 30, 160);
        assert_eq!(deficit_fingerprint(&target, &over_proteins), None);
    }

    #[test]
    fn exact_candidate_matches_in_the_first_pass() {
        let target = totals(2000, 90, 60, 250);
        let current = totals(500, 30, 30, 160);
        let candidates = vec![
            candidate("lard", (0.1, 30.0, 0.2)),
            candidate("barley", (2.0, 1.0, 3.0)),
        ];
        let rec = decide(&three_eaten(), &candidates, &target, &current).unwrap();
        match rec {
            Recommendation::Include(products) => {
                assert_eq!(products.len(), 1);
                assert_eq!(products[0].title, "barley");
            }
            other => panic!("expected include, got {other:?}"),
        }
    }

    #[test]
    fn window_widens_until_a_distant_candidate_fits() {
        let fingerprint = [2.0, 1.0, 3.0];
        let candidates = vec![candidate("oats", (2.5, 1.0, 3.0))];
        // Offset 0.5 fails while tolerance <= 0.5, matches at 0.6.
        let matches = find_matches(&candidates, fingerprint);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "oats");
    }

    #[test]
    fn boundary_distance_is_excluded_by_the_strict_window() {
        let product = candidate("edge", (2.1, 1.0, 3.0));
        assert!(!within_window(&product, [2.0, 1.0, 3.0], 0.1));
        assert!(within_window(&product, [2.0, 1.0, 3.0], 0.2));
    }

    #[test]
    fn at_most_four_matches_in_candidate_order() {
        let fingerprint = [1.0, 1.0, 1.0];
        let candidates: Vec<ProductRow> = (0..6)
            .map(|i| candidate(&format!("food-{i}"), (1.0, 1.0, 1.0)))
            .collect();
        let matches = find_matches(&candidates, fingerprint);
        assert_eq!(matches.len(), 4);
        let titles: Vec<&str> = matches.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["food-0", "food-1", "food-2", "food-3"]);
    }

    #[test]
    fn unmatchable_fingerprint_yields_an_empty_include() {
        let target = totals(2000, 90, 60, 250);
        let current = totals(500, 30, 30, 160);
        let candidates = vec![candidate("lard", (0.1, 500.0, 0.2))];
        let rec = decide(&three_eaten(), &candidates, &target, &current).unwrap();
        match rec {
            Recommendation::Include(products) => assert!(products.is_empty()),
            other => panic!("expected include, got {other:?}"),
        }
    }

    #[test]
    fn surplus_picks_the_top_source_of_the_worst_macro() {
        let target = totals(2000, 90, 60, 250);
        // Carbohydrates exceeded by 50, fats by 5, proteins under target.
        let current = totals(2600, 70, 65, 300);
        let rec = decide(&three_eaten(), &[], &target, &current).unwrap();
        match rec {
            Recommendation::Exclude(products) => {
                assert_eq!(products.len(), 1);
                assert_eq!(products[0].title, "buckwheat");
            }
            other => panic!("expected exclude, got {other:?}"),
        }
    }

    #[test]
    fn deep_deficit_on_another_macro_cannot_win_the_argmax() {
        let target = totals(2000, 90, 60, 250);
        // Proteins 80 under, fats 10 over: fats must be picked even though
        // the protein delta has the larger magnitude.
        let current = totals(1500, 10, 70, 100);
        assert_eq!(worst_overage(&target, &current), Some(MacroKind::Fats));
    }

    #[test]
    fn ties_resolve_to_the_first_eaten_food() {
        let foods = vec![
            eaten("first", (0.2, 0.1, 0.1)),
            eaten("second", (0.2, 0.1, 0.1)),
        ];
        let top = top_source(&foods, MacroKind::Proteins).unwrap();
        assert_eq!(top.title, "first");
    }

    #[test]
    fn balanced_day_has_no_recommendation() {
        let target = totals(2000, 90, 60, 250);
        let err = decide(&three_eaten(), &[], &target, &target).unwrap_err();
        assert!(matches!(err, ApiError::NoRecommendation(_)));
    }
}
