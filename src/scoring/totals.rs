use super::state::ScoringState;
use crate::catalog::{Category, Scheme};
use serde::Serialize;

/// Level reported when no threshold has been reached
pub const NO_LEVEL: &str = "No Level";

/// The next threshold above the achieved one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextLevel {
    pub level: String,
    pub min_points: u32,
    pub points_needed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_earned: u32,
    pub total_max: u32,
    pub level: String,
    pub next_level: Option<NextLevel>,
}

impl Totals {
    pub fn has_level(&self) -> bool {
        self.level != NO_LEVEL
    }
}

/// Sum earned and available points over the active scheme's credits and
/// pick the achieved level.
///
/// Only credits declared by `scheme` are counted, so entries left over from
/// another scheme never leak into the totals.
pub fn compute_totals(scheme: &Scheme, state: &ScoringState) -> Totals {
    let (total_earned, total_max) = scheme
        .flatten()
        .into_iter()
        .fold((0u32, 0u32), |(earned, max), (_, credit)| {
            (
                earned.saturating_add(state.earned(&credit.id)),
                max.saturating_add(credit.max_points),
            )
        });

    Totals {
        total_earned,
        total_max,
        level: level_for(scheme, total_earned).to_string(),
        next_level: next_level(scheme, total_earned),
    }
}

/// Name of the highest threshold whose minimum does not exceed `earned`.
///
/// Thresholds are scanned from the highest minimum down and the first one
/// satisfied wins; [`NO_LEVEL`] when none is.
pub fn level_for(scheme: &Scheme, earned: u32) -> &str {
    scheme
        .thresholds_descending()
        .into_iter()
        .find(|t| earned >= t.min_points)
        .map(|t| t.level.as_str())
        .unwrap_or(NO_LEVEL)
}

fn next_level(scheme: &Scheme, earned: u32) -> Option<NextLevel> {
    scheme
        .thresholds_descending()
        .into_iter()
        .rev()
        .find(|t| t.min_points > earned)
        .map(|t| NextLevel {
            level: t.level.clone(),
            min_points: t.min_points,
            points_needed: t.min_points - earned,
        })
}

/// Earned and available points of one category
pub fn category_totals(category: &Category, state: &ScoringState) -> (u32, u32) {
    category
        .credits
        .iter()
        .fold((0u32, 0u32), |(earned, max), credit| {
            (
                earned.saturating_add(state.earned(&credit.id)),
                max.saturating_add(credit.max_points),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, Credit, CreditType, Threshold};

    /// Scheme with a single credit `X` in category `c`
    fn scheme_with_credit(max: u32, thresholds: &[(&str, u32)]) -> Scheme {
        Scheme {
            key: "t".to_string(),
            display_name: "Test".to_string(),
            thresholds: thresholds
                .iter()
                .map(|(level, min)| Threshold { level: level.to_string(), min_points: *min })
                .collect(),
            categories: vec![Category {
                id: "c".to_string(),
                name: "Category".to_string(),
                credits: vec![Credit {
                    id: "X".to_string(),
                    kind: CreditType::Credit,
                    name: "X".to_string(),
                    max_points: max,
                    required_docs: vec![],
                    source: String::new(),
                }],
            }],
        }
    }

    const V4_THRESHOLDS: [(&str, u32); 4] =
        [("Certified", 40), ("Silver", 50), ("Gold", 60), ("Platinum", 80)];

    fn totals_at(earned: i64) -> Totals {
        let scheme = scheme_with_credit(110, &V4_THRESHOLDS);
        let state = ScoringState::new(&scheme)
            .set_points(&scheme, "c", "X", earned)
            .unwrap();
        compute_totals(&scheme, &state)
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(totals_at(39).level, NO_LEVEL);
        assert_eq!(totals_at(40).level, "Certified");
        assert_eq!(totals_at(49).level, "Certified");
        assert_eq!(totals_at(50).level, "Silver");
        assert_eq!(totals_at(60).level, "Gold");
        assert_eq!(totals_at(79).level, "Gold");
        assert_eq!(totals_at(80).level, "Platinum");
        assert_eq!(totals_at(110).level, "Platinum");
    }

    #[test]
    fn test_level_is_monotonic() {
        let rank = |level: &str| {
            [NO_LEVEL, "Certified", "Silver", "Gold", "Platinum"]
                .iter()
                .position(|l| *l == level)
                .unwrap()
        };
        let mut previous = 0;
        for earned in 0..=110 {
            let current = rank(&totals_at(earned).level);
            assert!(current >= previous, "level dropped at {}", earned);
            previous = current;
        }
    }

    #[test]
    fn test_unordered_thresholds_evaluated_descending() {
        let scheme = scheme_with_credit(
            100,
            &[("Platinum", 80), ("Certified", 40), ("Gold", 60), ("Silver", 50)],
        );
        assert_eq!(level_for(&scheme, 55), "Silver");
        assert_eq!(level_for(&scheme, 85), "Platinum");
        assert_eq!(level_for(&scheme, 10), NO_LEVEL);
    }

    #[test]
    fn test_zero_threshold_always_reached() {
        let scheme = scheme_with_credit(10, &[("Listed", 0), ("Certified", 5)]);
        assert_eq!(level_for(&scheme, 0), "Listed");
    }

    #[test]
    fn test_next_level() {
        let totals = totals_at(45);
        assert_eq!(
            totals.next_level,
            Some(NextLevel {
                level: "Silver".to_string(),
                min_points: 50,
                points_needed: 5,
            })
        );
        assert_eq!(totals_at(0).next_level.unwrap().level, "Certified");
        assert!(totals_at(80).next_level.is_none());
    }

    #[test]
    fn test_compute_totals_is_pure() {
        let catalog = Catalog::builtin().unwrap();
        let v4 = catalog.scheme("v4").unwrap();
        let state = ScoringState::new(v4)
            .set_earned_points(v4, "lt", "LT-1", "16")
            .unwrap()
            .set_earned_points(v4, "en", "EA-1", "18")
            .unwrap();

        let first = compute_totals(v4, &state);
        let second = compute_totals(v4, &state);
        assert_eq!(first, second);
        assert_eq!(first.total_earned, 34);
        assert_eq!(first.total_max, 67);
        assert_eq!(first.level, NO_LEVEL);
        assert!(!first.has_level());
    }

    #[test]
    fn test_totals_ignore_credits_of_other_schemes() {
        let catalog = Catalog::builtin().unwrap();
        let v4 = catalog.scheme("v4").unwrap();
        let v5 = catalog.scheme("v5").unwrap();
        let state = ScoringState::new(v4)
            .set_earned_points(v4, "lt", "LT-1", "16")
            .unwrap();

        let totals = compute_totals(v5, &state);
        assert_eq!(totals.total_earned, 0);
        assert_eq!(totals.total_max, 57);
    }

    #[test]
    fn test_category_totals() {
        let catalog = Catalog::builtin().unwrap();
        let v4 = catalog.scheme("v4").unwrap();
        let state = ScoringState::new(v4)
            .set_earned_points(v4, "lt", "LT-3", "2")
            .unwrap();
        let lt = v4.category("lt").unwrap();
        assert_eq!(category_totals(lt, &state), (2, 19));
    }

    #[test]
    fn test_unvalidated_scheme_totals_saturate() {
        let mut scheme = scheme_with_credit(3_000_000_000, &V4_THRESHOLDS);
        let mut second = scheme.categories[0].credits[0].clone();
        second.id = "Y".to_string();
        scheme.categories[0].credits.push(second);

        let state = ScoringState::new(&scheme)
            .set_points(&scheme, "c", "X", 3_000_000_000)
            .unwrap()
            .set_points(&scheme, "c", "Y", 3_000_000_000)
            .unwrap();

        let totals = compute_totals(&scheme, &state);
        assert_eq!(totals.total_max, u32::MAX);
        assert_eq!(totals.total_earned, u32::MAX);
        assert_eq!(totals.level, "Platinum");
        assert_eq!(category_totals(&scheme.categories[0], &state), (u32::MAX, u32::MAX));
        assert_eq!(scheme.max_points(), u32::MAX);
    }
}
