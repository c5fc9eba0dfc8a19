use super::state::{clamp_points, ScoringState};
use crate::catalog::Scheme;
use std::collections::BTreeMap;

/// What happened to earned points during a scheme switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// New credits whose id existed in the old scheme
    pub carried: usize,
    /// Carried credits whose value had to be lowered to the new maximum
    pub clamped: Vec<String>,
    /// Old credits with earned points and no counterpart in the new scheme
    pub dropped: Vec<String>,
}

impl MigrationReport {
    /// One-line description for status messages and verbose logs
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} carried", self.carried)];
        if !self.clamped.is_empty() {
            parts.push(format!("{} clamped", self.clamped.len()));
        }
        if !self.dropped.is_empty() {
            parts.push(format!("{} dropped", self.dropped.len()));
        }
        parts.join(", ")
    }
}

/// Carry earned points from `old_state` (scored against `old_scheme`) into a
/// fresh state for `new_scheme`.
///
/// Credits are matched by id string only. A credit that keeps its id across
/// versions inherits its old value clamped to the new maximum; every other
/// credit starts at zero. Two unrelated credits that happen to share an id
/// will share a score. This never fails.
pub fn migrate(
    old_scheme: &Scheme,
    old_state: &ScoringState,
    new_scheme: &Scheme,
) -> (ScoringState, MigrationReport) {
    let old_points: BTreeMap<&str, u32> = old_scheme
        .flatten()
        .into_iter()
        .map(|(_, credit)| (credit.id.as_str(), old_state.earned(&credit.id)))
        .collect();

    let mut report = MigrationReport::default();
    let mut carried = BTreeMap::new();

    for (_, credit) in new_scheme.flatten() {
        if let Some(&old_value) = old_points.get(credit.id.as_str()) {
            let value = clamp_points(old_value as i64, credit);
            if value < old_value {
                report.clamped.push(credit.id.clone());
            }
            report.carried += 1;
            carried.insert(credit.id.clone(), value);
        }
    }

    report.dropped = old_points
        .iter()
        .filter(|&(id, &points)| points > 0 && new_scheme.find_credit(id).is_none())
        .map(|(id, _)| id.to_string())
        .collect();

    (ScoringState::from_flat(new_scheme, &carried), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, Credit, CreditType, Threshold};

    fn scheme(key: &str, credits: &[(&str, u32)]) -> Scheme {
        Scheme {
            key: key.to_string(),
            display_name: key.to_string(),
            thresholds: vec![Threshold { level: "Certified".to_string(), min_points: 1 }],
            categories: vec![Category {
                id: "c".to_string(),
                name: "Category".to_string(),
                credits: credits
                    .iter()
                    .map(|(id, max)| Credit {
                        id: id.to_string(),
                        kind: if *max == 0 { CreditType::Prerequisite } else { CreditType::Credit },
                        name: id.to_string(),
                        max_points: *max,
                        required_docs: vec![],
                        source: String::new(),
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_shared_ids_carry_over() {
        let old = scheme("old", &[("A", 5), ("B", 5)]);
        let new = scheme("new", &[("B", 5), ("C", 5)]);
        let state = ScoringState::new(&old)
            .set_points(&old, "c", "A", 3)
            .unwrap()
            .set_points(&old, "c", "B", 4)
            .unwrap();

        let (migrated, report) = migrate(&old, &state, &new);

        assert_eq!(migrated.scheme_key(), "new");
        assert_eq!(migrated.earned("B"), 4);
        assert_eq!(migrated.earned("C"), 0);
        assert_eq!(report.carried, 1);
        assert_eq!(report.dropped, vec!["A".to_string()]);
        assert!(report.clamped.is_empty());
    }

    #[test]
    fn test_carried_value_clamps_to_new_max() {
        for (old_value, new_max) in [(0u32, 3u32), (2, 3), (3, 3), (7, 3), (7, 0), (10, 20)] {
            let old = scheme("old", &[("X", 10)]);
            let new = scheme("new", &[("X", new_max)]);
            let state = ScoringState::new(&old)
                .set_points(&old, "c", "X", old_value as i64)
                .unwrap();

            let (migrated, report) = migrate(&old, &state, &new);

            assert_eq!(migrated.earned("X"), old_value.min(new_max));
            assert_eq!(report.clamped.len(), usize::from(old_value > new_max));
        }
    }

    #[test]
    fn test_stale_entries_are_not_carried() {
        // State scored against a scheme other than old_scheme: only ids that
        // old_scheme declares are considered
        let old = scheme("old", &[("A", 5)]);
        let other = scheme("other", &[("A", 5), ("B", 5)]);
        let new = scheme("new", &[("B", 5)]);
        let state = ScoringState::new(&other)
            .set_points(&other, "c", "B", 5)
            .unwrap();

        let (migrated, _) = migrate(&old, &state, &new);
        assert_eq!(migrated.earned("B"), 0);
    }

    #[test]
    fn test_switch_v4_to_v41_prerequisite_ids_differ() {
        let catalog = Catalog::builtin().unwrap();
        let v4 = catalog.scheme("v4").unwrap();
        let v41 = catalog.scheme("v4.1").unwrap();
        let state = ScoringState::new(v4);

        let (migrated, report) = migrate(v4, &state, v41);

        assert_eq!(migrated.earned("SS-p1-v41"), 0);
        assert_eq!(report.carried, 0);
    }

    #[test]
    fn test_switch_matches_by_id_not_position() {
        let catalog = Catalog::builtin().unwrap();
        let v4 = catalog.scheme("v4").unwrap();
        let v41 = catalog.scheme("v4.1").unwrap();
        let state = ScoringState::new(v4)
            .set_earned_points(v4, "en", "EA-1", "15")
            .unwrap();

        let (migrated, report) = migrate(v4, &state, v41);

        assert_eq!(migrated.earned("EA-1-v41"), 0);
        assert_eq!(report.dropped, vec!["EA-1".to_string()]);
    }

    #[test]
    fn test_switch_back_and_forth_same_scheme_keeps_values() {
        let catalog = Catalog::builtin().unwrap();
        let v4 = catalog.scheme("v4").unwrap();
        let state = ScoringState::new(v4)
            .set_earned_points(v4, "lt", "LT-1", "16")
            .unwrap();

        let (migrated, report) = migrate(v4, &state, v4);
        assert_eq!(migrated, state);
        assert_eq!(report.carried, v4.flatten().len());
    }

    #[test]
    fn test_report_summary() {
        let report = MigrationReport {
            carried: 2,
            clamped: vec!["X".to_string()],
            dropped: vec![],
        };
        assert_eq!(report.summary(), "2 carried, 1 clamped");
        assert_eq!(MigrationReport::default().summary(), "0 carried");
    }
}
