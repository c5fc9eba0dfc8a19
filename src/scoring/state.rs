use crate::catalog::{Credit, Scheme};
use crate::error::ChecklistError;
use std::collections::BTreeMap;

/// Earned points per credit id for one scheme.
///
/// Every edit returns a new state; a state that has been handed out is never
/// changed behind its holder's back. Values always satisfy
/// `0 <= earned <= max_points` for the credit they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringState {
    scheme_key: String,
    points: BTreeMap<String, u32>,
}

impl ScoringState {
    /// Fresh state with every credit of `scheme` at zero
    pub fn new(scheme: &Scheme) -> Self {
        let points = scheme
            .flatten()
            .into_iter()
            .map(|(_, credit)| (credit.id.clone(), 0))
            .collect();
        Self {
            scheme_key: scheme.key.clone(),
            points,
        }
    }

    /// Rebuild a state from a flat `credit id -> points` mapping.
    ///
    /// Ids that are not part of `scheme` are ignored, missing ids start at
    /// zero, and every value is clamped to its credit's maximum.
    pub fn from_flat(scheme: &Scheme, flat: &BTreeMap<String, u32>) -> Self {
        let mut state = Self::new(scheme);
        for (_, credit) in scheme.flatten() {
            if let Some(&value) = flat.get(&credit.id) {
                state.points.insert(credit.id.clone(), clamp_points(value as i64, credit));
            }
        }
        state
    }

    pub fn scheme_key(&self) -> &str {
        &self.scheme_key
    }

    /// Earned points for a credit (0 when the id is not part of the scheme)
    pub fn earned(&self, credit_id: &str) -> u32 {
        self.points.get(credit_id).copied().unwrap_or(0)
    }

    /// Flat `credit id -> points` view of the state
    pub fn to_flat(&self) -> BTreeMap<String, u32> {
        self.points.clone()
    }

    /// Apply a user-typed value to one credit.
    ///
    /// Non-numeric input counts as 0 and the result is clamped to the
    /// credit's range. Prerequisites are left at 0.
    pub fn set_earned_points(
        &self,
        scheme: &Scheme,
        category_id: &str,
        credit_id: &str,
        raw: &str,
    ) -> Result<Self, ChecklistError> {
        self.set_points(scheme, category_id, credit_id, coerce_points(raw))
    }

    /// Same as [`ScoringState::set_earned_points`] with an already-numeric value
    pub fn set_points(
        &self,
        scheme: &Scheme,
        category_id: &str,
        credit_id: &str,
        value: i64,
    ) -> Result<Self, ChecklistError> {
        self.check_scheme(scheme)?;

        let credit = scheme
            .credit(category_id, credit_id)
            .ok_or_else(|| ChecklistError::CreditNotFound {
                scheme: scheme.key.clone(),
                category_id: Some(category_id.to_string()),
                credit_id: credit_id.to_string(),
            })?;

        Ok(self.with_value(credit, value))
    }

    /// Apply a user-typed value to a credit found by id alone
    pub fn set_by_credit_id(
        &self,
        scheme: &Scheme,
        credit_id: &str,
        raw: &str,
    ) -> Result<Self, ChecklistError> {
        self.check_scheme(scheme)?;

        let (_, credit) = scheme
            .find_credit(credit_id)
            .ok_or_else(|| ChecklistError::CreditNotFound {
                scheme: scheme.key.clone(),
                category_id: None,
                credit_id: credit_id.to_string(),
            })?;

        Ok(self.with_value(credit, coerce_points(raw)))
    }

    fn check_scheme(&self, scheme: &Scheme) -> Result<(), ChecklistError> {
        if scheme.key != self.scheme_key {
            return Err(ChecklistError::SchemeMismatch {
                state: self.scheme_key.clone(),
                scheme: scheme.key.clone(),
            });
        }
        Ok(())
    }

    fn with_value(&self, credit: &Credit, value: i64) -> Self {
        let mut next = self.clone();
        if credit.is_editable() {
            next.points.insert(credit.id.clone(), clamp_points(value, credit));
        }
        next
    }
}

/// Lenient conversion of typed input to a point value.
///
/// Integers parse directly, decimals truncate toward zero, and anything
/// else (including empty input) becomes 0.
pub fn coerce_points(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}

/// Strict conversion used where a bad value should be reported
pub fn parse_points(raw: &str) -> Result<i64, ChecklistError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ChecklistError::InvalidPointValue {
            raw: raw.to_string(),
        })
}

/// Clamp a value into `[0, credit.max_points]`
pub fn clamp_points(value: i64, credit: &Credit) -> u32 {
    value.clamp(0, credit.max_points as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn v4() -> Scheme {
        Catalog::builtin().unwrap().scheme("v4").unwrap().clone()
    }

    #[test]
    fn test_new_state_is_all_zero() {
        let scheme = v4();
        let state = ScoringState::new(&scheme);
        assert_eq!(state.scheme_key(), "v4");
        assert_eq!(state.to_flat().len(), scheme.flatten().len());
        assert!(state.to_flat().values().all(|&v| v == 0));
    }

    #[test]
    fn test_set_within_range() {
        let scheme = v4();
        let state = ScoringState::new(&scheme)
            .set_earned_points(&scheme, "en", "EA-1", "15")
            .unwrap();
        assert_eq!(state.earned("EA-1"), 15);
    }

    #[test]
    fn test_clamps_above_max() {
        let scheme = v4();
        let state = ScoringState::new(&scheme)
            .set_earned_points(&scheme, "lt", "LT-2", "5")
            .unwrap();
        assert_eq!(state.earned("LT-2"), 1);
    }

    #[test]
    fn test_clamps_below_zero() {
        let scheme = v4();
        let state = ScoringState::new(&scheme)
            .set_earned_points(&scheme, "lt", "LT-2", "1")
            .unwrap()
            .set_earned_points(&scheme, "lt", "LT-2", "-3")
            .unwrap();
        assert_eq!(state.earned("LT-2"), 0);
    }

    #[test]
    fn test_non_numeric_input_is_zero() {
        let scheme = v4();
        let state = ScoringState::new(&scheme)
            .set_earned_points(&scheme, "lt", "LT-1", "10")
            .unwrap()
            .set_earned_points(&scheme, "lt", "LT-1", "abc")
            .unwrap();
        assert_eq!(state.earned("LT-1"), 0);
    }

    #[test]
    fn test_prerequisite_edit_is_noop() {
        let scheme = v4();
        let before = ScoringState::new(&scheme);
        let after = before
            .set_earned_points(&scheme, "ss", "SS-p1", "3")
            .unwrap();
        assert_eq!(after.earned("SS-p1"), 0);
        assert_eq!(before, after);
    }

    #[test]
    fn test_edit_leaves_prior_state_untouched() {
        let scheme = v4();
        let before = ScoringState::new(&scheme)
            .set_earned_points(&scheme, "we", "WE-2", "4")
            .unwrap();
        let after = before
            .set_earned_points(&scheme, "en", "EA-1", "9")
            .unwrap();

        assert_eq!(before.earned("EA-1"), 0);
        assert_eq!(after.earned("EA-1"), 9);
        // Only the edited credit differs
        assert_eq!(after.earned("WE-2"), 4);
        let changed: Vec<_> = after
            .to_flat()
            .into_iter()
            .filter(|(id, v)| before.earned(id) != *v)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(changed, vec!["EA-1".to_string()]);
    }

    #[test]
    fn test_unknown_credit_is_an_error() {
        let scheme = v4();
        let state = ScoringState::new(&scheme);
        let err = state
            .set_earned_points(&scheme, "lt", "EA-1", "1")
            .unwrap_err();
        assert!(matches!(err, ChecklistError::CreditNotFound { .. }));

        let err = state
            .set_earned_points(&scheme, "nope", "LT-1", "1")
            .unwrap_err();
        assert!(matches!(err, ChecklistError::CreditNotFound { .. }));
    }

    #[test]
    fn test_edit_against_other_scheme_is_an_error() {
        let catalog = Catalog::builtin().unwrap();
        let v4 = catalog.scheme("v4").unwrap();
        let v5 = catalog.scheme("v5").unwrap();
        let state = ScoringState::new(v4);

        let expected = ChecklistError::SchemeMismatch {
            state: "v4".to_string(),
            scheme: "v5".to_string(),
        };
        assert_eq!(
            state.set_earned_points(v5, "ca", "CA-1", "3").unwrap_err(),
            expected
        );
        assert_eq!(state.set_by_credit_id(v5, "CA-1", "3").unwrap_err(), expected);
        // Nothing foreign was written
        assert_eq!(state.earned("CA-1"), 0);
        assert_eq!(state.to_flat(), ScoringState::new(v4).to_flat());
    }

    #[test]
    fn test_set_by_credit_id() {
        let scheme = v4();
        let state = ScoringState::new(&scheme)
            .set_by_credit_id(&scheme, "RP", "3")
            .unwrap();
        assert_eq!(state.earned("RP"), 3);

        let err = state.set_by_credit_id(&scheme, "CA-1", "3").unwrap_err();
        assert_eq!(
            err,
            ChecklistError::CreditNotFound {
                scheme: "v4".to_string(),
                category_id: None,
                credit_id: "CA-1".to_string(),
            }
        );
    }

    #[test]
    fn test_invariant_holds_after_arbitrary_edits() {
        let scheme = v4();
        let inputs = ["-100", "0", "1", "3.9", "7", "1e3", "99999999999999999999", "", "x"];
        let mut state = ScoringState::new(&scheme);
        for (category_id, credit) in scheme.flatten() {
            for raw in inputs {
                state = state
                    .set_earned_points(&scheme, category_id, &credit.id, raw)
                    .unwrap();
                let earned = state.earned(&credit.id);
                assert!(earned <= credit.max_points);
                if !credit.is_editable() {
                    assert_eq!(earned, 0);
                }
            }
        }
    }

    #[test]
    fn test_flat_round_trip() {
        let scheme = v4();
        let state = ScoringState::new(&scheme)
            .set_earned_points(&scheme, "lt", "LT-1", "12")
            .unwrap()
            .set_earned_points(&scheme, "in", "RP", "2")
            .unwrap();
        let rebuilt = ScoringState::from_flat(&scheme, &state.to_flat());
        assert_eq!(rebuilt, state);
    }

    #[test]
    fn test_from_flat_ignores_foreign_ids_and_clamps() {
        let scheme = v4();
        let mut flat = BTreeMap::new();
        flat.insert("CA-1".to_string(), 20);
        flat.insert("LT-2".to_string(), 4);
        let state = ScoringState::from_flat(&scheme, &flat);
        assert_eq!(state.earned("LT-2"), 1);
        assert!(!state.to_flat().contains_key("CA-1"));
    }

    #[test]
    fn test_coerce_points() {
        assert_eq!(coerce_points("5"), 5);
        assert_eq!(coerce_points(" 7 "), 7);
        assert_eq!(coerce_points("-3"), -3);
        assert_eq!(coerce_points("3.7"), 3);
        assert_eq!(coerce_points("-2.5"), -2);
        assert_eq!(coerce_points(""), 0);
        assert_eq!(coerce_points("abc"), 0);
        assert_eq!(coerce_points("NaN"), 0);
        assert_eq!(coerce_points("inf"), 0);
    }

    #[test]
    fn test_parse_points_strict() {
        assert_eq!(parse_points("4").unwrap(), 4);
        assert_eq!(
            parse_points("four").unwrap_err(),
            ChecklistError::InvalidPointValue {
                raw: "four".to_string()
            }
        );
    }
}
