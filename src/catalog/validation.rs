use super::types::{CreditType, Scheme};
use std::collections::HashSet;

/// Validate catalog schemes after parsing.
/// Returns all validation errors at once (not just the first).
pub fn validate_schemes(schemes: &[Scheme]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut scheme_keys = HashSet::new();

    if schemes.is_empty() {
        errors.push("catalog: must define at least one scheme".to_string());
    }

    for (i, scheme) in schemes.iter().enumerate() {
        if scheme.key.trim().is_empty() {
            errors.push(format!("schemes[{}].key: must not be empty", i));
        } else if !scheme_keys.insert(scheme.key.as_str()) {
            errors.push(format!("schemes[{}].key: duplicate scheme '{}'", i, scheme.key));
        }

        validate_thresholds(scheme, i, &mut errors);

        let mut category_ids = HashSet::new();
        let mut credit_ids = HashSet::new();
        let mut total_max: Option<u32> = Some(0);

        for (j, category) in scheme.categories.iter().enumerate() {
            if !category_ids.insert(category.id.as_str()) {
                errors.push(format!(
                    "{}.categories[{}].id: duplicate category '{}'",
                    scheme.key, j, category.id
                ));
            }

            for (k, credit) in category.credits.iter().enumerate() {
                let path = format!("{}.categories[{}].credits[{}]", scheme.key, j, k);

                if credit.id.trim().is_empty() {
                    errors.push(format!("{}.id: must not be empty", path));
                } else if !credit_ids.insert(credit.id.as_str()) {
                    errors.push(format!("{}.id: duplicate credit '{}'", path, credit.id));
                }

                total_max = total_max.and_then(|t| t.checked_add(credit.max_points));

                if credit.kind == CreditType::Prerequisite && credit.max_points != 0 {
                    errors.push(format!(
                        "{}.max_points: prerequisite '{}' must have 0 points, got {}",
                        path, credit.id, credit.max_points
                    ));
                }
            }
        }

        if total_max.is_none() {
            errors.push(format!(
                "schemes[{}].categories: '{}' max_points add up to more than {}",
                i,
                scheme.key,
                u32::MAX
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_thresholds(scheme: &Scheme, index: usize, errors: &mut Vec<String>) {
    if scheme.thresholds.is_empty() {
        errors.push(format!(
            "schemes[{}].thresholds: '{}' must define at least one level",
            index, scheme.key
        ));
        return;
    }

    let mut levels = HashSet::new();
    for (j, threshold) in scheme.thresholds.iter().enumerate() {
        if threshold.level.trim().is_empty() {
            errors.push(format!("{}.thresholds[{}].level: must not be empty", scheme.key, j));
        } else if !levels.insert(threshold.level.as_str()) {
            errors.push(format!(
                "{}.thresholds[{}].level: duplicate level '{}'",
                scheme.key, j, threshold.level
            ));
        }
    }
}
