use serde::Serialize;

use crate::catalog::{CreditType, Scheme};
use crate::scoring::{category_totals, compute_totals, ScoringState, Totals};

/// Machine-readable view of a scored checklist (`show --json`).
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistReport {
    pub scheme: String,
    pub display_name: String,
    pub categories: Vec<CategoryReport>,
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub id: String,
    pub name: String,
    pub earned: u32,
    pub max: u32,
    pub credits: Vec<CreditReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditReport {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CreditType,
    pub name: String,
    pub earned: u32,
    pub max: u32,
}

pub fn build_report(scheme: &Scheme, state: &ScoringState) -> ChecklistReport {
    let categories = scheme
        .categories
        .iter()
        .map(|category| {
            let (earned, max) = category_totals(category, state);
            CategoryReport {
                id: category.id.clone(),
                name: category.name.clone(),
                earned,
                max,
                credits: category
                    .credits
                    .iter()
                    .map(|credit| CreditReport {
                        id: credit.id.clone(),
                        kind: credit.kind,
                        name: credit.name.clone(),
                        earned: state.earned(&credit.id),
                        max: credit.max_points,
                    })
                    .collect(),
            }
        })
        .collect();

    ChecklistReport {
        scheme: scheme.key.clone(),
        display_name: scheme.display_name.clone(),
        categories,
        totals: compute_totals(scheme, state),
    }
}
