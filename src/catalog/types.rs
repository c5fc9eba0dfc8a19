use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a line item scores points or only gates certification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum CreditType {
    Prerequisite,
    Credit,
}

impl CreditType {
    pub fn label(&self) -> &'static str {
        match self {
            CreditType::Prerequisite => "Prerequisite",
            CreditType::Credit => "Credit",
        }
    }
}

impl fmt::Display for CreditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One checklist line item as published in the catalog.
///
/// Earned points are not stored here; see [`crate::scoring::ScoringState`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Credit {
    /// Unique within a scheme; used to carry points across scheme versions
    pub id: String,

    #[serde(rename = "type")]
    pub kind: CreditType,

    pub name: String,

    pub max_points: u32,

    /// Documentation expected for the credit, one block per entry
    #[serde(default)]
    pub required_docs: Vec<String>,

    /// Reference locator (usually a USGBC credit page)
    #[serde(default)]
    pub source: String,
}

impl Credit {
    /// Prerequisites carry no points and cannot be edited
    pub fn is_editable(&self) -> bool {
        self.max_points > 0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub credits: Vec<Credit>,
}

impl Category {
    pub fn credit(&self, credit_id: &str) -> Option<&Credit> {
        self.credits.iter().find(|c| c.id == credit_id)
    }

    /// Sum of the maximum points of every credit in the category
    pub fn max_points(&self) -> u32 {
        self.credits
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.max_points))
    }
}

/// Minimum total required for a named certification level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Threshold {
    pub level: String,
    pub min_points: u32,
}

/// One certification program version with its own categories and thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Scheme {
    pub key: String,
    pub display_name: String,
    pub thresholds: Vec<Threshold>,
    pub categories: Vec<Category>,
}

impl Scheme {
    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Resolve a credit by its category and credit ids
    pub fn credit(&self, category_id: &str, credit_id: &str) -> Option<&Credit> {
        self.category(category_id)
            .and_then(|category| category.credit(credit_id))
    }

    /// Resolve a credit by id alone, returning its owning category too
    pub fn find_credit(&self, credit_id: &str) -> Option<(&Category, &Credit)> {
        self.categories.iter().find_map(|category| {
            category
                .credit(credit_id)
                .map(|credit| (category, credit))
        })
    }

    /// Every credit paired with its category id, in catalog order
    pub fn flatten(&self) -> Vec<(&str, &Credit)> {
        self.categories
            .iter()
            .flat_map(|category| {
                category
                    .credits
                    .iter()
                    .map(move |credit| (category.id.as_str(), credit))
            })
            .collect()
    }

    pub fn max_points(&self) -> u32 {
        self.categories
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.max_points()))
    }

    /// Thresholds from the highest minimum to the lowest.
    ///
    /// Ties keep the later-declared level first.
    pub fn thresholds_descending(&self) -> Vec<&Threshold> {
        let mut ordered: Vec<&Threshold> = self.thresholds.iter().rev().collect();
        ordered.sort_by(|a, b| b.min_points.cmp(&a.min_points));
        ordered
    }
}
