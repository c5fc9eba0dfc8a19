pub mod migration;
pub mod state;
pub mod totals;

pub use migration::{migrate, MigrationReport};
pub use state::{clamp_points, coerce_points, parse_points, ScoringState};
pub use totals::{category_totals, compute_totals, level_for, NextLevel, Totals, NO_LEVEL};
