use super::ExportFormat;
use chrono::{DateTime, TimeZone};

const DEFAULT_PROJECT_PART: &str = "LEED_Project";

/// Make a project name safe for use in a file name.
///
/// Characters outside `[A-Za-z0-9_- ]` become `_`, then each run of spaces
/// collapses to a single `_`. An empty name falls back to `LEED_Project`.
pub fn sanitize_filename_part(name: &str) -> String {
    if name.is_empty() {
        return DEFAULT_PROJECT_PART.to_string();
    }

    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut out = String::with_capacity(replaced.len());
    let mut in_space = false;
    for c in replaced.chars() {
        if c == ' ' {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Minute-resolution timestamp in the form `YYYYMMDD_HHMM`
pub fn filename_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d_%H%M").to_string()
}

/// `<project>_<scheme>_<YYYYMMDD_HHMM>_LEED_Simulation.<ext>`
pub fn export_filename<Tz: TimeZone>(
    project_name: &str,
    scheme_key: &str,
    at: &DateTime<Tz>,
    format: ExportFormat,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}_{}_LEED_Simulation.{}",
        sanitize_filename_part(project_name),
        scheme_key,
        filename_timestamp(at),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_sanitize_keeps_allowed_characters() {
        assert_eq!(sanitize_filename_part("Tower_A-2"), "Tower_A-2");
    }

    #[test]
    fn test_sanitize_replaces_punctuation() {
        assert_eq!(sanitize_filename_part("HQ/Phase#1"), "HQ_Phase_1");
        assert_eq!(sanitize_filename_part("Café"), "Caf_");
    }

    #[test]
    fn test_sanitize_collapses_spaces() {
        assert_eq!(sanitize_filename_part("Main   Street  Office"), "Main_Street_Office");
        assert_eq!(sanitize_filename_part(" lead"), "_lead");
    }

    #[test]
    fn test_sanitize_tabs_become_underscores() {
        // Tabs are outside the allowed set, so they are replaced one for one
        assert_eq!(sanitize_filename_part("a\t\tb"), "a__b");
    }

    #[test]
    fn test_sanitize_empty_name() {
        assert_eq!(sanitize_filename_part(""), "LEED_Project");
    }

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 59).unwrap();
        assert_eq!(filename_timestamp(&at), "20260102_0304");
    }

    #[test]
    fn test_timestamp_uses_given_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2026, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(filename_timestamp(&at), "20261231_2359");
    }

    #[test]
    fn test_export_filename() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap();
        assert_eq!(
            export_filename("Green Tower", "v4.1", &at, ExportFormat::Xlsx),
            "Green_Tower_v4.1_20261019_1430_LEED_Simulation.xlsx"
        );
        assert_eq!(
            export_filename("", "v4", &at, ExportFormat::Csv),
            "LEED_Project_v4_20261019_1430_LEED_Simulation.csv"
        );
    }
}
