//! Document history (audit trail).

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One immutable audit record for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: Timestamp,
    pub user: String,
    pub activity: String,

    #[serde(default)]
    pub details: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Order entries oldest first, keeping backend order for equal timestamps.
#[must_use]
pub fn chronological(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    entries.sort_by_key(|entry| entry.timestamp);
    entries
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn entry(timestamp: &str, activity: &str) -> Result<HistoryEntry, jiff::Error> {
        Ok(HistoryEntry {
            timestamp: timestamp.parse()?,
            user: "alice".to_string(),
            activity: activity.to_string(),
            details: String::new(),
            comment: None,
        })
    }

    #[test]
    fn chronological_is_stable_for_equal_timestamps() -> TestResult {
        let entries = vec![
            entry("2024-01-02T00:00:00Z", "Done")?,
            entry("2024-01-01T00:00:00Z", "Need Review")?,
            entry("2024-01-01T00:00:00Z", "Need Revise")?,
        ];

        let activities: Vec<_> = chronological(entries)
            .into_iter()
            .map(|entry| entry.activity)
            .collect();

        assert_eq!(activities, ["Need Review", "Need Revise", "Done"]);

        Ok(())
    }

    #[test]
    fn decodes_entry_without_comment() -> TestResult {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"timestamp":"2024-01-01T10:00:00Z","user":"alice","activity":"Created"}"#,
        )?;

        assert_eq!(entry.details, "");
        assert_eq!(entry.comment, None);

        Ok(())
    }
}
