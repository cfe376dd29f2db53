//! Document Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::documents::{DocumentDecodeError, DocumentValidationError, UnknownStatus};

/// Lifecycle state of a document.
///
/// Declaration order follows the workflow: `Open`, `On Progress`,
/// `Need Review`, then either `Done` or `Need Revise` back to `On Progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Open")]
    Open,

    #[serde(rename = "On Progress")]
    OnProgress,

    #[serde(rename = "Need Review")]
    NeedReview,

    #[serde(rename = "Need Revise")]
    NeedRevise,

    #[serde(rename = "Done")]
    Done,
}

impl Status {
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::OnProgress,
        Self::NeedReview,
        Self::NeedRevise,
        Self::Done,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::OnProgress => "On Progress",
            Self::NeedReview => "Need Review",
            Self::NeedRevise => "Need Revise",
            Self::Done => "Done",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    /// Accepts the wire spelling in any case, so `need review` and
    /// `Need Review` are equivalent.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();

        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Backend-assigned document code, e.g. `PRD-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentCode(String);

impl DocumentCode {
    /// Parse a code, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error when the code is blank.
    pub fn parse(raw: &str) -> Result<Self, DocumentValidationError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DocumentValidationError::Blank { field: "code" });
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentCode {
    type Error = DocumentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentCode> for String {
    fn from(code: DocumentCode) -> Self {
        code.0
    }
}

impl AsRef<str> for DocumentCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend list row: `[timestamp, code, appName, owner, status]`.
pub type DocumentRow = (String, String, String, String, String);

/// A tracked document as mirrored from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRow", into = "DocumentRow")]
pub struct Document {
    pub timestamp: Timestamp,
    pub code: DocumentCode,
    pub app_name: String,
    pub owner: String,
    pub status: Status,
}

impl Document {
    /// Decode a list row.
    ///
    /// # Errors
    ///
    /// Returns an error when the timestamp, code or status cannot be decoded.
    pub fn from_row(row: DocumentRow) -> Result<Self, DocumentDecodeError> {
        let (timestamp, code, app_name, owner, status) = row;

        let timestamp = timestamp
            .trim()
            .parse::<Timestamp>()
            .map_err(|source| DocumentDecodeError::Timestamp {
                value: timestamp.clone(),
                source,
            })?;

        Ok(Self {
            timestamp,
            code: DocumentCode::parse(&code)?,
            app_name,
            owner,
            status: status.parse()?,
        })
    }

    #[must_use]
    pub fn to_row(&self) -> DocumentRow {
        (
            self.timestamp.to_string(),
            self.code.to_string(),
            self.app_name.clone(),
            self.owner.clone(),
            self.status.to_string(),
        )
    }
}

impl TryFrom<DocumentRow> for Document {
    type Error = DocumentDecodeError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Self::from_row(row)
    }
}

impl From<Document> for DocumentRow {
    fn from(document: Document) -> Self {
        document.to_row()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn row(status: &str) -> DocumentRow {
        (
            "2024-01-01T10:00:00Z".to_string(),
            "PRD-001".to_string(),
            "App A".to_string(),
            "alice".to_string(),
            status.to_string(),
        )
    }

    #[test]
    fn status_uses_wire_spelling() -> TestResult {
        assert_eq!(serde_json::to_string(&Status::OnProgress)?, "\"On Progress\"");
        assert_eq!("need revise".parse::<Status>()?, Status::NeedRevise);

        Ok(())
    }

    #[test]
    fn legacy_pending_status_is_not_accepted() {
        assert_eq!(
            "Pending".parse::<Status>(),
            Err(UnknownStatus("Pending".to_string()))
        );
    }

    #[test]
    fn decodes_backend_row() -> TestResult {
        let document: Document = serde_json::from_str(
            r#"["2024-01-01T10:00:00Z","PRD-001","App A","alice","Open"]"#,
        )?;

        assert_eq!(document.code.as_str(), "PRD-001");
        assert_eq!(document.owner, "alice");
        assert_eq!(document.status, Status::Open);
        assert_eq!(document.timestamp, "2024-01-01T10:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn rejects_row_with_unknown_status() {
        let result = Document::from_row(row("Pending"));

        assert!(matches!(result, Err(DocumentDecodeError::Status(_))));
    }

    #[test]
    fn rejects_row_with_bad_timestamp() {
        let mut bad = row("Open");
        bad.0 = "yesterday".to_string();

        assert!(matches!(
            Document::from_row(bad),
            Err(DocumentDecodeError::Timestamp { .. })
        ));
    }

    #[test]
    fn blank_code_is_invalid() {
        assert!(DocumentCode::parse("   ").is_err());
    }
}
