//! Document Data

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::documents::{
    Document, DocumentCode, DocumentDecodeError, DocumentValidationError, Status,
};

/// Fields an operator supplies when registering a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub prd_number: String,
    pub app_name: String,
    pub status: Status,
}

impl NewDocument {
    /// Build a new document request with trimmed fields.
    ///
    /// # Errors
    ///
    /// Returns an error when the number or application name is blank.
    pub fn new(
        prd_number: &str,
        app_name: &str,
        status: Status,
    ) -> Result<Self, DocumentValidationError> {
        let prd_number = prd_number.trim();
        let app_name = app_name.trim();

        if prd_number.is_empty() {
            return Err(DocumentValidationError::Blank { field: "prdNumber" });
        }

        if app_name.is_empty() {
            return Err(DocumentValidationError::Blank { field: "appName" });
        }

        Ok(Self {
            prd_number: prd_number.to_string(),
            app_name: app_name.to_string(),
            status,
        })
    }
}

/// Object form of a document, as returned after `add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub timestamp: String,
    pub code: String,
    pub app_name: String,
    pub user: String,
    pub status: String,
}

impl From<&Document> for DocumentRecord {
    fn from(document: &Document) -> Self {
        Self {
            timestamp: document.timestamp.to_string(),
            code: document.code.to_string(),
            app_name: document.app_name.clone(),
            user: document.owner.clone(),
            status: document.status.to_string(),
        }
    }
}

impl TryFrom<DocumentRecord> for Document {
    type Error = DocumentDecodeError;

    fn try_from(record: DocumentRecord) -> Result<Self, Self::Error> {
        let timestamp = record.timestamp.trim().parse::<Timestamp>().map_err(|source| {
            DocumentDecodeError::Timestamp {
                value: record.timestamp.clone(),
                source,
            }
        })?;

        Ok(Self {
            timestamp,
            code: DocumentCode::parse(&record.code)?,
            app_name: record.app_name,
            owner: record.user,
            status: record.status.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_document_trims_fields() -> TestResult {
        let document = NewDocument::new(" 042 ", "  Billing ", Status::Open)?;

        assert_eq!(document.prd_number, "042");
        assert_eq!(document.app_name, "Billing");

        Ok(())
    }

    #[test]
    fn new_document_requires_application_name() {
        assert_eq!(
            NewDocument::new("042", " ", Status::Open),
            Err(DocumentValidationError::Blank { field: "appName" })
        );
    }

    #[test]
    fn record_decodes_into_document() -> TestResult {
        let record: DocumentRecord = serde_json::from_str(
            r#"{"timestamp":"2024-03-01T08:30:00Z","code":"PRD-042","appName":"Billing","user":"bob","status":"On Progress"}"#,
        )?;

        let document = Document::try_from(record)?;

        assert_eq!(document.code.as_str(), "PRD-042");
        assert_eq!(document.owner, "bob");
        assert_eq!(document.status, Status::OnProgress);

        Ok(())
    }
}
