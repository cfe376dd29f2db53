//! Registry view

use std::num::NonZeroUsize;

use rustc_hash::FxHashSet;
use tracing::warn;

use crate::{
    domain::documents::{Document, DocumentCode, Status},
    registry::{RegistryError, SortColumn, SortDirection, SortState},
};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(limit) => limit,
    None => NonZeroUsize::MIN,
};

/// Canonical mirror plus the derived, paginated view.
#[derive(Debug, Clone)]
pub struct Registry {
    all: Vec<Document>,
    filtered: Vec<Document>,
    keyword: String,
    sort: Option<SortState>,
    page: usize,
    limit: NonZeroUsize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Registry {
    #[must_use]
    pub const fn new(limit: NonZeroUsize) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            keyword: String::new(),
            sort: None,
            page: 1,
            limit,
        }
    }

    /// Replace the mirror with a fresh backend listing.
    ///
    /// Clears the search, keeps the active sort and returns to page 1. When a
    /// code appears more than once the first row wins.
    pub fn load(&mut self, documents: Vec<Document>) {
        let mut seen = FxHashSet::default();

        self.all = documents
            .into_iter()
            .filter(|document| {
                let fresh = seen.insert(document.code.clone());

                if !fresh {
                    warn!(code = %document.code, "registry.duplicate_code");
                }

                fresh
            })
            .collect();

        self.keyword.clear();
        self.page = 1;
        self.refresh();
    }

    /// Filter by a case-insensitive substring of code, application, owner or
    /// status. The keyword is matched as given, whitespace included; an empty
    /// keyword shows everything.
    pub fn search(&mut self, keyword: &str) {
        self.keyword = keyword.to_lowercase();
        self.page = 1;
        self.refresh();
    }

    /// Order the view by `column`; see [`SortState::select`].
    pub fn sort(&mut self, column: SortColumn, direction: Option<SortDirection>) {
        self.sort = Some(SortState::select(self.sort, column, direction));
        self.page = 1;
        self.refresh();
    }

    /// Rows on `page`, without changing the current page.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PageOutOfRange`] when `page` is outside
    /// `1..=total_pages`.
    pub fn paginate(&self, page: usize) -> Result<&[Document], RegistryError> {
        let total_pages = self.total_pages();

        if page == 0 || page > total_pages {
            return Err(RegistryError::PageOutOfRange { page, total_pages });
        }

        let start = (page - 1) * self.limit.get();
        let end = (start + self.limit.get()).min(self.filtered.len());

        Ok(self.filtered.get(start..end).unwrap_or_default())
    }

    /// Move to `page` and return its rows. Out-of-range pages leave the view
    /// untouched.
    ///
    /// # Errors
    ///
    /// See [`Registry::paginate`].
    pub fn go_to_page(&mut self, page: usize) -> Result<&[Document], RegistryError> {
        self.paginate(page)?;
        self.page = page;

        self.paginate(page)
    }

    /// Rows on the current page.
    #[must_use]
    pub fn current_page(&self) -> &[Document] {
        self.paginate(self.page).unwrap_or_default()
    }

    /// Show a document the backend just created, ahead of the next `load`.
    ///
    /// The document goes first, replacing any stale row with the same code.
    /// The search is cleared so the new row is visible.
    pub fn apply_optimistic_insert(&mut self, document: Document) {
        self.all.retain(|existing| existing.code != document.code);
        self.all.insert(0, document);

        self.keyword.clear();
        self.page = 1;
        self.refresh();
    }

    /// Reflect a confirmed status change ahead of the next `load`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDocument`] if `code` is not mirrored.
    pub fn apply_optimistic_status_update(
        &mut self,
        code: &DocumentCode,
        status: Status,
    ) -> Result<(), RegistryError> {
        let document = self
            .all
            .iter_mut()
            .find(|document| &document.code == code)
            .ok_or_else(|| RegistryError::UnknownDocument(code.clone()))?;

        document.status = status;

        self.refresh();
        self.clamp_page();

        Ok(())
    }

    #[must_use]
    pub fn find(&self, code: &DocumentCode) -> Option<&Document> {
        self.all.iter().find(|document| &document.code == code)
    }

    #[must_use]
    pub fn all(&self) -> &[Document] {
        &self.all
    }

    #[must_use]
    pub fn filtered(&self) -> &[Document] {
        &self.filtered
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub const fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> NonZeroUsize {
        self.limit
    }

    /// Number of pages in the view; an empty view still has one page.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.limit.get()).max(1)
    }

    /// Re-derive the view from the mirror with the active keyword and sort.
    fn refresh(&mut self) {
        self.filtered = self
            .all
            .iter()
            .filter(|document| matches_keyword(document, &self.keyword))
            .cloned()
            .collect();

        if let Some(state) = self.sort {
            state.sort(&mut self.filtered);
        }
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }
}

fn matches_keyword(document: &Document, keyword: &str) -> bool {
    if keyword.is_empty() {
        return true;
    }

    [
        document.code.as_str(),
        document.app_name.as_str(),
        document.owner.as_str(),
        document.status.as_str(),
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(keyword))
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use super::*;

    fn document(day: i64, code: &str, app: &str, owner: &str, status: Status) -> TestResult<Document> {
        let base: Timestamp = "2024-01-01T10:00:00Z".parse()?;

        Ok(Document {
            timestamp: base.checked_add(SignedDuration::from_hours(24 * day))?,
            code: DocumentCode::parse(code)?,
            app_name: app.to_string(),
            owner: owner.to_string(),
            status,
        })
    }

    fn numbered(count: usize) -> TestResult<Vec<Document>> {
        (0..count)
            .map(|index| {
                document(
                    i64::try_from(index)?,
                    &format!("PRD-{index:03}"),
                    "App",
                    "alice",
                    Status::Open,
                )
            })
            .collect()
    }

    fn codes(documents: &[Document]) -> Vec<&str> {
        documents.iter().map(|document| document.code.as_str()).collect()
    }

    #[test]
    fn twenty_three_documents_make_three_pages() -> TestResult {
        let mut registry = Registry::default();
        registry.load(numbered(23)?);

        assert_eq!(registry.paginate(1)?.len(), 10);
        assert_eq!(registry.paginate(3)?.len(), 3);
        assert_eq!(
            registry.paginate(4),
            Err(RegistryError::PageOutOfRange {
                page: 4,
                total_pages: 3
            })
        );
        assert!(registry.paginate(0).is_err());

        Ok(())
    }

    #[test]
    fn rejected_page_change_keeps_current_page() -> TestResult {
        let mut registry = Registry::default();
        registry.load(numbered(23)?);
        registry.go_to_page(2)?;

        assert!(registry.go_to_page(9).is_err());
        assert_eq!(registry.page(), 2);

        Ok(())
    }

    #[test]
    fn same_page_twice_is_identical() -> TestResult {
        let mut registry = Registry::default();
        registry.load(numbered(23)?);

        let first = registry.paginate(2)?.to_vec();

        assert_eq!(registry.paginate(2)?, first.as_slice());

        Ok(())
    }

    #[test]
    fn empty_registry_has_single_empty_page() -> TestResult {
        let registry = Registry::default();

        assert_eq!(registry.total_pages(), 1);
        assert!(registry.paginate(1)?.is_empty());

        Ok(())
    }

    #[test]
    fn search_matches_any_text_field_case_insensitively() -> TestResult {
        let mut registry = Registry::default();
        registry.load(vec![
            document(0, "PRD-001", "Billing", "alice", Status::Open)?,
            document(1, "PRD-002", "Payroll", "BOB", Status::Done)?,
            document(2, "PRD-003", "Ledger", "carol", Status::NeedReview)?,
        ]);

        registry.search("bob");
        assert_eq!(codes(registry.filtered()), ["PRD-002"]);

        registry.search("REVIEW");
        assert_eq!(codes(registry.filtered()), ["PRD-003"]);

        registry.search("prd-00");
        assert_eq!(registry.filtered().len(), 3);

        Ok(())
    }

    #[test]
    fn search_keeps_whitespace_in_keyword() -> TestResult {
        let mut registry = Registry::default();
        registry.load(vec![
            document(0, "PRD-001", "App A", "alice", Status::Open)?,
            document(1, "PRD-002", "Billing", "bob", Status::Open)?,
        ]);

        registry.search(" ");

        assert_eq!(codes(registry.filtered()), ["PRD-001"], "only rows containing a space match");
        assert_eq!(registry.keyword(), " ");

        Ok(())
    }

    #[test]
    fn search_resets_page() -> TestResult {
        let mut registry = Registry::default();
        registry.load(numbered(23)?);
        registry.go_to_page(3)?;

        registry.search("PRD");

        assert_eq!(registry.page(), 1);

        Ok(())
    }

    #[test]
    fn clearing_search_matches_fresh_sort() -> TestResult {
        let rows = vec![
            document(2, "PRD-003", "ledger", "carol", Status::Open)?,
            document(0, "PRD-001", "Billing", "alice", Status::Done)?,
            document(1, "PRD-002", "billing", "bob", Status::Open)?,
        ];

        let mut searched = Registry::default();
        searched.load(rows.clone());
        searched.sort(SortColumn::App, None);
        searched.search("carol");
        searched.search("");

        let mut direct = Registry::default();
        direct.load(rows);
        direct.sort(SortColumn::App, None);

        assert_eq!(searched.filtered(), direct.filtered());

        Ok(())
    }

    #[test]
    fn sort_is_stable_and_descending_reverses() -> TestResult {
        let mut registry = Registry::default();
        registry.load(vec![
            document(0, "PRD-001", "Billing", "alice", Status::Open)?,
            document(1, "PRD-002", "billing", "bob", Status::Open)?,
            document(2, "PRD-003", "Atlas", "carol", Status::Open)?,
        ]);

        registry.sort(SortColumn::App, None);
        assert_eq!(codes(registry.filtered()), ["PRD-003", "PRD-001", "PRD-002"]);

        registry.sort(SortColumn::App, None);
        assert_eq!(codes(registry.filtered()), ["PRD-001", "PRD-002", "PRD-003"]);

        registry.sort(SortColumn::Timestamp, Some(SortDirection::Descending));
        assert_eq!(codes(registry.filtered()), ["PRD-003", "PRD-002", "PRD-001"]);

        Ok(())
    }

    #[test]
    fn load_keeps_first_of_duplicate_codes() -> TestResult {
        let mut registry = Registry::default();
        registry.load(vec![
            document(0, "PRD-001", "First", "alice", Status::Open)?,
            document(1, "PRD-001", "Second", "bob", Status::Done)?,
        ]);

        assert_eq!(registry.all().len(), 1);
        assert!(registry.all().iter().all(|document| document.app_name == "First"));

        Ok(())
    }

    #[test]
    fn load_reapplies_sort_and_clears_search() -> TestResult {
        let mut registry = Registry::default();
        registry.sort(SortColumn::Code, Some(SortDirection::Descending));
        registry.search("nothing matches");

        registry.load(numbered(3)?);

        assert_eq!(registry.keyword(), "");
        assert_eq!(codes(registry.filtered()), ["PRD-002", "PRD-001", "PRD-000"]);

        Ok(())
    }

    #[test]
    fn optimistic_insert_goes_first_and_replaces_stale_row() -> TestResult {
        let mut registry = Registry::default();
        registry.load(numbered(3)?);
        registry.search("PRD-002");

        registry.apply_optimistic_insert(document(9, "PRD-001", "Renamed", "dave", Status::Open)?);

        assert_eq!(registry.keyword(), "");
        assert_eq!(codes(registry.all()), ["PRD-001", "PRD-000", "PRD-002"]);
        assert_eq!(registry.all().len(), 3);

        Ok(())
    }

    #[test]
    fn optimistic_status_update_keeps_search_and_clamps_page() -> TestResult {
        let mut registry = Registry::new(NonZeroUsize::MIN);
        registry.load(vec![
            document(0, "PRD-001", "App", "alice", Status::Open)?,
            document(1, "PRD-002", "App", "alice", Status::Open)?,
        ]);
        registry.search("open");
        registry.go_to_page(2)?;

        registry.apply_optimistic_status_update(&DocumentCode::parse("PRD-002")?, Status::NeedReview)?;

        assert_eq!(registry.keyword(), "open");
        assert_eq!(codes(registry.filtered()), ["PRD-001"]);
        assert_eq!(registry.page(), 1);
        assert_eq!(
            registry
                .find(&DocumentCode::parse("PRD-002")?)
                .map(|document| document.status),
            Some(Status::NeedReview)
        );

        Ok(())
    }

    #[test]
    fn status_update_for_unknown_code_fails() -> TestResult {
        let mut registry = Registry::default();
        let code = DocumentCode::parse("PRD-404")?;

        assert_eq!(
            registry.apply_optimistic_status_update(&code, Status::Done),
            Err(RegistryError::UnknownDocument(code))
        );

        Ok(())
    }
}
