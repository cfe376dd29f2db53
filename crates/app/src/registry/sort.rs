//! Sorting

use std::{cmp::Ordering, fmt};

use crate::domain::documents::Document;

/// Column a registry view can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SortColumn {
    Timestamp,
    Code,
    App,
    Owner,
    Status,
}

impl SortColumn {
    /// Total order on documents for this column.
    ///
    /// Timestamps compare by instant; text compares case-insensitively.
    #[must_use]
    pub fn compare(self, left: &Document, right: &Document) -> Ordering {
        match self {
            Self::Timestamp => left.timestamp.cmp(&right.timestamp),
            Self::Code => cmp_ignore_case(left.code.as_str(), right.code.as_str()),
            Self::App => cmp_ignore_case(&left.app_name, &right.app_name),
            Self::Owner => cmp_ignore_case(&left.owner, &right.owner),
            Self::Status => cmp_ignore_case(left.status.as_str(), right.status.as_str()),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timestamp => "timestamp",
            Self::Code => "code",
            Self::App => "app",
            Self::Owner => "owner",
            Self::Status => "status",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    /// Next sort state after the operator picks `column`.
    ///
    /// Reselecting the active column flips direction; a new column starts
    /// ascending. An explicit `direction` always wins.
    #[must_use]
    pub fn select(
        current: Option<Self>,
        column: SortColumn,
        direction: Option<SortDirection>,
    ) -> Self {
        let direction = direction.unwrap_or_else(|| match current {
            Some(active) if active.column == column => active.direction.toggled(),
            _ => SortDirection::Ascending,
        });

        Self { column, direction }
    }

    /// Stable in-place sort; equal keys keep their relative order.
    pub fn sort(self, documents: &mut [Document]) {
        documents.sort_by(|left, right| self.direction.apply(self.column.compare(left, right)));
    }
}

fn cmp_ignore_case(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reselecting_column_toggles_direction() {
        let first = SortState::select(None, SortColumn::Code, None);
        let second = SortState::select(Some(first), SortColumn::Code, None);
        let third = SortState::select(Some(second), SortColumn::Code, None);

        assert_eq!(first.direction, SortDirection::Ascending);
        assert_eq!(second.direction, SortDirection::Descending);
        assert_eq!(third.direction, SortDirection::Ascending);
    }

    #[test]
    fn new_column_resets_to_ascending() {
        let current = SortState {
            column: SortColumn::Code,
            direction: SortDirection::Descending,
        };

        let next = SortState::select(Some(current), SortColumn::Owner, None);

        assert_eq!(next.direction, SortDirection::Ascending);
    }

    #[test]
    fn explicit_direction_overrides_toggle() {
        let current = SortState {
            column: SortColumn::Code,
            direction: SortDirection::Descending,
        };

        let next = SortState::select(Some(current), SortColumn::Code, Some(SortDirection::Descending));

        assert_eq!(next.direction, SortDirection::Descending);
    }

    #[test]
    fn text_comparison_ignores_case() {
        assert_eq!(cmp_ignore_case("app b", "App A"), Ordering::Greater);
        assert_eq!(cmp_ignore_case("ALICE", "alice"), Ordering::Equal);
    }
}
