//! Text rendering of the registry view and document history.

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    domain::{
        documents::{Document, HistoryEntry},
        users::Role,
        workflow::{Action, legal_actions},
    },
    registry::Registry,
};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the current page of `registry` with the actions `role` may take.
#[must_use]
pub fn render_page(registry: &Registry, role: Role) -> String {
    let rows = registry.current_page();

    let mut builder = Builder::default();
    builder.push_record(["Code", "Application", "Status", "Owner", "Date", "Actions"]);

    for document in rows {
        builder.push_record(document_row(document, role));
    }

    let body = if rows.is_empty() {
        String::from("No documents.\n")
    } else {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .modify(Rows::first(), Alignment::center());

        format!("{table}\n")
    };

    let matching = if registry.keyword().is_empty() {
        String::new()
    } else {
        format!(" matching \"{}\"", registry.keyword())
    };

    format!(
        "{body}Page {} of {} ({} documents{matching})",
        registry.page(),
        registry.total_pages(),
        registry.filtered().len()
    )
}

fn document_row(document: &Document, role: Role) -> [String; 6] {
    [
        document.code.to_string(),
        document.app_name.clone(),
        document.status.to_string(),
        document.owner.clone(),
        document.timestamp.strftime(DATE_FORMAT).to_string(),
        describe_actions(&legal_actions(role, document.status)),
    ]
}

fn describe_actions(actions: &[Action]) -> String {
    if actions.is_empty() {
        return "-".to_string();
    }

    if actions.iter().all(|action| matches!(action, Action::SetStatus(_))) {
        return "set status".to_string();
    }

    actions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an audit trail, oldest first as given.
#[must_use]
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["When", "User", "Activity", "Comment"]);

    for entry in entries {
        builder.push_record([
            entry.timestamp.strftime(DATE_FORMAT).to_string(),
            entry.user.clone(),
            entry.activity.clone(),
            entry
                .comment
                .clone()
                .unwrap_or_else(|| entry.details.clone()),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .modify(Columns::first(), Alignment::left());

    table.to_string()
}
