use clap::Args;
use prd_tracker_app::{
    dashboard::{ClientError, Dashboard},
    domain::documents::Status,
    presentation::{render_history, render_page},
    registry::{SortColumn, SortDirection},
};

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Keep documents whose code, application, owner or status contains this text
    #[arg(long)]
    search: Option<String>,

    /// Column to sort by
    #[arg(long, value_enum)]
    sort: Option<SortColumn>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// PRD number; the backend assigns the code
    #[arg(long)]
    number: String,

    /// Application name
    #[arg(long)]
    app: String,

    /// Initial status
    #[arg(long, default_value = "Open")]
    status: Status,
}

#[derive(Debug, Args)]
pub(crate) struct TransitionArgs {
    /// Document code, e.g. PRD-001
    #[arg(long)]
    code: String,

    /// Target status
    #[arg(long)]
    status: Status,

    /// Reason recorded in the audit trail
    #[arg(long, default_value = "")]
    comment: String,
}

#[derive(Debug, Args)]
pub(crate) struct HistoryArgs {
    /// Document code, e.g. PRD-001
    #[arg(long)]
    code: String,
}

fn describe(action: &str, error: &ClientError) -> String {
    if error.ends_session() {
        format!("{action}: {error}; sign in again with `prd-tracker login`")
    } else {
        format!("{action}: {error}")
    }
}

pub(crate) async fn list(dashboard: &mut Dashboard, args: ListArgs) -> Result<(), String> {
    dashboard
        .load()
        .await
        .map_err(|error| describe("failed to load documents", &error))?;

    if let Some(keyword) = args.search.as_deref() {
        dashboard.search(keyword.trim());
    }

    if let Some(column) = args.sort {
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        dashboard.sort(column, Some(direction));
    }

    dashboard
        .go_to_page(args.page)
        .map_err(|error| describe("invalid page", &error))?;

    let role = dashboard.user().map(|user| user.role).ok_or("not signed in")?;

    println!("{}", render_page(dashboard.registry(), role));

    Ok(())
}

pub(crate) async fn add(dashboard: &mut Dashboard, args: AddArgs) -> Result<(), String> {
    let document = dashboard
        .add(&args.number, &args.app, args.status)
        .await
        .map_err(|error| describe("failed to add document", &error))?;

    println!("added {} ({}, {})", document.code, document.app_name, document.status);

    Ok(())
}

pub(crate) async fn transition(
    dashboard: &mut Dashboard,
    args: TransitionArgs,
) -> Result<(), String> {
    dashboard
        .load()
        .await
        .map_err(|error| describe("failed to load documents", &error))?;

    let outcome = dashboard
        .request_transition(&args.code, args.status, &args.comment)
        .await
        .map_err(|error| describe("transition refused", &error))?;

    println!("{} is now {}", outcome.code, outcome.status);

    match outcome.history {
        Some(history) => println!("{}", render_history(&history)),
        None => println!("history could not be refreshed; run `history --code {}`", outcome.code),
    }

    Ok(())
}

pub(crate) async fn history(dashboard: &mut Dashboard, args: HistoryArgs) -> Result<(), String> {
    let entries = dashboard
        .history(&args.code)
        .await
        .map_err(|error| describe("failed to fetch history", &error))?;

    println!("{}", render_history(&entries));

    Ok(())
}
