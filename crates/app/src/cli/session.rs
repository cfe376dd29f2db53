use clap::Args;
use prd_tracker_app::dashboard::Dashboard;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account name
    #[arg(long)]
    username: String,

    /// Account password
    #[arg(long, env = "PRD_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn login(dashboard: &mut Dashboard, args: LoginArgs) -> Result<(), String> {
    let user = dashboard
        .login(&args.username, &args.password)
        .await
        .map_err(|error| format!("login failed: {error}"))?;

    println!("signed in as {} ({})", user.name, user.role);

    Ok(())
}

pub(crate) fn logout(dashboard: &mut Dashboard) -> Result<(), String> {
    dashboard
        .logout()
        .map_err(|error| format!("failed to clear session: {error}"))?;

    println!("signed out");

    Ok(())
}

pub(crate) fn whoami(dashboard: &Dashboard) -> Result<(), String> {
    match dashboard.user() {
        Some(user) => println!("{} ({})", user.name, user.role),
        None => println!("not signed in"),
    }

    Ok(())
}
