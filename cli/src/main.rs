//! `formsite` - print the forms and results of a FormSite account.
//!
//! Credentials come from flags or the `FORMSITE_*` environment variables.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use formsite_core::{Account, Credentials, FormResult, ItemValue, UreqTransport};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "formsite", version, about = "List FormSite forms and their results")]
struct Cli {
    /// Account user name.
    #[arg(long, env = "FORMSITE_USER")]
    user: String,

    /// API key sent with every request.
    #[arg(long, env = "FORMSITE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Server shard hosting the account.
    #[arg(long, env = "FORMSITE_SERVER", default_value = formsite_core::config::DEFAULT_SERVER)]
    server: String,

    /// Replace `https://{server}.formsite.com`, e.g. to target the mock server.
    #[arg(long, env = "FORMSITE_API_ROOT")]
    api_root: Option<String>,

    /// Also print each form's status.
    #[arg(long)]
    status: bool,

    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn credentials(&self) -> Credentials {
        let creds = Credentials::new(&self.user, &self.api_key).with_server(&self.server);
        match &self.api_root {
            Some(root) => creds.with_api_root(root),
            None => creds,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formsite=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let account = Account::connect(cli.credentials(), Arc::new(UreqTransport::new()))
        .with_context(|| format!("failed to list forms for {}", cli.user))?;
    info!(user = account.user(), forms = account.len(), "connected");

    println!("{} forms", account.len());
    for form in &account {
        if cli.status {
            let status = form
                .status()
                .with_context(|| format!("failed to fetch status of {}", form.directory()))?;
            println!(
                "{form}: {} (modified {}, results {}/{}, items {}/{})",
                status.state,
                status.last_modified,
                status.limit_results.used,
                status.limit_results.total,
                status.limit_items.used,
                status.limit_items.total
            );
        }

        let results = form
            .results()
            .with_context(|| format!("failed to fetch results of {}", form.directory()))?;
        if results.is_empty() {
            continue;
        }

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&results.into_vec())?);
            continue;
        }

        println!("{form} {}", results.len());
        for result in &results {
            println!("  {result}");
            if result.is_complete() {
                print_items(result);
            }
        }
    }
    Ok(())
}

fn print_items(result: &FormResult) {
    for (id, value) in &result.items {
        match value {
            ItemValue::Text(text) => println!("    {id}: {text}"),
            ItemValue::List(values) => {
                let joined: Vec<String> = values.iter().map(|(i, v)| format!("{i}={v}")).collect();
                println!("    {id}: [{}]", joined.join(", "));
            }
        }
    }
}
