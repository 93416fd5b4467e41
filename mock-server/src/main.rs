use mock_server::MockAccount;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("MOCK_FORMSITE_PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    let root = format!("http://{}", listener.local_addr()?);

    let account = MockAccount::sample();
    println!("serving FormSite account `{}` at {root}", account.user);
    for form in &account.forms {
        println!("  {} ({} results)", form.directory, form.results.len());
    }
    println!(
        "FORMSITE_API_ROOT={root} FORMSITE_USER={} FORMSITE_API_KEY={}",
        account.user, account.api_key
    );

    mock_server::run_with(listener, account).await
}
