use std::sync::Arc;

use anyhow::{Context, bail};
use serde_json::json;

use learnhub_auth::{FileStorage, Navigation, RouteTable, SessionStore};
use learnhub_client::{ApiClient, AuthFlow, ClientConfig, FormFailure};

const USAGE: &str = "usage: learnhub <status | login <email> <password> | logout | refresh | check <path>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    learnhub_observability::init();

    let config = ClientConfig::from_env();
    let store = Arc::new(SessionStore::restore(Arc::new(FileStorage::new(
        config.session_dir.clone(),
    ))));
    let client = ApiClient::new(&config, store.clone()).context("failed to build HTTP client")?;
    let flow = AuthFlow::new(client);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["status"] | [] => {
            let session = store.snapshot();
            match session.user() {
                Some(user) => println!(
                    "signed in as {} <{}> ({})",
                    user.full_name(),
                    user.email,
                    session
                        .role()
                        .map(|r| r.label().unwrap_or(r.as_str()))
                        .unwrap_or("no role")
                ),
                None => println!("not signed in"),
            }
        }
        ["login", email, password] => {
            let input = json!({ "email": email, "password": password });
            match flow.login(&input).await {
                Ok(user) => println!("signed in as {}", user.email),
                Err(failure) => {
                    report(&failure);
                    bail!("login failed");
                }
            }
        }
        ["logout"] => {
            flow.logout().await;
            println!("signed out");
        }
        ["refresh"] => {
            let user = flow.refresh_current_user().await?;
            println!("refreshed {}", user.email);
        }
        ["check", path] => match RouteTable::standard().navigate(&store.snapshot(), path) {
            Navigation::Render(matched) => println!("render {:?}", matched.view),
            Navigation::Redirect(redirect) => {
                println!("redirect {} ({:?})", redirect.to, redirect.reason)
            }
        },
        _ => bail!(USAGE),
    }

    Ok(())
}

fn report(failure: &FormFailure) {
    for (path, message) in failure.errors.iter() {
        eprintln!("{path}: {message}");
    }
}
