use fbgraph::{CallOptions, ClientConfig, GraphClient, Params};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let token = env::var("FACEBOOK_ACCESS_TOKEN").expect("FACEBOOK_ACCESS_TOKEN is required");
    let client = GraphClient::new(ClientConfig::new(token))?;

    let mut params = Params::new();
    params.insert("limit".to_string(), "5".to_string());
    let mut page = client
        .get_connections("me", "feed", params, CallOptions::default())
        .await?
        .into_collection();

    let mut pages = 0;
    while let Some(current) = page {
        pages += 1;
        for post in &current {
            println!("{}", post["id"]);
        }
        if pages == 3 {
            break;
        }
        page = current.next_page().await?;
    }

    Ok(())
}
