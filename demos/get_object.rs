use fbgraph::{CallOptions, ClientConfig, GraphClient, Params};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let token = env::var("FACEBOOK_ACCESS_TOKEN").expect("FACEBOOK_ACCESS_TOKEN is required");
    let object = env::args().nth(1).unwrap_or_else(|| "me".to_string());

    let mut config = ClientConfig::new(token);
    if let Ok(secret) = env::var("FACEBOOK_APP_SECRET") {
        config = config.with_app_secret(secret);
    }
    let client = GraphClient::new(config)?;

    let name = client
        .get_object_with(&object, Params::new(), CallOptions::default(), |result| {
            result
                .as_value()
                .and_then(|value| value["name"].as_str().map(str::to_string))
        })
        .await?;
    println!("name: {}", name.unwrap_or_default());

    let picture = client
        .get_picture(&object, Params::new(), CallOptions::default())
        .await?;
    println!("picture: {picture:?}");

    Ok(())
}
