pub mod activity_log_repo;
pub mod lot_repo;
pub mod project_repo;
pub mod quote_repo;
pub mod repository_error;
pub mod user_repo;

use crate::config::mongo_conf::MongoConfig;

/// Open a database handle from config. Every Mongo repository constructor
/// goes through here so connection options stay in one place.
pub(crate) async fn mongo_database(
    config: &MongoConfig,
) -> Result<mongodb::Database, mongodb::error::Error> {
    use mongodb::{options::{ClientOptions, Credential, ResolverConfig}, Client};

    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
    client_options.app_name = Some("ChantierBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout =
        Some(std::time::Duration::from_secs(config.connection_timeout_secs));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(Credential::builder()
            .username(username.clone())
            .password(password.clone())
            .build());
    }

    let client = Client::with_options(client_options)?;
    Ok(client.database(&config.database))
}
