use std::sync::Arc;

use chrono::TimeDelta;
use secrecy::Secret;
use tokio::sync::RwLock;

use jobsprint_adapters::config::Settings;
use jobsprint_adapters::{
    Argon2SecretHasher, FieldCipher, JwtTokenService, PostgresAccountStore, PostmarkEmailClient,
    RedisRevocationStore, TokenConfig,
};
use jobsprint_core::Email;
use jobsprint_service::{AuthService, startup};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    color_eyre::install().expect("Failed to install color_eyre");
    startup::init_tracing().expect("Failed to initialize tracing");

    // Load configuration
    let settings = Settings::load()?;

    // Setup database connection pool and run migrations
    let pg_pool = startup::get_postgres_pool(&settings.postgres).await?;
    sqlx::migrate!().run(&pg_pool).await?;

    // Setup Redis connection
    let redis_client = startup::get_redis_client(&settings.redis.host_name)?;
    let redis_conn = Arc::new(RwLock::new(redis_client.get_connection()?));

    // Create stores
    let cipher = FieldCipher::new(&settings.auth.field_key)?;
    let account_store = PostgresAccountStore::new(pg_pool, cipher);
    let revocation_store = RedisRevocationStore::new(redis_conn);

    // Create the hashing and token services
    let hasher = Argon2SecretHasher::for_passwords();
    let token_service = JwtTokenService::new(TokenConfig {
        access_secret: settings.auth.access_token.secret.clone(),
        refresh_secret: settings.auth.refresh_token.secret.clone(),
        access_ttl_seconds: settings.auth.access_token.ttl_seconds,
        refresh_ttl_seconds: settings.auth.refresh_token.ttl_seconds,
    });

    // Create email client
    let http_client = reqwest::Client::builder()
        .timeout(settings.email_client.timeout())
        .build()?;

    let email_client = PostmarkEmailClient::new(
        settings.email_client.base_url.clone(),
        Email::try_from(Secret::from(settings.email_client.sender.clone()))?,
        settings.email_client.auth_token.clone(),
        http_client,
    );

    // Wire the service
    let auth_service = AuthService::new(
        account_store,
        revocation_store,
        hasher,
        token_service,
        email_client,
        TimeDelta::minutes(settings.auth.otp_ttl_minutes),
    );

    let address = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on {address}");

    auth_service
        .run(listener, Some(settings.application.allowed_origins.clone()))
        .await?;

    Ok(())
}
