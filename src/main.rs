use anyhow::Context;
use coffee_shop::{
    app::{self, AppState},
    authorize::jwt::{
        jwk_set::{fetch::HttpJwkSetFetcher, KeySetCache},
        JwtVerifier, Validation,
    },
    config::Config,
    drinks::DrinkStore,
    server,
    users::{ClientCredentials, HttpUserManagement, RoleIds, Staff},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::init("coffee_shop")?;

    let config = Config::from_env().context("Failed to load configuration")?;

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build http client")?;

    let verifier = JwtVerifier::new(
        KeySetCache::new(
            config.jwks_time_to_live,
            config.jwks_refetch_cooldown,
            HttpJwkSetFetcher::for_domain(&config.auth_domain, http_client.clone()),
        ),
        Validation::for_provider(&config.auth_domain, &config.api_audience)
            .algorithms(config.algorithms.clone()),
    );

    // Keys are fetched lazily otherwise, a failure here is not fatal.
    if let Err(err) = verifier.key_set_cache().get_keys().await {
        tracing::warn!(%err, "Signing keys are not available yet");
    }

    let credentials = match (config.client_id.clone(), config.client_secret.clone()) {
        (Some(client_id), Some(client_secret)) => Some(ClientCredentials {
            client_id,
            client_secret,
        }),
        _ => {
            tracing::warn!("Management API credentials missing, staff endpoints will fail");

            None
        }
    };

    let state = AppState {
        drinks: DrinkStore::new(),
        staff: Staff::new(
            HttpUserManagement::new(config.auth_domain.clone(), credentials, http_client),
            RoleIds {
                barista: config.barista_role_id.clone(),
                manager: config.manager_role_id.clone(),
            },
        ),
    };

    let app = app::router(verifier, state)
        .layer(server::cors_layer())
        .layer(server::trace_layer());

    server::serve(app, config.bind_addr).await
}
