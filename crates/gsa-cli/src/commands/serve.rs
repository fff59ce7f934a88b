use crate::config::Config;
use anyhow::Result;
use gsa_gateway::{start_server, AppState, AuthCookieSettings, SearchDefaults};
use std::time::Duration;
use tracing::{info, warn};

pub async fn execute(host: Option<String>, port: Option<u16>, config: &Config) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    if config.systems.is_empty() {
        warn!("No systems configured; every API call will be rejected");
    }
    info!(
        host = %host,
        port,
        systems = config.systems.systems().count(),
        "Starting gateway server"
    );

    start_server(build_state(config), &host, port).await?;

    Ok(())
}

fn build_state(config: &Config) -> AppState {
    let mut state = AppState::new(config.systems.clone())
        .with_defaults(SearchDefaults {
            client: config.search.client.clone(),
            results_per_page: config.search.results_per_page,
            max_suggestions: config.search.max_suggestions,
        })
        .with_allowed_origins(config.server.allowed_origins.clone());

    if let Some(cookie) = &config.auth_cookie {
        state = state.with_auth_cookie(AuthCookieSettings {
            name: cookie.name.clone(),
            http_only: cookie.http_only,
            secure: cookie.secure,
            ttl: cookie.ttl_secs.map(Duration::from_secs),
        });
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::DEFAULT_CONFIG;

    #[test]
    fn test_state_from_config() {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.search.client = "intranet".into();
        config.server.allowed_origins = vec!["http://portal".into()];

        let state = build_state(&config);
        assert_eq!(state.defaults.client, "intranet");
        assert_eq!(state.allowed_origins, vec!["http://portal"]);
        assert!(state.auth_cookie.is_none());
        assert!(state.systems.resolve("intranet", gsa_search::Endpoint::Feed).is_some());
    }

    #[test]
    fn test_auth_cookie_settings_carried_over() {
        let config: Config = toml::from_str(
            r#"
            [auth_cookie]
            name = "session"
            secure = true
            ttl_secs = 60
            "#,
        )
        .unwrap();

        let state = build_state(&config);
        let cookie = state.auth_cookie.unwrap();
        assert_eq!(cookie.name, "session");
        assert!(cookie.secure);
        assert_eq!(cookie.ttl, Some(Duration::from_secs(60)));
    }
}
