use reqwest::Client;

use crate::config::settings::Settings;

/// Shared outbound client. Every upstream call inherits its timeouts.
pub fn build_client(settings: &Settings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(settings.upstream_timeout)
        .connect_timeout(settings.connect_timeout)
        .user_agent(concat!("signbridge/", env!("CARGO_PKG_VERSION")))
        .build()
}
