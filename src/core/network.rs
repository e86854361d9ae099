use crate::error::AppError;
use log::warn;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Exposes the globally configured ureq Agent for outbound requests.
/// Non-2xx statuses are not turned into errors here: the proxy relays the
/// upstream status verbatim.
pub fn get_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Fetches one page of the remote leaderboard service. Returns the upstream
/// status and its JSON body (an empty object when the body is not JSON), so
/// the caller can relay both unchanged.
pub fn fetch_remote_leaderboard(
    agent: &ureq::Agent,
    base_url: &str,
    game_id: &str,
    page: &str,
    sort_by: &str,
) -> Result<(u16, Value), AppError> {
    let response = agent
        .get(base_url)
        .query("gameId", game_id)
        .query("page", page)
        .query("sortBy", sort_by)
        .call()
        .map_err(|e| {
            warn!("Remote leaderboard request failed: {}", e);
            AppError::Upstream
        })?;

    let status = response.status().as_u16();
    let body = response.into_body().read_to_string().map_err(|e| {
        warn!("Failed to read remote leaderboard body: {}", e);
        AppError::Upstream
    })?;
    let json = serde_json::from_str(&body).unwrap_or_else(|_| Value::Object(Default::default()));
    Ok((status, json))
}
