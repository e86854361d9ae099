use std::env;

// Gameplay Constants
//
// Both the interactive session engine and the server-side recomputation read
// these; there is exactly one copy so the preview can never drift from the
// authoritative score.
pub const BPM: f64 = 120.0;
pub const BEAT_MS: f64 = 60_000.0 / BPM;
pub const DURATION_MS: f64 = 20_000.0;
pub const DEBOUNCE_MS: f64 = 120.0;
pub const MIN_DT_MS: f64 = 50.0;
pub const MAX_DT_MS: f64 = 220.0;
pub const MAX_TAP_POINTS: u32 = 100;

// Leaderboard Constants
pub const LEADERBOARD_CAP: usize = 100;
pub const LEADERBOARD_PAGE: usize = 50;

// Remote leaderboard defaults
pub const DEFAULT_REMOTE_LEADERBOARD_URL: &str =
    "https://monad-games-id-site.vercel.app/api/leaderboard";
pub const DEFAULT_REMOTE_GAME_ID: &str = "116";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Server configuration, read once at startup from the environment.
///
/// The chain fields are optional on purpose: a missing credential only fails
/// the on-chain submission request, never the whole process.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub signer_api_key: Option<String>,
    pub rpc_url: Option<String>,
    pub games_contract: Option<String>,
    pub identity_app_id: Option<String>,
    pub cross_app_id: String,
    pub remote_leaderboard_url: String,
    pub remote_game_id: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("OFFBEAT_BIND_ADDR", DEFAULT_BIND_ADDR),
            signer_api_key: env_nonempty("SIGNER_API_KEY"),
            rpc_url: env_nonempty("CHAIN_RPC_URL"),
            games_contract: env_nonempty("GAMES_CONTRACT_ADDRESS"),
            identity_app_id: env_nonempty("IDENTITY_APP_ID"),
            cross_app_id: env_or("CROSS_APP_ID", ""),
            remote_leaderboard_url: env_or(
                "REMOTE_LEADERBOARD_URL",
                DEFAULT_REMOTE_LEADERBOARD_URL,
            ),
            remote_game_id: env_or("REMOTE_GAME_ID", DEFAULT_REMOTE_GAME_ID),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
