use crate::config::ServerConfig;
use crate::error::AppError;
use log::{info, warn};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use sha3::{Digest, Keccak256};

/// `updatePlayerData(address,uint256,uint256)` on the score registry.
const UPDATE_PLAYER_DATA_SIG: &str = "updatePlayerData(address,uint256,uint256)";

static UPDATE_PLAYER_DATA_SELECTOR: Lazy<[u8; 4]> = Lazy::new(|| {
    let digest = Keccak256::digest(UPDATE_PLAYER_DATA_SIG.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
});

/// Records `(player, score, tx_count)` on the remote ledger. The handler
/// only ever sees this seam; the signing mechanics live behind it.
pub trait ScoreLedger: Send + Sync {
    fn record_score(&self, player: &str, score: u64, tx_count: u64) -> Result<String, AppError>;
}

/// Production ledger: builds the contract calldata and hands the write to a
/// signing-capable RPC endpoint, authenticated with the backend credential.
/// Key custody and transaction signing are the endpoint's concern.
///
/// All three settings stay optional so a bare deployment still serves the
/// local leaderboard; the missing piece is reported per request.
pub struct JsonRpcLedger {
    agent: ureq::Agent,
    signer_api_key: Option<String>,
    rpc_url: Option<String>,
    contract: Option<String>,
}

impl JsonRpcLedger {
    pub fn new(agent: ureq::Agent, config: &ServerConfig) -> Self {
        Self {
            agent,
            signer_api_key: config.signer_api_key.clone(),
            rpc_url: config.rpc_url.clone(),
            contract: config.games_contract.clone(),
        }
    }
}

impl ScoreLedger for JsonRpcLedger {
    fn record_score(&self, player: &str, score: u64, tx_count: u64) -> Result<String, AppError> {
        let key = self
            .signer_api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("SIGNER_API_KEY missing".to_string()))?;
        let rpc_url = self
            .rpc_url
            .as_deref()
            .ok_or_else(|| AppError::Config("CHAIN_RPC_URL missing".to_string()))?;
        let contract = self
            .contract
            .as_deref()
            .ok_or_else(|| AppError::Config("GAMES_CONTRACT_ADDRESS missing".to_string()))?;

        let calldata = encode_update_player_data(player, score, tx_count)?;
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_sendTransaction",
            "params": [{ "to": contract, "data": calldata }],
        });

        info!(
            "Recording score {} (txCount {}) for player {} via {}",
            score, tx_count, player, rpc_url
        );

        let response = self
            .agent
            .post(rpc_url)
            .header("authorization", &format!("Bearer {key}"))
            .send_json(&request)
            .map_err(|e| {
                warn!("Ledger write failed: {}", e);
                AppError::Internal(format!("ledger write failed: {e}"))
            })?;

        let body: Value = response
            .into_body()
            .read_json()
            .map_err(|e| AppError::Internal(format!("bad ledger response: {e}")))?;

        if let Some(tx) = body.get("result").and_then(Value::as_str) {
            return Ok(tx.to_string());
        }
        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("ledger rejected the write");
        warn!("Ledger rejected the write: {}", message);
        Err(AppError::Internal(message.to_string()))
    }
}

/// ABI-encodes the `updatePlayerData` call: 4-byte selector followed by
/// three 32-byte words (left-padded address, score, tx count).
pub fn encode_update_player_data(
    player: &str,
    score: u64,
    tx_count: u64,
) -> Result<String, AppError> {
    let address = decode_address(player)?;

    let mut data = Vec::with_capacity(4 + 32 * 3);
    data.extend_from_slice(&*UPDATE_PLAYER_DATA_SELECTOR);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(&address);
    data.extend_from_slice(&u256_word(score));
    data.extend_from_slice(&u256_word(tx_count));

    Ok(format!("0x{}", hex::encode(data)))
}

fn decode_address(player: &str) -> Result<[u8; 20], AppError> {
    let stripped = player
        .strip_prefix("0x")
        .or_else(|| player.strip_prefix("0X"))
        .unwrap_or(player);
    let bytes = hex::decode(stripped)
        .map_err(|_| AppError::BadRequest("bad payload".to_string()))?;
    bytes
        .try_into()
        .map_err(|_| AppError::BadRequest("bad payload".to_string()))
}

fn u256_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn calldata_has_selector_and_three_words() {
        let calldata = encode_update_player_data(PLAYER, 1_234, 1).unwrap();
        let bytes = hex::decode(calldata.strip_prefix("0x").unwrap()).unwrap();
        assert_eq!(bytes.len(), 4 + 32 * 3);
        assert_eq!(&bytes[..4], &*UPDATE_PLAYER_DATA_SELECTOR);
        // Address word: 12 zero bytes then the 20 address bytes.
        assert_eq!(&bytes[4..16], &[0u8; 12]);
        assert_eq!(&bytes[16..36], &[0x11u8; 20]);
        // Score and tx count words, big-endian.
        assert_eq!(&bytes[36..68][24..], &1_234u64.to_be_bytes());
        assert_eq!(&bytes[68..100][24..], &1u64.to_be_bytes());
    }

    #[test]
    fn malformed_player_address_is_a_bad_request() {
        for player in ["", "0x1234", "not-hex", "0xzz11111111111111111111111111111111111111"] {
            let err = encode_update_player_data(player, 1, 1).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{player}");
        }
    }

    #[test]
    fn missing_configuration_is_reported_per_field() {
        let ledger = JsonRpcLedger::new(
            crate::core::network::get_agent(),
            &ServerConfig::default(),
        );
        let err = ledger.record_score(PLAYER, 10, 1).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("SIGNER_API_KEY")));

        let config = ServerConfig {
            signer_api_key: Some("k".to_string()),
            ..Default::default()
        };
        let ledger = JsonRpcLedger::new(crate::core::network::get_agent(), &config);
        let err = ledger.record_score(PLAYER, 10, 1).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("CHAIN_RPC_URL")));
    }
}
