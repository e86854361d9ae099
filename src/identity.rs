use serde::Deserialize;

/// One account linked to an identity-provider user. The provider returns a
/// heterogeneous list; only the wallet-bearing shapes matter here, anything
/// else collapses into `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkedAccount {
    #[serde(rename_all = "camelCase")]
    Wallet { address: String },
    #[serde(rename_all = "camelCase")]
    CrossApp {
        #[serde(default)]
        provider_app: Option<ProviderApp>,
        #[serde(default)]
        embedded_wallets: Vec<EmbeddedWallet>,
        #[serde(default)]
        address: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderApp {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddedWallet {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Email {
    pub address: String,
}

/// The identity-provider user object, reduced to the fields this crate
/// reads. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub linked_accounts: Vec<LinkedAccount>,
}

/// Finds the player's wallet among the linked accounts.
///
/// Lookup rule, applied once here rather than per call site: prefer the
/// cross-app account whose provider app matches `cross_app_id` (its first
/// embedded wallet, falling back to the account-level address), otherwise
/// the first plain wallet account, otherwise none.
pub fn resolve_wallet(user: &IdentityUser, cross_app_id: &str) -> Option<String> {
    let cross = user.linked_accounts.iter().find_map(|account| {
        if let LinkedAccount::CrossApp {
            provider_app,
            embedded_wallets,
            address,
        } = account
        {
            if provider_app.as_ref().is_some_and(|app| app.id == cross_app_id) {
                return embedded_wallets
                    .first()
                    .map(|w| w.address.clone())
                    .or_else(|| address.clone());
            }
        }
        None
    });
    if cross.is_some() {
        return cross;
    }

    user.linked_accounts.iter().find_map(|account| {
        if let LinkedAccount::Wallet { address } = account {
            Some(address.clone())
        } else {
            None
        }
    })
}

/// Display name for score submissions: the linked email, else "anonymous".
pub fn display_name(user: &IdentityUser) -> &str {
    user.email
        .as_ref()
        .map(|e| e.address.as_str())
        .filter(|a| !a.is_empty())
        .unwrap_or("anonymous")
}

/// Shortened wallet form for display: `0x1234…abcd`.
pub fn short_address(address: &str) -> String {
    if address.chars().count() <= 10 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{head}…{tail}")
}
