use crate::{
    auth::AuthError,
    models::{ProviderUser, Role},
};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use std::{collections::HashMap, fs, path::Path, sync::Arc};
use thiserror::Error;
use uuid::Uuid;

/// IdentityProvider Trait
///
/// The contract for whatever service checks a user's credentials. The session store
/// only depends on this result shape; transport and storage belong to the provider.
///
/// **Send + Sync + async_trait** are required so the trait object (`Arc<dyn IdentityProvider>`)
/// can live in the shared application state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError>;
}

/// IdentityProviderState
pub type IdentityProviderState = Arc<dyn IdentityProvider>;

/// AccountsError
///
/// Failures while loading an accounts file. Raised at startup only.
#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("failed to read accounts file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed accounts file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate account email `{0}`")]
    DuplicateEmail(String),
    #[error("account `{0}` has a malformed password digest, expected 64 hex characters")]
    MalformedDigest(String),
}

/// Account
///
/// One record in the accounts file. Unknown `role` values fail deserialization,
/// which rejects the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Hex SHA-256 of the password, in either case.
    pub password_sha256: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// InMemoryIdentityProvider
///
/// Authenticates against a fixed account list held in memory. Emails are matched
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    accounts: HashMap<String, StoredAccount>,
}

/// An account with its password digest already decoded.
#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    digest: [u8; 32],
}

impl InMemoryIdentityProvider {
    /// new
    ///
    /// Indexes accounts by lowercased email. Digests are decoded here, so a file with
    /// a malformed digest fails at startup instead of rejecting every login.
    pub fn new(accounts: Vec<Account>) -> Result<Self, AccountsError> {
        let mut by_email = HashMap::with_capacity(accounts.len());
        for mut account in accounts {
            let key = account.email.trim().to_lowercase();
            if by_email.contains_key(&key) {
                return Err(AccountsError::DuplicateEmail(key));
            }
            let digest = decode_digest(&account.password_sha256)
                .ok_or_else(|| AccountsError::MalformedDigest(key.clone()))?;
            account.password_sha256 = account.password_sha256.trim().to_ascii_lowercase();
            by_email.insert(key, StoredAccount { account, digest });
        }
        Ok(Self { accounts: by_email })
    }

    /// from_json_file
    ///
    /// Loads a JSON array of `Account` records.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AccountsError> {
        let raw = fs::read_to_string(path)?;
        let accounts: Vec<Account> = serde_json::from_str(&raw)?;
        Self::new(accounts)
    }

    /// demo
    ///
    /// One account per role (`teacher@lms.local`, `superadmin@lms.local`, ...), all
    /// with the password `password`.
    /// Ids are fixed so that local sessions are reproducible.
    pub fn demo() -> Self {
        let names = [
            (Role::SuperAdmin, "superadmin@lms.local", "Super Admin"),
            (Role::SchoolAdmin, "schooladmin@lms.local", "Admin Sekolah"),
            (Role::Teacher, "teacher@lms.local", "Budi Santoso"),
            (Role::Student, "student@lms.local", "Siti Rahma"),
            (Role::Parent, "parent@lms.local", "Ahmad Hidayat"),
        ];

        let accounts = names
            .into_iter()
            .enumerate()
            .map(|(index, (role, email, display_name))| {
                let account = Account {
                    id: Uuid::from_u128(0x1000 + index as u128),
                    email: email.to_string(),
                    display_name: display_name.to_string(),
                    role,
                    password_sha256: hash_password("password"),
                    avatar_url: None,
                };
                let digest = digest_of("password");
                (email.to_string(), StoredAccount { account, digest })
            })
            .collect();

        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn authenticate(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        let stored = self
            .accounts
            .get(&email.trim().to_lowercase())
            .ok_or(AuthError::InvalidCredentials)?;

        // Unknown email and wrong password report the same error.
        let candidate = digest_of(password);
        if stored.digest.as_slice().ct_eq(candidate.as_slice()).unwrap_u8() == 0 {
            return Err(AuthError::InvalidCredentials);
        }

        let account = &stored.account;

        Ok(ProviderUser {
            id: account.id,
            name: account.display_name.clone(),
            role: account.role,
            avatar_url: account.avatar_url.clone(),
        })
    }
}

/// hash_password
///
/// Lowercase hex SHA-256 digest, the format stored in accounts files.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn digest_of(password: &str) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(password.as_bytes()));
    digest
}

/// Decodes a 64-character hex digest, accepting upper and lower case.
fn decode_digest(hex: &str) -> Option<[u8; 32]> {
    let hex = hex.trim();
    if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let mut digest = [0u8; 32];
    for (byte, pair) in digest.iter_mut().zip(hex.as_bytes().chunks(2)) {
        let pair = std::str::from_utf8(pair).ok()?;
        *byte = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(digest)
}
