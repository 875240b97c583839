use crate::config::WalletSource;
use crate::error::WalletError;
use std::fmt;
use std::fs;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A validated private key, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LoadedKey {
    /// 64 lowercase hex characters, no `0x` prefix
    pub private_key: String,
    #[zeroize(skip)]
    pub source: String,
}

impl fmt::Debug for LoadedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedKey")
            .field("source", &self.source)
            .field("private_key", &"***REDACTED***")
            .finish()
    }
}

/// Resolves the signing key the scripts run with.
pub struct WalletManager {
    source: WalletSource,
}

impl WalletManager {
    pub const DEFAULT_ENV_KEY: &'static str = "PRIVATE_KEY";

    pub fn new(source: WalletSource) -> Self {
        Self { source }
    }

    pub fn from_env() -> Self {
        Self::new(WalletSource::default())
    }

    pub fn source(&self) -> &WalletSource {
        &self.source
    }

    pub fn load(&self) -> Result<LoadedKey, WalletError> {
        match &self.source {
            WalletSource::Env { key } => {
                let raw = std::env::var(key).map_err(|_| WalletError::MissingKey { var: key.clone() })?;
                Ok(LoadedKey {
                    private_key: Self::normalize_key(&raw)?,
                    source: format!("env:{}", key),
                })
            }
            WalletSource::File { path } => Self::load_file(Path::new(path)),
        }
    }

    /// Reads the first non-empty, non-comment line of a key file.
    fn load_file(path: &Path) -> Result<LoadedKey, WalletError> {
        let content = fs::read_to_string(path).map_err(|_| WalletError::MissingKey {
            var: path.display().to_string(),
        })?;
        let line = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .ok_or(WalletError::MissingKey {
                var: path.display().to_string(),
            })?;

        Ok(LoadedKey {
            private_key: Self::normalize_key(line)?,
            source: format!("file:{}", path.display()),
        })
    }

    pub fn normalize_key(raw: &str) -> Result<String, WalletError> {
        let trimmed = raw.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WalletError::InvalidKeyFormat);
        }
        if hex_part.len() != 64 {
            return Err(WalletError::InvalidKeyLength {
                length: hex_part.len(),
            });
        }
        let mut bytes = hex::decode(hex_part).map_err(|_| WalletError::InvalidKeyFormat)?;
        let normalized = hex::encode(&bytes);
        bytes.zeroize();
        Ok(normalized)
    }
}
