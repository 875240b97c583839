//! Token transfer form.

use crate::contract::{parse_token_amount, TOKEN_DECIMALS, TOKEN_SYMBOL};
use crate::session::{Notice, Session};
use core_logic::{is_valid_address, ExplorerLinks, FormError};
use ethers::types::{Address, H256, U256};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{}", join_form_errors(.0))]
    Invalid(Vec<FormError>),

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Contract not loaded")]
    ContractNotLoaded,

    #[error("Transfer failed: {0:#}")]
    Failed(anyhow::Error),
}

fn join_form_errors(errors: &[FormError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
}

impl TransferForm {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    /// Inline checks against the cached balance. Nothing here touches the chain.
    pub fn validate(&self, balance: &str) -> Result<(Address, U256), Vec<FormError>> {
        let mut errors = Vec::new();

        let recipient = self.recipient.trim();
        let mut to = None;
        if recipient.is_empty() {
            errors.push(FormError::new("recipient", "Recipient address is required"));
        } else if !is_valid_address(recipient) {
            errors.push(FormError::new("recipient", "Please enter a valid Ethereum address"));
        } else {
            to = recipient.parse::<Address>().ok();
        }

        let amount = self.amount.trim();
        let mut value = None;
        if amount.is_empty() {
            errors.push(FormError::new("amount", "Amount is required"));
        } else {
            match parse_token_amount(amount, TOKEN_DECIMALS) {
                Ok(raw) if !raw.is_zero() => {
                    // Compared in base units; an unreadable balance counts as zero
                    let available = parse_token_amount(balance, TOKEN_DECIMALS).unwrap_or_default();
                    if raw > available {
                        errors.push(FormError::new("amount", "Insufficient balance"));
                    } else {
                        value = Some(raw);
                    }
                }
                _ => errors.push(FormError::new("amount", "Please enter a valid amount")),
            }
        }

        match (to, value) {
            (Some(to), Some(value)) if errors.is_empty() => Ok((to, value)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: H256,
    pub explorer_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct TransferView {
    pub form: TransferForm,
    links: Option<ExplorerLinks>,
    last_errors: Vec<FormError>,
}

impl TransferView {
    pub fn new(links: Option<ExplorerLinks>) -> Self {
        Self {
            form: TransferForm::default(),
            links,
            last_errors: Vec::new(),
        }
    }

    /// Errors from the last blocked submission, for inline display.
    pub fn errors(&self) -> &[FormError] {
        &self.last_errors
    }

    pub fn set_max(&mut self, balance: &str) {
        self.form.amount = balance.to_string();
    }

    pub async fn submit(&mut self, session: &mut Session) -> Result<TransferReceipt, TransferError> {
        let (to, value) = match self.form.validate(session.token_balance()) {
            Ok(parsed) => parsed,
            Err(errors) => {
                self.last_errors = errors.clone();
                return Err(TransferError::Invalid(errors));
            }
        };
        self.last_errors.clear();

        if !session.is_connected() {
            return Err(TransferError::NotConnected);
        }
        let Some(token) = session.token() else {
            session.notify(
                Notice::error("Contract not loaded")
                    .with_description("Please try connecting your wallet again."),
            );
            return Err(TransferError::ContractNotLoaded);
        };

        let hash = match token.submit_transfer(to, value).await {
            Ok(hash) => hash,
            Err(e) => return Err(self.fail(session, e)),
        };
        session.notify(Notice::info("Transaction submitted").with_description("Your transfer is being processed."));

        if let Err(e) = token.wait_for_receipt(hash).await {
            return Err(self.fail(session, e));
        }

        let amount = self.form.amount.trim().to_string();
        info!("Transferred {} {} to {:?} in {:?}", amount, TOKEN_SYMBOL, to, hash);
        session.notify(
            Notice::success("Transfer successful")
                .with_description(format!("Successfully transferred {} {} tokens.", amount, TOKEN_SYMBOL)),
        );
        self.form = TransferForm::default();
        session.refresh_balance().await;

        let hash_text = format!("{:?}", hash);
        Ok(TransferReceipt {
            tx_hash: hash,
            explorer_url: self.links.as_ref().map(|l| l.tx(&hash_text)),
        })
    }

    fn fail(&self, session: &Session, e: anyhow::Error) -> TransferError {
        error!("Transfer error: {:#}", e);
        session.notify(Notice::error("Transfer failed").with_description(format!("{:#}", e)));
        TransferError::Failed(e)
    }
}
