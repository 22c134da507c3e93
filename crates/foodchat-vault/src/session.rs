//! Session lifecycle around the credential vault.
//!
//! A [`VaultSession`] owns the unlocked secret for the lifetime of the
//! process and moves between three states:
//!
//! ```text
//! NoRecord --submit_secret--> Unlocked
//! Locked   --unlock ok------> Unlocked
//! Locked   --unlock failed--> Locked
//! Unlocked --lock-----------> Locked
//! Unlocked --change_passphrase--> Locked
//! any      --forget---------> NoRecord
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use foodchat_core::{Locale, SecretString};
use tracing::{debug, info, warn};

use crate::error::{Result, VaultError};
use crate::passphrase::PassphraseCache;
use crate::prompt::{PassphrasePrompt, PromptKind};
use crate::record::EncryptedRecord;
use crate::vault::CredentialVault;

/// Where the session stands with respect to the stored API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// Nothing usable is stored.
    NoRecord,
    /// A record is stored but the secret is not in memory.
    Locked,
    /// The secret is available in memory.
    Unlocked,
}

impl std::fmt::Display for VaultState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultState::NoRecord => write!(f, "no-record"),
            VaultState::Locked => write!(f, "locked"),
            VaultState::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// Non-error results of an unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// The secret was decrypted by this call.
    Unlocked,
    /// The secret was already in memory; nothing to do.
    AlreadyUnlocked,
    /// There is no record to unlock.
    NoRecord,
    /// The user declined to enter a passphrase.
    Cancelled,
    /// The automatic attempt for this session has already been spent.
    AlreadyAttempted,
}

/// Unlock orchestration for one process lifetime.
pub struct VaultSession {
    vault: CredentialVault,
    cache: Arc<dyn PassphraseCache>,
    locale: Locale,
    state: VaultState,
    record: Option<EncryptedRecord>,
    secret: Option<SecretString>,
    passphrase: Option<SecretString>,
    remember: bool,
    auto_unlock_attempted: bool,
    failed_attempts: u32,
    record_malformed: bool,
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("state", &self.state)
            .field("remember", &self.remember)
            .field("auto_unlock_attempted", &self.auto_unlock_attempted)
            .field("failed_attempts", &self.failed_attempts)
            .finish_non_exhaustive()
    }
}

impl VaultSession {
    /// Start a session from whatever is persisted.
    ///
    /// Remember is on exactly when a remembered passphrase exists. A stored
    /// record that cannot be decoded is treated as absent.
    pub async fn open(
        vault: CredentialVault,
        cache: Arc<dyn PassphraseCache>,
        locale: Locale,
    ) -> Result<Self> {
        let passphrase = cache.get().await?;
        let remember = passphrase.is_some();

        let (record, record_malformed) = match vault.load_record().await {
            Ok(record) => (record, false),
            Err(VaultError::MalformedRecord(reason)) => {
                warn!(%reason, "stored API key record is malformed, treating it as absent");
                (None, true)
            }
            Err(e) => return Err(e),
        };

        let state = if record.is_some() {
            VaultState::Locked
        } else {
            VaultState::NoRecord
        };
        debug!(%state, remember, "vault session opened");

        Ok(Self {
            vault,
            cache,
            locale,
            state,
            record,
            secret: None,
            passphrase,
            remember,
            auto_unlock_attempted: false,
            failed_attempts: 0,
            record_malformed,
        })
    }

    pub fn state(&self) -> VaultState {
        self.state
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Whether the passphrase is remembered on this device.
    pub fn remember(&self) -> bool {
        self.remember
    }

    /// Failed unlock attempts in this session.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Whether a damaged record was found when the session opened.
    pub fn record_malformed(&self) -> bool {
        self.record_malformed
    }

    /// When the current record was written, if known.
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        self.record.as_ref().and_then(|r| r.created_at)
    }

    /// The unlocked secret.
    pub fn secret(&self) -> Result<&SecretString> {
        match (&self.state, &self.secret) {
            (VaultState::Unlocked, Some(secret)) => Ok(secret),
            (VaultState::NoRecord, _) => Err(VaultError::NoRecord),
            _ => Err(VaultError::NotUnlocked),
        }
    }

    /// Encrypt and persist a new API key, replacing any stored one.
    ///
    /// Uses the in-memory passphrase if known, otherwise asks for one. The
    /// session is unlocked with the new secret afterwards.
    pub async fn submit_secret(
        &mut self,
        secret: SecretString,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<()> {
        let (passphrase, prompted) = self
            .resolve_passphrase(PromptKind::Setup, prompt)
            .ok_or(VaultError::PassphraseRequired)?;

        let record = self.vault.store(&secret, &passphrase).await?;

        if prompted && self.remember {
            self.remember_passphrase(passphrase).await?;
        }

        self.record = Some(record);
        self.secret = Some(secret);
        self.state = VaultState::Unlocked;
        self.record_malformed = false;
        Ok(())
    }

    /// The single automatic unlock attempt of this session.
    ///
    /// Only the first call that finds a locked record tries to unlock; every
    /// later call returns [`UnlockOutcome::AlreadyAttempted`] without
    /// prompting.
    pub async fn auto_unlock(&mut self, prompt: &mut dyn PassphrasePrompt) -> Result<UnlockOutcome> {
        match self.state {
            VaultState::NoRecord => return Ok(UnlockOutcome::NoRecord),
            VaultState::Unlocked => return Ok(UnlockOutcome::AlreadyUnlocked),
            VaultState::Locked => {}
        }
        if self.auto_unlock_attempted {
            return Ok(UnlockOutcome::AlreadyAttempted);
        }
        self.auto_unlock_attempted = true;
        self.unlock(prompt).await
    }

    /// Explicitly try to unlock the stored record.
    ///
    /// A wrong passphrase leaves the session locked and returns
    /// [`VaultError::InvalidPassphrase`]. A cancelled prompt is not a failure.
    pub async fn unlock(&mut self, prompt: &mut dyn PassphrasePrompt) -> Result<UnlockOutcome> {
        let record = match (self.state, &self.record) {
            (VaultState::Unlocked, _) => return Ok(UnlockOutcome::AlreadyUnlocked),
            (VaultState::Locked, Some(record)) => record.clone(),
            _ => return Ok(UnlockOutcome::NoRecord),
        };

        let Some((passphrase, prompted)) = self.resolve_passphrase(PromptKind::Unlock, prompt)
        else {
            debug!("unlock cancelled");
            return Ok(UnlockOutcome::Cancelled);
        };

        match self.vault.unlock(&record, &passphrase).await {
            Ok(secret) => {
                if prompted && self.remember {
                    self.remember_passphrase(passphrase).await?;
                }
                self.secret = Some(secret);
                self.state = VaultState::Unlocked;
                info!("API key unlocked");
                Ok(UnlockOutcome::Unlocked)
            }
            Err(VaultError::InvalidPassphrase) => {
                self.failed_attempts += 1;
                warn!(failed_attempts = self.failed_attempts, "unlock failed");
                if !prompted {
                    // Stale remembered passphrase; ask next time.
                    self.passphrase = None;
                }
                Err(VaultError::InvalidPassphrase)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the secret from memory. The record stays on disk.
    pub fn lock(&mut self) {
        if self.state == VaultState::Unlocked {
            self.secret = None;
            self.state = VaultState::Locked;
            info!("API key locked");
        }
    }

    /// Remove the record and every cached passphrase. Idempotent.
    pub async fn forget(&mut self) -> Result<()> {
        self.vault.forget().await?;
        self.cache.clear().await?;
        self.passphrase = None;
        self.secret = None;
        self.record = None;
        self.record_malformed = false;
        self.state = VaultState::NoRecord;
        Ok(())
    }

    /// Turn the remember-passphrase option on or off.
    ///
    /// Turning it on persists the known passphrase, or asks for the current
    /// one and checks it against the stored record before persisting. The
    /// option stays off if that fails.
    pub async fn set_remember(
        &mut self,
        enabled: bool,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Result<()> {
        if !enabled {
            self.passphrase = None;
            self.cache.clear().await?;
            self.remember = false;
            info!("remembered passphrase cleared");
            return Ok(());
        }

        let passphrase = match self.passphrase.clone() {
            Some(known) => known,
            None => {
                let entered = self
                    .ask(PromptKind::Remember, prompt)
                    .ok_or(VaultError::PassphraseRequired)?;
                if let Some(record) = self.record.clone() {
                    match self.vault.unlock(&record, &entered).await {
                        Ok(secret) => {
                            self.secret = Some(secret);
                            self.state = VaultState::Unlocked;
                        }
                        Err(e) => {
                            if matches!(e, VaultError::InvalidPassphrase) {
                                self.failed_attempts += 1;
                                warn!(failed_attempts = self.failed_attempts, "unlock failed");
                            }
                            return Err(e);
                        }
                    }
                }
                entered
            }
        };

        self.remember = true;
        self.remember_passphrase(passphrase).await?;
        info!("passphrase remembered on this device");
        Ok(())
    }

    /// Re-encrypt the unlocked secret under a new passphrase.
    ///
    /// The secret is dropped from memory afterwards, so the session ends up
    /// locked and the new passphrase is needed to unlock again.
    pub async fn change_passphrase(&mut self, prompt: &mut dyn PassphrasePrompt) -> Result<()> {
        let secret = self.secret()?.clone();
        let passphrase = self
            .ask(PromptKind::NewPassphrase, prompt)
            .ok_or(VaultError::PassphraseRequired)?;

        let record = self.vault.store(&secret, &passphrase).await?;
        self.record = Some(record);

        if self.remember {
            self.remember_passphrase(passphrase).await?;
        } else {
            self.passphrase = None;
        }

        self.secret = None;
        self.state = VaultState::Locked;
        info!("passphrase changed");
        Ok(())
    }

    fn resolve_passphrase(
        &self,
        kind: PromptKind,
        prompt: &mut dyn PassphrasePrompt,
    ) -> Option<(SecretString, bool)> {
        if let Some(known) = &self.passphrase {
            return Some((known.clone(), false));
        }
        self.ask(kind, prompt).map(|entered| (entered, true))
    }

    fn ask(&self, kind: PromptKind, prompt: &mut dyn PassphrasePrompt) -> Option<SecretString> {
        prompt
            .request(kind, kind.message().text(self.locale))
            .filter(|p| !p.is_empty())
    }

    async fn remember_passphrase(&mut self, passphrase: SecretString) -> Result<()> {
        self.cache.set(&passphrase).await?;
        self.passphrase = Some(passphrase);
        Ok(())
    }
}
