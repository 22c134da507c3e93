//! API key commands.
//!
//! Provides `foodchat key set|unlock|show|status|forget|remember|passwd`,
//! backed by the file stores of the `foodchat-vault` crate. Each invocation is
//! one vault session, so `show` gets the single automatic unlock attempt.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, ValueEnum};
use foodchat_core::env::{self, vars};
use foodchat_core::{Config, Locale, SecretString};
use foodchat_vault::{
    CredentialVault, FilePassphraseCache, FileRecordStore, Message, PassphrasePrompt, PromptKind,
    UnlockOutcome, VaultError, VaultSession,
};
use tracing::{debug, warn};

/// Key command arguments.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(clap::Subcommand)]
pub enum KeyCommand {
    /// Encrypt and store the API key
    Set {
        /// API key (if omitted, prompts for hidden input)
        #[arg(long)]
        value: Option<String>,
    },

    /// Unlock the stored API key
    Unlock,

    /// Print the API key, unlocking it if needed
    Show {
        /// Print the full key instead of a masked form
        #[arg(long)]
        reveal: bool,
    },

    /// Show the vault state
    Status,

    /// Delete the stored API key and any remembered passphrase
    Forget,

    /// Remember the passphrase on this device
    Remember {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Change the passphrase
    Passwd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// Terminal passphrase prompt.
///
/// `FOODCHAT_PASSPHRASE` and `FOODCHAT_NEW_PASSPHRASE` answer without asking;
/// `FOODCHAT_NO_PROMPT` disables the hidden-input fallback.
pub struct TerminalPrompt {
    passphrase: Option<SecretString>,
    new_passphrase: Option<SecretString>,
    interactive: bool,
}

impl TerminalPrompt {
    pub fn from_env() -> Self {
        Self {
            passphrase: env::get_var(vars::FOODCHAT_PASSPHRASE).map(SecretString::from),
            new_passphrase: env::get_var(vars::FOODCHAT_NEW_PASSPHRASE).map(SecretString::from),
            interactive: !env::get_bool(vars::FOODCHAT_NO_PROMPT),
        }
    }

    fn read_hidden(&self, text: &str) -> Option<SecretString> {
        if !self.interactive {
            return None;
        }
        match rpassword::prompt_password(format!("{text} ")) {
            Ok(value) => Some(SecretString::from(value)),
            Err(e) => {
                warn!(error = %e, "failed to read from terminal");
                None
            }
        }
    }
}

impl PassphrasePrompt for TerminalPrompt {
    fn request(&mut self, kind: PromptKind, text: &str) -> Option<SecretString> {
        let preset = match kind {
            PromptKind::NewPassphrase => &self.new_passphrase,
            _ => &self.passphrase,
        };
        if let Some(passphrase) = preset {
            debug!(?kind, "using passphrase from environment");
            return Some(passphrase.clone());
        }
        self.read_hidden(text)
    }
}

/// Open the vault session described by the config at `config_path`.
///
/// Returns the session and the record file location.
pub async fn open_session(config_path: Option<&Path>) -> anyhow::Result<(VaultSession, PathBuf)> {
    let config = Config::load_or_default_from(config_path);
    config.validate()?;

    let data_dir = config.data_dir()?;
    let records = FileRecordStore::in_dir(&data_dir);
    let record_path = records.path().to_path_buf();

    let vault =
        CredentialVault::new(Arc::new(records)).with_iterations(config.vault.kdf_iterations)?;
    let cache = Arc::new(FilePassphraseCache::in_dir(&data_dir));
    let session = VaultSession::open(vault, cache, config.locale).await?;

    Ok((session, record_path))
}

/// Wrap a vault error with its localized message.
fn localized(err: VaultError, locale: Locale) -> anyhow::Error {
    let message = err.user_message(locale);
    if err.is_recoverable() || matches!(err, VaultError::NoRecord | VaultError::NotUnlocked) {
        debug!(error = %err, "vault operation failed");
        anyhow::Error::msg(message)
    } else {
        anyhow::Error::new(err).context(message)
    }
}

fn ensure_unlocked(outcome: UnlockOutcome, locale: Locale) -> anyhow::Result<()> {
    match outcome {
        UnlockOutcome::Unlocked | UnlockOutcome::AlreadyUnlocked => Ok(()),
        UnlockOutcome::NoRecord => anyhow::bail!(Message::NeedApiKey.text(locale)),
        UnlockOutcome::Cancelled | UnlockOutcome::AlreadyAttempted => {
            anyhow::bail!(Message::VaultLocked.text(locale))
        }
    }
}

/// Human-readable status lines for `key status`.
pub fn status_lines(session: &VaultSession, record_path: &Path) -> Vec<(&'static str, String)> {
    let stored_at = session
        .stored_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());
    let remember = if session.remember() { "on" } else { "off" };

    let mut lines = vec![
        ("state", session.state().to_string()),
        ("remember", remember.to_string()),
        ("stored at", stored_at),
        ("record file", record_path.display().to_string()),
    ];
    if session.record_malformed() {
        lines.push(("warning", Message::RecordMalformed.text(session.locale()).to_string()));
    }
    lines
}

/// Run the key command.
pub async fn run(args: KeyArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (mut session, record_path) = open_session(config_path).await?;
    let locale = session.locale();
    let mut prompt = TerminalPrompt::from_env();

    match args.command {
        KeyCommand::Set { value } => {
            let secret = match value {
                Some(v) => SecretString::from(v),
                None => {
                    println!("{}", Message::ApiKeyLocalInfo.text(locale));
                    prompt
                        .read_hidden(Message::NeedApiKey.text(locale))
                        .unwrap_or_default()
                }
            };

            if secret.is_empty() {
                anyhow::bail!(Message::NeedApiKey.text(locale));
            }

            session
                .submit_secret(secret, &mut prompt)
                .await
                .map_err(|e| localized(e, locale))?;

            println!("{}", Message::ApiKeySaved.text(locale));
        }

        KeyCommand::Unlock => {
            let outcome = session
                .unlock(&mut prompt)
                .await
                .map_err(|e| localized(e, locale))?;
            ensure_unlocked(outcome, locale)?;

            let secret = session.secret().map_err(|e| localized(e, locale))?;
            println!("{}", secret.masked());
        }

        KeyCommand::Show { reveal } => {
            let outcome = session
                .auto_unlock(&mut prompt)
                .await
                .map_err(|e| localized(e, locale))?;
            ensure_unlocked(outcome, locale)?;

            let secret = session.secret().map_err(|e| localized(e, locale))?;
            if reveal {
                println!("{}", secret.expose_secret());
            } else {
                println!("{}", secret.masked());
            }
        }

        KeyCommand::Status => {
            for (label, value) in status_lines(&session, &record_path) {
                println!("{:<12} {}", format!("{label}:"), value);
            }
        }

        KeyCommand::Forget => {
            session.forget().await.map_err(|e| localized(e, locale))?;
            println!("{}", Message::ApiKeyRemoved.text(locale));
        }

        KeyCommand::Remember { state } => {
            session
                .set_remember(state == Toggle::On, &mut prompt)
                .await
                .map_err(|e| localized(e, locale))?;

            let label = Message::RememberPassphraseLabel.text(locale);
            let value = if session.remember() { "on" } else { "off" };
            println!("{label}: {value}");
            if session.remember() {
                println!("{}", Message::RememberPassphraseHint.text(locale));
            }
        }

        KeyCommand::Passwd => {
            let outcome = session
                .unlock(&mut prompt)
                .await
                .map_err(|e| localized(e, locale))?;
            ensure_unlocked(outcome, locale)?;

            session
                .change_passphrase(&mut prompt)
                .await
                .map_err(|e| localized(e, locale))?;
            println!("{}", Message::PassphraseChanged.text(locale));
        }
    }

    Ok(())
}
