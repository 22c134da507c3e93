//! Localized user-facing texts for the vault flows.

use foodchat_core::Locale;

/// A user-facing vault message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    PassphraseSetupPrompt,
    PassphraseSetupRequired,
    PassphraseUnlockPrompt,
    PassphraseInvalid,
    PassphraseEncryptError,
    RememberPassphraseLabel,
    RememberPassphraseHint,
    RememberPassphrasePrompt,
    NewPassphrasePrompt,
    PassphraseChanged,
    NeedApiKey,
    ApiKeySaved,
    ApiKeyRemoved,
    ApiKeyLocalInfo,
    RecordMalformed,
    VaultLocked,
    StorageFailed,
}

impl Message {
    /// Text for `locale`.
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::De => self.de(),
            Locale::En => self.en(),
        }
    }

    fn de(self) -> &'static str {
        match self {
            Message::PassphraseSetupPrompt => {
                "Lege ein Passwort fest, um deinen API Key zu verschlüsseln:"
            }
            Message::PassphraseSetupRequired => "Ohne Passwort kann ich den Key nicht sichern.",
            Message::PassphraseUnlockPrompt => {
                "Bitte gib dein Passwort ein, um den gespeicherten API Key zu entsperren:"
            }
            Message::PassphraseInvalid => "Passwort ist nicht korrekt.",
            Message::PassphraseEncryptError => {
                "Der API Key konnte nicht gesichert werden. Versuche es erneut."
            }
            Message::RememberPassphraseLabel => "Passwort auf diesem Gerät merken",
            Message::RememberPassphraseHint => {
                "Wenn aktiviert, musst du das Passwort nicht bei jedem Start erneut eingeben."
            }
            Message::RememberPassphrasePrompt => {
                "Bitte gib dein aktuelles Passwort ein, damit ich es speichern kann:"
            }
            Message::NewPassphrasePrompt => "Lege ein neues Passwort für deinen API Key fest:",
            Message::PassphraseChanged => "Das Passwort wurde geändert.",
            Message::NeedApiKey => "Bitte gib zuerst deinen OpenAI API Key ein.",
            Message::ApiKeySaved => "Danke! Ich habe den API Key lokal gespeichert.",
            Message::ApiKeyRemoved => "Der API Key wurde entfernt.",
            Message::ApiKeyLocalInfo => {
                "Keine Sorge! Dein OpenAI Key wird ausschließlich verschlüsselt auf diesem Gerät gespeichert."
            }
            Message::RecordMalformed => {
                "Der gespeicherte API Key ist beschädigt. Bitte gib ihn erneut ein."
            }
            Message::VaultLocked => "Der API Key ist gesperrt. Bitte entsperre ihn zuerst.",
            Message::StorageFailed => {
                "Der Speicher auf diesem Gerät ist nicht verfügbar. Versuche es erneut."
            }
        }
    }

    fn en(self) -> &'static str {
        match self {
            Message::PassphraseSetupPrompt => "Set a passphrase to encrypt your API key:",
            Message::PassphraseSetupRequired => "I need a passphrase to store the key securely.",
            Message::PassphraseUnlockPrompt => {
                "Enter your passphrase to unlock the stored API key:"
            }
            Message::PassphraseInvalid => "Incorrect passphrase.",
            Message::PassphraseEncryptError => {
                "Unable to securely store the API key. Please try again."
            }
            Message::RememberPassphraseLabel => "Remember passphrase on this device",
            Message::RememberPassphraseHint => {
                "When enabled you will not be asked for your passphrase on every launch."
            }
            Message::RememberPassphrasePrompt => {
                "Enter your current passphrase so I can remember it:"
            }
            Message::NewPassphrasePrompt => "Set a new passphrase for your API key:",
            Message::PassphraseChanged => "Your passphrase has been changed.",
            Message::NeedApiKey => "Please send your OpenAI API key first.",
            Message::ApiKeySaved => "Thanks! I stored the API key locally.",
            Message::ApiKeyRemoved => "The API key has been removed.",
            Message::ApiKeyLocalInfo => {
                "Don't worry! Your OpenAI key is stored only on this device."
            }
            Message::RecordMalformed => {
                "The stored API key is damaged. Please enter it again."
            }
            Message::VaultLocked => "The API key is locked. Please unlock it first.",
            Message::StorageFailed => {
                "Storage on this device is unavailable. Please try again."
            }
        }
    }
}
