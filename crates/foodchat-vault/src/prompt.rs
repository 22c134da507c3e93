//! Asking the user for a passphrase.

use std::collections::VecDeque;

use foodchat_core::SecretString;

use crate::messages::Message;

/// Why a passphrase is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Choosing a passphrase for a new record.
    Setup,
    /// Unlocking the stored record.
    Unlock,
    /// Confirming the current passphrase so it can be remembered.
    Remember,
    /// Choosing a replacement passphrase.
    NewPassphrase,
}

impl PromptKind {
    /// The message to show alongside the prompt.
    pub fn message(self) -> Message {
        match self {
            PromptKind::Setup => Message::PassphraseSetupPrompt,
            PromptKind::Unlock => Message::PassphraseUnlockPrompt,
            PromptKind::Remember => Message::RememberPassphrasePrompt,
            PromptKind::NewPassphrase => Message::NewPassphrasePrompt,
        }
    }
}

/// Source of passphrases typed by the user.
///
/// Returning `None` means the user cancelled or entered nothing.
pub trait PassphrasePrompt: Send {
    fn request(&mut self, kind: PromptKind, text: &str) -> Option<SecretString>;
}

/// A prompt that never yields a passphrase, for headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl PassphrasePrompt for NoPrompt {
    fn request(&mut self, _kind: PromptKind, _text: &str) -> Option<SecretString> {
        None
    }
}

/// A prompt answering from a fixed script, recording what was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<SecretString>>,
    asked: Vec<PromptKind>,
}

impl ScriptedPrompt {
    /// Answer successive requests with `answers`; `None` simulates cancel.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<SecretString>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            asked: Vec::new(),
        }
    }

    /// Answer one request per entry, in order.
    pub fn answering(passphrases: &[&str]) -> Self {
        Self::new(passphrases.iter().map(|p| Some(*p)))
    }

    /// Every prompt kind requested so far, in order.
    pub fn asked(&self) -> &[PromptKind] {
        &self.asked
    }
}

impl PassphrasePrompt for ScriptedPrompt {
    fn request(&mut self, kind: PromptKind, _text: &str) -> Option<SecretString> {
        self.asked.push(kind);
        self.answers.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompt_answers_in_order() {
        let mut prompt = ScriptedPrompt::new([Some("one"), None, Some("three")]);

        assert_eq!(
            prompt.request(PromptKind::Setup, "").unwrap().expose_secret(),
            "one"
        );
        assert!(prompt.request(PromptKind::Unlock, "").is_none());
        assert_eq!(
            prompt.request(PromptKind::Unlock, "").unwrap().expose_secret(),
            "three"
        );
        assert!(prompt.request(PromptKind::Unlock, "").is_none());
        assert_eq!(
            prompt.asked(),
            &[
                PromptKind::Setup,
                PromptKind::Unlock,
                PromptKind::Unlock,
                PromptKind::Unlock
            ]
        );
    }

    #[test]
    fn test_no_prompt() {
        assert!(NoPrompt.request(PromptKind::Setup, "text").is_none());
    }

    #[test]
    fn test_prompt_messages() {
        assert_eq!(PromptKind::Setup.message(), Message::PassphraseSetupPrompt);
        assert_eq!(PromptKind::Remember.message(), Message::RememberPassphrasePrompt);
    }
}
