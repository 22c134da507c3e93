//! Vault lifecycle integration tests.
//!
//! These tests drive `VaultSession` over the real file stores and reopen the
//! session between steps, the way separate application launches would.

use std::sync::Arc;

use foodchat_integration_tests::open_session;
use foodchat_vault::{
    CredentialVault, EncryptedRecord, FilePassphraseCache, FileRecordStore, NoPrompt,
    PassphraseCache, PromptKind, RecordStore, ScriptedPrompt, UnlockOutcome, VaultError,
    VaultState,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_record_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut session = open_session(dir.path()).await;
    session
        .submit_secret(
            "sk-test-123".into(),
            &mut ScriptedPrompt::answering(&["correct-horse"]),
        )
        .await
        .unwrap();
    drop(session);

    let mut session = open_session(dir.path()).await;
    assert_eq!(session.state(), VaultState::Locked);

    let wrong = session
        .auto_unlock(&mut ScriptedPrompt::answering(&["wrong-pass"]))
        .await;
    assert!(matches!(wrong, Err(VaultError::InvalidPassphrase)));

    let outcome = session
        .unlock(&mut ScriptedPrompt::answering(&["correct-horse"]))
        .await
        .unwrap();
    assert_eq!(outcome, UnlockOutcome::Unlocked);
    assert_eq!(session.secret().unwrap().expose_secret(), "sk-test-123");
}

#[tokio::test]
async fn test_persisted_document_shape() {
    let dir = TempDir::new().unwrap();
    let mut session = open_session(dir.path()).await;
    session
        .submit_secret("sk-test-123".into(), &mut ScriptedPrompt::answering(&["p"]))
        .await
        .unwrap();

    let path = dir.path().join("foodchat_api_cipher.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    for field in ["salt", "iv", "ciphertext"] {
        assert!(json[field].is_string(), "{field} should be a base64 string");
    }
    assert_eq!(json["iterations"], 100_000);
    assert!(!json.to_string().contains("sk-test-123"));
}

#[tokio::test]
async fn test_three_field_document_unlocks() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::in_dir(dir.path());
    let vault = CredentialVault::new(Arc::new(store.clone()));
    vault
        .store(&"sk-legacy".into(), &"correct-horse".into())
        .await
        .unwrap();

    // Strip everything but the three original fields.
    let mut json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    let object = json.as_object_mut().unwrap();
    object.retain(|key, _| matches!(key.as_str(), "salt" | "iv" | "ciphertext"));
    std::fs::write(store.path(), json.to_string()).unwrap();

    let record = store.load().await.unwrap().unwrap();
    assert!(record.created_at.is_none());
    let secret = vault.unlock(&record, &"correct-horse".into()).await.unwrap();
    assert_eq!(secret.expose_secret(), "sk-legacy");
}

#[tokio::test]
async fn test_tampered_file_fails_closed() {
    let dir = TempDir::new().unwrap();
    let store = FileRecordStore::in_dir(dir.path());
    let vault = CredentialVault::new(Arc::new(store.clone()));
    let record = vault
        .store(&"sk-test-123".into(), &"correct-horse".into())
        .await
        .unwrap();

    let mut tampered = record.clone();
    let last = tampered.ciphertext.len() - 1;
    tampered.ciphertext[last] ^= 0x01;
    std::fs::write(store.path(), tampered.to_json().unwrap()).unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    let result = vault.unlock(&loaded, &"correct-horse".into()).await;
    assert!(matches!(result, Err(VaultError::InvalidPassphrase)));

    std::fs::write(store.path(), "{\"salt\": 42}").unwrap();
    assert!(matches!(
        EncryptedRecord::from_json(&std::fs::read_to_string(store.path()).unwrap()),
        Err(VaultError::MalformedRecord(_))
    ));
    let session = open_session(dir.path()).await;
    assert_eq!(session.state(), VaultState::NoRecord);
    assert!(session.record_malformed());
}

#[tokio::test]
async fn test_remember_across_restarts() {
    let dir = TempDir::new().unwrap();

    let mut session = open_session(dir.path()).await;
    assert!(!session.remember());
    session
        .set_remember(true, &mut ScriptedPrompt::answering(&["correct-horse"]))
        .await
        .unwrap();
    session
        .submit_secret("sk-test-123".into(), &mut NoPrompt)
        .await
        .unwrap();
    drop(session);

    let cache = FilePassphraseCache::in_dir(dir.path());
    assert_eq!(
        cache.get().await.unwrap().unwrap().expose_secret(),
        "correct-horse"
    );

    let mut session = open_session(dir.path()).await;
    assert!(session.remember());
    let mut prompt = ScriptedPrompt::new(Vec::<Option<&str>>::new());
    assert_eq!(
        session.auto_unlock(&mut prompt).await.unwrap(),
        UnlockOutcome::Unlocked
    );
    assert!(prompt.asked().is_empty());

    session.set_remember(false, &mut NoPrompt).await.unwrap();
    drop(session);

    let mut session = open_session(dir.path()).await;
    assert!(!session.remember());
    let mut prompt = ScriptedPrompt::answering(&["correct-horse"]);
    session.auto_unlock(&mut prompt).await.unwrap();
    assert_eq!(prompt.asked(), &[PromptKind::Unlock]);
}

#[tokio::test]
async fn test_forget_removes_files() {
    let dir = TempDir::new().unwrap();
    let mut session = open_session(dir.path()).await;
    session
        .set_remember(true, &mut ScriptedPrompt::answering(&["p"]))
        .await
        .unwrap();
    session
        .submit_secret("sk".into(), &mut NoPrompt)
        .await
        .unwrap();
    assert!(dir.path().join("foodchat_passphrase").exists());

    session.forget().await.unwrap();
    assert!(!dir.path().join("foodchat_api_cipher.json").exists());
    assert!(!dir.path().join("foodchat_passphrase").exists());

    let session = open_session(dir.path()).await;
    assert_eq!(session.state(), VaultState::NoRecord);
    assert!(!session.remember());
}
