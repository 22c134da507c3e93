//! Shared helpers for the FoodChat integration tests.

use std::path::Path;
use std::sync::Arc;

use foodchat_core::Locale;
use foodchat_vault::{CredentialVault, FilePassphraseCache, FileRecordStore, VaultSession};

/// Open a session over the file stores in `dir`, as a fresh launch would.
pub async fn open_session(dir: &Path) -> VaultSession {
    let vault = CredentialVault::new(Arc::new(FileRecordStore::in_dir(dir)));
    let cache = Arc::new(FilePassphraseCache::in_dir(dir));
    VaultSession::open(vault, cache, Locale::En)
        .await
        .expect("failed to open vault session")
}
