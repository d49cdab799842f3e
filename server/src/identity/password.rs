use color_eyre::eyre::{eyre, WrapErr as _};
use tracing::warn;

/// Hashes a password with a fresh random salt.
///
/// bcrypt is deliberately slow, so the work runs on the blocking pool.
pub async fn hash(plaintext: &str, cost: u32) -> color_eyre::Result<String> {
    let plaintext = plaintext.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .wrap_err("Password hashing task panicked")?
        .map_err(|e| eyre!("Failed to hash password: {}", e))
}

/// Checks a password against a stored digest.
///
/// A malformed digest counts as a mismatch.
pub async fn verify(plaintext: &str, digest: &str) -> bool {
    let plaintext = plaintext.to_owned();
    let digest = digest.to_owned();

    let result = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest)).await;

    match result {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            warn!("Stored password digest could not be parsed: {}", e);
            false
        }
        Err(e) => {
            warn!("Password verification task failed: {}", e);
            false
        }
    }
}
