//! Execution of CLI commands against the service.

use anyhow::{Context, anyhow};
use kdsm_client::{DecryptResult, EncryptResult, KdsmClient};

use crate::TRACING_TARGET_COMMAND;
use crate::config::Command;

/// Runs `command` and prints its output to stdout.
pub async fn execute(client: &KdsmClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Encrypt { message, key } => {
            let result = client
                .encrypt(message, key.as_deref())
                .await
                .context("encryption failed")?;
            print_encrypted(&result)?;
        }
        Command::Decrypt {
            encrypted_message,
            key,
        } => {
            let result = client
                .decrypt(encrypted_message, key)
                .await
                .context("decryption failed")?;
            print_decrypted(&result)?;
        }
        Command::Roundtrip { message } => {
            let encrypted = client
                .encrypt(message.as_str(), None)
                .await
                .context("encryption failed")?;
            let (ciphertext, key) = print_encrypted(&encrypted)?;

            let decrypted = client
                .decrypt(ciphertext, key)
                .await
                .context("decryption failed")?;
            let plaintext = print_decrypted(&decrypted)?;

            tracing::info!(
                target: TRACING_TARGET_COMMAND,
                matches = plaintext == message,
                "Round trip completed"
            );
        }
    }

    Ok(())
}

fn print_encrypted(result: &EncryptResult) -> anyhow::Result<(&str, &str)> {
    let ciphertext = result
        .encrypted_message()
        .ok_or_else(|| anyhow!("response has no encryptedMessage"))?;
    let key = result
        .key()
        .ok_or_else(|| anyhow!("response has no key"))?;

    println!("Encrypted: {ciphertext}");
    println!("Key: {key}");
    Ok((ciphertext, key))
}

fn print_decrypted(result: &DecryptResult) -> anyhow::Result<&str> {
    let plaintext = result
        .decrypted_message()
        .ok_or_else(|| anyhow!("response has no decryptedMessage"))?;

    println!("Decrypted: {plaintext}");
    Ok(plaintext)
}
