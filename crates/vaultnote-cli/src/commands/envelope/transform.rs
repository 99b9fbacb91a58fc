use vaultnote_core::{decrypt, encrypt, is_correct_passphrase, VaultError};

use crate::app::{read_passphrase, read_text, AppContext};
use crate::cli::TextArgs;
use crate::errors::CliError;
use crate::output::format_label;
use crate::ui::{badge, print, Badge};

pub fn handle_encrypt(ctx: &AppContext, args: &TextArgs) -> anyhow::Result<()> {
    let (_vault, holder) = ctx.unlocked(args.no_input)?;
    let text = read_text(args.text.clone(), args.no_input)?;
    let key = holder
        .key()
        .ok_or_else(|| CliError::auth_failed("Vault is locked."))?;

    println!("{}", encrypt(&text, key.expose())?);
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &TextArgs) -> anyhow::Result<()> {
    let (_vault, holder) = ctx.unlocked(args.no_input)?;
    let envelope = read_text(args.text.clone(), args.no_input)?;
    let key = holder
        .key()
        .ok_or_else(|| CliError::auth_failed("Vault is locked."))?;

    let decrypted = decrypt(envelope.trim(), key.expose()).map_err(decrypt_error)?;
    tracing::debug!(format = format_label(decrypted.format()), "Envelope decrypted");
    if !decrypted.is_verified() && !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        eprintln!(
            "{}",
            badge(
                &ui_ctx,
                Badge::Warn,
                "Read as unencrypted Base64 text; the passphrase was not checked."
            )
        );
    }
    println!("{}", decrypted.plaintext());
    Ok(())
}

/// Check a passphrase against an envelope. Does not need a vault.
pub fn handle_verify(ctx: &AppContext, args: &TextArgs) -> anyhow::Result<()> {
    let envelope = read_text(args.text.clone(), args.no_input)?;
    let passphrase = read_passphrase(args.no_input)?;

    if !is_correct_passphrase(envelope.trim(), &passphrase) {
        return Err(CliError::auth_failed("Passphrase does not open this envelope.").into());
    }
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Passphrase opens this envelope."));
    }
    Ok(())
}

/// Map core decryption failures onto CLI exit codes.
pub(crate) fn decrypt_error(err: VaultError) -> anyhow::Error {
    match err {
        VaultError::DecryptionFailed => CliError::auth_failed_with_hint(
            "Incorrect passphrase or corrupted data.",
            "The envelope may have been written with a different passphrase",
        )
        .into(),
        other => other.into(),
    }
}
