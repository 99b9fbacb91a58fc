use std::path::PathBuf;

use vaultnote_core::crypto::{evaluate_strength, PassphraseStrength};

use crate::app::{prompt_new_passphrase, resolve_config_path, AppContext, Vault};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, StorageBackend, VaultnoteConfig};
use crate::errors::CliError;
use crate::ui::{badge, blank_line, header, hint, print, receipt, Badge};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() {
        return Err(CliError::invalid_input(format!(
            "A vault is already configured at {}",
            config_path.display()
        ))
        .into());
    }

    let requested = args.path.clone().or_else(|| ctx.cli().store.clone());
    let (store_path, backend) = match (requested, args.backend) {
        (Some(path), Some(backend)) => (PathBuf::from(path), backend),
        (Some(path), None) => {
            let path = PathBuf::from(path);
            let backend = StorageBackend::infer(&path);
            (path, backend)
        }
        (None, backend) => {
            let backend = backend.unwrap_or_default();
            (default_store_path(backend)?, backend)
        }
    };

    let config = VaultnoteConfig::new(store_path, backend);
    let passphrase = prompt_new_passphrase(args.no_input, config.security.min_passphrase_length)?;
    let strength = evaluate_strength(&passphrase);

    let vault = Vault::create(config.clone(), &passphrase)?;
    write_config(&config_path, &config)?;
    tracing::info!(path = %vault.path().display(), backend = backend.label(), "Vault initialized");

    if ctx.quiet() {
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false);
    print(&ui_ctx, &header(&ui_ctx, "init", None));
    blank_line(&ui_ctx);
    let config_display = config_path.display().to_string();
    let store_display = vault.path().display().to_string();
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Vault initialized",
            &[
                ("Config", config_display.as_str()),
                ("Store", store_display.as_str()),
                ("Backend", backend.label()),
            ],
        ),
    );
    if strength.strength != PassphraseStrength::Strong {
        blank_line(&ui_ctx);
        print(&ui_ctx, &badge(&ui_ctx, Badge::Warn, strength.feedback));
    }
    blank_line(&ui_ctx);
    print(&ui_ctx, &hint(&ui_ctx, "Record a note with `vaultnote commit <NOTE>`"));

    Ok(())
}
