use vaultnote_core::decrypt;

use crate::app::{unlock, AppContext};
use crate::cli::ShowArgs;
use crate::commands::envelope::decrypt_error;
use crate::errors::CliError;
use crate::output::{commit_json, format_timestamp, print_json};
use crate::ui::{badge, blank_line, divider, header, kv, print, Badge, OutputMode};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut versions = vault.versions();
    let commit = versions.find_commit(&args.note, &args.hash).ok_or_else(|| {
        CliError::not_found(
            format!("Commit {} not found for note {}", args.hash, args.note),
            format!("Run `vaultnote log {}` to list commits", args.note),
        )
    })?;

    let decrypted = if args.decrypt {
        let mut holder = vault.key_holder();
        unlock(&vault, &mut holder, args.no_input, false, ctx.quiet())?;
        let key = holder
            .key()
            .ok_or_else(|| CliError::auth_failed("Vault is locked."))?;
        Some(decrypt(&commit.content, key.expose()).map_err(decrypt_error)?)
    } else {
        None
    };

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        let output = commit_json(
            &args.note,
            &commit,
            decrypted.as_ref().map(|d| d.plaintext()),
            decrypted.as_ref().map(|d| d.is_verified()),
        );
        return print_json(&output);
    }

    let body = decrypted
        .as_ref()
        .map(|d| d.plaintext())
        .unwrap_or(&commit.content);

    if !ctx.quiet() {
        if ui_ctx.mode == OutputMode::Pretty {
            print(&ui_ctx, &header(&ui_ctx, "show", Some(&args.note)));
            blank_line(&ui_ctx);
        }
        print(&ui_ctx, &kv(&ui_ctx, "Hash", &commit.hash));
        print(&ui_ctx, &kv(&ui_ctx, "Date", &format_timestamp(&commit.timestamp)));
        print(&ui_ctx, &kv(&ui_ctx, "Message", &commit.message));
        if let Some(parent) = &commit.parent {
            print(&ui_ctx, &kv(&ui_ctx, "Parent", parent));
        }
        if decrypted.as_ref().is_some_and(|d| !d.is_verified()) {
            print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::Warn, "Stored unencrypted; passphrase not checked"),
            );
        }
        blank_line(&ui_ctx);
        print(&ui_ctx, &divider(&ui_ctx));
        blank_line(&ui_ctx);
    }
    println!("{}", body);
    Ok(())
}
