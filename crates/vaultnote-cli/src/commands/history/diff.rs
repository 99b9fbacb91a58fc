use vaultnote_core::codec::inspect_envelope;
use vaultnote_core::history::{diff_words, has_differences, Commit};
use vaultnote_core::{decrypt, VersionStore};

use crate::app::{unlock, AppContext};
use crate::cli::DiffArgs;
use crate::commands::envelope::decrypt_error;
use crate::errors::CliError;
use crate::output::{format_word_diff, print_json};
use crate::ui::{badge, blank_line, header, hint, print, Badge, OutputMode};

use super::unknown_note;

pub fn handle_diff(ctx: &AppContext, args: &DiffArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut versions = vault.versions();
    if versions.history(&args.note).is_none() {
        return Err(unknown_note(&args.note).into());
    }

    let older = find(&mut versions, &args.note, &args.hash)?;
    let newer = match &args.against {
        Some(hash) => find(&mut versions, &args.note, hash)?,
        None => versions
            .head_commit(&args.note)
            .ok_or_else(|| unknown_note(&args.note))?,
    };

    let (old_text, new_text) = if args.decrypt {
        let mut holder = vault.key_holder();
        unlock(&vault, &mut holder, args.no_input, false, ctx.quiet())?;
        let key = holder
            .key()
            .ok_or_else(|| CliError::auth_failed("Vault is locked."))?;
        let old = decrypt(&older.content, key.expose()).map_err(decrypt_error)?;
        let new = decrypt(&newer.content, key.expose()).map_err(decrypt_error)?;
        (old.plaintext().to_string(), new.plaintext().to_string())
    } else {
        (older.content.clone(), newer.content.clone())
    };

    let spans = diff_words(&old_text, &new_text);
    let changed = old_text != new_text;

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        let output = serde_json::json!({
            "note": args.note,
            "from": older.hash,
            "to": newer.hash,
            "changed": changed,
            "spans": spans,
        });
        return print_json(&output);
    }

    if ui_ctx.mode == OutputMode::Pretty && !ctx.quiet() {
        print(
            &ui_ctx,
            &header(
                &ui_ctx,
                "diff",
                Some(&format!("{} {}..{}", args.note, older.hash, newer.hash)),
            ),
        );
        blank_line(&ui_ctx);
    }

    if !changed {
        print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "No differences"));
        return Ok(());
    }
    if !has_differences(&spans) {
        // one side is empty
        print(
            &ui_ctx,
            &badge(&ui_ctx, Badge::Info, "Nothing to compare: one version is empty"),
        );
        return Ok(());
    }
    if !args.decrypt && (looks_encrypted(&older) || looks_encrypted(&newer)) && !ctx.quiet() {
        eprintln!(
            "{}",
            hint(&ui_ctx, "Bodies are encrypted; pass --decrypt to compare the text")
        );
    }
    println!("{}", format_word_diff(&ui_ctx, &spans));
    Ok(())
}

fn find(versions: &mut VersionStore, note: &str, hash: &str) -> anyhow::Result<Commit> {
    versions.find_commit(note, hash).ok_or_else(|| {
        CliError::not_found(
            format!("Commit {} not found for note {}", hash, note),
            format!("Run `vaultnote log {}` to list commits", note),
        )
        .into()
    })
}

fn looks_encrypted(commit: &Commit) -> bool {
    inspect_envelope(&commit.content).is_json
}
