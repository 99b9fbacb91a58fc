use chrono::Local;
use vaultnote_core::encrypt;
use vaultnote_core::history::{auto_message, DEFAULT_BRANCH};

use crate::app::{read_text, unlock, AppContext};
use crate::cli::CommitArgs;
use crate::errors::CliError;
use crate::ui::{badge, print, receipt, Badge};

pub fn handle_commit(ctx: &AppContext, args: &CommitArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let body = read_text(args.text.clone(), args.no_input)?;
    if body.is_empty() {
        return Err(CliError::invalid_input("Nothing to commit: the note body is empty").into());
    }

    let mut versions = vault.versions();
    let previous_head = versions.history(&args.note).and_then(|h| h.head.clone());

    let (content, message) = if args.encrypt {
        let mut holder = vault.key_holder();
        unlock(&vault, &mut holder, args.no_input, false, ctx.quiet())?;
        let key = holder
            .key()
            .ok_or_else(|| CliError::auth_failed("Vault is locked."))?;
        // Titles come from the plaintext, never the envelope.
        let message = args
            .message
            .clone()
            .unwrap_or_else(|| auto_message(&body, &Local::now()));
        (encrypt(&body, key.expose())?, Some(message))
    } else {
        (body, args.message.clone())
    };

    let hash = versions
        .save_version(&args.note, &content, message.as_deref())
        .ok_or_else(|| CliError::invalid_input("Note identifier cannot be empty"))?;
    let branch = versions
        .current_branch(&args.note)
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    if previous_head.as_deref() == Some(hash.as_str()) {
        print(
            &ui_ctx,
            &badge(&ui_ctx, Badge::Info, &format!("No changes; HEAD is still {}", hash)),
        );
        return Ok(());
    }
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Committed",
            &[
                ("Note", args.note.as_str()),
                ("Hash", hash.as_str()),
                ("Branch", branch.as_str()),
                ("Encrypted", if args.encrypt { "yes" } else { "no" }),
            ],
        ),
    );
    Ok(())
}
