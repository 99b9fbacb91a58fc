use vaultnote_core::history::DEFAULT_BRANCH;

use crate::app::AppContext;
use crate::cli::LogArgs;
use crate::output::{print_commit_log, print_json};
use crate::ui::{blank_line, header, print, OutputMode};

use super::unknown_note;

pub fn handle_log(ctx: &AppContext, args: &LogArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut versions = vault.versions();
    let mut commits = versions.get_versions(&args.note);
    if commits.is_empty() && versions.history(&args.note).is_none() {
        return Err(unknown_note(&args.note).into());
    }
    if let Some(limit) = args.limit {
        commits.truncate(limit);
    }

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        return print_json(&commits);
    }

    if ui_ctx.mode == OutputMode::Pretty && !ctx.quiet() {
        let branch = versions
            .current_branch(&args.note)
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        print(
            &ui_ctx,
            &header(&ui_ctx, "log", Some(&format!("{} on {}", args.note, branch))),
        );
        blank_line(&ui_ctx);
    }
    print_commit_log(&ui_ctx, &commits);
    Ok(())
}
