use crate::app::AppContext;
use crate::cli::ClearHistoryArgs;
use crate::errors::CliError;
use crate::ui::{badge, print, Badge};

pub fn handle_clear_history(ctx: &AppContext, args: &ClearHistoryArgs) -> anyhow::Result<()> {
    if !args.yes {
        return Err(CliError::invalid_input(
            "Refusing to delete the history of every note without --yes",
        )
        .into());
    }

    let vault = ctx.open_vault()?;
    let mut versions = vault.versions();
    versions.clear_all()?;
    tracing::info!(path = %vault.path().display(), "History cleared");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "History cleared."));
    }
    Ok(())
}
