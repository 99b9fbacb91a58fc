use crate::app::{unlock, AppContext};
use crate::cli::UnlockArgs;
use crate::ui::{print, receipt};

pub fn handle_unlock(ctx: &AppContext, args: &UnlockArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut holder = vault.key_holder();
    unlock(&vault, &mut holder, args.no_input, args.remember, ctx.quiet())?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let remembered = if holder.is_remembered_here() { "yes" } else { "no" };
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Passphrase accepted",
                &[("Remembered device", remembered)],
            ),
        );
    }
    Ok(())
}
