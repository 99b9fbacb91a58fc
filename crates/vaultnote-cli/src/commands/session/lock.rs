use crate::app::AppContext;
use crate::ui::{badge, print, Badge};

pub fn handle_lock(ctx: &AppContext) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut holder = vault.key_holder();
    let was_remembered = holder.has_remembered_device();
    holder.clear_key();

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let message = if was_remembered {
            "Locked. This device is no longer remembered."
        } else {
            "Locked."
        };
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, message));
    }
    Ok(())
}
