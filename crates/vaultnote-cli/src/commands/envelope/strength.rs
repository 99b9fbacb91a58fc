use vaultnote_core::crypto::{evaluate_strength, PassphraseStrength};

use crate::app::{read_passphrase, AppContext};
use crate::cli::JsonArgs;
use crate::output::print_json;
use crate::ui::{badge, kv, print, Badge};

pub fn handle_strength(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let passphrase = read_passphrase(false)?;
    let report = evaluate_strength(&passphrase);

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        return print_json(&report);
    }

    let kind = match report.strength {
        PassphraseStrength::Strong => Badge::Ok,
        PassphraseStrength::Moderate => Badge::Warn,
        PassphraseStrength::Weak => Badge::Err,
    };
    print(&ui_ctx, &badge(&ui_ctx, kind, report.strength.label()));
    print(
        &ui_ctx,
        &kv(&ui_ctx, "Criteria met", &format!("{}/5", report.criteria_met)),
    );
    print(&ui_ctx, report.feedback);
    Ok(())
}
