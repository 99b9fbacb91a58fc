use vaultnote_core::codec::inspect_envelope;

use crate::app::{read_text, AppContext};
use crate::cli::InspectArgs;
use crate::output::print_json;
use crate::ui::{kv, print};

pub fn handle_inspect(ctx: &AppContext, args: &InspectArgs) -> anyhow::Result<()> {
    let text = read_text(args.text.clone(), false)?;
    let info = inspect_envelope(text.trim());

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        return print_json(&info);
    }

    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    print(&ui_ctx, &kv(&ui_ctx, "Kind", info.kind));
    print(&ui_ctx, &kv(&ui_ctx, "Length", &info.length.to_string()));
    print(&ui_ctx, &kv(&ui_ctx, "Empty", yes_no(info.is_empty)));
    print(&ui_ctx, &kv(&ui_ctx, "JSON", yes_no(info.is_json)));
    print(&ui_ctx, &kv(&ui_ctx, "Base64", yes_no(info.is_base64)));
    print(&ui_ctx, &kv(&ui_ctx, "Preview", &info.preview));
    Ok(())
}
