use chrono::{Local, TimeZone};
use vaultnote_core::history::DEFAULT_BRANCH;
use vaultnote_core::LockState;

use crate::app::{unlock, AppContext};
use crate::cli::JsonArgs;
use crate::constants::env_vars;
use crate::output::print_json;
use crate::ui::{blank_line, header, kv, print, OutputMode};

pub fn handle_status(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut holder = vault.key_holder();

    // Only the environment passphrase is tried; status never prompts.
    if std::env::var(env_vars::PASSPHRASE).is_ok_and(|v| !v.trim().is_empty()) {
        if let Err(e) = unlock(&vault, &mut holder, true, false, true) {
            tracing::debug!(error = %e, "Environment passphrase did not unlock the vault");
        }
    }

    let has_check = vault.passphrase_check()?.is_some();
    let notes = vault.versions().note_ids().count();
    let marker = holder.remembered_device();
    let remembered_here = holder.is_remembered_here();
    let state = match holder.state() {
        LockState::Locked => "locked",
        LockState::Unlocked => "unlocked",
    };
    let retention = vault.config().history.retention();
    let last_write = vault.last_write()?;

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        let device = marker.as_ref().map(|m| {
            serde_json::json!({
                "device_id": m.device_id,
                "timestamp": m.timestamp,
                "this_device": remembered_here,
            })
        });
        let output = serde_json::json!({
            "store": vault.path().display().to_string(),
            "backend": vault.backend().label(),
            "session": state,
            "passphrase_set": has_check,
            "remembered_device": device,
            "notes": notes,
            "last_write": last_write.map(|dt| dt.to_rfc3339()),
            "retention": {
                "default_branch": retention.default_branch_limit,
                "branch": retention.branch_limit,
            },
        });
        return print_json(&output);
    }

    let remembered = match &marker {
        Some(m) => {
            let since = Local
                .timestamp_millis_opt(m.timestamp)
                .single()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| m.timestamp.to_string());
            let whose = if remembered_here { "this device" } else { "another device" };
            format!("{} since {}", whose, since)
        }
        None => "no".to_string(),
    };

    if ui_ctx.mode == OutputMode::Pretty {
        print(&ui_ctx, &header(&ui_ctx, "status", None));
        blank_line(&ui_ctx);
    }
    print(&ui_ctx, &kv(&ui_ctx, "Store", &vault.path().display().to_string()));
    print(&ui_ctx, &kv(&ui_ctx, "Backend", vault.backend().label()));
    print(&ui_ctx, &kv(&ui_ctx, "Session", state));
    print(
        &ui_ctx,
        &kv(&ui_ctx, "Passphrase set", if has_check { "yes" } else { "no" }),
    );
    print(&ui_ctx, &kv(&ui_ctx, "Remembered", &remembered));
    print(&ui_ctx, &kv(&ui_ctx, "Notes", &notes.to_string()));
    let last_write = last_write
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    print(&ui_ctx, &kv(&ui_ctx, "Last write", &last_write));
    print(
        &ui_ctx,
        &kv(
            &ui_ctx,
            "Retention",
            &format!(
                "{} on {}, {} per branch",
                retention.default_branch_limit, DEFAULT_BRANCH, retention.branch_limit
            ),
        ),
    );
    Ok(())
}
