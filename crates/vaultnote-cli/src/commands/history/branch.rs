use vaultnote_core::history::DEFAULT_BRANCH;

use crate::app::AppContext;
use crate::cli::{BranchArgs, NoteArgs};
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::theme::{styled, styles};
use crate::ui::{blank_line, header, print, receipt, table, Column, OutputMode};

use super::unknown_note;

pub fn handle_branch(ctx: &AppContext, args: &BranchArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut versions = vault.versions();

    if !versions.create_branch(&args.note, &args.name) {
        let reason = if args.name.trim().is_empty() || args.name == DEFAULT_BRANCH {
            format!("'{}' is not a valid branch name", args.name)
        } else if versions.history(&args.note).is_none() {
            return Err(unknown_note(&args.note).into());
        } else {
            format!(
                "Cannot create branch '{}' for note {}; it may already exist",
                args.name, args.note
            )
        };
        return Err(CliError::invalid_input(reason).into());
    }

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let head = versions
            .history(&args.note)
            .and_then(|h| h.head.clone())
            .unwrap_or_default();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Branch created",
                &[("Note", args.note.as_str()), ("Branch", args.name.as_str()), ("HEAD", head.as_str())],
            ),
        );
    }
    Ok(())
}

pub fn handle_checkout(ctx: &AppContext, args: &BranchArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut versions = vault.versions();

    let head = versions.switch_branch(&args.note, &args.name).ok_or_else(|| {
        CliError::not_found(
            format!("Branch '{}' not found for note {}", args.name, args.note),
            format!("Run `vaultnote branches {}` to list branches", args.note),
        )
    })?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Switched branch",
                &[
                    ("Note", args.note.as_str()),
                    ("Branch", args.name.as_str()),
                    ("HEAD", head.hash.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_branches(ctx: &AppContext, args: &NoteArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    let mut versions = vault.versions();
    let branches = versions.branches(&args.note);
    if branches.is_empty() {
        return Err(unknown_note(&args.note).into());
    }

    let ui_ctx = ctx.ui_context(args.json);
    if ui_ctx.mode.is_json() {
        return print_json(&branches);
    }

    if ui_ctx.mode == OutputMode::Pretty && !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "branches", Some(&args.note)));
        blank_line(&ui_ctx);
    }
    let rows: Vec<Vec<String>> = branches
        .iter()
        .map(|branch| {
            let marker = if branch.is_current {
                styled("*", styles::green(), ui_ctx.color)
            } else {
                String::new()
            };
            vec![marker, branch.name.clone(), branch.commits.to_string()]
        })
        .collect();
    let columns = [Column::new(""), Column::new("Branch"), Column::new("Commits")];
    print(&ui_ctx, &table(&ui_ctx, &columns, &rows));
    Ok(())
}
