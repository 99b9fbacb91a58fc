mod branch;
mod clear;
mod commit;
mod diff;
mod log;
mod show;

pub use branch::{handle_branch, handle_branches, handle_checkout};
pub use clear::handle_clear_history;
pub use commit::handle_commit;
pub use diff::handle_diff;
pub use log::handle_log;
pub use show::handle_show;

use crate::errors::CliError;

pub(crate) fn unknown_note(note: &str) -> CliError {
    CliError::not_found(
        format!("No history for note {}", note),
        format!("Record a first version with `vaultnote commit {}`", note),
    )
}
