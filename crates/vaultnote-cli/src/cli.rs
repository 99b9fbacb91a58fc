use clap::{Args, Parser, Subcommand};

use vaultnote_core::VERSION;

use crate::config::StorageBackend;

/// VaultNote - client-side encrypted notes with commit history
#[derive(Parser)]
#[command(name = "vaultnote")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault store (overrides the config file)
    #[arg(short, long, global = true, env = "VAULTNOTE_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging on stderr (VAULTNOTE_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the config file and protect a new vault with a passphrase
    Init(InitArgs),

    /// Verify the passphrase and unlock the session
    Unlock(UnlockArgs),

    /// Clear the session key and forget this device
    Lock,

    /// Show vault, lock and device status
    Status(JsonArgs),

    /// Encrypt text into an envelope
    Encrypt(TextArgs),

    /// Decrypt an envelope of any known format
    Decrypt(TextArgs),

    /// Check whether the passphrase opens an envelope
    Verify(TextArgs),

    /// Record a note body as a new commit
    Commit(CommitArgs),

    /// List commits on the note's current branch, newest first
    Log(LogArgs),

    /// Print one commit
    Show(ShowArgs),

    /// Word-level diff between a commit and HEAD or another commit
    Diff(DiffArgs),

    /// Fork a branch at HEAD and switch to it
    Branch(BranchArgs),

    /// Switch a note to another branch
    Checkout(BranchArgs),

    /// List a note's branches
    Branches(NoteArgs),

    /// Rate a passphrase
    Strength(JsonArgs),

    /// Describe an envelope without decrypting it
    Inspect(InspectArgs),

    /// Delete the history of every note
    ClearHistory(ClearHistoryArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Where the vault store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Storage backend for the vault
    #[arg(long, value_enum)]
    pub backend: Option<StorageBackend>,

    /// Disable interactive prompts (requires VAULTNOTE_PASSPHRASE)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `unlock` command
#[derive(Args)]
pub struct UnlockArgs {
    /// Remember this device after unlocking
    #[arg(long)]
    pub remember: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Input for commands that read a note body or an envelope
#[derive(Args)]
pub struct TextArgs {
    /// Text to process (reads stdin when omitted)
    #[arg(long)]
    pub text: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `commit` command
#[derive(Args)]
pub struct CommitArgs {
    /// Note identifier
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// Commit message (generated from the first line when omitted)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Note body (reads stdin when omitted)
    #[arg(long)]
    pub text: Option<String>,

    /// Encrypt the body before committing
    #[arg(long)]
    pub encrypt: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `log` command
#[derive(Args)]
pub struct LogArgs {
    /// Note identifier
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// Maximum number of commits to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note identifier
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// Commit hash
    #[arg(value_name = "HASH")]
    pub hash: String,

    /// Decrypt the stored body
    #[arg(long)]
    pub decrypt: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `diff` command
#[derive(Args)]
pub struct DiffArgs {
    /// Note identifier
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// Older commit
    #[arg(value_name = "HASH")]
    pub hash: String,

    /// Newer commit (defaults to HEAD)
    #[arg(value_name = "AGAINST")]
    pub against: Option<String>,

    /// Decrypt both bodies before comparing
    #[arg(long)]
    pub decrypt: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for `branch` and `checkout`
#[derive(Args)]
pub struct BranchArgs {
    /// Note identifier
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// Branch name
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Note identifier
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `inspect` command
#[derive(Args)]
pub struct InspectArgs {
    /// Envelope to inspect (reads stdin when omitted)
    #[arg(long)]
    pub text: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `clear-history` command
#[derive(Args)]
pub struct ClearHistoryArgs {
    /// Confirm deleting all history
    #[arg(long)]
    pub yes: bool,
}
