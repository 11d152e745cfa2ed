use std::path::PathBuf;

use purifier_model::RunResult;

/// What a subcommand produced, for the summary printer and exit code.
#[derive(Debug)]
pub struct CommandOutcome {
    pub result: RunResult,
    pub output_dir: PathBuf,
    /// Written files; empty on a dry run.
    pub written: Vec<PathBuf>,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
}

impl CommandOutcome {
    /// Process exit code: 1 when any input failed to parse.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.result.has_parse_failures())
    }
}
