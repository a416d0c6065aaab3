//! Subprocess execution for external engines.

use std::process::{ExitStatus, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use tokio::process::Command;

use crate::traits::{CommandSpec, EngineError};

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Combined stderr and stdout with terminal colors stripped.
    pub fn combined(&self) -> String {
        let stderr = strip_ansi(self.stderr.trim());
        let stdout = strip_ansi(self.stdout.trim());

        match (stderr.is_empty(), stdout.is_empty()) {
            (true, true) => String::new(),
            (false, true) => stderr,
            (true, false) => stdout,
            (false, false) => format!("{stderr}\nStdout:\n{stdout}"),
        }
    }

    /// Diagnostic text for a failed run.
    pub fn diagnostic(&self, name: &str) -> String {
        let mut msg = format!("Command `{name}` failed with {}", self.status);
        let combined = self.combined();
        if !combined.is_empty() {
            msg.push('\n');
            msg.push_str(&combined);
        }
        msg
    }
}

/// Run a command to completion, capturing its output.
///
/// There is no timeout. Ctrl-C kills the child and yields
/// [`EngineError::Interrupted`]. A Ctrl-C arriving while no child runs is
/// not seen here; [`crate::InterruptWatch`] covers those stretches.
pub async fn run(spec: &CommandSpec) -> Result<ProcessOutput, EngineError> {
    let name = spec.name();
    tracing::debug!("Running `{}` in {}", spec.display(), spec.cwd.display());

    let child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(&spec.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| EngineError::Spawn {
            program: name.clone(),
            source,
        })?;

    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available: never resolve
            std::future::pending::<()>().await;
        }
    };

    // Dropping the wait future on interrupt drops the child, which kills it
    let output = tokio::select! {
        output = child.wait_with_output() => output.map_err(|source| EngineError::Spawn {
            program: name.clone(),
            source,
        })?,
        () = interrupted => return Err(EngineError::Interrupted(format!("`{name}`"))),
    };

    Ok(ProcessOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi pattern"));
    re.replace_all(s, "").into_owned()
}
