//! Handing finished clips to an external player.

use std::path::Path;
use std::process::{Command, Stdio};

/// Opens a player for a finished file. Fire-and-forget: failures are logged, never returned.
pub trait Presenter {
    /// Start playback of `path`.
    fn play(&self, path: &Path);
}

/// Presenter that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn play(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "playback disabled");
    }
}

/// Spawns `program args... <path>` and does not wait for it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommandPresenter {
    /// Player executable.
    pub program: String,
    /// Arguments placed before the file path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CommandPresenter {
    fn default() -> Self {
        Self {
            program: "ffplay".to_string(),
            args: vec!["-autoexit".to_string(), "-loglevel".to_string(), "error".to_string()],
        }
    }
}

impl CommandPresenter {
    pub(crate) fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Presenter for CommandPresenter {
    fn play(&self, path: &Path) {
        match self.command(path).spawn() {
            Ok(child) => {
                tracing::info!(program = %self.program, pid = child.id(), path = %path.display(), "player started");
            }
            Err(e) => {
                tracing::warn!(program = %self.program, path = %path.display(), "failed to start player: {e}");
            }
        }
    }
}
