use log::{debug, trace};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::error::BackendError;
use crate::types::UpgradeOutcome;

/// Live, merged stdout+stderr of one upgrade child.
///
/// Lines arrive in the order the two pipes deliver them. The stream is
/// consumed once: call [`UpgradeStream::next_line`] until it returns `None`,
/// then [`UpgradeStream::finish`] to collect the exit status.
pub struct UpgradeStream {
    program: String,
    child: Child,
    lines: mpsc::UnboundedReceiver<String>,
    captured: Vec<String>,
}

impl UpgradeStream {
    /// Spawn `command` with both output pipes captured.
    ///
    /// # Errors
    /// Returns [`BackendError::Spawn`] if the process cannot be started.
    pub fn spawn(mut command: Command) -> Result<Self, BackendError> {
        let program = command
            .as_std()
            .get_program()
            .to_string_lossy()
            .into_owned();

        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = command
            .spawn()
            .map_err(|error| BackendError::spawn(program.clone(), &error))?;
        debug!("Spawned {program} (pid {:?})", child.id());

        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx));
        }

        Ok(Self {
            program,
            child,
            lines: rx,
            captured: Vec::new(),
        })
    }

    /// Next output line, or `None` once both pipes are closed.
    pub async fn next_line(&mut self) -> Option<String> {
        let line = self.lines.recv().await?;
        trace!("{}: {line}", self.program);
        self.captured.push(line.clone());
        Some(line)
    }

    /// Drain whatever output remains, wait for the child and report its exit
    /// status. A missing status (for example a signal on Unix) counts as 0.
    ///
    /// # Errors
    /// Returns an error if waiting on the child fails.
    pub async fn finish(mut self) -> Result<UpgradeOutcome, BackendError> {
        while self.next_line().await.is_some() {}

        let status = self.child.wait().await?;
        let exit_code = status.code().map_or(0, i64::from);
        debug!("{} exited with code {exit_code}", self.program);

        Ok(UpgradeOutcome {
            exit_code,
            output: self.captured.join("\n"),
        })
    }
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut receiver_dropped = false;

    // Keep reading until EOF even when nobody listens any more, otherwise the
    // child dies of a broken pipe halfway through an install.
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) if receiver_dropped => {}
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                if tx.send(line).is_err() {
                    debug!("Output receiver dropped, draining child output until EOF");
                    receiver_dropped = true;
                }
            }
            Err(error) => {
                debug!("Stopped reading child output: {error}");
                break;
            }
        }
    }
}
