use std::process::Stdio;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Prepares a package manager invocation to run unattended: no console window
/// on Windows and no inherited stdin, so a tool that unexpectedly prompts sees
/// end-of-input instead of blocking on the operator's terminal.
pub trait BackgroundCommand {
    fn background(&mut self) -> &mut Self;
}

impl BackgroundCommand for tokio::process::Command {
    #[cfg(windows)]
    fn background(&mut self) -> &mut Self {
        self.creation_flags(CREATE_NO_WINDOW).stdin(Stdio::null())
    }

    #[cfg(not(windows))]
    fn background(&mut self) -> &mut Self {
        self.stdin(Stdio::null())
    }
}
