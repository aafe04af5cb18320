use tokio::task::AbortHandle;

/// Which background operation a slot tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Scan,
    Upgrade,
}

impl OperationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Upgrade => "upgrade",
        }
    }
}

/// One in-flight background operation per manager and kind.
///
/// Starting a new operation bumps `request_seq` and aborts the previous
/// task, so only the latest operation's messages are applied. Aborting the
/// task does not kill a child process it already started.
#[derive(Debug, Default)]
pub struct OperationSlot {
    request_seq: u64,
    busy: bool,
    task: Option<AbortHandle>,
}

impl OperationSlot {
    pub fn begin(&mut self) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.request_seq = self.request_seq.wrapping_add(1);
        self.busy = true;
        self.request_seq
    }

    pub fn attach(&mut self, task: AbortHandle) {
        self.task = Some(task);
    }

    pub fn is_current(&self, request_seq: u64) -> bool {
        self.busy && request_seq == self.request_seq
    }

    /// Mark the operation done. Returns false for a stale `request_seq`.
    pub fn finish(&mut self, request_seq: u64) -> bool {
        if !self.is_current(request_seq) {
            return false;
        }
        self.busy = false;
        self.task = None;
        true
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn request_seq(&self) -> u64 {
        self.request_seq
    }
}
