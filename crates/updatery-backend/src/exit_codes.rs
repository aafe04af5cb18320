use std::collections::HashMap;

const SIGNED_SPAN: i64 = 1 << 32;

/// Immutable code-to-message lookup for one package manager.
///
/// Windows result codes such as `0x8A150011` may reach us either as the
/// unsigned value or as its negative two's-complement `i32` form, depending on
/// how the exit status was surfaced; [`ExitCodeTableBuilder::result_code`]
/// registers both.
#[derive(Debug, Clone)]
pub struct ExitCodeTable {
    messages: HashMap<i64, &'static str>,
    fallback: &'static str,
}

impl ExitCodeTable {
    /// Start a table whose unknown codes render as `"{fallback} (code N)"`.
    #[must_use]
    pub fn builder(fallback: &'static str) -> ExitCodeTableBuilder {
        ExitCodeTableBuilder {
            table: Self {
                messages: HashMap::new(),
                fallback,
            },
        }
    }

    #[must_use]
    pub fn get(&self, code: i64) -> Option<&'static str> {
        self.messages.get(&code).copied()
    }

    #[must_use]
    pub fn translate(&self, code: i64) -> String {
        match self.get(code) {
            Some(message) => message.to_string(),
            None => format!("{} (code {code})", self.fallback),
        }
    }

    /// Every registered code, signed aliases included.
    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.messages.keys().copied()
    }
}

pub struct ExitCodeTableBuilder {
    table: ExitCodeTable,
}

impl ExitCodeTableBuilder {
    /// Register a plain process exit code.
    #[must_use]
    pub fn code(mut self, code: i64, message: &'static str) -> Self {
        self.table.messages.insert(code, message);
        self
    }

    /// Register a 32-bit result code under its unsigned value and, when it
    /// does not fit in an `i32`, under its signed interpretation too.
    #[must_use]
    pub fn result_code(mut self, code: u32, message: &'static str) -> Self {
        let unsigned = i64::from(code);
        self.table.messages.insert(unsigned, message);
        if i32::try_from(code).is_err() {
            self.table.messages.insert(unsigned - SIGNED_SPAN, message);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> ExitCodeTable {
        self.table
    }
}
