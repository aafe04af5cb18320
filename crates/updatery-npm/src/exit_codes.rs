use std::sync::LazyLock;

use updatery_backend::ExitCodeTable;

pub(crate) static NPM_EXIT_CODES: LazyLock<ExitCodeTable> = LazyLock::new(|| {
    ExitCodeTable::builder("npm error")
        .code(0, "Success")
        .code(1, "General error")
        .code(127, "Command not found")
        .build()
});
