use std::sync::LazyLock;

use updatery_backend::ExitCodeTable;

pub(crate) const REBOOT_REQUIRED: i64 = 3;
pub(crate) const ACCESS_DENIED: i64 = 5;

/// winget installer result codes (`APPINSTALLER_CLI_ERROR_*`) plus the two
/// plain Windows exit codes installers commonly pass through.
pub(crate) static WINGET_EXIT_CODES: LazyLock<ExitCodeTable> = LazyLock::new(|| {
    ExitCodeTable::builder("Unknown error")
        .code(REBOOT_REQUIRED, "Reboot required to complete")
        .code(ACCESS_DENIED, "Access denied — needs admin elevation")
        .result_code(0x8A15_0006, "ShellExecute install failed")
        .result_code(0x8A15_0008, "Downloading installer failed")
        .result_code(0x8A15_0010, "No applicable installer for this system")
        .result_code(0x8A15_0011, "Installer hash mismatch")
        .result_code(0x8A15_0019, "Requires administrator privileges")
        .result_code(0x8A15_002B, "No applicable update found")
        .result_code(0x8A15_004F, "Upgrade version is not newer than installed")
        .result_code(0x8A15_0061, "Package is already installed")
        .result_code(0x8A15_0101, "App is running — close it and retry")
        .result_code(0x8A15_0102, "Another installation in progress — try later")
        .result_code(0x8A15_0103, "File in use — close the app and retry")
        .result_code(0x8A15_0105, "Not enough disk space")
        .result_code(0x8A15_0108, "Installer error — contact support")
        .result_code(0x8A15_0109, "Restart PC to finish installation")
        .result_code(0x8A15_010A, "Installation failed — restart PC and retry")
        .result_code(0x8A15_010C, "Installation was cancelled")
        .result_code(0x8A15_010D, "Another version already installed")
        .result_code(0x8A15_010E, "A higher version is already installed")
        .result_code(0x8A15_010F, "Blocked by organization policy")
        .build()
});
