//! Plain-text rendering for the command line front end.

use updatery_backend::PackageInfo;

use crate::manager_kind::ManagerKind;
use crate::state::{LogEntry, LogLevel, ManagerPanel};

const HEADERS: [&str; 4] = ["Name", "Id", "Version", "Available"];

pub fn log_line(kind: ManagerKind, entry: &LogEntry) -> String {
    let marker = match entry.level {
        LogLevel::Info => "",
        LogLevel::Success => "ok: ",
        LogLevel::Warning => "warning: ",
        LogLevel::Error => "error: ",
        LogLevel::Output => "  | ",
    };
    format!("[{kind}] {marker}{}", entry.text)
}

pub fn manager_line(panel: &ManagerPanel) -> String {
    let status = if panel.installed {
        "installed"
    } else {
        "not installed"
    };
    let elevation = if panel.manager.capabilities().requires_elevation {
        " (upgrades need elevation)"
    } else {
        ""
    };
    format!("{:<8}{status}{elevation}", panel.kind.as_str())
}

/// Left-aligned columns sized to their widest value, in characters.
pub fn package_table(packages: &[PackageInfo]) -> String {
    let rows: Vec<[&str; 4]> = packages
        .iter()
        .map(|package| {
            [
                package.name.as_str(),
                package.package_id.as_str(),
                package.current_version.as_str(),
                package.available_version.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, values: &[&str; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (index, (value, width)) in values.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        line.push_str(value);
        let pad = width - value.chars().count();
        line.extend(std::iter::repeat_n(' ', pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
