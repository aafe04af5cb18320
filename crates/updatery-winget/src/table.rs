//! Positional parser for winget's fixed-width tables.
//!
//! winget has no stable machine-readable listing, so field boundaries come
//! from the character offsets of the header keywords. This only works for
//! English output; a localized header yields no rows.

/// Columns we know how to read, in the order winget prints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Id,
    Version,
    Available,
    Source,
}

impl Column {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Id,
        Self::Version,
        Self::Available,
        Self::Source,
    ];

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Id => "Id",
            Self::Version => "Version",
            Self::Available => "Available",
            Self::Source => "Source",
        }
    }
}

const HEADER_KEYWORDS: [Column; 3] = [Column::Name, Column::Id, Column::Version];
const MIN_COLUMNS: usize = 3;

/// One data line, keyed by the columns present in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    fields: Vec<(Column, String)>,
}

impl TableRow {
    #[must_use]
    pub fn get(&self, column: Column) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, value)| value.as_str())
    }

    /// Columns in left-to-right order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.fields.iter().map(|(column, _)| *column)
    }
}

/// Why a listing could not be read as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    MissingHeader,
    MissingSeparator,
    TooFewColumns,
}

impl TableError {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingHeader => "no header line with Name, Id and Version",
            Self::MissingSeparator => "header is not followed by a dash separator",
            Self::TooFewColumns => "fewer than three known columns in header",
        }
    }
}

/// Parse winget table output into rows, in input order.
///
/// Returns an empty list when no header is found, when the header is not
/// followed by an all-dash separator, or when fewer than three known columns
/// appear in the header.
#[must_use]
pub fn parse_table(output: &str) -> Vec<TableRow> {
    try_parse_table(output).unwrap_or_default()
}

/// [`parse_table`], reporting why nothing could be parsed.
///
/// # Errors
/// Returns the first structural problem found in the output.
pub fn try_parse_table(output: &str) -> Result<Vec<TableRow>, TableError> {
    let lines: Vec<&str> = split_lines(output).collect();

    let header_idx = lines
        .iter()
        .position(|line| {
            HEADER_KEYWORDS
                .iter()
                .all(|column| line.contains(column.keyword()))
        })
        .ok_or(TableError::MissingHeader)?;

    if !lines.get(header_idx + 1).is_some_and(|line| is_separator(line)) {
        return Err(TableError::MissingSeparator);
    }

    let columns = column_offsets(lines[header_idx]);
    if columns.len() < MIN_COLUMNS {
        return Err(TableError::TooFewColumns);
    }

    Ok(lines[header_idx + 2..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| slice_row(line, &columns))
        .collect())
}

/// Line splitting that treats `\r\n`, `\r` and `\n` alike. winget redraws its
/// progress spinner with bare carriage returns before printing the table.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        if let Some(pos) = rest.find(['\r', '\n']) {
            let line = &rest[..pos];
            let break_len = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
            rest = &rest[pos + break_len..];
            Some(line)
        } else {
            let line = rest;
            rest = "";
            Some(line)
        }
    })
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-')
}

/// Known columns present in the header with their character offsets, sorted
/// left to right.
fn column_offsets(header: &str) -> Vec<(Column, usize)> {
    let mut columns: Vec<(Column, usize)> = Column::ALL
        .iter()
        .filter_map(|column| {
            header
                .find(column.keyword())
                .map(|byte_pos| (*column, header[..byte_pos].chars().count()))
        })
        .collect();
    columns.sort_by_key(|(_, offset)| *offset);
    columns
}

fn slice_row(line: &str, columns: &[(Column, usize)]) -> TableRow {
    let chars: Vec<char> = line.chars().collect();
    let bounds = column_bounds(&chars, columns);

    let fields = columns
        .iter()
        .enumerate()
        .map(|(j, (column, _))| {
            let start = bounds[j];
            let end = bounds.get(j + 1).copied().unwrap_or(chars.len());
            let value = if start < chars.len() {
                chars[start..end.min(chars.len())]
                    .iter()
                    .collect::<String>()
                    .trim()
                    .to_string()
            } else {
                String::new()
            };
            (*column, value)
        })
        .collect();

    TableRow { fields }
}

/// Start offset of every column for one line. A header offset that lands in
/// the middle of a word is pushed right to the end of that word, so a value
/// that overran its column stays whole. Aligned output always has a blank
/// before each column start and is sliced exactly at the header offsets.
fn column_bounds(chars: &[char], columns: &[(Column, usize)]) -> Vec<usize> {
    let mut bounds: Vec<usize> = Vec::with_capacity(columns.len());

    for (j, (_, offset)) in columns.iter().enumerate() {
        let mut bound = bounds.last().map_or(*offset, |prev| (*offset).max(*prev));
        if j > 0 {
            while bound > 0
                && bound < chars.len()
                && !chars[bound - 1].is_whitespace()
                && !chars[bound].is_whitespace()
            {
                bound += 1;
            }
        }
        bounds.push(bound);
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::{Column, TableError, parse_table, split_lines, try_parse_table};

    fn dashes(n: usize) -> String {
        "-".repeat(n)
    }

    fn table(header: &str, rows: &[&str]) -> String {
        let mut text = format!("{header}\n{}\n", dashes(header.len()));
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn parses_documented_scenario_row() {
        let text = format!(
            "Name   Id        Version  Available  Source\n{}\nFoo.Bar  Foo.Bar.Id  1.0      2.0        winget\n",
            dashes(60)
        );

        let rows = parse_table(&text);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Column::Name), Some("Foo.Bar"));
        assert_eq!(rows[0].get(Column::Id), Some("Foo.Bar.Id"));
        assert_eq!(rows[0].get(Column::Version), Some("1.0"));
        assert_eq!(rows[0].get(Column::Available), Some("2.0"));
        assert_eq!(rows[0].get(Column::Source), Some("winget"));
    }

    #[test]
    fn aligned_rows_are_sliced_at_header_offsets() {
        let text = table(
            "Name           Id                Version   Available Source",
            &[
                "Microsoft Edge Microsoft.Edge    120.0.1   121.0.2   winget",
                "7-Zip          7zip.7zip         23.01               winget",
                "Side Loaded    ARP\\Machine\\X64   1.2",
            ],
        );

        let rows = parse_table(&text);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get(Column::Name), Some("Microsoft Edge"));
        assert_eq!(rows[0].get(Column::Id), Some("Microsoft.Edge"));
        assert_eq!(rows[0].get(Column::Available), Some("121.0.2"));
        assert_eq!(rows[1].get(Column::Available), Some(""));
        assert_eq!(rows[1].get(Column::Source), Some("winget"));
        assert_eq!(rows[2].get(Column::Id), Some("ARP\\Machine\\X64"));
        assert_eq!(rows[2].get(Column::Available), Some(""));
        assert_eq!(rows[2].get(Column::Source), Some(""));
    }

    #[test]
    fn optional_columns_may_appear_in_any_order() {
        let text = table(
            "Name    Source  Id      Available Version",
            &["Foo     winget  Foo.Id  2.0       1.0"],
        );

        let rows = parse_table(&text);

        assert_eq!(rows.len(), 1);
        let columns: Vec<Column> = rows[0].columns().collect();
        assert_eq!(
            columns,
            vec![
                Column::Name,
                Column::Source,
                Column::Id,
                Column::Available,
                Column::Version
            ]
        );
        assert_eq!(rows[0].get(Column::Source), Some("winget"));
        assert_eq!(rows[0].get(Column::Available), Some("2.0"));
        assert_eq!(rows[0].get(Column::Version), Some("1.0"));
    }

    #[test]
    fn missing_optional_columns_are_absent_from_rows() {
        let text = table("Name  Id    Version", &["Foo   Foo   1.0"]);

        let rows = parse_table(&text);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Column::Available), None);
        assert_eq!(rows[0].get(Column::Source), None);
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = table(
            "Name  Id     Version Available Source",
            &["A     a.id   1       2         winget", "B     b.id   3       4         msstore"],
        );

        assert_eq!(parse_table(&text), parse_table(&text));
    }

    #[test]
    fn no_header_yields_nothing() {
        assert!(parse_table("No installed package found matching input criteria.\n").is_empty());
        assert!(parse_table("").is_empty());
    }

    #[test]
    fn header_without_separator_yields_nothing() {
        let text = "Name  Id  Version  Available  Source\nFoo   f   1.0      2.0        winget\n";

        assert!(parse_table(text).is_empty());
    }

    #[test]
    fn separator_with_other_characters_yields_nothing() {
        let text = "Name  Id  Version  Available  Source\n----=====----\nFoo   f   1.0      2.0        winget\n";

        assert!(parse_table(text).is_empty());
    }

    #[test]
    fn try_parse_reports_structural_problem() {
        assert_eq!(
            try_parse_table("No installed package found matching input criteria."),
            Err(TableError::MissingHeader)
        );
        assert_eq!(
            try_parse_table("Name Id Version\nFoo f 1\n"),
            Err(TableError::MissingSeparator)
        );
        assert_eq!(try_parse_table("Name Id Version\n---\n"), Ok(Vec::new()));
    }

    #[test]
    fn blank_separator_yields_nothing() {
        let text = "Name  Id  Version  Available  Source\n   \nFoo   f   1.0      2.0        winget\n";

        assert!(parse_table(text).is_empty());
    }

    #[test]
    fn header_at_end_of_input_yields_nothing() {
        assert!(parse_table("Name  Id  Version").is_empty());
    }

    #[test]
    fn header_with_two_keywords_yields_nothing() {
        let text = "Name  Id\n--------\nFoo   f.id\n";

        assert!(parse_table(text).is_empty());
    }

    #[test]
    fn short_lines_leave_trailing_columns_empty() {
        let text = table("Name  Id    Version  Available  Source", &["Foo   f.id"]);

        let rows = parse_table(&text);

        assert_eq!(rows[0].get(Column::Id), Some("f.id"));
        assert_eq!(rows[0].get(Column::Version), Some(""));
        assert_eq!(rows[0].get(Column::Source), Some(""));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let text = table(
            "Name  Id    Version",
            &["Foo   f.id  1", "   ", "", "Bar   b.id  2"],
        );

        let rows = parse_table(&text);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get(Column::Name), Some("Bar"));
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let text = table(
            "Name   Id      Version Available Source",
            &["Café…  cafe.id 1.0     1.1       winget"],
        );

        let rows = parse_table(&text);

        assert_eq!(rows[0].get(Column::Name), Some("Café…"));
        assert_eq!(rows[0].get(Column::Id), Some("cafe.id"));
        assert_eq!(rows[0].get(Column::Source), Some("winget"));
    }

    #[test]
    fn spinner_frames_before_header_are_ignored() {
        let text = format!(
            "\r   - \r   \\ \r   | \rName  Id    Version Available Source\r\n{}\r\nFoo   f.id  1.0     2.0       winget\r\n",
            dashes(38)
        );

        let rows = parse_table(&text);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Column::Name), Some("Foo"));
        assert_eq!(rows[0].get(Column::Source), Some("winget"));
    }

    #[test]
    fn split_lines_handles_every_line_break() {
        let lines: Vec<&str> = split_lines("a\r\nb\rc\nd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);

        let lines: Vec<&str> = split_lines("a\n\nb\n").collect();
        assert_eq!(lines, vec!["a", "", "b"]);
    }
}
