/// Parse delimited text into a rectangular grid of trimmed string cells.
///
/// Splits on line breaks, drops blank lines, splits each line on commas,
/// trims every cell and strips one layer of surrounding double quotes.
///
/// Commas inside quoted fields are NOT handled: a field like `"Doe, Jr"`
/// splits into two cells. The published sheets this feeds on never quote
/// fields, so the simple split is kept deliberately.
pub fn parse_rows(raw: &str) -> Vec<Vec<String>> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(clean_cell).collect())
        .collect()
}

fn clean_cell(cell: &str) -> String {
    let trimmed = cell.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}
