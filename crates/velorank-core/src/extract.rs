use thiserror::Error;

use crate::entry::{Category, Entry, ValidationLimits};

/// Entry fields a header column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    FullName,
    Score,
    Affiliation,
    RankHint,
}

/// Why extraction for one tab produced nothing. Never fatal to the pipeline;
/// callers log and move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no tab matched category '{0}'")]
    TabNotFound(Category),
    #[error("tab for category '{0}' has no rows")]
    EmptyTab(Category),
    #[error("header row for category '{0}' does not identify a name and a score column")]
    InvalidHeader(Category),
}

enum Match {
    Exact,
    Contains,
}

struct HeaderRule {
    needles: &'static [&'static str],
    kind: Match,
    field: Field,
}

/// Priority-ordered header rules. Evaluated top to bottom per header cell;
/// the first matching rule wins, so the sheet-specific exact names take
/// precedence over the generic fallbacks.
const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule { needles: &["first name"], kind: Match::Exact, field: Field::FirstName },
    HeaderRule { needles: &["last name", "surname"], kind: Match::Exact, field: Field::LastName },
    HeaderRule { needles: &["total"], kind: Match::Exact, field: Field::Score },
    HeaderRule { needles: &["ci club"], kind: Match::Exact, field: Field::Affiliation },
    HeaderRule { needles: &["name", "rider", "cyclist"], kind: Match::Contains, field: Field::FullName },
    HeaderRule { needles: &["points", "pts", "total"], kind: Match::Contains, field: Field::Score },
    HeaderRule { needles: &["club", "team"], kind: Match::Contains, field: Field::Affiliation },
    HeaderRule { needles: &["pos", "position", "rank"], kind: Match::Contains, field: Field::RankHint },
    HeaderRule { needles: &["#"], kind: Match::Exact, field: Field::RankHint },
];

fn match_field(header_cell: &str) -> Option<Field> {
    let cell = header_cell.trim().to_lowercase();
    if cell.is_empty() {
        return None;
    }
    for rule in HEADER_RULES {
        let hit = match rule.kind {
            Match::Exact => rule.needles.iter().any(|n| cell == *n),
            Match::Contains => rule.needles.iter().any(|n| cell.contains(n)),
        };
        if hit {
            return Some(rule.field);
        }
    }
    None
}

/// Column indices resolved from a header row.
///
/// Built by pattern matching on column names rather than fixed positions, so
/// tabs with reordered or renamed columns (or a single combined name column
/// instead of first/last) all extract correctly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderMap {
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub full_name: Option<usize>,
    pub score: Option<usize>,
    pub affiliation: Option<usize>,
    pub rank_hint: Option<usize>,
}

impl HeaderMap {
    /// Map each header cell to a field. The first column matching a field
    /// keeps it; later duplicates are ignored.
    pub fn from_header_row(header: &[String]) -> Self {
        let mut map = HeaderMap::default();
        for (idx, cell) in header.iter().enumerate() {
            let Some(field) = match_field(cell) else {
                continue;
            };
            let slot = match field {
                Field::FirstName => &mut map.first_name,
                Field::LastName => &mut map.last_name,
                Field::FullName => &mut map.full_name,
                Field::Score => &mut map.score,
                Field::Affiliation => &mut map.affiliation,
                Field::RankHint => &mut map.rank_hint,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }

    /// A mapping is usable only when it can produce a name and a score:
    /// (first AND last) or last alone or a generic name column, plus a
    /// score column.
    pub fn is_valid(&self) -> bool {
        let has_name = (self.first_name.is_some() && self.last_name.is_some())
            || self.last_name.is_some()
            || self.full_name.is_some();
        has_name && self.score.is_some()
    }

    fn cell<'a>(&self, row: &'a [String], idx: Option<usize>) -> &'a str {
        idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
    }

    fn build_name(&self, row: &[String]) -> String {
        let first = self.cell(row, self.first_name).trim();
        let last = self.cell(row, self.last_name).trim();
        if !first.is_empty() || !last.is_empty() {
            return [first, last]
                .iter()
                .filter(|p| !p.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
        }
        self.cell(row, self.full_name).trim().to_string()
    }

    /// Convert one data row into an entry tagged with `category`. All-blank
    /// rows yield `None`. A missing or unparseable score becomes NaN so the
    /// validity filter drops the record; an unparseable position falls back
    /// to 0 (absent).
    pub fn build_entry(&self, row: &[String], category: Category) -> Option<Entry> {
        if row.iter().all(|c| c.trim().is_empty()) {
            return None;
        }

        let score = self
            .cell(row, self.score)
            .trim()
            .parse::<f64>()
            .unwrap_or(f64::NAN);
        let rank_hint = self.cell(row, self.rank_hint).trim().parse::<i64>().unwrap_or(0);
        let affiliation = match self.cell(row, self.affiliation).trim() {
            "" => None,
            a => Some(a.to_string()),
        };

        Some(Entry {
            name: self.build_name(row),
            rank_hint,
            score,
            affiliation,
            category,
        })
    }
}

/// Extract entries for `category` from a set of named tab grids, returning
/// an empty list (with a warning) when the tab is missing or its header is
/// unusable. A bad tab never aborts the rest of the pipeline.
pub fn extract_category(
    tabs: &[(String, Vec<Vec<String>>)],
    category: Category,
    limits: &ValidationLimits,
) -> Vec<Entry> {
    match try_extract_category(tabs, category, limits) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(category = %category, error = %err, "skipping category");
            Vec::new()
        }
    }
}

/// Fallible variant of [`extract_category`], used where the caller wants to
/// distinguish a structural problem from a simply absent tab.
pub fn try_extract_category(
    tabs: &[(String, Vec<Vec<String>>)],
    category: Category,
    limits: &ValidationLimits,
) -> Result<Vec<Entry>, ExtractError> {
    let grid = tabs
        .iter()
        .find(|(name, _)| category.matches_tab(name))
        .map(|(_, grid)| grid)
        .ok_or(ExtractError::TabNotFound(category))?;
    extract_rows(grid, category, limits)
}

/// Extract entries from a single tab grid whose first row is the header.
pub fn extract_rows(
    grid: &[Vec<String>],
    category: Category,
    limits: &ValidationLimits,
) -> Result<Vec<Entry>, ExtractError> {
    let Some(header) = grid.first() else {
        return Err(ExtractError::EmptyTab(category));
    };

    let map = HeaderMap::from_header_row(header);
    if !map.is_valid() {
        return Err(ExtractError::InvalidHeader(category));
    }

    Ok(grid[1..]
        .iter()
        .filter_map(|row| map.build_entry(row, category))
        .filter(|entry| entry.is_valid(limits))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse_rows;

    fn limits() -> ValidationLimits {
        ValidationLimits::default()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_map_split_names() {
        let map = HeaderMap::from_header_row(&row(&["First Name", "Last Name", "Total", "CI Club"]));
        assert_eq!(map.first_name, Some(0));
        assert_eq!(map.last_name, Some(1));
        assert_eq!(map.score, Some(2));
        assert_eq!(map.affiliation, Some(3));
        assert!(map.is_valid());
    }

    #[test]
    fn test_header_map_generic_synonyms() {
        let map = HeaderMap::from_header_row(&row(&["Pos", "Rider", "Points", "Team"]));
        assert_eq!(map.rank_hint, Some(0));
        assert_eq!(map.full_name, Some(1));
        assert_eq!(map.score, Some(2));
        assert_eq!(map.affiliation, Some(3));
        assert!(map.is_valid());
    }

    #[test]
    fn test_header_map_case_insensitive_and_trimmed() {
        let map = HeaderMap::from_header_row(&row(&["  FIRST NAME ", "last name", " TOTAL "]));
        assert!(map.is_valid());
        assert_eq!(map.score, Some(2));
    }

    #[test]
    fn test_first_matching_column_wins() {
        let map = HeaderMap::from_header_row(&row(&["Points", "Total Points"]));
        assert_eq!(map.score, Some(0));
    }

    #[test]
    fn test_invalid_header_missing_score() {
        let map = HeaderMap::from_header_row(&row(&["First Name", "Last Name", "Club"]));
        assert!(!map.is_valid());
    }

    #[test]
    fn test_invalid_header_missing_name() {
        let map = HeaderMap::from_header_row(&row(&["Pos", "Points", "Club"]));
        assert!(!map.is_valid());
    }

    #[test]
    fn test_extract_joins_names() {
        let grid = parse_rows("First Name,Last Name,Total,CI Club\nJohn,Doe,150,Test Club\nJane,Smith,140,Another Club");
        let entries = extract_rows(&grid, Category::ALeague, &limits()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "John Doe");
        assert_eq!(entries[0].score, 150.0);
        assert_eq!(entries[0].affiliation.as_deref(), Some("Test Club"));
        assert_eq!(entries[0].category, Category::ALeague);
        assert_eq!(entries[1].name, "Jane Smith");
    }

    #[test]
    fn test_extract_single_name_column() {
        let grid = parse_rows("Rider,Points\nJohn Doe,55\nJane Smith,40");
        let entries = extract_rows(&grid, Category::Development, &limits()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "John Doe");
        assert_eq!(entries[0].category, Category::Development);
    }

    #[test]
    fn test_extract_last_name_only() {
        let grid = parse_rows("Last Name,Total\nDoe,12");
        let entries = extract_rows(&grid, Category::ALeague, &limits()).unwrap();
        assert_eq!(entries[0].name, "Doe");
    }

    #[test]
    fn test_extract_rank_hint() {
        let grid = parse_rows("Pos,Rider,Points\n2,John,10\nx,Jane,9");
        let entries = extract_rows(&grid, Category::ALeague, &limits()).unwrap();
        assert_eq!(entries[0].rank_hint, 2);
        assert_eq!(entries[1].rank_hint, 0, "unparseable position falls back to 0");
    }

    #[test]
    fn test_malformed_rows_dropped() {
        // 5 data rows, 2 malformed: one without a name, one with a
        // non-numeric score. Blank row is skipped outright.
        let grid = parse_rows(
            "First Name,Last Name,Total\n\
             John,Doe,150\n\
             ,,120\n\
             Jane,Smith,abc\n\
             ,,,\n\
             Amy,Jones,90\n\
             Tom,Byrne,85",
        );
        let entries = extract_rows(&grid, Category::ALeague, &limits()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["John Doe", "Amy Jones", "Tom Byrne"]);
    }

    #[test]
    fn test_invalid_header_aborts_tab_only() {
        let grid = parse_rows("Colour,Shape\nred,square");
        assert_eq!(
            extract_rows(&grid, Category::ALeague, &limits()),
            Err(ExtractError::InvalidHeader(Category::ALeague))
        );
    }

    #[test]
    fn test_mixed_schema_tabs() {
        // One tab with split name columns, another with a combined column.
        let tabs = vec![
            (
                "A League".to_string(),
                parse_rows("First Name,Last Name,Total\nJohn,Doe,150"),
            ),
            (
                "Development League".to_string(),
                parse_rows("Rider,Points\nJane Smith,90"),
            ),
        ];
        let a = extract_category(&tabs, Category::ALeague, &limits());
        let dev = extract_category(&tabs, Category::Development, &limits());
        assert_eq!(a[0].name, "John Doe");
        assert_eq!(dev[0].name, "Jane Smith");
    }

    #[test]
    fn test_missing_tab_is_nonfatal() {
        let tabs = vec![(
            "A League".to_string(),
            parse_rows("First Name,Last Name,Total\nJohn,Doe,150"),
        )];
        assert!(extract_category(&tabs, Category::Development, &limits()).is_empty());
        assert_eq!(
            try_extract_category(&tabs, Category::Development, &limits()),
            Err(ExtractError::TabNotFound(Category::Development))
        );
    }

    #[test]
    fn test_empty_tab() {
        let tabs = vec![("A League".to_string(), Vec::new())];
        assert_eq!(
            try_extract_category(&tabs, Category::ALeague, &limits()),
            Err(ExtractError::EmptyTab(Category::ALeague))
        );
    }
}
