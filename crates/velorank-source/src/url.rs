use crate::error::SourceError;

const PUBLISHED_MARKER: &str = "/spreadsheets/d/e/";
const DIRECT_MARKER: &str = "/spreadsheets/d/";
const SHORT_MARKER: &str = "/d/";

/// A spreadsheet identifier extracted from one of the supported public
/// sharing-link shapes.
///
/// The "published to web" form carries a long opaque publication id followed
/// by `/pubhtml`; the "direct" forms carry the document id after
/// `/spreadsheets/d/` or a bare `/d/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Published { id: String },
    Direct { id: String },
}

impl SheetRef {
    /// Extract the document identifier from a shareable URL.
    pub fn parse(url: &str) -> Result<Self, SourceError> {
        let url = url.trim();

        if let Some(id) = id_after(url, PUBLISHED_MARKER) {
            return Ok(SheetRef::Published { id });
        }
        if let Some(id) = id_after(url, DIRECT_MARKER) {
            return Ok(SheetRef::Direct { id });
        }
        if let Some(id) = id_after(url, SHORT_MARKER) {
            return Ok(SheetRef::Direct { id });
        }

        Err(SourceError::InvalidUrl(url.to_string()))
    }

    /// The per-tab CSV export URL for this document.
    pub fn csv_url(&self, gid: &str) -> String {
        match self {
            SheetRef::Published { id } => format!(
                "https://docs.google.com/spreadsheets/d/e/{id}/pub?output=csv&gid={gid}"
            ),
            SheetRef::Direct { id } => format!(
                "https://docs.google.com/spreadsheets/d/{id}/export?format=csv&gid={gid}"
            ),
        }
    }
}

fn id_after(url: &str, marker: &str) -> Option<String> {
    let start = url.find(marker)? + marker.len();
    let id: String = url[start..]
        .chars()
        .take_while(|c| !matches!(c, '/' | '?' | '#'))
        .collect();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUB_ID: &str =
        "2PACX-1vS2Bi0VWUtBxL7yQ27ctm5CQlky2rRAlZzxhKI0M0G-oDUnHnaA-fdQjmEdRF5wbbycP5bJHWL_-POp";

    #[test]
    fn test_parse_published_url() {
        let url = format!("https://docs.google.com/spreadsheets/d/e/{PUB_ID}/pubhtml");
        let sheet = SheetRef::parse(&url).unwrap();
        assert_eq!(sheet, SheetRef::Published { id: PUB_ID.to_string() });
    }

    #[test]
    fn test_parse_direct_url() {
        let sheet = SheetRef::parse("https://docs.google.com/spreadsheets/d/abc123/edit#gid=0").unwrap();
        assert_eq!(sheet, SheetRef::Direct { id: "abc123".to_string() });
    }

    #[test]
    fn test_parse_short_direct_url() {
        let sheet = SheetRef::parse("https://docs.google.com/d/abc123").unwrap();
        assert_eq!(sheet, SheetRef::Direct { id: "abc123".to_string() });
    }

    #[test]
    fn test_parse_rejects_unknown_shapes() {
        assert!(matches!(
            SheetRef::parse("https://example.com/standings.csv"),
            Err(SourceError::InvalidUrl(_))
        ));
        assert!(matches!(
            SheetRef::parse("https://docs.google.com/spreadsheets/d/"),
            Err(SourceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_published_csv_url() {
        let sheet = SheetRef::Published { id: "PUBID".to_string() };
        assert_eq!(
            sheet.csv_url("42"),
            "https://docs.google.com/spreadsheets/d/e/PUBID/pub?output=csv&gid=42"
        );
    }

    #[test]
    fn test_direct_csv_url() {
        let sheet = SheetRef::Direct { id: "abc123".to_string() };
        assert_eq!(
            sheet.csv_url("0"),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv&gid=0"
        );
    }
}
