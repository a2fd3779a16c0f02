use chrono::{DateTime, Utc};
use thiserror::Error;

use velorank_core::{Category, ResultSet};

/// The presentation layer threw while building output. The one failure with
/// no cache fallback: the data was fine, only the display failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Display target of the orchestrator. Implementations own the mount point;
/// the orchestrator only decides WHAT state to show.
pub trait Presenter {
    fn show_loading(&mut self);
    /// Show a failure message together with a manual retry affordance.
    fn show_error(&mut self, message: &str);
    fn show_results(&mut self, results: &ResultSet) -> Result<(), RenderError>;
}

/// One row of a rendered table.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// 1-based display position after ranking.
    pub position: usize,
    pub name: String,
    pub score: f64,
    pub affiliation: Option<String>,
}

/// One category section of the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub title: &'static str,
    pub rows: Vec<RenderedRow>,
}

/// Pure display structure built from a result set, independent of any
/// output format.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub title: &'static str,
    pub updated_at: DateTime<Utc>,
    pub sections: Vec<RenderedSection>,
}

/// Build the display structure for `results`, one section per category in
/// display order.
pub fn build_view(results: &ResultSet) -> RenderedView {
    let sections = Category::ALL
        .iter()
        .map(|category| RenderedSection {
            title: category.display_name(),
            rows: results
                .category(*category)
                .iter()
                .enumerate()
                .map(|(idx, entry)| RenderedRow {
                    position: idx + 1,
                    name: entry.name.clone(),
                    score: entry.score,
                    affiliation: entry.affiliation.clone(),
                })
                .collect(),
        })
        .collect();

    RenderedView {
        title: "Top Riders",
        updated_at: results.computed_at,
        sections,
    }
}

/// Renders the widget as an HTML fragment, using the same container/class
/// names as the deployed standings page. Callers inject [`html`](Self::html)
/// into their mount element after every state change.
#[derive(Debug, Clone, Default)]
pub struct HtmlPresenter {
    html: String,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current HTML fragment.
    pub fn html(&self) -> &str {
        &self.html
    }

    fn header(view_time: Option<DateTime<Utc>>) -> String {
        let updated = view_time
            .map(|t| {
                format!(
                    "<span class=\"top-riders-updated\">Updated {}</span>",
                    t.format("%H:%M")
                )
            })
            .unwrap_or_default();
        format!(
            "<div class=\"top-riders-header\"><h2>Top Riders</h2>{updated}\
             <button class=\"top-riders-refresh-btn\" type=\"button\">Refresh</button></div>"
        )
    }
}

impl Presenter for HtmlPresenter {
    fn show_loading(&mut self) {
        self.html = "<div class=\"top-riders-loading\">Loading top riders…</div>".to_string();
    }

    fn show_error(&mut self, message: &str) {
        self.html = format!(
            "<div class=\"top-riders-error\"><p>{}</p>\
             <button class=\"top-riders-refresh-btn\" type=\"button\">Try again</button></div>",
            escape_html(message)
        );
    }

    fn show_results(&mut self, results: &ResultSet) -> Result<(), RenderError> {
        let view = build_view(results);
        let mut out = Self::header(Some(view.updated_at));

        for section in &view.sections {
            out.push_str(&format!(
                "<div class=\"top-riders-section\"><h3>{}</h3>",
                escape_html(section.title)
            ));
            if section.rows.is_empty() {
                out.push_str("<p class=\"top-riders-empty\">No results yet</p>");
            } else {
                out.push_str(
                    "<table class=\"top-riders-table\"><thead><tr>\
                     <th>#</th><th>Rider</th><th>Points</th><th>Club</th>\
                     </tr></thead><tbody>",
                );
                for row in &section.rows {
                    out.push_str(&format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        row.position,
                        escape_html(&row.name),
                        format_score(row.score),
                        escape_html(row.affiliation.as_deref().unwrap_or("—")),
                    ));
                }
                out.push_str("</tbody></table>");
            }
            out.push_str("</div>");
        }

        self.html = out;
        Ok(())
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.abs() < 1e15 {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
