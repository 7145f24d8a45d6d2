//! Pure projection from application state to what gets shown.
//!
//! `project` builds a `ViewModel`; `to_html` and `to_text` serialize it for
//! a page and for a terminal respectively.

use crate::app::AppState;
use crate::entry::Entry;
use crate::highlight::{escape_html, highlight};
use crate::utils::{format_date, format_stars, repo_slug};
use std::fmt::Write;

/// One row of the result list
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub index: usize,
    pub selected: bool,
    pub name: String,
    pub slug: String,
    pub name_html: String,
    pub description_html: String,
    pub slug_html: String,
    pub stars: String,
    pub updated: String,
}

/// The detail panel for the selected entry
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub name: String,
    pub description: String,
    pub stars: String,
    pub updated: String,
    pub repository: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub count_label: String,
    pub rows: Vec<RowView>,
    /// Set to the raw query when it matched nothing
    pub no_matches_for: Option<String>,
    pub details: Option<DetailView>,
    pub open_enabled: bool,
    pub copy_enabled: bool,
    pub status: String,
}

/// Build the view for the current state
pub fn project(state: &AppState) -> ViewModel {
    let selected = state.selection.index();
    let rows: Vec<RowView> = state
        .filtered
        .iter()
        .filter_map(|id| state.entry(*id))
        .enumerate()
        .map(|(index, entry)| row_view(index, selected == Some(index), entry, &state.query))
        .collect();

    let shown = state.selected_entry().or_else(|| state.row(0));
    let repository_usable = shown.is_some_and(Entry::has_repository);

    ViewModel {
        count_label: format!("{} results", state.filtered.len()),
        no_matches_for: rows.is_empty().then(|| state.query.clone()),
        rows,
        details: shown.map(detail_view),
        open_enabled: repository_usable,
        copy_enabled: repository_usable,
        status: state.status.clone(),
    }
}

fn row_view(index: usize, selected: bool, entry: &Entry, query: &str) -> RowView {
    let slug = repo_slug(&entry.repository);
    RowView {
        index,
        selected,
        name: entry.name.clone(),
        name_html: highlight(&entry.name, query),
        description_html: highlight(&entry.description, query),
        slug_html: highlight(&slug, query),
        slug,
        stars: format_stars(entry.repository_stars),
        updated: format_date(&entry.repository_last_updated).to_string(),
    }
}

fn detail_view(entry: &Entry) -> DetailView {
    DetailView {
        name: entry.name.clone(),
        description: if entry.description.is_empty() {
            "No description available.".to_string()
        } else {
            entry.description.clone()
        },
        stars: format_stars(entry.repository_stars),
        updated: format_date(&entry.repository_last_updated).to_string(),
        repository: entry.repository.clone(),
        source: format!("{} ({})", entry.source_file, entry.source_format),
    }
}

/// HTML fragment: count, result list, detail panel, action buttons, status
pub fn to_html(view: &ViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<p id="result-count">{}</p>"#, escape_html(&view.count_label));
    out.push_str("<ul id=\"results\">\n");

    if let Some(query) = &view.no_matches_for {
        let _ = writeln!(
            out,
            r#"<li class="empty">No matches for "{}".</li>"#,
            escape_html(query)
        );
    }
    for row in &view.rows {
        let class = if row.selected { "row selected" } else { "row" };
        let _ = writeln!(
            out,
            r#"<li class="{class}" data-index="{}" tabindex="0" role="button" aria-label="{}">"#,
            row.index,
            escape_html(&row.name)
        );
        let _ = writeln!(out, r#"  <div class="name">{}</div>"#, row.name_html);
        let _ = writeln!(out, r#"  <div class="desc">{}</div>"#, row.description_html);
        let _ = writeln!(out, r#"  <div class="repo">{}</div>"#, row.slug_html);
        let _ = writeln!(
            out,
            r#"  <div class="row-stats"><span class="stat-chip">Stars: {}</span><span class="stat-chip">Updated: {}</span></div>"#,
            row.stars,
            escape_html(&row.updated)
        );
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");

    out.push_str("<section id=\"details\">\n");
    match &view.details {
        Some(d) => {
            let _ = writeln!(out, "<h2>{}</h2>", escape_html(&d.name));
            let _ = writeln!(out, "<p>{}</p>", escape_html(&d.description));
            let _ = writeln!(
                out,
                r#"<p class="detail-stats"><span class="stat-chip">Stars: {}</span><span class="stat-chip">Updated: {}</span></p>"#,
                d.stars,
                escape_html(&d.updated)
            );
            let _ = writeln!(
                out,
                r#"<p><a href="{0}" target="_blank" rel="noopener">{0}</a></p>"#,
                escape_html(&d.repository)
            );
            let _ = writeln!(out, r#"<p class="kv">Source: {}</p>"#, escape_html(&d.source));
        }
        None => out.push_str("<h2>BOF Details</h2>\n<p>No BOF selected.</p>\n"),
    }
    out.push_str("</section>\n");

    let disabled = |enabled: bool| if enabled { "" } else { " disabled" };
    let _ = writeln!(
        out,
        r#"<button id="open-repo"{}>Open</button><button id="copy-repo"{}>Copy URL</button>"#,
        disabled(view.open_enabled),
        disabled(view.copy_enabled)
    );
    let _ = writeln!(out, r#"<p id="status">{}</p>"#, escape_html(&view.status));
    out
}

/// Plain listing for terminals; the selected row is marked with `>`
pub fn to_text(view: &ViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.count_label);

    if let Some(query) = &view.no_matches_for {
        let _ = writeln!(out, "No matches for \"{query}\".");
    }
    for row in &view.rows {
        let marker = if row.selected { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:>3}  {}  [{}]  stars {}  updated {}",
            row.index, row.name, row.slug, row.stars, row.updated
        );
    }

    out.push_str("--\n");
    match &view.details {
        Some(d) => {
            let _ = writeln!(out, "{}", d.name);
            let _ = writeln!(out, "{}", d.description);
            let _ = writeln!(out, "Stars: {}  Updated: {}", d.stars, d.updated);
            let _ = writeln!(out, "{}", d.repository);
            let _ = writeln!(out, "Source: {}", d.source);
        }
        None => out.push_str("No BOF selected.\n"),
    }
    if !view.status.is_empty() {
        let _ = writeln!(out, "[{}]", view.status);
    }
    out
}
