// src/alfred.rs
use crate::entry::Entry;
use crate::utils;
use serde::Serialize;
use std::error::Error;

/// Represents an Alfred Script Filter item
#[derive(Serialize, Debug)]
pub struct AlfredItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mods: Option<Mods>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quicklookurl: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct Mods {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<ModifierAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<ModifierAction>,
}

#[derive(Serialize, Debug)]
pub struct ModifierAction {
    pub valid: bool,
    pub arg: String,
    pub subtitle: String,
}

#[derive(Serialize, Debug)]
pub struct Text {
    pub copy: String,
    pub largetype: String,
}

#[derive(Serialize, Debug)]
pub struct AlfredResponse {
    pub items: Vec<AlfredItem>,
}

/// Build the Script Filter response for already filtered and sorted entries
pub fn response<'a, I>(entries: I, show_stats: bool) -> AlfredResponse
where
    I: IntoIterator<Item = &'a Entry>,
{
    AlfredResponse {
        items: entries
            .into_iter()
            .map(|entry| to_item(entry, show_stats))
            .collect(),
    }
}

/// Output search results to Alfred
pub fn output_results<'a, I>(entries: I, show_stats: bool) -> Result<(), Box<dyn Error>>
where
    I: IntoIterator<Item = &'a Entry>,
{
    println!("{}", serde_json::to_string(&response(entries, show_stats))?);
    Ok(())
}

fn stats_line(entry: &Entry) -> String {
    format!(
        "★ {} · updated {}",
        utils::format_stars(entry.repository_stars),
        utils::format_date(&entry.repository_last_updated)
    )
}

/// Convert an Entry to an AlfredItem
fn to_item(entry: &Entry, show_stats: bool) -> AlfredItem {
    let slug = utils::repo_slug(&entry.repository);
    let mut subtitle = if entry.description.is_empty() {
        slug.clone()
    } else {
        entry.description.clone()
    };
    if show_stats {
        subtitle = format!("{subtitle} ({})", stats_line(entry));
    }

    let repository = entry.has_repository().then(|| entry.repository.clone());

    AlfredItem {
        uid: Some(repository.clone().unwrap_or_else(|| entry.name.clone())),
        title: entry.name.clone(),
        subtitle: Some(subtitle),
        arg: repository.clone(),
        valid: Some(entry.has_repository()),
        mods: repository.as_ref().map(|url| Mods {
            alt: Some(ModifierAction {
                valid: true,
                arg: url.clone(),
                subtitle: stats_line(entry),
            }),
            cmd: Some(ModifierAction {
                valid: true,
                arg: url.clone(),
                subtitle: slug.clone(),
            }),
        }),
        text: repository.as_ref().map(|url| Text {
            copy: url.clone(),
            largetype: format!("{}\n{}", entry.name, url),
        }),
        quicklookurl: repository,
    }
}
