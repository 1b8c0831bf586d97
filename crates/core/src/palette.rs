//! Command-palette search over notes, tags and host commands.
//!
//! One query fans out to the note search, the tag table and a list of
//! commands supplied by the host. Results are merged into a single list of
//! [`PaletteItem`]s ordered by match tier, then kind, then label.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::index::search::name_match;
use crate::index::{MatchKind, SearchHit, SearchQuery, TagCount, VaultIndex};

/// A command the host offers in its palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteCommand {
    pub id: String,
    pub title: String,
}

impl PaletteCommand {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

/// One palette row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaletteItem {
    Note(SearchHit),
    Tag(TagCount),
    Command(PaletteCommand),
}

impl PaletteItem {
    /// Text shown for the row.
    pub fn label(&self) -> &str {
        match self {
            Self::Note(hit) => &hit.name,
            Self::Tag(tag) => &tag.tag,
            Self::Command(cmd) => &cmd.title,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Self::Command(_) => 0,
            Self::Note(_) => 1,
            Self::Tag(_) => 2,
        }
    }
}

/// Search notes, tags and `commands` for `query`.
///
/// Facet queries (`file:`, `path:`, `content:`) only return notes; `tag:`
/// returns notes and matching tags. A blank query returns nothing.
pub fn palette_search(
    index: &VaultIndex,
    query: &str,
    commands: &[PaletteCommand],
) -> Vec<PaletteItem> {
    let Some(parsed) = SearchQuery::parse(query) else {
        return Vec::new();
    };

    let mut ranked: Vec<(MatchKind, PaletteItem)> = index
        .search_files(query)
        .into_iter()
        .map(|hit| (hit.kind, PaletteItem::Note(hit)))
        .collect();

    if let SearchQuery::Name(q) | SearchQuery::Tag(q) = &parsed {
        ranked.extend(
            index
                .tags()
                .into_iter()
                .filter_map(|tag| name_match(&tag.tag, q).map(|kind| (kind, PaletteItem::Tag(tag)))),
        );
    }

    if let SearchQuery::Name(q) = &parsed {
        ranked.extend(commands.iter().filter_map(|cmd| {
            name_match(&cmd.title.to_lowercase(), q)
                .map(|kind| (kind, PaletteItem::Command(cmd.clone())))
        }));
    }

    // Stable, so notes with equal labels keep their search order.
    ranked.sort_by(|(ka, a), (kb, b)| compare_items(*ka, a, *kb, b));
    ranked.into_iter().map(|(_, item)| item).collect()
}

fn compare_items(ka: MatchKind, a: &PaletteItem, kb: MatchKind, b: &PaletteItem) -> Ordering {
    kb.score()
        .cmp(&ka.score())
        .then_with(|| a.kind_rank().cmp(&b.kind_rank()))
        .then_with(|| a.label().to_lowercase().cmp(&b.label().to_lowercase()))
}
