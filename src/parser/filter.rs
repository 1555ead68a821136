use std::fmt;

use crate::rules::{find_fragment, Rules};

use super::links::LinkPair;

/// Why a link pair was dropped before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    HrefMarker(String),
    TitlePhrase(String),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::HrefMarker(m) => write!(f, "href marker {:?}", m),
            Exclusion::TitlePhrase(p) => write!(f, "title phrase {:?}", p),
        }
    }
}

/// `Some` when the pair points at a namespace, system or navigation page.
///
/// Both checks are case-insensitive substring matches, so a title that merely
/// contains a chrome phrase is dropped even if the rest looks like an entity.
pub fn exclusion(pair: &LinkPair, rules: &Rules) -> Option<Exclusion> {
    let href = pair.href.to_lowercase();
    if let Some(marker) = find_fragment(&rules.href_markers, &href) {
        return Some(Exclusion::HrefMarker(marker.to_string()));
    }
    let title = pair.title.to_lowercase();
    find_fragment(&rules.title_phrases, &title).map(|p| Exclusion::TitlePhrase(p.to_string()))
}
