use std::fmt::{Display, Formatter, Result as FmtResult};

use super::sanitize;

/// Placeholder used for reporting when an entry has neither a title nor a
/// usable reference.
const UNKNOWN_TITLE: &str = "unknown";

/// One mod entry of a modpack listing.
///
/// Both fields are optional: broken markup produces a partially-filled
/// reference instead of failing the whole listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModReference {
    /// Display name with all whitespace removed.
    pub title: Option<String>,
    /// Path of the mod's detail page, relative to the hosting origin.
    pub reference: Option<String>,
}
impl ModReference {
    pub fn new(title: Option<impl AsRef<str>>, reference: Option<impl Into<String>>) -> Self {
        Self {
            title: title.map(sanitize).filter(|t| !t.is_empty()),
            reference: reference.map(Into::into),
        }
    }

    /// Name to report this entry under.
    ///
    /// Falls back to the last segment of the reference path
    /// (`/c/game/p/Owner/Name/` becomes `Name`) when the title is missing.
    pub fn display_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        self.reference
            .as_deref()
            .and_then(|r| r.split('/').rev().find(|segment| !segment.is_empty()))
            .unwrap_or(UNKNOWN_TITLE)
            .to_string()
    }
}

impl Display for ModReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.reference {
            Some(reference) => write!(f, "{} ({})", self.display_title(), reference),
            None => write!(f, "{}", self.display_title()),
        }
    }
}
