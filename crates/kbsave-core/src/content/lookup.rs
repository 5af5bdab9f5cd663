//! Game content lookups
//!
//! The decoder never owns content tables. Callers that can tell real item
//! identifiers from stats, buffs, and achievements pass a [`ContentLookup`].

/// Resolves identifiers against known game content
pub trait ContentLookup {
    fn is_item(&self, name: &str) -> bool;
}

impl<F> ContentLookup for F
where
    F: Fn(&str) -> bool,
{
    fn is_item(&self, name: &str) -> bool {
        self(name)
    }
}

/// Accepts every identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ContentLookup for AcceptAll {
    fn is_item(&self, _name: &str) -> bool {
        true
    }
}

/// Prefix-based item recognition for callers without a content database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixRules {
    /// When non-empty, an item must start with one of these
    pub accept_prefixes: Vec<String>,
    pub reject_prefixes: Vec<String>,
    pub reject_names: Vec<String>,
}

impl PrefixRules {
    /// Entries that share the item encoding but are not carried items
    pub fn hero_items() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        Self {
            accept_prefixes: Vec::new(),
            reject_prefixes: owned(&[
                "achievement_",
                "medal_",
                "sp_",
                "hidden_",
                "warrior_bonus_",
                "demoness_",
            ]),
            reject_names: owned(&[
                "slbody",
                "experience",
                "defense",
                "crystals",
                "wife0",
                "wife1",
                "wife2",
                "wife3",
                "comp1_item",
                "comp2_item",
                "comp3_item",
                "comp4_item",
            ]),
        }
    }

    pub fn with_accept_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

impl ContentLookup for PrefixRules {
    fn is_item(&self, name: &str) -> bool {
        if self.reject_names.iter().any(|n| n == name) {
            return false;
        }
        if self.reject_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return false;
        }
        self.accept_prefixes.is_empty()
            || self.accept_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}
