//! Spell cost sub-blocks of spell definition files
//!
//! ```text
//! spell_haste {
//!   school=1
//!   levels {
//!     1=5,1        // <level>=<mana>,<crystals>
//!     2=8,2
//!     3=10,4
//!   }
//! }
//! ```
//!
//! Battle schools (1 to 4) carry a `levels` block. Wandering spells
//! (school 5) do not, and have no costs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Schools whose spells are cast in battle and cost mana
pub const BATTLE_SCHOOLS: std::ops::RangeInclusive<u32> = 1..=4;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Value(String),
    Block(Vec<(String, Node)>),
}

impl Node {
    fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Block(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Node::Value(_) => None,
        }
    }

    fn as_value(&self) -> Option<&str> {
        match self {
            Node::Value(v) => Some(v),
            Node::Block(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCosts {
    pub school: Option<u32>,
    pub mana_cost: Option<Vec<u32>>,
    pub crystal_cost: Option<Vec<u32>>,
}

impl SpellCosts {
    /// Parse one spell definition, with or without its enclosing name
    pub fn parse(text: &str) -> Self {
        let root = parse_tree(text);
        let block = match &root {
            Node::Block(entries) if root.get("school").is_none() && entries.len() == 1 => {
                &entries[0].1
            }
            _ => &root,
        };
        Self::from_block(block)
    }

    fn from_block(block: &Node) -> Self {
        let school = block
            .get("school")
            .and_then(Node::as_value)
            .and_then(|v| v.parse::<u32>().ok());

        let levels = match (school, block.get("levels")) {
            (Some(s), Some(levels)) if BATTLE_SCHOOLS.contains(&s) => Some(levels),
            _ => None,
        };

        match levels {
            Some(levels) => {
                let (mana, crystals) = parse_levels(levels);
                Self {
                    school,
                    mana_cost: Some(mana),
                    crystal_cost: Some(crystals),
                }
            }
            None => Self {
                school,
                mana_cost: None,
                crystal_cost: None,
            },
        }
    }
}

/// Costs of every `spell_*` block in a spells file, keyed without the prefix
pub fn parse_spells_file(text: &str) -> BTreeMap<String, SpellCosts> {
    let Node::Block(entries) = parse_tree(text) else {
        return BTreeMap::new();
    };
    entries
        .iter()
        .filter(|(_, node)| matches!(node, Node::Block(_)))
        .filter_map(|(name, node)| {
            name.strip_prefix("spell_")
                .map(|id| (id.to_string(), SpellCosts::from_block(node)))
        })
        .collect()
}

fn parse_levels(levels: &Node) -> (Vec<u32>, Vec<u32>) {
    let mut entries: Vec<(i64, &str)> = match levels {
        Node::Block(entries) => entries
            .iter()
            .filter_map(|(key, node)| Some((key.parse::<i64>().ok()?, node.as_value()?)))
            .filter(|(level, _)| *level > 0)
            .collect(),
        Node::Value(_) => Vec::new(),
    };
    entries.sort_by_key(|(level, _)| *level);

    entries
        .into_iter()
        .filter_map(|(_, cost)| parse_cost_pair(cost))
        .unzip()
}

fn parse_cost_pair(cost: &str) -> Option<(u32, u32)> {
    let (mana, crystals) = cost.split_once(',')?;
    if crystals.contains(',') {
        return None;
    }
    Some((mana.trim().parse().ok()?, crystals.trim().parse().ok()?))
}

fn strip_comments(text: &str) -> String {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(|line| line.find("//").map_or(line, |pos| &line[..pos]))
        .collect::<Vec<_>>()
        .join("\n")
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        match c {
            '{' | '}' | '=' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_tree(text: &str) -> Node {
    let tokens = tokenize(&strip_comments(text));
    let mut pos = 0;
    Node::Block(parse_entries(&tokens, &mut pos))
}

/// Entries up to the matching `}` (consumed) or end of input
fn parse_entries(tokens: &[String], pos: &mut usize) -> Vec<(String, Node)> {
    let mut entries = Vec::new();

    while *pos < tokens.len() {
        let token = tokens[*pos].as_str();
        if token == "}" {
            *pos += 1;
            break;
        }
        if token == "{" {
            *pos += 1;
            let index = entries.len() + 1;
            entries.push((index.to_string(), Node::Block(parse_entries(tokens, pos))));
            continue;
        }

        match tokens.get(*pos + 1).map(String::as_str) {
            Some("=") => {
                *pos += 2;
                match tokens.get(*pos).map(String::as_str) {
                    Some("{") => {
                        *pos += 1;
                        entries.push((token.to_string(), Node::Block(parse_entries(tokens, pos))));
                    }
                    Some("}") | None => entries.push((token.to_string(), Node::Value(String::new()))),
                    Some(value) => {
                        entries.push((token.to_string(), Node::Value(value.to_string())));
                        *pos += 1;
                    }
                }
            }
            Some("{") => {
                *pos += 2;
                entries.push((token.to_string(), Node::Block(parse_entries(tokens, pos))));
            }
            _ => *pos += 1,
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASTE: &str = "spell_haste {
  school=1 // order
  profit=3
  levels {
    1=5,1
    2=8,2
    3=10,4
  }
}";

    #[test]
    fn test_battle_spell_costs() {
        let costs = SpellCosts::parse(HASTE);
        assert_eq!(costs.school, Some(1));
        assert_eq!(costs.mana_cost, Some(vec![5, 8, 10]));
        assert_eq!(costs.crystal_cost, Some(vec![1, 2, 4]));
    }

    #[test]
    fn test_wandering_spell_has_no_costs() {
        let costs = SpellCosts::parse("school=5\naction=spell_wander_dig\n");
        assert_eq!(costs.school, Some(5));
        assert_eq!(costs.mana_cost, None);
        assert_eq!(costs.crystal_cost, None);
    }

    #[test]
    fn test_levels_sorted_by_number() {
        let costs = SpellCosts::parse("school=2 levels { 10=30,9 2=8,2 0=1,1 1=5,1 bad=x }");
        assert_eq!(costs.mana_cost, Some(vec![5, 8, 30]));
        assert_eq!(costs.crystal_cost, Some(vec![1, 2, 9]));
    }

    #[test]
    fn test_levels_ignored_outside_battle_schools() {
        let costs = SpellCosts::parse("school=5 levels { 1=5,1 }");
        assert_eq!(costs.mana_cost, None);
    }

    #[test]
    fn test_malformed_cost_entries_skipped() {
        let costs = SpellCosts::parse("school=3 levels { 1=5 2=8,2 3=1,2,3 }");
        assert_eq!(costs.mana_cost, Some(vec![8]));
        assert_eq!(costs.crystal_cost, Some(vec![2]));
    }

    #[test]
    fn test_spells_file() {
        let text = format!(
            "// spells\n{HASTE}\nspell_dig {{ school=5 action=dig }}\nnot_a_spell {{ school=1 }}"
        );
        let spells = parse_spells_file(&text);
        assert_eq!(spells.len(), 2);
        assert_eq!(spells["haste"].mana_cost, Some(vec![5, 8, 10]));
        assert_eq!(spells["dig"].mana_cost, None);
    }
}
