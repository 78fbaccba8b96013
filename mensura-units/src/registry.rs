//! Unit registry - alias lookup and token matching over the definition table

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use serde::{Serialize, Serializer};

use crate::definitions::{UnitDef, BASE_UNITS, DEFINITIONS, UNITY_ID};

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Handle on one definition-table entry (unit or prefix)
#[derive(Clone, Copy)]
pub struct Atom(&'static UnitDef);

impl Atom {
    /// Canonical id, e.g. `<meter>`
    pub fn id(self) -> &'static str {
        self.0.id
    }

    /// Id without the angle brackets, e.g. `meter`
    pub fn name(self) -> &'static str {
        let id = self.0.id;
        id.strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(id)
    }

    pub fn definition(self) -> &'static UnitDef {
        self.0
    }

    pub fn output_name(self) -> &'static str {
        self.0.output_name()
    }

    pub fn scalar(self) -> f64 {
        self.0.scalar
    }

    pub fn kind(self) -> &'static str {
        self.0.kind
    }

    pub fn is_prefix(self) -> bool {
        self.0.is_prefix()
    }

    pub fn is_unity(self) -> bool {
        self.0.id == UNITY_ID
    }

    pub fn is_base(self) -> bool {
        BASE_UNITS.contains(&self.0.id)
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.id)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.id)
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.id)
    }
}

/// Character trie over a set of tokens
#[derive(Default)]
struct TokenTrie {
    nodes: Vec<TrieNode>,
}

#[derive(Default)]
struct TrieNode {
    children: HashMap<char, usize>,
    atom: Option<Atom>,
}

impl TokenTrie {
    fn new() -> Self {
        TokenTrie {
            nodes: vec![TrieNode::default()],
        }
    }

    fn insert(&mut self, token: &str, atom: Atom) {
        let mut node = 0;
        for c in token.chars() {
            node = match self.nodes[node].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(c, next);
                    next
                }
            };
        }
        self.nodes[node].atom = Some(atom);
    }

    /// Every token that `text` starts with, as (byte length, atom), longest first
    fn prefixes_of(&self, text: &str) -> Vec<(usize, Atom)> {
        let mut found = Vec::new();
        let mut node = 0;
        for (offset, c) in text.char_indices() {
            match self.nodes[node].children.get(&c) {
                Some(&next) => node = next,
                None => break,
            }
            if let Some(atom) = self.nodes[node].atom {
                found.push((offset + c.len_utf8(), atom));
            }
        }
        found.reverse();
        found
    }
}

/// Registry of all known units and prefixes
pub struct UnitRegistry {
    by_id: HashMap<&'static str, Atom>,
    units: HashMap<&'static str, Atom>,
    prefixes: HashMap<&'static str, Atom>,
    unit_tokens: TokenTrie,
    prefix_tokens: TokenTrie,
    unity: Atom,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut by_id = HashMap::new();
        let mut units = HashMap::new();
        let mut prefixes = HashMap::new();

        for def in DEFINITIONS {
            let atom = Atom(def);
            by_id.insert(def.id, atom);
            let aliases = if def.is_prefix() { &mut prefixes } else { &mut units };
            for alias in def.aliases {
                aliases.insert(*alias, atom);
            }
        }

        let mut unit_tokens = TokenTrie::new();
        for (alias, atom) in &units {
            unit_tokens.insert(alias, *atom);
        }
        let mut prefix_tokens = TokenTrie::new();
        for (alias, atom) in &prefixes {
            prefix_tokens.insert(alias, *atom);
        }

        static UNITY: UnitDef = UnitDef {
            id: UNITY_ID,
            aliases: &["1", "<1>"],
            scalar: 1.0,
            kind: "",
            numerator: &[],
            denominator: &[],
        };
        let unity = by_id.get(UNITY_ID).copied().unwrap_or(Atom(&UNITY));

        tracing::debug!(
            units = units.len(),
            prefixes = prefixes.len(),
            "unit registry built"
        );

        UnitRegistry {
            by_id,
            units,
            prefixes,
            unit_tokens,
            prefix_tokens,
            unity,
        }
    }

    /// Atom by canonical id (`<meter>`)
    pub fn atom(&self, id: &str) -> Option<Atom> {
        self.by_id.get(id).copied()
    }

    /// Unit atom by alias (`m`, `meters`)
    pub fn unit(&self, alias: &str) -> Option<Atom> {
        self.units.get(alias).copied()
    }

    /// Prefix atom by alias (`k`, `kilo`)
    pub fn prefix(&self, alias: &str) -> Option<Atom> {
        self.prefixes.get(alias).copied()
    }

    pub fn unity(&self) -> Atom {
        self.unity
    }

    /// All entries in definition order
    pub fn atoms(&self) -> impl Iterator<Item = Atom> {
        DEFINITIONS.iter().map(Atom)
    }

    /// Unit tokens `text` starts with, longest first
    pub(crate) fn units_at(&self, text: &str) -> Vec<(usize, Atom)> {
        self.unit_tokens.prefixes_of(text)
    }

    /// Prefix tokens `text` starts with, longest first
    pub(crate) fn prefixes_at(&self, text: &str) -> Vec<(usize, Atom)> {
        self.prefix_tokens.prefixes_of(text)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup() {
        assert_eq!(UNITS.unit("m").unwrap().id(), "<meter>");
        assert_eq!(UNITS.unit("metres").unwrap().id(), "<meter>");
        assert_eq!(UNITS.prefix("m").unwrap().id(), "<milli>");
        assert_eq!(UNITS.prefix("\u{00B5}").unwrap().id(), "<micro>");
        assert_eq!(UNITS.prefix("\u{03BC}").unwrap().id(), "<micro>");
        assert_eq!(UNITS.unit("\u{2126}").unwrap().id(), "<ohm>");
        assert!(UNITS.unit("k").is_none());
    }

    #[test]
    fn test_later_alias_wins() {
        assert_eq!(UNITS.unit("pt").unwrap().id(), "<pint>");
        assert_eq!(UNITS.unit("gr").unwrap().id(), "<gross>");
    }

    #[test]
    fn test_units_at_longest_first() {
        let found: Vec<&str> = UNITS.units_at("mmHg").iter().map(|(_, a)| a.id()).collect();
        assert_eq!(found, vec!["<mmHg>", "<meter>"]);
        let lens: Vec<usize> = UNITS.units_at("°C").iter().map(|(l, _)| *l).collect();
        assert_eq!(lens, vec!["°C".len()]);
    }

    #[test]
    fn test_atom_names() {
        let meter = UNITS.atom("<meter>").unwrap();
        assert_eq!(meter.name(), "meter");
        assert_eq!(meter.output_name(), "m");
        assert!(meter.is_base());
        assert!(!UNITS.atom("<foot>").unwrap().is_base());
        assert!(UNITS.unity().is_unity());
    }

    #[test]
    fn test_every_definition_expands_to_base_atoms() {
        for atom in UNITS.atoms().filter(|a| !a.is_prefix()) {
            let def = atom.definition();
            for id in def.numerator.iter().chain(def.denominator) {
                let part = UNITS
                    .atom(id)
                    .unwrap_or_else(|| panic!("{} references unknown {}", def.id, id));
                assert!(
                    part.is_base() || part.is_unity(),
                    "{} expands to non-base {}",
                    def.id,
                    id
                );
            }
        }
    }

    #[test]
    fn test_base_units_define_themselves() {
        for id in BASE_UNITS {
            let atom = UNITS.atom(id).unwrap();
            assert_eq!(atom.definition().numerator, &[*id]);
            assert_eq!(atom.scalar(), 1.0);
        }
    }
}
