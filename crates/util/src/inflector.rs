//! English singularization for collection property names.
//!
//! Adder/remover discovery turns a plural property (`axes`) into candidate
//! singular stems (`ax`, `axe`, `axis`). Irregular plurals produce several
//! candidates; callers try them in order.

/// Produces candidate singular forms of a plural word.
pub trait Inflector: Send + Sync {
    /// Ordered candidates, never empty. A word that looks singular already is
    /// returned unchanged.
    fn singularize(&self, plural: &str) -> Vec<String>;
}

/// Suffix rules, most specific first. An empty replacement list marks a
/// suffix whose words are already singular.
const RULES: &[(&str, &[&str])] = &[
    ("children", &["child"]),
    ("people", &["person"]),
    ("teeth", &["tooth"]),
    ("feet", &["foot"]),
    ("geese", &["goose"]),
    ("mice", &["mouse"]),
    ("oxen", &["ox"]),
    ("criteria", &["criterion"]),
    ("phenomena", &["phenomenon"]),
    ("data", &["datum"]),
    ("axes", &["ax", "axe", "axis"]),
    ("matrices", &["matrix"]),
    ("vertices", &["vertex"]),
    ("indices", &["index", "indix"]),
    ("men", &["man"]),
    ("ies", &["y", "ie"]),
    ("ves", &["f", "fe", "ve"]),
    ("sses", &["ss"]),
    ("xes", &["x", "xe"]),
    ("ches", &["ch", "che"]),
    ("shes", &["sh", "she"]),
    ("zes", &["z", "ze"]),
    ("oes", &["o", "oe"]),
    ("ses", &["s", "se", "sis"]),
    ("ss", &[]),
    ("us", &[]),
    ("is", &[]),
    ("s", &[""]),
];

/// Rule-table inflector for English nouns.
///
/// The stem before the matched suffix keeps its original case, and a
/// replacement inherits the case of the suffix's first letter, so camelized
/// names stay camelized (`userGroups` gives `userGroup`).
///
/// # Examples
///
/// ```
/// use patchwork_util::inflector::{EnglishInflector, Inflector};
///
/// let inflector = EnglishInflector;
/// assert_eq!(inflector.singularize("items"), vec!["item"]);
/// assert_eq!(inflector.singularize("axes"), vec!["ax", "axe", "axis"]);
/// assert_eq!(inflector.singularize("categories"), vec!["category", "categorie"]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishInflector;

impl Inflector for EnglishInflector {
    fn singularize(&self, plural: &str) -> Vec<String> {
        let lower = plural.to_lowercase();
        // Lower-casing can change byte lengths outside ASCII; only split on
        // boundaries that line up in both strings.
        for (suffix, replacements) in RULES {
            if !lower.ends_with(suffix) || lower.len() != plural.len() {
                continue;
            }
            let split = plural.len() - suffix.len();
            if !plural.is_char_boundary(split) {
                continue;
            }
            if replacements.is_empty() {
                return vec![plural.to_string()];
            }
            let (stem, matched) = plural.split_at(split);
            let upper = matched.chars().next().is_some_and(char::is_uppercase);
            let mut out: Vec<String> = Vec::with_capacity(replacements.len());
            for replacement in replacements.iter() {
                let replacement = if upper {
                    crate::strings::ucfirst(replacement)
                } else {
                    replacement.to_string()
                };
                let candidate = format!("{stem}{replacement}");
                if !candidate.is_empty() && !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
            if !out.is_empty() {
                return out;
            }
        }
        vec![plural.to_string()]
    }
}
