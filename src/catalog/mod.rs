// Content store for the slang dictionary
// Entries are authored at build time; a JSON file may replace the built-in table.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{map_io_err, KambaError, KambaResult};

/// Closed set of categories an entry can belong to.
///
/// Serialized with the Portuguese labels used in the authored catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Rua")]
    Street,
    #[serde(rename = "Juventude")]
    Youth,
    #[serde(rename = "Música")]
    Music,
    #[serde(rename = "Humor")]
    Humor,
    #[serde(rename = "Cotidiano")]
    Everyday,
    #[serde(rename = "Internet")]
    Internet,
    #[serde(rename = "Família")]
    Family,
    #[serde(rename = "Saudações")]
    Greetings,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Street,
        Category::Youth,
        Category::Music,
        Category::Humor,
        Category::Everyday,
        Category::Internet,
        Category::Family,
        Category::Greetings,
    ];

    /// Display label as shown in the app
    pub fn label(&self) -> &'static str {
        match self {
            Category::Street => "Rua",
            Category::Youth => "Juventude",
            Category::Music => "Música",
            Category::Humor => "Humor",
            Category::Everyday => "Cotidiano",
            Category::Internet => "Internet",
            Category::Family => "Família",
            Category::Greetings => "Saudações",
        }
    }

    /// Parse a label, accepting either the Portuguese label or the English variant name
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| {
            c.label().to_lowercase() == wanted || format!("{:?}", c).to_lowercase() == wanted
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A category selector used by the dictionary filter.
///
/// `All` is a synthetic value that never appears on a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const ALL_LABEL: &'static str = "Todas";

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => Self::ALL_LABEL,
            CategoryFilter::Only(category) => category.label(),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case(Self::ALL_LABEL) || trimmed.eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        Category::from_label(trimmed).map(CategoryFilter::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chips offered by the dictionary screen, in display order
pub const FILTER_CHIPS: [CategoryFilter; 7] = [
    CategoryFilter::All,
    CategoryFilter::Only(Category::Street),
    CategoryFilter::Only(Category::Youth),
    CategoryFilter::Only(Category::Everyday),
    CategoryFilter::Only(Category::Music),
    CategoryFilter::Only(Category::Humor),
    CategoryFilter::Only(Category::Internet),
];

/// Shortcuts shown on the home screen
pub const EXPLORE_SHORTCUTS: [Category; 4] = [
    Category::Greetings,
    Category::Street,
    Category::Youth,
    Category::Humor,
];

/// A single dictionary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlangEntry {
    /// Stable identifier, also used as the favorite key
    pub id: String,
    /// Headword
    pub term: String,
    /// Meaning in standard Portuguese
    pub definition: String,
    /// Usage sentence
    #[serde(default)]
    pub example: String,
    pub category: Category,
    /// Province or region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

impl SlangEntry {
    /// Text handed to speech synthesis for this entry
    pub fn pronunciation_text(&self) -> String {
        format!("{}. Significa: {}", self.term, self.definition)
    }

    /// Text used when sharing the entry
    pub fn share_text(&self) -> String {
        if self.example.is_empty() {
            format!("{}: {}", self.term, self.definition)
        } else {
            format!("{}: {} (\"{}\")", self.term, self.definition, self.example)
        }
    }
}

/// Read-only, ordered collection of entries
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<SlangEntry>,
}

impl Catalog {
    /// Build a catalog, validating ids and required fields
    pub fn new(entries: Vec<SlangEntry>) -> KambaResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.term.trim().is_empty() {
                return Err(KambaError::catalog_error(format!(
                    "Entry {} has an empty term",
                    entry.id
                )));
            }
            if entry.definition.trim().is_empty() {
                return Err(KambaError::catalog_error(format!(
                    "Entry {} has an empty definition",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(KambaError::catalog_error(format!(
                    "Duplicate entry id: {}",
                    entry.id
                )));
            }
        }

        debug!("Catalog built with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// The authored catalog shipped with the crate
    pub fn builtin() -> Self {
        Self {
            entries: builtin::entries(),
        }
    }

    /// Parse a catalog from a JSON array of entries
    pub fn from_json(content: &str) -> KambaResult<Self> {
        let entries: Vec<SlangEntry> = serde_json::from_str(content)?;
        Self::new(entries)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> KambaResult<Self> {
        let content = fs::read_to_string(path).map_err(map_io_err(path))?;
        let catalog = Self::from_json(&content)?;
        info!(
            "Loaded {} slang entries from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// All entries in authoring order
    pub fn list_all(&self) -> &[SlangEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&SlangEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_empty());
        // Re-validating the built-in table catches duplicate ids
        let rebuilt = Catalog::new(catalog.list_all().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), catalog.len());
        assert_eq!(catalog.list_all()[0].term, "Mambo");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut entries = Catalog::builtin().list_all().to_vec();
        let first = entries[0].clone();
        entries.push(first);
        let err = Catalog::new(entries).unwrap_err();
        assert!(err.to_string().contains("Duplicate entry id"));
    }

    #[test]
    fn test_from_json_uses_portuguese_labels() {
        let json = r#"[
            {"id": "a", "term": "Kamba", "definition": "Amigo.", "example": "", "category": "Rua"},
            {"id": "b", "term": "Kota", "definition": "Mais velho.", "category": "Família",
             "origin": "Geral", "synonyms": ["Velho"]}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b").unwrap().category, Category::Family);
        assert_eq!(catalog.get("b").unwrap().synonyms, vec!["Velho".to_string()]);
        assert!(catalog.get("a").unwrap().origin.is_none());
    }

    #[test]
    fn test_from_json_rejects_all_as_stored_category() {
        let json = r#"[{"id": "a", "term": "X", "definition": "Y", "category": "Todas"}]"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("street"), Some(Category::Street));
        assert_eq!(CategoryFilter::from_label("todas"), Some(CategoryFilter::All));
        assert_eq!(CategoryFilter::from_label("nada"), None);
    }

    #[test]
    fn test_pronunciation_and_share_text() {
        let catalog = Catalog::builtin();
        let bwe = catalog.get("2").unwrap();
        assert_eq!(
            bwe.pronunciation_text(),
            "Bwé. Significa: Muito, em grande quantidade."
        );
        assert!(bwe.share_text().starts_with("Bwé: Muito"));
    }
}
