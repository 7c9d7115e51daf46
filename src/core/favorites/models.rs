use serde::{Deserialize, Serialize};

/// Insertion-ordered set of resource ids.
///
/// Serializes as `{ "articles": [...] }` whatever category the ids belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FavoritesDocument")]
pub struct FavoritesSet {
    #[serde(rename = "articles")]
    ids: Vec<String>,
}

#[derive(Deserialize)]
struct FavoritesDocument {
    #[serde(default)]
    articles: Vec<String>,
}

impl From<FavoritesDocument> for FavoritesSet {
    fn from(document: FavoritesDocument) -> Self {
        document.articles.into_iter().collect()
    }
}

impl FromIterator<String> for FavoritesSet {
    /// Keeps the first occurrence of each id.
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = FavoritesSet::default();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl FavoritesSet {
    /// Appends `id` unless present. Returns whether the set changed.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Drops the first occurrence of `id`. Returns whether the set changed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|existing| existing == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl IntoIterator for FavoritesSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}
