use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::io::ArticleId;

/// Display titles of all known articles. Titles are only used for output.
#[derive(Default)]
pub struct Catalog {
    titles: HashMap<ArticleId, String>,
}

impl Catalog {
    pub fn with_capacity(capacity: usize) -> Self {
        Catalog {
            titles: HashMap::with_capacity(capacity),
        }
    }

    /// Returns `true` if the title was stored, `false` if the article already had one.
    pub fn insert_if_absent(&mut self, article_id: ArticleId, title: String) -> bool {
        match self.titles.entry(article_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(title);
                true
            }
        }
    }

    pub fn title(&self, article_id: &ArticleId) -> Option<&str> {
        self.titles.get(article_id).map(String::as_str)
    }

    pub fn contains(&self, article_id: &ArticleId) -> bool {
        self.titles.contains_key(article_id)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn article_ids(&self) -> impl Iterator<Item = &ArticleId> {
        self.titles.keys()
    }
}

impl FromIterator<(ArticleId, String)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (ArticleId, String)>>(iter: T) -> Self {
        let mut catalog = Catalog::default();
        for (article_id, title) in iter {
            catalog.insert_if_absent(article_id, title);
        }
        catalog
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    #[test]
    fn should_keep_first_title() {
        let mut catalog = Catalog::default();
        assert!(catalog.insert_if_absent(1, "first".to_string()));
        assert!(!catalog.insert_if_absent(1, "second".to_string()));
        assert_eq!(Some("first"), catalog.title(&1));
        assert_eq!(1, catalog.len());
    }

    #[test]
    fn should_return_none_for_missing_article() {
        let catalog: Catalog = vec![(7, "seven".to_string())].into_iter().collect();
        assert!(catalog.contains(&7));
        assert_eq!(None, catalog.title(&8));
    }
}
