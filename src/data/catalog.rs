use serde::Serialize;

/// A single catalog row: the movie's stable position and its title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub index: usize,
    pub title: String,
}

/// Ordered list of known movie titles
///
/// Positions are stable for the lifetime of the process and index both the rows
/// and the columns of the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    titles: Vec<String>,
}

impl Catalog {
    pub fn new(titles: Vec<String>) -> Self {
        Self { titles }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Position of the first entry whose title matches exactly
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.titles.iter().position(|t| t == title)
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.titles.get(index).map(String::as_str)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        self.titles.iter().enumerate().map(|(index, title)| CatalogEntry {
            index,
            title: title.clone(),
        })
    }

    /// Number of entries whose title already appeared at a lower position
    pub fn duplicate_count(&self) -> usize {
        let mut seen = std::collections::HashSet::with_capacity(self.titles.len());
        self.titles
            .iter()
            .filter(|t| !seen.insert(t.as_str()))
            .count()
    }
}
