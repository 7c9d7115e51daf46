use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Articles,
    Reports,
    Blogs,
}

impl Category {
    /// Fixed probing and listing order.
    pub const ALL: [Category; 3] = [Category::Articles, Category::Reports, Category::Blogs];

    /// Upstream collection path segment.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Articles => "articles",
            Category::Reports => "reports",
            Category::Blogs => "blogs",
        }
    }

    /// Template key the presentation layer renders this category's page with.
    pub fn presentation_key(self) -> &'static str {
        match self {
            Category::Articles => "categorie1.html",
            Category::Reports => "categorie2.html",
            Category::Blogs => "categorie3.html",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0:?} (expected articles, reports or blogs)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.slug() == normalized)
            .ok_or_else(|| UnknownCategory(raw.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub news_site: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub updated_at: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryListing {
    pub articles: Vec<Resource>,
    pub reports: Vec<Resource>,
    pub blogs: Vec<Resource>,
}

impl CategoryListing {
    pub fn get(&self, category: Category) -> &[Resource] {
        match category {
            Category::Articles => &self.articles,
            Category::Reports => &self.reports,
            Category::Blogs => &self.blogs,
        }
    }

    /// All resources in articles, reports, blogs order.
    pub fn flatten(self) -> Vec<Resource> {
        let mut all =
            Vec::with_capacity(self.articles.len() + self.reports.len() + self.blogs.len());
        all.extend(self.articles);
        all.extend(self.reports);
        all.extend(self.blogs);
        all
    }
}
