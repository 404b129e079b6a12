// Read-only catalog of the site's informational cards.
//
// Records are embedded at build time, one JSON file per category, and are
// never mutated at runtime. Lookup, search and filtering are linear scans;
// the catalog holds a few dozen records.

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::controller::{CardSequence, Keyed};
use crate::error::{Error, Result};

static CONTENT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/content/data");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    Glossary,
    LabTest,
    CaseStudy,
    Testimonial,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Glossary,
        Category::LabTest,
        Category::CaseStudy,
        Category::Testimonial,
    ];

    fn file_name(self) -> &'static str {
        match self {
            Category::Glossary => "glossary.json",
            Category::LabTest => "lab_tests.json",
            Category::CaseStudy => "case_studies.json",
            Category::Testimonial => "testimonials.json",
        }
    }

    /// Human-readable label for headings
    pub fn label(self) -> &'static str {
        match self {
            Category::Glossary => "Glossary",
            Category::LabTest => "Lab Test",
            Category::CaseStudy => "Case Study",
            Category::Testimonial => "Testimonial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardItem {
    pub slug: String,
    pub title: String,
    pub category: Category,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Keyed for CardItem {
    fn key(&self) -> &str {
        &self.slug
    }
}

#[derive(Deserialize)]
struct CategoryFile {
    category: Category,
    items: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    slug: String,
    title: String,
    summary: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CardItem>,
}

impl Catalog {
    /// Load every embedded category file in [`Category::ALL`] order
    pub fn load_embedded() -> Result<Self> {
        let mut items = Vec::new();
        for &category in Category::ALL {
            let file = CONTENT_DIR
                .get_file(category.file_name())
                .ok_or_else(|| Error::Content(format!("{} not embedded", category.file_name())))?;
            let text = file
                .contents_utf8()
                .ok_or_else(|| Error::Content(format!("{} is not UTF-8", category.file_name())))?;
            let parsed = parse_category_file(text)?;
            if parsed.iter().any(|item| item.category != category) {
                return Err(Error::Content(format!(
                    "{} declares the wrong category",
                    category.file_name()
                )));
            }
            items.extend(parsed);
        }
        Self::from_items(items)
    }

    /// Build from explicit records; slugs must be unique
    pub fn from_items(items: Vec<CardItem>) -> Result<Self> {
        if let Some(dup) = items.iter().map(|i| i.slug.as_str()).duplicates().next() {
            return Err(Error::Content(format!("duplicate slug `{dup}`")));
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&CardItem> {
        self.items.iter().find(|i| i.slug == slug)
    }

    pub fn by_category(&self, category: Category) -> Vec<&CardItem> {
        self.items
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }

    /// Categories present, in first-seen order
    pub fn categories(&self) -> Vec<Category> {
        self.items.iter().map(|i| i.category).unique().collect()
    }

    /// Case-insensitive match over title, summary and tags. Title hits
    /// rank first; within a rank the catalog order is kept.
    pub fn search(&self, query: &str) -> Vec<&CardItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.items
            .iter()
            .filter_map(|item| {
                if item.title.to_lowercase().contains(&needle) {
                    Some((0u8, item))
                } else if item.summary.to_lowercase().contains(&needle)
                    || item.tags.iter().any(|t| t.to_lowercase().contains(&needle))
                {
                    Some((1u8, item))
                } else {
                    None
                }
            })
            .sorted_by_key(|(rank, _)| *rank)
            .map(|(_, item)| item)
            .collect()
    }

    /// Other records sharing tags with `slug`, most shared tags first
    pub fn related(&self, slug: &str, limit: usize) -> Vec<&CardItem> {
        let Some(origin) = self.get(slug) else {
            return Vec::new();
        };
        let origin_tags: HashSet<&str> = origin.tags.iter().map(String::as_str).collect();

        self.items
            .iter()
            .filter(|i| i.slug != origin.slug)
            .map(|i| {
                let shared = i
                    .tags
                    .iter()
                    .filter(|t| origin_tags.contains(t.as_str()))
                    .count();
                (shared, i)
            })
            .filter(|(shared, _)| *shared > 0)
            .sorted_by(|a, b| b.0.cmp(&a.0))
            .take(limit)
            .map(|(_, i)| i)
            .collect()
    }

    /// Card sequence for one category, or the whole catalog when `None`
    pub fn sequence(&self, category: Option<Category>) -> Result<CardSequence<CardItem>> {
        let items = match category {
            Some(c) => self.by_category(c).into_iter().cloned().collect(),
            None => self.items.clone(),
        };
        CardSequence::new(items)
    }
}

fn parse_category_file(text: &str) -> Result<Vec<CardItem>> {
    let file: CategoryFile = serde_json::from_str(text)?;
    Ok(file
        .items
        .into_iter()
        .map(|raw| CardItem {
            slug: raw.slug,
            title: raw.title,
            category: file.category,
            summary: raw.summary,
            tags: raw.tags,
        })
        .collect())
}
