use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use serde_derive::Deserialize;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{RecommendError, Result};

pub type UserId = u32;
pub type ArticleId = u64;

/// A single observed view of an article by a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interaction {
    pub user_id: UserId,
    pub article_id: ArticleId,
}

impl Interaction {
    pub fn new(user_id: UserId, article_id: ArticleId) -> Self {
        Interaction {
            user_id,
            article_id,
        }
    }
}

/// One row of the cleaned user-item file. Column order is free, the title is
/// optional and extra columns are ignored.
#[derive(Debug, Deserialize)]
pub struct InteractionRecord {
    pub user_id: UserId,
    pub article_id: ArticleId,
    pub title: Option<String>,
}

/// One row of the cleaned article file.
#[derive(Debug, Deserialize)]
pub struct ArticleRecord {
    pub article_id: ArticleId,
    #[serde(alias = "doc_full_name")]
    pub title: String,
}

/// The cleaned interaction log together with the article catalog it refers to.
pub struct Dataset {
    pub descriptive_name: String,
    pub interactions: Vec<Interaction>,
    pub catalog: Catalog,
}

impl Dataset {
    pub fn load(interactions_path: &str, articles_path: &str) -> Result<Dataset> {
        let start_time = Instant::now();
        info!(interactions_path, articles_path, "reading cleaned datasets");

        let interaction_records = read_interaction_records(open(interactions_path)?)?;
        let article_records = read_article_records(open(articles_path)?)?;
        debug!(
            qty_interaction_records = interaction_records.len(),
            qty_article_records = article_records.len(),
            elapsed_micros = start_time.elapsed().as_micros() as u64,
            "parsed csv files"
        );

        Dataset::from_records(interactions_path, interaction_records, article_records)
    }

    /// Builds the catalog from the article rows first and the titles seen in
    /// the interaction rows second (the first title for an id wins), then
    /// checks that every interacted article has a catalog entry.
    pub fn from_records(
        descriptive_name: &str,
        interaction_records: Vec<InteractionRecord>,
        article_records: Vec<ArticleRecord>,
    ) -> Result<Dataset> {
        let mut catalog = Catalog::with_capacity(article_records.len());
        for record in article_records.into_iter() {
            catalog.insert_if_absent(record.article_id, record.title);
        }

        let mut interactions = Vec::with_capacity(interaction_records.len());
        for record in interaction_records.into_iter() {
            if let Some(title) = record.title {
                catalog.insert_if_absent(record.article_id, title);
            }
            interactions.push(Interaction::new(record.user_id, record.article_id));
        }

        if let Some(orphan) = interactions
            .iter()
            .find(|interaction| !catalog.contains(&interaction.article_id))
        {
            return Err(RecommendError::UnknownArticle {
                user_id: orphan.user_id,
                article_id: orphan.article_id,
            });
        }

        Ok(Dataset {
            descriptive_name: descriptive_name.to_string(),
            interactions,
            catalog,
        })
    }
}

fn open(path: &str) -> Result<File> {
    Ok(File::open(Path::new(path))?)
}

pub fn read_interaction_records<R: Read>(reader: R) -> Result<Vec<InteractionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

pub fn read_article_records<R: Read>(reader: R) -> Result<Vec<ArticleRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}
