use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use hashbrown::{HashMap, HashSet};
use serde_derive::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RecommendError, Result};
use crate::io::{ArticleId, UserId};

pub const CLEAN_INTERACTIONS_FILE: &str = "user-item-clean.csv";
pub const CLEAN_ARTICLES_FILE: &str = "item-clean.csv";
pub const EMAIL_ENCODINGS_FILE: &str = "email-encodings.csv";

/// Row of the raw interaction export. The export carries an unnamed index
/// column and floating point article ids, e.g. `0,1430.0,title,<email hash>`.
#[derive(Debug, Deserialize)]
struct RawInteractionRecord {
    article_id: f64,
    title: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawArticleRecord {
    article_id: f64,
    doc_full_name: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CleanInteractionRecord {
    pub article_id: ArticleId,
    pub title: String,
    pub user_id: UserId,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CleanArticleRecord {
    pub article_id: ArticleId,
    pub title: String,
}

#[derive(Debug, PartialEq, Serialize)]
struct EmailEncodingRecord<'a> {
    email: &'a str,
    user_id: UserId,
}

/// Replaces user emails by integer ids, assigned from 1 in order of first
/// appearance.
#[derive(Default)]
pub struct EmailEncoder {
    email_to_user_id: HashMap<String, UserId>,
    emails_in_order: Vec<String>,
}

impl EmailEncoder {
    pub fn encode(&mut self, email: &str) -> UserId {
        if let Some(user_id) = self.email_to_user_id.get(email) {
            return *user_id;
        }
        self.emails_in_order.push(email.to_string());
        let user_id = self.emails_in_order.len() as UserId;
        self.email_to_user_id.insert(email.to_string(), user_id);
        user_id
    }

    pub fn len(&self) -> usize {
        self.emails_in_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails_in_order.is_empty()
    }

    /// `(email, user_id)` pairs in user id order.
    pub fn encodings(&self) -> impl Iterator<Item = (&str, UserId)> {
        self.emails_in_order
            .iter()
            .enumerate()
            .map(|(position, email)| (email.as_str(), position as UserId + 1))
    }
}

pub struct CleanedInteractions {
    pub records: Vec<CleanInteractionRecord>,
    pub encoder: EmailEncoder,
    pub qty_dropped_without_user: usize,
}

fn to_article_id(raw: f64) -> Result<ArticleId> {
    if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 {
        Ok(raw as ArticleId)
    } else {
        Err(RecommendError::MalformedRecord(format!(
            "article id {} is not a non-negative integer",
            raw
        )))
    }
}

/// Converts article ids to integers, drops interactions without a user email
/// and anonymizes the remaining emails.
pub fn clean_interactions<R: Read>(reader: R) -> Result<CleanedInteractions> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut encoder = EmailEncoder::default();
    let mut records = Vec::new();
    let mut qty_dropped_without_user = 0;

    for result in reader.deserialize() {
        let raw: RawInteractionRecord = result?;
        let email = match raw.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => email,
            _ => {
                qty_dropped_without_user += 1;
                continue;
            }
        };
        records.push(CleanInteractionRecord {
            article_id: to_article_id(raw.article_id)?,
            title: raw.title.unwrap_or_default(),
            user_id: encoder.encode(email),
        });
    }

    if qty_dropped_without_user > 0 {
        warn!(qty_dropped_without_user, "dropped interactions without user");
    }

    Ok(CleanedInteractions {
        records,
        encoder,
        qty_dropped_without_user,
    })
}

/// Keeps the first row of every article id.
pub fn clean_articles<R: Read>(reader: R) -> Result<Vec<CleanArticleRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut seen: HashSet<ArticleId> = HashSet::new();
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let raw: RawArticleRecord = result?;
        let article_id = to_article_id(raw.article_id)?;
        if seen.insert(article_id) {
            records.push(CleanArticleRecord {
                article_id,
                title: raw.doc_full_name.unwrap_or_default(),
            });
        }
    }
    Ok(records)
}

pub fn write_records<W: Write, S: serde::Serialize>(writer: W, records: &[S]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records.iter() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Cleans both raw exports and writes the results into `out_dir`.
pub fn clean_and_save(
    raw_interactions_path: &str,
    raw_articles_path: &str,
    out_dir: &str,
) -> Result<()> {
    info!(raw_interactions_path, raw_articles_path, "loading and cleaning data");
    let cleaned = clean_interactions(File::open(raw_interactions_path)?)?;
    let articles = clean_articles(File::open(raw_articles_path)?)?;
    info!(
        interactions = cleaned.records.len(),
        users = cleaned.encoder.len(),
        articles = articles.len(),
        "cleaned data"
    );

    let out_dir = Path::new(out_dir);
    fs::create_dir_all(out_dir)?;

    write_records(File::create(out_dir.join(CLEAN_INTERACTIONS_FILE))?, &cleaned.records)?;
    write_records(File::create(out_dir.join(CLEAN_ARTICLES_FILE))?, &articles)?;
    let encodings: Vec<EmailEncodingRecord> = cleaned
        .encoder
        .encodings()
        .map(|(email, user_id)| EmailEncodingRecord { email, user_id })
        .collect();
    write_records(File::create(out_dir.join(EMAIL_ENCODINGS_FILE))?, &encodings)?;

    info!(out_dir = %out_dir.display(), "saved cleaned data");
    Ok(())
}
