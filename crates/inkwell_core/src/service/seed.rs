//! Demo content bootstrap.
//!
//! Inserts a small fixed data set (two authors, two categories, two
//! articles) into an empty store. Runs inside one transaction and does
//! nothing when any author already exists.

use crate::model::article::NewArticle;
use crate::model::catalog::{NewAuthor, NewLabel};
use crate::query::Page;
use crate::repo::article_repo::{ArticleRepository, SqliteArticleRepository};
use crate::repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::Connection;

/// Outcome of [`seed_demo_content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted { authors: usize, articles: usize },
    AlreadySeeded,
}

struct SeedArticle {
    title: &'static str,
    content: &'static str,
    author: usize,
    category: usize,
}

const AUTHORS: &[(&str, &str)] = &[
    (
        "Dr. Ada Lovelace",
        "Pioneering computer scientist and mathematician.",
    ),
    (
        "Dr. Alan Turing",
        "Father of theoretical computer science and artificial intelligence.",
    ),
];

const CATEGORIES: &[(&str, &str)] = &[
    (
        "Machine Learning",
        "Articles about ML algorithms, models, and techniques.",
    ),
    (
        "Natural Language Processing",
        "Exploring how computers process and understand human language.",
    ),
];

const ARTICLES: &[SeedArticle] = &[
    SeedArticle {
        title: "The Future of Neural Networks",
        content: "Deep learning continues to evolve...",
        author: 0,
        category: 0,
    },
    SeedArticle {
        title: "Understanding Transformer Models",
        content: "Transformers have revolutionized NLP...",
        author: 1,
        category: 1,
    },
];

/// Seeds the demo blog content when the store has no authors yet.
pub fn seed_demo_content(conn: &Connection) -> RepoResult<SeedOutcome> {
    let tx = conn.unchecked_transaction()?;
    let outcome = {
        let catalog = SqliteCatalogRepository::try_new(&tx)?;
        if !catalog.list_authors(Page::new(0, 1))?.is_empty() {
            info!("event=seed module=service status=skipped reason=already_seeded");
            return Ok(SeedOutcome::AlreadySeeded);
        }
        let articles = SqliteArticleRepository::try_new(&tx)?;

        let mut author_ids = Vec::with_capacity(AUTHORS.len());
        for (name, bio) in AUTHORS {
            let author = catalog.create_author(&NewAuthor {
                name: (*name).to_string(),
                bio: Some((*bio).to_string()),
            })?;
            author_ids.push(author.id);
        }

        let mut category_ids = Vec::with_capacity(CATEGORIES.len());
        for (name, description) in CATEGORIES {
            let category = catalog.create_category(&NewLabel {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
            })?;
            category_ids.push(category.id);
        }

        for seed in ARTICLES {
            articles.create_article(&NewArticle::new(
                seed.title,
                seed.content,
                author_ids[seed.author],
                category_ids[seed.category],
            ))?;
        }

        SeedOutcome::Inserted {
            authors: author_ids.len(),
            articles: ARTICLES.len(),
        }
    };
    tx.commit()?;

    info!("event=seed module=service status=ok outcome={outcome:?}");
    Ok(outcome)
}
