//! Article use-case service.
//!
//! # Responsibility
//! - Turn raw listing parameters into an `ArticleFilter` and run it.
//! - Return detailed read-backs after article writes.
//! - Emit `article_*` diagnostic events with duration and outcome.
//!
//! # Invariants
//! - Unknown category/tag names yield an empty list, never an error.
//! - Malformed parameters fail before any SQL runs.

use crate::model::article::{ArticleId, ArticleUpdate, ArticleWithDetails, NewArticle};
use crate::model::catalog::TagId;
use crate::query::{ArticleFilter, ArticleQueryParams};
use crate::repo::article_repo::ArticleRepository;
use crate::repo::RepoResult;
use crate::service::{ServiceError, ServiceResult};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Article service facade over repository implementations.
pub struct ArticleService<R: ArticleRepository> {
    repo: R,
}

impl<R: ArticleRepository> ArticleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Parses raw query-string parameters and runs the listing.
    pub fn list_articles(
        &self,
        params: &ArticleQueryParams,
    ) -> ServiceResult<Vec<ArticleWithDetails>> {
        let filter = ArticleFilter::from_params(params).map_err(|err| {
            warn!("event=article_list module=service status=rejected error={err}");
            err
        })?;
        Ok(self.query(&filter)?)
    }

    /// Runs the listing for an already-normalized filter.
    pub fn query(&self, filter: &ArticleFilter) -> RepoResult<Vec<ArticleWithDetails>> {
        let started_at = Instant::now();
        match self.repo.list_articles(filter) {
            Ok(articles) => {
                info!(
                    "event=article_list module=service status=ok category={} tags={} search={} offset={} limit={} count={} duration_ms={}",
                    filter.category.is_some(),
                    filter.tags.as_ref().map_or(0, Vec::len),
                    filter.search.is_some(),
                    filter.page.offset,
                    filter.page.limit,
                    articles.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(articles)
            }
            Err(err) => {
                error!(
                    "event=article_list module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    pub fn get_article(&self, id: ArticleId) -> RepoResult<Option<ArticleWithDetails>> {
        self.repo.get_article(id)
    }

    /// Creates an article and returns its detailed read-back.
    pub fn create_article(&self, article: &NewArticle) -> ServiceResult<ArticleWithDetails> {
        let created = self.repo.create_article(article)?;
        info!(
            "event=article_create module=service status=ok article_id={}",
            created.id
        );
        self.read_back(created.id, "created article not found in read-back")
    }

    pub fn update_article(
        &self,
        id: ArticleId,
        update: &ArticleUpdate,
    ) -> ServiceResult<ArticleWithDetails> {
        if update.is_empty() {
            debug!("event=article_update module=service status=noop article_id={id}");
        }
        self.repo.update_article(id, update)?;
        self.read_back(id, "updated article not found in read-back")
    }

    pub fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        self.repo.delete_article(id)?;
        info!("event=article_delete module=service status=ok article_id={id}");
        Ok(())
    }

    /// Replaces the tag set of one article and returns the read-back.
    pub fn set_article_tags(
        &self,
        id: ArticleId,
        tag_ids: &[TagId],
    ) -> ServiceResult<ArticleWithDetails> {
        self.repo.set_article_tags(id, tag_ids)?;
        self.read_back(id, "article missing after tag replacement")
    }

    fn read_back(&self, id: ArticleId, details: &'static str) -> ServiceResult<ArticleWithDetails> {
        self.repo
            .get_article(id)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}
