//! Author, category and tag use-case service.
//!
//! # Responsibility
//! - Apply endpoint pagination defaults to catalog listings.
//! - Assemble author/tag detail views from both repositories.

use crate::model::catalog::{
    Author, AuthorId, AuthorUpdate, AuthorWithArticles, Category, CategoryId, LabelUpdate,
    NewAuthor, NewLabel, Tag, TagId, TagWithArticles,
};
use crate::query::{Page, PageParams, ARTICLES_DEFAULT_LIMIT, CATEGORIES_DEFAULT_LIMIT};
use crate::repo::article_repo::ArticleRepository;
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::RepoResult;
use crate::service::ServiceResult;
use log::info;

/// Catalog service facade over repository implementations.
pub struct CatalogService<C: CatalogRepository> {
    repo: C,
}

impl<C: CatalogRepository> CatalogService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    pub fn list_authors(&self, params: &PageParams) -> ServiceResult<Vec<Author>> {
        let page = Page::from_params(params, ARTICLES_DEFAULT_LIMIT)?;
        Ok(self.repo.list_authors(page)?)
    }

    /// Lists categories; the default page size is 50.
    pub fn list_categories(&self, params: &PageParams) -> ServiceResult<Vec<Category>> {
        let page = Page::from_params(params, CATEGORIES_DEFAULT_LIMIT)?;
        Ok(self.repo.list_categories(page)?)
    }

    pub fn list_tags(&self, params: &PageParams) -> ServiceResult<Vec<Tag>> {
        let page = Page::from_params(params, ARTICLES_DEFAULT_LIMIT)?;
        Ok(self.repo.list_tags(page)?)
    }

    pub fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        let created = self.repo.create_author(author)?;
        info!(
            "event=author_create module=service status=ok author_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.repo.get_author(id)
    }

    /// Author detail including the author's articles in creation order.
    pub fn author_with_articles(
        &self,
        articles: &impl ArticleRepository,
        id: AuthorId,
    ) -> RepoResult<Option<AuthorWithArticles>> {
        let Some(author) = self.repo.get_author(id)? else {
            return Ok(None);
        };
        let articles = articles.list_articles_by_author(id)?;
        Ok(Some(AuthorWithArticles { author, articles }))
    }

    pub fn update_author(&self, id: AuthorId, update: &AuthorUpdate) -> RepoResult<Author> {
        self.repo.update_author(id, update)
    }

    pub fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        self.repo.delete_author(id)
    }

    pub fn create_category(&self, category: &NewLabel) -> RepoResult<Category> {
        let created = self.repo.create_category(category)?;
        info!(
            "event=category_create module=service status=ok category_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.repo.get_category(id)
    }

    pub fn update_category(&self, id: CategoryId, update: &LabelUpdate) -> RepoResult<Category> {
        self.repo.update_category(id, update)
    }

    pub fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.repo.delete_category(id)
    }

    pub fn create_tag(&self, tag: &NewLabel) -> RepoResult<Tag> {
        let created = self.repo.create_tag(tag)?;
        info!(
            "event=tag_create module=service status=ok tag_id={}",
            created.id
        );
        Ok(created)
    }

    /// Tag detail including every article carrying the tag.
    pub fn tag_with_articles(
        &self,
        articles: &impl ArticleRepository,
        id: TagId,
    ) -> RepoResult<Option<TagWithArticles>> {
        let Some(tag) = self.repo.get_tag(id)? else {
            return Ok(None);
        };
        let articles = articles.list_articles_by_tag(id)?;
        Ok(Some(TagWithArticles { tag, articles }))
    }

    pub fn update_tag(&self, id: TagId, update: &LabelUpdate) -> RepoResult<Tag> {
        self.repo.update_tag(id, update)
    }

    pub fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        self.repo.delete_tag(id)
    }
}
