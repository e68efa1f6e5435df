//! Article repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Build the filtered article listing query (category, tags, search,
//!   pagination) and attach join targets and tags to every hit.
//! - Provide article write paths with existence checks on join targets.
//!
//! # Invariants
//! - Listings are deduplicated by article before `LIMIT/OFFSET` is applied.
//! - Listing order is `seq ASC` (creation order), so pages are
//!   stable across identical calls.
//! - An article whose author or category does not resolve is reported as
//!   `RepoError::IntegrityFault`, never dropped from the result.
//! - Search is a literal, Unicode case-insensitive substring match; the
//!   connection must carry the `casefold` function (see `db::open`).

use crate::db::CASEFOLD_FN;
use crate::model::article::{Article, ArticleId, ArticleUpdate, ArticleWithDetails, NewArticle};
use crate::model::catalog::{Author, AuthorId, Category, Tag, TagId};
use crate::query::ArticleFilter;
use crate::repo::{ensure_tables, parse_uuid, row_exists, RepoError, RepoResult};
use log::error;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashMap;
use uuid::Uuid;

pub(crate) const REQUIRED_TABLES: &[&str] =
    &["articles", "authors", "categories", "tags", "article_tags"];

const ARTICLE_COLUMNS_SQL: &str = "SELECT
    uuid,
    title,
    content,
    published_at,
    author_uuid,
    category_uuid
FROM articles";

const DETAIL_SELECT_SQL: &str = "SELECT DISTINCT
    a.seq AS seq,
    a.uuid AS uuid,
    a.title AS title,
    a.content AS content,
    a.published_at AS published_at,
    a.author_uuid AS author_uuid,
    a.category_uuid AS category_uuid,
    au.uuid AS author_ref,
    au.name AS author_name,
    au.bio AS author_bio,
    c.uuid AS category_ref,
    c.name AS category_name,
    c.description AS category_description
FROM articles a
LEFT JOIN authors au ON au.uuid = a.author_uuid
LEFT JOIN categories c ON c.uuid = a.category_uuid";

/// Repository interface for article reads and writes.
pub trait ArticleRepository {
    /// Runs the filtered, deduplicated, paginated article listing.
    fn list_articles(&self, filter: &ArticleFilter) -> RepoResult<Vec<ArticleWithDetails>>;
    /// Gets one article with its join targets and tags.
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<ArticleWithDetails>>;
    /// Inserts an article after checking that author and category exist.
    fn create_article(&self, article: &NewArticle) -> RepoResult<Article>;
    /// Applies a partial update and returns the stored row.
    fn update_article(&self, id: ArticleId, update: &ArticleUpdate) -> RepoResult<Article>;
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
    /// Replaces the full tag set of one article in a single transaction.
    fn set_article_tags(&self, id: ArticleId, tag_ids: &[TagId]) -> RepoResult<()>;
    /// Flat articles written by one author, in creation order.
    fn list_articles_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Article>>;
    /// Flat articles carrying one tag, in creation order.
    fn list_articles_by_tag(&self, tag_id: TagId) -> RepoResult<Vec<Article>>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, REQUIRED_TABLES)?;
        Ok(Self::new(conn))
    }

    /// Wraps a connection already checked with [`crate::repo::ensure_schema`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn list_articles(&self, filter: &ArticleFilter) -> RepoResult<Vec<ArticleWithDetails>> {
        let (sql, bind_values) = build_list_query(filter);
        collect_details(self.conn, &sql, bind_values)
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<ArticleWithDetails>> {
        let sql = format!("{DETAIL_SELECT_SQL} WHERE a.uuid = ?");
        let mut found = collect_details(self.conn, &sql, vec![Value::Text(id.to_string())])?;
        Ok(found.pop())
    }

    fn create_article(&self, article: &NewArticle) -> RepoResult<Article> {
        article.validate()?;
        if !row_exists(self.conn, "authors", article.author_id)? {
            return Err(RepoError::not_found("author", article.author_id));
        }
        if !row_exists(self.conn, "categories", article.category_id)? {
            return Err(RepoError::not_found("category", article.category_id));
        }

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO articles (
                uuid,
                title,
                content,
                published_at,
                author_uuid,
                category_uuid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                article.title.as_str(),
                article.content.as_str(),
                article.published_at,
                article.author_id.to_string(),
                article.category_id.to_string(),
            ],
        )?;

        Ok(Article {
            id,
            title: article.title.clone(),
            content: article.content.clone(),
            published_at: article.published_at,
            author_id: article.author_id,
            category_id: article.category_id,
        })
    }

    fn update_article(&self, id: ArticleId, update: &ArticleUpdate) -> RepoResult<Article> {
        update.validate()?;
        let mut article =
            load_article(self.conn, id)?.ok_or_else(|| RepoError::not_found("article", id))?;

        if let Some(category_id) = update.category_id {
            if !row_exists(self.conn, "categories", category_id)? {
                return Err(RepoError::not_found("category", category_id));
            }
            article.category_id = category_id;
        }
        if let Some(title) = update.title.as_ref() {
            article.title = title.clone();
        }
        if let Some(content) = update.content.as_ref() {
            article.content = content.clone();
        }
        if let Some(published_at) = update.published_at {
            article.published_at = Some(published_at);
        }

        self.conn.execute(
            "UPDATE articles
             SET
                title = ?2,
                content = ?3,
                published_at = ?4,
                category_uuid = ?5
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                article.title.as_str(),
                article.content.as_str(),
                article.published_at,
                article.category_id.to_string(),
            ],
        )?;

        Ok(article)
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("article", id));
        }
        Ok(())
    }

    fn set_article_tags(&self, id: ArticleId, tag_ids: &[TagId]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        if !row_exists(&tx, "articles", id)? {
            return Err(RepoError::not_found("article", id));
        }
        for tag_id in tag_ids {
            if !row_exists(&tx, "tags", *tag_id)? {
                return Err(RepoError::not_found("tag", *tag_id));
            }
        }

        let article_uuid = id.to_string();
        tx.execute(
            "DELETE FROM article_tags WHERE article_uuid = ?1;",
            [article_uuid.as_str()],
        )?;
        for tag_id in tag_ids {
            tx.execute(
                "INSERT OR IGNORE INTO article_tags (article_uuid, tag_uuid) VALUES (?1, ?2);",
                params![article_uuid.as_str(), tag_id.to_string()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn list_articles_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Article>> {
        collect_articles(
            self.conn,
            &format!("{ARTICLE_COLUMNS_SQL} WHERE author_uuid = ?1 ORDER BY seq ASC;"),
            author_id,
        )
    }

    fn list_articles_by_tag(&self, tag_id: TagId) -> RepoResult<Vec<Article>> {
        collect_articles(
            self.conn,
            &format!(
                "{ARTICLE_COLUMNS_SQL}
                 WHERE uuid IN (
                    SELECT article_uuid FROM article_tags WHERE tag_uuid = ?1
                 )
                 ORDER BY seq ASC;"
            ),
            tag_id,
        )
    }
}

/// Builds the listing SQL and its bind values for one filter.
///
/// The tag join can produce one row per matching tag; `SELECT DISTINCT`
/// over the article projection collapses those before `LIMIT/OFFSET`.
fn build_list_query(filter: &ArticleFilter) -> (String, Vec<Value>) {
    let mut sql = String::from(DETAIL_SELECT_SQL);
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(tags) = filter.tags.as_ref() {
        sql.push_str(
            "
INNER JOIN article_tags at ON at.article_uuid = a.uuid
INNER JOIN tags t ON t.uuid = at.tag_uuid",
        );
        sql.push_str(" WHERE t.name IN (");
        sql.push_str(&vec!["?"; tags.len()].join(", "));
        sql.push(')');
        bind_values.extend(tags.iter().cloned().map(Value::Text));
    } else {
        sql.push_str(" WHERE 1 = 1");
    }

    if let Some(category) = filter.category.as_ref() {
        sql.push_str(" AND c.name = ?");
        bind_values.push(Value::Text(category.clone()));
    }

    if let Some(search) = filter.search.as_ref() {
        sql.push_str(&format!(
            " AND (instr({CASEFOLD_FN}(a.title), {CASEFOLD_FN}(?)) > 0 \
             OR instr({CASEFOLD_FN}(a.content), {CASEFOLD_FN}(?)) > 0)"
        ));
        bind_values.push(Value::Text(search.clone()));
        bind_values.push(Value::Text(search.clone()));
    }

    sql.push_str(" ORDER BY seq ASC LIMIT ? OFFSET ?");
    bind_values.push(Value::Integer(i64::from(filter.page.limit)));
    bind_values.push(Value::Integer(i64::from(filter.page.offset)));

    (sql, bind_values)
}

fn collect_details(
    conn: &Connection,
    sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<ArticleWithDetails>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut articles = Vec::new();
    while let Some(row) = rows.next()? {
        articles.push(parse_detail_row(row)?);
    }

    let mut tags_by_article = load_tags_for_articles(conn, &articles)?;
    for details in &mut articles {
        if let Some(tags) = tags_by_article.remove(&details.article.id) {
            details.tags = tags;
        }
    }
    Ok(articles)
}

fn parse_detail_row(row: &Row<'_>) -> RepoResult<ArticleWithDetails> {
    let article = parse_article_row(row)?;

    let author_ref: Option<String> = row.get("author_ref")?;
    if author_ref.is_none() {
        return Err(integrity_fault(article.id, "author"));
    }
    let category_ref: Option<String> = row.get("category_ref")?;
    if category_ref.is_none() {
        return Err(integrity_fault(article.id, "category"));
    }

    let author = Author {
        id: article.author_id,
        name: row.get("author_name")?,
        bio: row.get("author_bio")?,
    };
    let category = Category {
        id: article.category_id,
        name: row.get("category_name")?,
        description: row.get("category_description")?,
    };

    Ok(ArticleWithDetails {
        article,
        author,
        category,
        tags: Vec::new(),
    })
}

fn integrity_fault(article_id: ArticleId, missing: &'static str) -> RepoError {
    error!(
        "event=article_integrity module=repo status=error article_id={} missing={}",
        article_id, missing
    );
    RepoError::IntegrityFault {
        article_id,
        missing,
    }
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let uuid_text: String = row.get("uuid")?;
    let author_text: String = row.get("author_uuid")?;
    let category_text: String = row.get("category_uuid")?;
    Ok(Article {
        id: parse_uuid(&uuid_text, "articles.uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        published_at: row.get("published_at")?,
        author_id: parse_uuid(&author_text, "articles.author_uuid")?,
        category_id: parse_uuid(&category_text, "articles.category_uuid")?,
    })
}

fn load_article(conn: &Connection, id: ArticleId) -> RepoResult<Option<Article>> {
    let mut stmt = conn.prepare(&format!("{ARTICLE_COLUMNS_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_article_row(row)?)),
        None => Ok(None),
    }
}

fn collect_articles(conn: &Connection, sql: &str, key: Uuid) -> RepoResult<Vec<Article>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key.to_string()])?;
    let mut articles = Vec::new();
    while let Some(row) = rows.next()? {
        articles.push(parse_article_row(row)?);
    }
    Ok(articles)
}

/// Loads the tag sets of a whole result page in one query, each set ordered
/// by tag name.
fn load_tags_for_articles(
    conn: &Connection,
    articles: &[ArticleWithDetails],
) -> RepoResult<HashMap<ArticleId, Vec<Tag>>> {
    let mut tags_by_article: HashMap<ArticleId, Vec<Tag>> = HashMap::new();
    if articles.is_empty() {
        return Ok(tags_by_article);
    }

    let placeholders = vec!["?"; articles.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT at.article_uuid, t.uuid, t.name, t.description
         FROM article_tags at
         INNER JOIN tags t ON t.uuid = at.tag_uuid
         WHERE at.article_uuid IN ({placeholders})
         ORDER BY t.name ASC;"
    ))?;
    let keys = articles.iter().map(|details| details.article.id.to_string());
    let mut rows = stmt.query(params_from_iter(keys))?;
    while let Some(row) = rows.next()? {
        let article_text: String = row.get(0)?;
        let tag_text: String = row.get(1)?;
        tags_by_article
            .entry(parse_uuid(&article_text, "article_tags.article_uuid")?)
            .or_default()
            .push(Tag {
                id: parse_uuid(&tag_text, "tags.uuid")?,
                name: row.get(2)?,
                description: row.get(3)?,
            });
    }
    Ok(tags_by_article)
}

#[cfg(test)]
mod tests {
    use super::build_list_query;
    use crate::query::ArticleFilter;
    use rusqlite::types::Value;

    #[test]
    fn search_binds_raw_text_against_folded_columns() {
        let filter = ArticleFilter::new().with_search("100%_ ");
        let (sql, binds) = build_list_query(&filter);
        assert!(sql.contains("instr(casefold(a.title), casefold(?)) > 0"));
        assert!(sql.contains("instr(casefold(a.content), casefold(?)) > 0"));
        assert!(!sql.contains("LIKE"));
        assert_eq!(binds[0], Value::Text("100%_ ".to_string()));
        assert_eq!(binds[1], Value::Text("100%_ ".to_string()));
    }

    #[test]
    fn tag_filter_joins_association_and_binds_each_name() {
        let filter = ArticleFilter::new().with_tags(["ml", "nlp"]);
        let (sql, binds) = build_list_query(&filter);
        assert!(sql.contains("INNER JOIN article_tags"));
        assert!(sql.contains("t.name IN (?, ?)"));
        assert!(sql.starts_with("SELECT DISTINCT"));
        // two tag names + limit + offset
        assert_eq!(binds.len(), 4);
    }

    #[test]
    fn pagination_follows_filters_and_order() {
        let filter = ArticleFilter::new().with_category("ML").with_search("x");
        let (sql, _) = build_list_query(&filter);
        let order_at = sql.find("ORDER BY seq ASC").expect("order clause");
        let where_at = sql.find("c.name = ?").expect("category clause");
        assert!(where_at < order_at);
        assert!(sql.ends_with("LIMIT ? OFFSET ?"));
        assert!(!sql.contains("article_tags"));
    }
}
