//! Author, category and tag repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Category and tag names are unique; duplicates surface as `Conflict`.
//! - Deleting an author or category still referenced by articles is a
//!   `Conflict`, not a cascade.
//! - Plain listings are ordered by name, then id.

use crate::model::catalog::{
    Author, AuthorId, AuthorUpdate, Category, CategoryId, LabelUpdate, NewAuthor, NewLabel, Tag,
    TagId,
};
use crate::query::Page;
use crate::repo::{ensure_tables, is_constraint_violation, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

/// Repository interface for the join targets of articles.
pub trait CatalogRepository {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self, page: Page) -> RepoResult<Vec<Author>>;
    fn update_author(&self, id: AuthorId, update: &AuthorUpdate) -> RepoResult<Author>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;

    fn create_category(&self, category: &NewLabel) -> RepoResult<Category>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    fn list_categories(&self, page: Page) -> RepoResult<Vec<Category>>;
    fn update_category(&self, id: CategoryId, update: &LabelUpdate) -> RepoResult<Category>;
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;

    fn create_tag(&self, tag: &NewLabel) -> RepoResult<Tag>;
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    fn list_tags(&self, page: Page) -> RepoResult<Vec<Tag>>;
    fn update_tag(&self, id: TagId, update: &LabelUpdate) -> RepoResult<Tag>;
    fn delete_tag(&self, id: TagId) -> RepoResult<()>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["authors", "categories", "tags"])?;
        Ok(Self::new(conn))
    }

    /// Wraps a connection already checked with [`crate::repo::ensure_schema`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

/// Table metadata for the two name/description entities.
#[derive(Debug, Clone, Copy)]
struct LabelTable {
    table: &'static str,
    entity: &'static str,
}

const CATEGORIES: LabelTable = LabelTable {
    table: "categories",
    entity: "category",
};
const TAGS: LabelTable = LabelTable {
    table: "tags",
    entity: "tag",
};

struct LabelRow {
    id: Uuid,
    name: String,
    description: Option<String>,
}

impl From<LabelRow> for Category {
    fn from(row: LabelRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

impl From<LabelRow> for Tag {
    fn from(row: LabelRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        author.validate()?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO authors (uuid, name, bio) VALUES (?1, ?2, ?3);",
            params![id.to_string(), author.name.as_str(), author.bio.as_deref()],
        )?;
        Ok(Author {
            id,
            name: author.name.clone(),
            bio: author.bio.clone(),
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, name, bio FROM authors WHERE uuid = ?1;",
                [id.to_string()],
                author_columns,
            )
            .optional()?;
        row.map(author_from_columns).transpose()
    }

    fn list_authors(&self, page: Page) -> RepoResult<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, bio
             FROM authors
             ORDER BY name ASC, uuid ASC
             LIMIT ?1 OFFSET ?2;",
        )?;
        let rows = stmt.query_map(
            params![i64::from(page.limit), i64::from(page.offset)],
            author_columns,
        )?;
        let mut authors = Vec::new();
        for row in rows {
            authors.push(author_from_columns(row?)?);
        }
        Ok(authors)
    }

    fn update_author(&self, id: AuthorId, update: &AuthorUpdate) -> RepoResult<Author> {
        update.validate()?;
        let mut author = self
            .get_author(id)?
            .ok_or_else(|| RepoError::not_found("author", id))?;
        if let Some(name) = update.name.as_ref() {
            author.name = name.clone();
        }
        if let Some(bio) = update.bio.as_ref() {
            author.bio = Some(bio.clone());
        }
        self.conn.execute(
            "UPDATE authors SET name = ?2, bio = ?3 WHERE uuid = ?1;",
            params![id.to_string(), author.name.as_str(), author.bio.as_deref()],
        )?;
        Ok(author)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        delete_row(self.conn, "authors", "author", id)
    }

    fn create_category(&self, category: &NewLabel) -> RepoResult<Category> {
        create_label(self.conn, CATEGORIES, category).map(Category::from)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(get_label(self.conn, CATEGORIES, id)?.map(Category::from))
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        Ok(find_label_by_name(self.conn, CATEGORIES, name)?.map(Category::from))
    }

    fn list_categories(&self, page: Page) -> RepoResult<Vec<Category>> {
        list_labels(self.conn, CATEGORIES, page)
            .map(|rows| rows.into_iter().map(Category::from).collect())
    }

    fn update_category(&self, id: CategoryId, update: &LabelUpdate) -> RepoResult<Category> {
        update_label(self.conn, CATEGORIES, id, update).map(Category::from)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        delete_row(self.conn, CATEGORIES.table, CATEGORIES.entity, id)
    }

    fn create_tag(&self, tag: &NewLabel) -> RepoResult<Tag> {
        create_label(self.conn, TAGS, tag).map(Tag::from)
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        Ok(get_label(self.conn, TAGS, id)?.map(Tag::from))
    }

    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        Ok(find_label_by_name(self.conn, TAGS, name)?.map(Tag::from))
    }

    fn list_tags(&self, page: Page) -> RepoResult<Vec<Tag>> {
        list_labels(self.conn, TAGS, page).map(|rows| rows.into_iter().map(Tag::from).collect())
    }

    fn update_tag(&self, id: TagId, update: &LabelUpdate) -> RepoResult<Tag> {
        update_label(self.conn, TAGS, id, update).map(Tag::from)
    }

    fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        delete_row(self.conn, TAGS.table, TAGS.entity, id)
    }
}

type AuthorColumns = (String, String, Option<String>);

fn author_columns(row: &Row<'_>) -> rusqlite::Result<AuthorColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn author_from_columns((uuid, name, bio): AuthorColumns) -> RepoResult<Author> {
    Ok(Author {
        id: parse_uuid(&uuid, "authors.uuid")?,
        name,
        bio,
    })
}

fn label_from_row(row: &Row<'_>, table: &str) -> RepoResult<LabelRow> {
    let uuid_text: String = row.get(0)?;
    Ok(LabelRow {
        id: parse_uuid(&uuid_text, &format!("{table}.uuid"))?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn create_label(conn: &Connection, kind: LabelTable, label: &NewLabel) -> RepoResult<LabelRow> {
    label.validate()?;
    ensure_name_free(conn, kind, &label.name, None)?;
    let id = Uuid::new_v4();
    conn.execute(
        &format!(
            "INSERT INTO {} (uuid, name, description) VALUES (?1, ?2, ?3);",
            kind.table
        ),
        params![
            id.to_string(),
            label.name.as_str(),
            label.description.as_deref()
        ],
    )
    .map_err(|err| map_name_conflict(err, kind, &label.name))?;
    Ok(LabelRow {
        id,
        name: label.name.clone(),
        description: label.description.clone(),
    })
}

fn get_label(conn: &Connection, kind: LabelTable, id: Uuid) -> RepoResult<Option<LabelRow>> {
    query_one_label(
        conn,
        kind,
        &format!(
            "SELECT uuid, name, description FROM {} WHERE uuid = ?1;",
            kind.table
        ),
        &id.to_string(),
    )
}

fn find_label_by_name(
    conn: &Connection,
    kind: LabelTable,
    name: &str,
) -> RepoResult<Option<LabelRow>> {
    query_one_label(
        conn,
        kind,
        &format!(
            "SELECT uuid, name, description FROM {} WHERE name = ?1;",
            kind.table
        ),
        name,
    )
}

fn query_one_label(
    conn: &Connection,
    kind: LabelTable,
    sql: &str,
    key: &str,
) -> RepoResult<Option<LabelRow>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key])?;
    match rows.next()? {
        Some(row) => Ok(Some(label_from_row(row, kind.table)?)),
        None => Ok(None),
    }
}

fn list_labels(conn: &Connection, kind: LabelTable, page: Page) -> RepoResult<Vec<LabelRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT uuid, name, description
         FROM {}
         ORDER BY name ASC, uuid ASC
         LIMIT ?1 OFFSET ?2;",
        kind.table
    ))?;
    let mut rows = stmt.query(params![i64::from(page.limit), i64::from(page.offset)])?;
    let mut labels = Vec::new();
    while let Some(row) = rows.next()? {
        labels.push(label_from_row(row, kind.table)?);
    }
    Ok(labels)
}

fn update_label(
    conn: &Connection,
    kind: LabelTable,
    id: Uuid,
    update: &LabelUpdate,
) -> RepoResult<LabelRow> {
    update.validate()?;
    let mut label =
        get_label(conn, kind, id)?.ok_or_else(|| RepoError::not_found(kind.entity, id))?;
    if let Some(name) = update.name.as_ref() {
        ensure_name_free(conn, kind, name, Some(id))?;
        label.name = name.clone();
    }
    if let Some(description) = update.description.as_ref() {
        label.description = Some(description.clone());
    }
    conn.execute(
        &format!(
            "UPDATE {} SET name = ?2, description = ?3 WHERE uuid = ?1;",
            kind.table
        ),
        params![
            id.to_string(),
            label.name.as_str(),
            label.description.as_deref()
        ],
    )
    .map_err(|err| map_name_conflict(err, kind, &label.name))?;
    Ok(label)
}

fn ensure_name_free(
    conn: &Connection,
    kind: LabelTable,
    name: &str,
    except: Option<Uuid>,
) -> RepoResult<()> {
    match find_label_by_name(conn, kind, name)? {
        Some(existing) if Some(existing.id) != except => Err(RepoError::Conflict(format!(
            "{} with name `{name}` already exists",
            kind.entity
        ))),
        _ => Ok(()),
    }
}

fn map_name_conflict(err: rusqlite::Error, kind: LabelTable, name: &str) -> RepoError {
    if is_constraint_violation(&err) {
        return RepoError::Conflict(format!(
            "{} with name `{name}` already exists",
            kind.entity
        ));
    }
    err.into()
}

fn delete_row(conn: &Connection, table: &str, entity: &'static str, id: Uuid) -> RepoResult<()> {
    let changed = conn
        .execute(
            &format!("DELETE FROM {table} WHERE uuid = ?1;"),
            [id.to_string()],
        )
        .map_err(|err| {
            if is_constraint_violation(&err) {
                RepoError::Conflict(format!("{entity} {id} is still referenced by articles"))
            } else {
                err.into()
            }
        })?;
    if changed == 0 {
        return Err(RepoError::not_found(entity, id));
    }
    Ok(())
}
