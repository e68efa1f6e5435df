use inkwell_core::db::open_db_in_memory;
use inkwell_core::{
    ArticleRepository, ArticleService, ArticleUpdate, AuthorUpdate, CatalogRepository,
    CatalogService, LabelUpdate, NewArticle, NewAuthor, NewLabel, PageParams, RepoError,
    ServiceError, SqliteArticleRepository, SqliteCatalogRepository, ValidationError,
};
use uuid::Uuid;

fn label(name: &str) -> NewLabel {
    NewLabel {
        name: name.to_string(),
        description: None,
    }
}

fn author(name: &str) -> NewAuthor {
    NewAuthor {
        name: name.to_string(),
        bio: None,
    }
}

#[test]
fn duplicate_category_and_tag_names_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    repo.create_category(&label("Machine Learning")).unwrap();
    let err = repo.create_category(&label("Machine Learning")).unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let ml = repo.create_tag(&label("ml")).unwrap();
    let nlp = repo.create_tag(&label("nlp")).unwrap();
    let err = repo
        .update_tag(
            nlp.id,
            &LabelUpdate {
                name: Some("ml".to_string()),
                description: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // Renaming a row to its own name is not a conflict.
    let same = repo
        .update_tag(
            ml.id,
            &LabelUpdate {
                name: Some("ml".to_string()),
                description: Some("machine learning".to_string()),
            },
        )
        .unwrap();
    assert_eq!(same.description.as_deref(), Some("machine learning"));
}

#[test]
fn author_names_are_not_unique() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let first = repo.create_author(&author("Sam")).unwrap();
    let second = repo.create_author(&author("Sam")).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn blank_names_are_rejected_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let err = repo.create_author(&author("   ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankField("name"))
    ));
    assert!(repo.list_authors(Default::default()).unwrap().is_empty());
}

#[test]
fn missing_rows_surface_as_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let ghost = Uuid::new_v4();

    assert!(repo.get_author(ghost).unwrap().is_none());
    assert!(matches!(
        repo.update_author(ghost, &AuthorUpdate::default()),
        Err(RepoError::NotFound { entity: "author", .. })
    ));
    assert!(matches!(
        repo.delete_category(ghost),
        Err(RepoError::NotFound {
            entity: "category",
            ..
        })
    ));
    assert!(matches!(
        repo.delete_tag(ghost),
        Err(RepoError::NotFound { entity: "tag", .. })
    ));
}

#[test]
fn referenced_author_and_category_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let articles = SqliteArticleRepository::try_new(&conn).unwrap();

    let ada = catalog.create_author(&author("Ada")).unwrap();
    let ml = catalog.create_category(&label("ML")).unwrap();
    let tag = catalog.create_tag(&label("neural")).unwrap();
    let article = articles
        .create_article(&NewArticle::new("t", "c", ada.id, ml.id))
        .unwrap();
    articles.set_article_tags(article.id, &[tag.id]).unwrap();

    assert!(matches!(
        catalog.delete_author(ada.id),
        Err(RepoError::Conflict(_))
    ));
    assert!(matches!(
        catalog.delete_category(ml.id),
        Err(RepoError::Conflict(_))
    ));

    // Tags detach instead of blocking deletion.
    catalog.delete_tag(tag.id).unwrap();
    let detail = articles.get_article(article.id).unwrap().unwrap();
    assert!(detail.tags.is_empty());

    articles.delete_article(article.id).unwrap();
    catalog.delete_author(ada.id).unwrap();
    catalog.delete_category(ml.id).unwrap();
}

#[test]
fn article_writes_require_existing_join_targets() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = ArticleService::new(SqliteArticleRepository::try_new(&conn).unwrap());

    let ada = catalog.create_author(&author("Ada")).unwrap();
    let ml = catalog.create_category(&label("ML")).unwrap();

    let err = service
        .create_article(&NewArticle::new("t", "c", Uuid::new_v4(), ml.id))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::NotFound { entity: "author", .. })
    ));

    let created = service
        .create_article(&NewArticle::new("Title", "Body", ada.id, ml.id))
        .unwrap();
    assert_eq!(created.author.name, "Ada");
    assert_eq!(created.category.name, "ML");

    let err = service
        .update_article(
            created.id(),
            &ArticleUpdate {
                category_id: Some(Uuid::new_v4()),
                ..ArticleUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::NotFound {
            entity: "category",
            ..
        })
    ));

    let err = service
        .set_article_tags(created.id(), &[Uuid::new_v4()])
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::NotFound { entity: "tag", .. })
    ));
}

#[test]
fn update_article_keeps_untouched_fields() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = ArticleService::new(SqliteArticleRepository::try_new(&conn).unwrap());
    let ada = catalog.create_author(&author("Ada")).unwrap();
    let ml = catalog.create_category(&label("ML")).unwrap();
    let nlp = catalog.create_category(&label("NLP")).unwrap();

    let created = service
        .create_article(&NewArticle::new("Title", "Body", ada.id, ml.id))
        .unwrap();
    let updated = service
        .update_article(
            created.id(),
            &ArticleUpdate {
                title: Some("Renamed".to_string()),
                category_id: Some(nlp.id),
                ..ArticleUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.article.title, "Renamed");
    assert_eq!(updated.article.content, "Body");
    assert_eq!(updated.article.published_at, created.article.published_at);
    assert_eq!(updated.category.name, "NLP");
}

#[test]
fn set_article_tags_replaces_previous_set() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = ArticleService::new(SqliteArticleRepository::try_new(&conn).unwrap());
    let ada = catalog.create_author(&author("Ada")).unwrap();
    let ml = catalog.create_category(&label("ML")).unwrap();
    let a = catalog.create_tag(&label("a")).unwrap();
    let b = catalog.create_tag(&label("b")).unwrap();
    let c = catalog.create_tag(&label("c")).unwrap();

    let created = service
        .create_article(&NewArticle::new("Title", "Body", ada.id, ml.id))
        .unwrap();
    let tagged = service
        .set_article_tags(created.id(), &[b.id, a.id, a.id])
        .unwrap();
    assert_eq!(tagged.tag_names(), vec!["a", "b"]);

    let retagged = service.set_article_tags(created.id(), &[c.id]).unwrap();
    assert_eq!(retagged.tag_names(), vec!["c"]);

    let cleared = service.set_article_tags(created.id(), &[]).unwrap();
    assert!(cleared.tags.is_empty());
}

#[test]
fn detail_views_include_related_articles_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let catalog_repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let articles = SqliteArticleRepository::try_new(&conn).unwrap();

    let ada = catalog_repo.create_author(&author("Ada")).unwrap();
    let alan = catalog_repo.create_author(&author("Alan")).unwrap();
    let ml = catalog_repo.create_category(&label("ML")).unwrap();
    let tag = catalog_repo.create_tag(&label("neural")).unwrap();

    let first = articles
        .create_article(&NewArticle::new("first", "", ada.id, ml.id))
        .unwrap();
    articles
        .create_article(&NewArticle::new("other", "", alan.id, ml.id))
        .unwrap();
    let second = articles
        .create_article(&NewArticle::new("second", "", ada.id, ml.id))
        .unwrap();
    articles.set_article_tags(second.id, &[tag.id]).unwrap();

    let service = CatalogService::new(catalog_repo);
    let detail = service
        .author_with_articles(&articles, ada.id)
        .unwrap()
        .unwrap();
    let titles: Vec<_> = detail.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);
    assert_eq!(detail.articles[0].id, first.id);

    let tagged = service.tag_with_articles(&articles, tag.id).unwrap().unwrap();
    assert_eq!(tagged.articles.len(), 1);
    assert_eq!(tagged.articles[0].id, second.id);

    assert!(service
        .author_with_articles(&articles, Uuid::new_v4())
        .unwrap()
        .is_none());
}

#[test]
fn category_listing_defaults_to_fifty_and_orders_by_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    for idx in (0..60).rev() {
        repo.create_category(&label(&format!("cat-{idx:02}"))).unwrap();
    }
    let service = CatalogService::new(repo);

    let first_page = service.list_categories(&PageParams::default()).unwrap();
    assert_eq!(first_page.len(), 50);
    assert_eq!(first_page[0].name, "cat-00");
    assert_eq!(first_page[49].name, "cat-49");

    let rest = service
        .list_categories(&PageParams {
            offset: Some("50".to_string()),
            limit: None,
        })
        .unwrap();
    assert_eq!(rest.len(), 10);

    let err = service
        .list_categories(&PageParams {
            offset: None,
            limit: Some("0".to_string()),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Query(_)));
}
