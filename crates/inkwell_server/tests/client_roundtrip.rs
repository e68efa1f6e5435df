mod support;

use inkwell_client::{
    spawn_article_list, ArticleSource, ClientConfig, FetchPhase, HttpArticleSource,
    TransportError,
};
use inkwell_core::ArticleFilter;
use std::time::Duration;
use support::TestServer;

fn config_for(server: &TestServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.base_url.as_str())
        .with_search_debounce(Duration::from_millis(20))
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn http_source_runs_filters_against_the_server() {
    let server = TestServer::start().await;
    let source = HttpArticleSource::new(&config_for(&server)).unwrap();

    let neural = source
        .fetch_articles(&ArticleFilter::new().with_search("neural"))
        .await
        .unwrap();
    assert_eq!(neural.len(), 1);
    assert_eq!(neural[0].article.title, "The Future of Neural Networks");
    assert_eq!(neural[0].author.name, "Dr. Ada Lovelace");

    let by_category = source
        .fetch_articles(&ArticleFilter::new().with_category("Natural Language Processing"))
        .await
        .unwrap();
    assert_eq!(by_category.len(), 1);

    let categories = source.fetch_categories().await.unwrap();
    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Machine Learning", "Natural Language Processing"]);

    server.stop().await;
}

#[tokio::test]
async fn http_source_maps_error_statuses() {
    let server = TestServer::start().await;
    let config = config_for(&server).with_base_url(format!("{}/missing", server.base_url));
    let source = HttpArticleSource::new(&config).unwrap();

    let err = source
        .fetch_articles(&ArticleFilter::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 404, .. }));

    server.stop().await;
}

#[tokio::test]
async fn controller_tracks_server_results() {
    let server = TestServer::start().await;
    let config = config_for(&server);
    let handle = spawn_article_list(HttpArticleSource::new(&config).unwrap(), &config);
    let mut views = handle.subscribe();

    let mounted = views.wait_for(|view| !view.is_loading).await.unwrap().clone();
    assert_eq!(mounted.articles.len(), 2);
    assert_eq!(mounted.categories.len(), 2);
    assert_eq!(mounted.phase, FetchPhase::Loaded);

    handle.select_category("Machine Learning").unwrap();
    let filtered = views
        .wait_for(|view| {
            !view.is_loading && view.selected_category == "Machine Learning"
        })
        .await
        .unwrap()
        .clone();
    assert_eq!(filtered.articles.len(), 1);
    assert_eq!(
        filtered.articles[0].article.title,
        "The Future of Neural Networks"
    );

    handle.shutdown().await;
    server.stop().await;
}

#[tokio::test]
async fn unreachable_server_leaves_view_idle() {
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(2));
    let handle = spawn_article_list(HttpArticleSource::new(&config).unwrap(), &config);
    let mut views = handle.subscribe();

    let view = views.wait_for(|view| !view.is_loading).await.unwrap().clone();
    assert_eq!(view.phase, FetchPhase::Idle);
    assert!(view.articles.is_empty());

    handle.shutdown().await;
}
