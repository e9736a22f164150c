//! Integration tests for link-header pagination, against a mock HTTP
//! server.

use futures::StreamExt;
use octorest::{ApiOptions, GitHub};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitHub {
    GitHub::builder()
        .base_url(server.uri())
        .token("ghp_test_token")
        .build()
        .unwrap()
}

fn link_next(server: &MockServer, page: u32, per_page: u32) -> String {
    format!(
        "<{}/items?per_page={}&page={}>; rel=\"next\"",
        server.uri(),
        per_page,
        page
    )
}

/// Mounts `/items` pages 1..=total, each advertising the next page via the
/// `Link` header, with `per_page` items per page numbered sequentially.
async fn mount_pages(server: &MockServer, total: u32, per_page: u32) {
    for page in 1..=total {
        let first = (page - 1) * per_page + 1;
        let items: Vec<u64> = (first..first + per_page).map(u64::from).collect();

        let mut template = ResponseTemplate::new(200).set_body_json(json!(items));
        if page < total {
            template = template.insert_header("link", link_next(server, page + 1, per_page).as_str());
        }

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page", page.to_string()))
            .respond_with(template)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn follows_next_links_until_exhausted() {
    let server = MockServer::start().await;
    mount_pages(&server, 3, 2).await;

    let client = client_for(&server);
    let items: Vec<u64> = client
        .get_all("/items", &ApiOptions::none().page_size(2).start_page(1))
        .await
        .unwrap();

    // Concatenated in server order, terminated by the absent next link
    assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn page_count_bounds_total_items() {
    let server = MockServer::start().await;
    // 5 pages exist, each advertising a next page except the last
    mount_pages(&server, 5, 3).await;

    let client = client_for(&server);
    let options = ApiOptions::none().page_size(3).page_count(2).start_page(1);
    let items: Vec<u64> = client.get_all("/items", &options).await.unwrap();

    // total items <= page_count * page_size
    assert!(items.len() <= 2 * 3);
    assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
    // The bound also caps the request count
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn start_page_skips_directly() {
    let server = MockServer::start().await;
    mount_pages(&server, 4, 2).await;

    let client = client_for(&server);

    let from_start: Vec<u64> = client
        .get_all(
            "/items",
            &ApiOptions::none().page_size(2).page_count(1).start_page(1),
        )
        .await
        .unwrap();
    let from_third: Vec<u64> = client
        .get_all(
            "/items",
            &ApiOptions::none().page_size(2).page_count(1).start_page(3),
        )
        .await
        .unwrap();

    // Disjoint from and ordered after the page-1 results
    assert_eq!(from_start, vec![1, 2]);
    assert_eq!(from_third, vec![5, 6]);
    assert!(from_start.iter().all(|i| !from_third.contains(i)));
    assert!(from_start.iter().max() < from_third.iter().min());
}

#[tokio::test]
async fn single_page_carries_links_and_number() {
    let server = MockServer::start().await;
    mount_pages(&server, 2, 2).await;

    let client = client_for(&server);
    let page = client
        .get_page::<u64>("/items", &ApiOptions::none().page_size(2).start_page(1))
        .await
        .unwrap();

    assert_eq!(page.items, vec![1, 2]);
    assert_eq!(page.page, Some(1));
    assert_eq!(page.per_page, Some(2));
    assert!(page.has_next());
    assert!(page.next_url().unwrap().contains("page=2"));
}

#[tokio::test]
async fn paginator_streams_pages() {
    let server = MockServer::start().await;
    mount_pages(&server, 3, 2).await;

    let client = client_for(&server);
    let paginator = client
        .paginate::<u64>("/items", &ApiOptions::none().page_size(2).start_page(1))
        .unwrap();

    let pages: Vec<_> = paginator.into_stream().collect().await;
    assert_eq!(pages.len(), 3);

    let lengths: Vec<usize> = pages.iter().map(|p| p.as_ref().unwrap().len()).collect();
    assert_eq!(lengths, vec![2, 2, 2]);

    // Page numbers follow the next URLs
    let numbers: Vec<Option<u32>> = pages.iter().map(|p| p.as_ref().unwrap().page).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn stops_without_next_link() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let items: Vec<u64> = client.get_all("/items", &ApiOptions::none()).await.unwrap();

    assert_eq!(items, vec![1, 2, 3]);
}

#[tokio::test]
async fn preserves_existing_query_when_appending_page_options() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("state", "open"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([7])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let items: Vec<u64> = client
        .get_all("/items?state=open", &ApiOptions::none().page_size(10))
        .await
        .unwrap();

    assert_eq!(items, vec![7]);
}

#[tokio::test]
async fn errors_propagate_mid_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([1, 2]))
                .insert_header("link", link_next(&server, 2, 2).as_str()),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result: Result<Vec<u64>, _> = client
        .get_all("/items", &ApiOptions::none().page_size(2).start_page(1))
        .await;

    assert_eq!(
        *result.unwrap_err().kind(),
        octorest::ApiErrorKind::InternalError
    );
}
