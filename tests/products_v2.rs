//! Contract tests for the v2 Product service client.
//!
//! The v2 surface maps the agreed failure cases to sentinel returns: a
//! missing product reads as `None`, a delete refused for a missing
//! precondition as `false`.

use product_contracts::factory::{self, HeadersTemplate, Pagination};
use product_contracts::models::NewProduct;
use product_contracts::{
    Client, ContractSession, Format, Interaction, Matcher, RequestSpec, ResponseSpec,
    SessionConfig,
};
use serde_json::json;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn config() -> SessionConfig {
    SessionConfig::new("ProductServiceClient", "ProductService")
        .with_contract_dir(concat!(env!("CARGO_TARGET_TMPDIR"), "/contracts"))
}

async fn start_session() -> ContractSession {
    init_logging();
    ContractSession::start(config())
        .await
        .expect("mock provider should start")
}

#[tokio::test]
async fn test_get_existent_product() {
    let mut session = start_session().await;
    let expected = factory::product()
        .create_with(&[("id", json!(1)), ("name", json!("product0"))])
        .unwrap();

    session.stage(
        Interaction::new("a request for a product")
            .given("there is a product with ID 1")
            .with_request(RequestSpec::get("/v2/products/1"))
            .will_respond_with(
                ResponseSpec::new(200)
                    .with_headers(HeadersTemplate::baseline())
                    .with_header("Last-Modified", Format::last_modified())
                    .with_body(expected.like()),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let product = client.products_v2().get(1).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    let product = product.expect("staged product should be returned");
    assert_eq!(product.id, 1);
    assert_eq!(product.name, expected.string("name").unwrap());
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_get_nonexistent_product_returns_none() {
    let mut session = start_session().await;

    session.stage(
        Interaction::new("a request for a missing product")
            .given("there is no product with ID 7777")
            .with_request(RequestSpec::get("/v2/products/7777"))
            .will_respond_with(
                ResponseSpec::new(404)
                    .with_header("Content-Type", Format::media_type_json())
                    .with_body(factory::not_found_error().create().exact()),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let product = client.products_v2().get(7777).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    assert!(product.is_none());
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_delete_without_if_match_returns_false() {
    let mut session = start_session().await;

    session.stage(
        Interaction::new("a request to delete a product without a precondition")
            .given("there is no product with ID 7777")
            .with_request(RequestSpec::delete("/v2/products/7777"))
            .will_respond_with(
                ResponseSpec::new(428)
                    .with_header("Content-Type", Format::media_type_json())
                    .with_body(factory::precondition_required_error().create().exact()),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let deleted = client.products_v2().delete(7777, None).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    assert!(!deleted);
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_empty_products_response_is_a_list() {
    let mut session = start_session().await;

    session.stage(
        Interaction::new("a request to get list of products")
            .given("there are no products")
            .with_request(RequestSpec::get("/v2/products"))
            .will_respond_with(
                ResponseSpec::new(200)
                    .with_headers(HeadersTemplate::baseline().with_pagination(&Pagination::empty()))
                    .with_body(Matcher::exact(json!([]))),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let products = client.products_v2().all(&[]).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    // An empty result set is an empty list, never a missing one.
    assert!(products.is_empty());
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_products_response() {
    let mut session = start_session().await;
    let expected = factory::product().create();

    session.stage(
        Interaction::new("a request to get list of products")
            .given("there are few products")
            .with_request(RequestSpec::get("/v2/products"))
            .will_respond_with(
                ResponseSpec::new(200)
                    .with_headers(
                        HeadersTemplate::baseline().with_pagination(&Pagination::single_page(3)),
                    )
                    .with_body(Matcher::each_like(expected.like(), 3)),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let products = client.products_v2().all(&[]).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    assert!(products.len() >= 3);
    assert_eq!(products[0].name, expected.string("name").unwrap());
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_no_products_in_category_response() {
    let mut session = start_session().await;

    session.stage(
        Interaction::new("a request to get list of products in a category")
            .given("there are no products in category #2")
            .with_request(RequestSpec::get("/v2/products").with_query("cid", "2"))
            .will_respond_with(
                ResponseSpec::new(200)
                    .with_headers(HeadersTemplate::baseline().with_pagination(&Pagination::empty()))
                    .with_body(Matcher::exact(json!([]))),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let products = client.products_v2().all(&[("cid", "2")]).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    assert!(products.is_empty());
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_products_in_category_response() {
    let mut session = start_session().await;
    let expected = factory::product()
        .create_with(&[("category_id", json!(2))])
        .unwrap();

    session.stage(
        Interaction::new("a request to get list of products in a category")
            .given("there are few products in category #2")
            .with_request(RequestSpec::get("/v2/products").with_query("cid", "2"))
            .will_respond_with(
                ResponseSpec::new(200)
                    .with_headers(
                        HeadersTemplate::baseline().with_pagination(&Pagination::single_page(2)),
                    )
                    .with_body(Matcher::each_like(expected.like(), 2)),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let products = client.products_v2().all(&[("cid", "2")]).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.category_id == 2));
    session.teardown().await.unwrap();
}

#[tokio::test]
async fn test_create_product() {
    let mut session = start_session().await;

    let fields = NewProduct {
        name: "test".to_string(),
        description: "test".to_string(),
        price: 442.95,
        discount: 241.93,
        rating: 5.0,
        stock: 123,
        category_id: 1,
        brand_id: 1,
    };
    let expected = factory::product()
        .create_with(&[
            ("name", json!("test")),
            ("description", json!("test")),
            ("price", json!(442.95)),
            ("discount", json!(241.93)),
            ("rating", json!(5.0)),
            ("stock", json!(123)),
            ("category_id", json!(1)),
            ("brand_id", json!(1)),
        ])
        .unwrap();

    session.stage(
        Interaction::new("a request to create product")
            .given("there is category #1 and brand #1")
            .with_request(
                RequestSpec::post("/v2/products")
                    .with_header("Content-Type", "application/json")
                    .with_body(serde_json::to_value(&fields).unwrap()),
            )
            .will_respond_with(
                ResponseSpec::new(201)
                    .with_headers(HeadersTemplate::baseline())
                    .with_header(
                        "Location",
                        Format::url("/v2/products/1", "https://example.com/v2/products/1"),
                    )
                    .with_body(expected.like()),
            ),
    );

    session.activate().await.unwrap();
    let client = Client::new(session.base_url()).unwrap();
    let created = client.products_v2().create(&fields).await.unwrap();
    session.deactivate().await.unwrap();
    session.verify().await.unwrap();

    assert_eq!(created.name, "test");
    assert_eq!(created.price, 442.95);
    session.teardown().await.unwrap();
}
