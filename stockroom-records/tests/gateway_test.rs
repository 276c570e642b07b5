use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use stockroom_api_types::{
    Invoice, PaymentMethod, Product, ProductBatchDraft, ProductDraft, ProductId, Supplier,
    SupplierDraft, TransactionId, TransactionItemDraft, User, UserUpdate, Username,
};
use stockroom_http::{ApiClient, CredentialSource, HttpConfig};
use stockroom_records::{
    load_batch_workspace, record_sale, BatchKey, ChatService, RecordCreator, RecordError,
    RecordGateway, RecordService, RecordServices, SaleDraft,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CountingCredentials {
    rejections: AtomicUsize,
}

impl CredentialSource for CountingCredentials {
    fn bearer_token(&self) -> Option<String> {
        Some("session-token".to_string())
    }

    fn on_unauthorized(&self) {
        self.rejections.fetch_add(1, Ordering::SeqCst);
    }
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri()), HttpConfig::default()).unwrap()
}

fn product_json() -> serde_json::Value {
    json!({
        "id": "TEA",
        "name": "Green tea",
        "latestBatchNo": "B7",
        "remainingQuantity": 40,
        "latestUnitPrice": 2.5
    })
}

#[tokio::test]
async fn test_list_sends_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json()])))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server).with_credentials(Arc::new(CountingCredentials::default()));
    let products = RecordServices::new(&api).products.list().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].latest_batch_no.as_deref(), Some("B7"));
}

#[tokio::test]
async fn test_invalid_draft_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/suppliers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let suppliers: RecordService<Supplier> = RecordService::new(client(&server));
    let err = suppliers.create(&SupplierDraft::default()).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Supplier name is required");
}

#[tokio::test]
async fn test_create_and_update_product() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(body_json(product_json()))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/products/TEA"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/TEA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json()))
        .expect(1)
        .mount(&server)
        .await;

    let products: RecordService<Product> = RecordService::new(client(&server));
    let draft = ProductDraft {
        id: ProductId::new("TEA"),
        name: "Green tea".into(),
        latest_batch_no: "B7".into(),
        remaining_quantity: 40,
        latest_unit_price: 2.5,
    };
    let created = products.create(&draft).await.unwrap();
    assert_eq!(created.name, "Green tea");

    // Empty update response falls back to a fresh read
    let updated = products.update(&created.id, &ProductDraft::from(&created)).await.unwrap();
    assert_eq!(updated, created);
}

#[tokio::test]
async fn test_batch_composite_key_paths() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/product-batches/TEA/INV-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/product-batches/product/TEA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "productId": "TEA",
            "invoiceNo": "INV-1",
            "batchNo": "B7",
            "qty": 12,
            "unitCost": 1.5,
            "unitPrice": 2.5,
            "exp": "2025-01-31T00:00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let services = RecordServices::new(&client(&server));
    services.batches.delete(&BatchKey::new("TEA", "INV-1")).await.unwrap();

    let batches = services
        .batches
        .list_for_product(&ProductId::new("TEA"))
        .await
        .unwrap();
    assert_eq!(batches[0].qty, 12);
    assert!(batches[0].exp.is_some());
}

#[tokio::test]
async fn test_batch_validation_blocks_request() {
    let server = MockServer::start().await;
    let services = RecordServices::new(&client(&server));
    let draft = ProductBatchDraft {
        product_id: ProductId::new("TEA"),
        invoice_no: "INV-1".into(),
        batch_no: "B7".into(),
        qty: 0,
        unit_cost: 1.0,
        unit_price: 2.0,
        exp: None,
    };

    let err = services.batches.create(&draft).await.unwrap_err();
    assert_eq!(err.to_string(), "Quantity must be greater than 0");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_an_operation_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/suppliers/S-1"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"message": "Supplier has invoices"})),
        )
        .mount(&server)
        .await;

    let services = RecordServices::new(&client(&server));
    let err = services.suppliers.delete(&"S-1".into()).await.unwrap_err();
    match err {
        RecordError::Operation { entity, message } => {
            assert_eq!(entity, "supplier");
            assert_eq!(message, "Supplier has invoices");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_triggers_session_purge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let credentials = Arc::new(CountingCredentials::default());
    let api = client(&server).with_credentials(credentials.clone());
    let users: RecordService<User> = RecordService::new(api);

    let err = users.list().await.unwrap_err();
    assert!(matches!(err, RecordError::Unauthorized));
    assert_eq!(credentials.rejections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_user_update_by_username() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/ana"))
        .and(body_json(json!({"roles": ["USER", "ADMIN"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "ana",
            "email": "ana@acme.test",
            "roles": ["USER", "ADMIN"],
            "type": "STAFF"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = RecordServices::new(&client(&server));
    let update = UserUpdate {
        email: None,
        roles: Some(vec!["USER".into(), "ADMIN".into()]),
    };
    let user = services
        .users
        .update(&Username::new("ana"), &update)
        .await
        .unwrap();
    assert_eq!(user.account_type.as_deref(), Some("STAFF"));
}

#[tokio::test]
async fn test_batch_workspace_tolerates_missing_invoices() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/invoices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let services = RecordServices::new(&client(&server));
    let workspace = load_batch_workspace(&services.products, &services.invoices)
        .await
        .unwrap();
    assert_eq!(workspace.products.len(), 1);
    assert!(workspace.invoices.is_empty());
}

#[tokio::test]
async fn test_batch_workspace_requires_products() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let services = RecordServices::new(&client(&server));
    let invoices: &dyn RecordGateway<Invoice> = &services.invoices;
    assert!(load_batch_workspace(&services.products, invoices).await.is_err());
}

#[tokio::test]
async fn test_record_sale_posts_derived_amounts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions"))
        .and(body_json(json!({
            "paymentMethod": "CARD",
            "grossAmount": 7.5,
            "discountAmount": 0.5,
            "netAmount": 7.0,
            "paidAmount": 10.0,
            "balanceAmount": -3.0,
            "items": [{"productId": "TEA", "qty": 3, "unitPrice": 2.5}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "transactionId": "T-100",
            "paymentMethod": "CARD",
            "grossAmount": 7.5,
            "discountAmount": 0.5,
            "netAmount": 7.0,
            "paidAmount": 10.0,
            "balanceAmount": -3.0,
            "items": [{"transactionId": "T-100", "productId": "TEA", "qty": 3, "unitPrice": 2.5}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = RecordServices::new(&client(&server));
    let mut sale = SaleDraft::new(PaymentMethod::Card);
    sale.add_line(ProductId::new("TEA"), 3, 2.5);
    sale.discount = 0.5;
    sale.paid = 10.0;

    let tx = record_sale(&services.transactions, &sale).await.unwrap();
    assert_eq!(tx.transaction_id.as_str(), "T-100");
    assert_eq!(tx.items[0].line_total(), 7.5);
}

#[tokio::test]
async fn test_transaction_items_sub_resource() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transactions/T-1/items"))
        .and(body_json(json!({"transactionId": "T-1", "productId": "CUP", "qty": 2, "unitPrice": 1.25})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "transactionId": "T-1", "productId": "CUP", "qty": 2, "unitPrice": 1.25
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/transactions/T-1/items/CUP"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let services = RecordServices::new(&client(&server));
    let tx = TransactionId::new("T-1");
    let item = TransactionItemDraft {
        product_id: ProductId::new("CUP"),
        qty: 2,
        unit_price: 1.25,
    };

    let added = services.transactions.add_item(&tx, &item).await.unwrap();
    assert_eq!(added.transaction_id, Some(tx.clone()));
    services
        .transactions
        .delete_item(&tx, &item.product_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_chat_query_encodes_prompt_and_keeps_extra_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/query"))
        .and(query_param("prompt", "low stock & expiring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "d1", "title": "Tea", "score": 0.9, "productId": "TEA"},
            {"content": "Cups"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let chat = ChatService::new(client(&server));
    let docs = chat.query("  low stock & expiring ").await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].extra.get("productId"), Some(&json!("TEA")));
    assert_eq!(docs[1].content.as_deref(), Some("Cups"));

    assert!(chat.query("   ").await.unwrap_err().is_validation());
}
