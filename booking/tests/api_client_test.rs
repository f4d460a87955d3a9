//! REST client against a mock backend: auth header, status mapping, login.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;
use std::sync::Arc;
use venue_booking::config::ApiConfig;
use venue_booking::session::{MemorySessionStore, Session};
use venue_booking::types::{
    EventId, EventStatus, ItemDraft, ItemId, Money, NewNotification, NotificationKind,
    NotificationId, Payment, PaymentDraft, PaymentId, PaymentMethod, PaymentStatus, Receipt,
    ReservationStatus, Role, User, UserId,
};
use venue_booking::{ApiClient, ApiError, SessionContext};
use venue_testing::test_clock;
use venue_testing::date;
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAR_FUTURE: i64 = 4_102_444_800;

fn token(exp: i64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": "owner@venue.com", "exp": exp, "role": "OWNER" }).to_string(),
    );
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2ln")
}

fn owner() -> User {
    User {
        id: UserId::new(1),
        name: "Maria".to_string(),
        email: "owner@venue.com".to_string(),
        role: Role::Owner,
        client_id: None,
    }
}

async fn client(server: &MockServer, session: Option<Session>) -> (ApiClient, Arc<MemorySessionStore>) {
    let store = Arc::new(match session {
        Some(session) => MemorySessionStore::with_session(session),
        None => MemorySessionStore::new(),
    });
    let context = Arc::new(SessionContext::new(store.clone(), Arc::new(test_clock())));
    context.init().await.unwrap();

    let api = ApiClient::new(
        &ApiConfig {
            base_url: format!("{}/api", server.uri()),
            timeout_secs: 5,
        },
        context,
    )
    .unwrap();
    (api, store)
}

fn signed_in() -> Option<Session> {
    Some(Session {
        token: token(FAR_FUTURE),
        user: owner(),
    })
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/7"))
        .and(header("authorization", format!("Bearer {}", token(FAR_FUTURE)).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Casamento Ana & Leo",
            "eventDate": "2026-03-20",
            "startTime": "18:00",
            "status": "CONFIRMED",
            "clientId": 3,
            "totalValue": 12000.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let event = api.event(EventId::new(7)).await.unwrap();

    assert_eq!(event.status, EventStatus::Confirmed);
    assert_eq!(event.event_date.to_string(), "2026-03-20");
    assert_eq!(event.total_value.cents(), 1_200_000);
}

#[tokio::test]
async fn unauthorized_response_ends_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (api, store) = client(&server, signed_in()).await;
    assert!(api.session().is_authenticated());

    let error = api.items().await.unwrap_err();

    assert_eq!(error, ApiError::Unauthorized);
    assert!(!api.session().is_authenticated());
    assert!(store.snapshot().is_none());
}

#[tokio::test]
async fn missing_resource_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let error = api.event(EventId::new(99)).await.unwrap_err();

    assert!(matches!(error, ApiError::NotFound(_)));
    assert!(api.session().is_authenticated());
}

#[tokio::test]
async fn business_rejection_keeps_the_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/clients/3"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "message": "Client has events" })),
        )
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let error = api
        .delete_client(venue_booking::types::ClientId::new(3))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Status {
            status: 409,
            message: "Client has events".to_string(),
        }
    );
}

#[tokio::test]
async fn login_stores_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "owner@venue.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token(FAR_FUTURE),
            "user": { "id": 1, "name": "Maria", "email": "owner@venue.com", "role": "OWNER" }
        })))
        .mount(&server)
        .await;

    let (api, store) = client(&server, None).await;
    let user = api.login("owner@venue.com", "secret").await.unwrap();

    assert_eq!(user, owner());
    assert!(api.session().is_authenticated());
    assert_eq!(store.snapshot().map(|s| s.user), Some(owner()));
}

#[tokio::test]
async fn wrong_credentials_are_reported_as_such() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (api, store) = client(&server, None).await;
    let error = api.login("owner@venue.com", "nope").await.unwrap_err();

    assert!(matches!(error, ApiError::Status { status: 401, .. }));
    assert!(!api.session().is_authenticated());
    assert!(store.snapshot().is_none());
}

fn pending_payment() -> Payment {
    Payment {
        id: PaymentId::new(5),
        event_id: EventId::new(1),
        amount: Money::from_reais(2_000),
        method: PaymentMethod::Pix,
        status: PaymentStatus::Pending,
        due_date: Some(date(2026, 3, 20)),
        paid_at: None,
        receipt_url: None,
    }
}

fn payment_json(status: &str) -> serde_json::Value {
    json!({
        "id": 5,
        "eventId": 1,
        "amount": 2000.0,
        "method": "PIX",
        "status": status,
        "dueDate": "2026-03-20"
    })
}

fn boleto_json() -> serde_json::Value {
    json!({
        "id": 9,
        "paymentId": 5,
        "barcode": "23793381286000000000300000000401840000020000",
        "digitableLine": "23793.38128 60000.000003 00000.000400 1 84000000020000",
        "dueDate": "2026-03-20",
        "amount": 2000.0
    })
}

#[tokio::test]
async fn payment_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .and(body_json(json!({
            "eventId": 1, "amount": 2000.0, "method": "PIX", "status": "PENDING", "dueDate": "2026-03-20"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(payment_json("PENDING")))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let created = api
        .create_payment(&PaymentDraft {
            event_id: EventId::new(1),
            amount: Money::from_reais(2_000),
            method: PaymentMethod::Pix,
            status: PaymentStatus::Pending,
            due_date: Some(date(2026, 3, 20)),
        })
        .await
        .unwrap();

    assert_eq!(created, pending_payment());
}

#[tokio::test]
async fn payment_status_change_keeps_other_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/payments/5"))
        .and(body_json(json!({
            "eventId": 1, "amount": 2000.0, "method": "PIX", "status": "PAID", "dueDate": "2026-03-20"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("PAID")))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let updated = api
        .update_payment_status(&pending_payment(), PaymentStatus::Paid)
        .await
        .unwrap();

    assert_eq!(updated.status, PaymentStatus::Paid);
    assert_eq!(updated.amount, Money::from_reais(2_000));
}

#[tokio::test]
async fn boleto_is_generated_then_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/5/boleto"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(201).set_body_json(boleto_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/5/boleto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(boleto_json()))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let generated = api.generate_boleto(PaymentId::new(5)).await.unwrap();
    let fetched = api.boleto(PaymentId::new(5)).await.unwrap();

    assert_eq!(generated, fetched);
    assert_eq!(fetched.payment_id, PaymentId::new(5));
    assert_eq!(fetched.due_date, date(2026, 3, 20));
    assert_eq!(fetched.url, None);
}

#[tokio::test]
async fn missing_boleto_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/6/boleto"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;

    assert!(matches!(
        api.boleto(PaymentId::new(6)).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn receipt_is_uploaded_as_raw_bytes() {
    let server = MockServer::start().await;
    let pdf = b"%PDF-1.4 receipt".to_vec();
    Mock::given(method("POST"))
        .and(path("/api/payments/5/receipt"))
        .and(header("content-type", "application/pdf"))
        .and(header("content-disposition", "attachment; filename=\"pix-0312.pdf\""))
        .and(body_bytes(pdf.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "eventId": 1, "amount": 2000.0, "method": "PIX", "status": "PAID",
            "receiptUrl": "/payments/5/receipt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let payment = api
        .upload_receipt(
            PaymentId::new(5),
            Receipt {
                file_name: "pix-0312.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: pdf,
            },
        )
        .await
        .unwrap();

    assert_eq!(payment.receipt_url.as_deref(), Some("/payments/5/receipt"));
    assert_eq!(payment.due_date, None);
}

#[tokio::test]
async fn receipt_download_reads_name_and_type_from_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/5/receipt"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"pix-0312.pdf\"")
                .set_body_raw(b"%PDF-1.4 receipt".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let receipt = api.download_receipt(PaymentId::new(5)).await.unwrap();

    assert_eq!(
        receipt,
        Receipt {
            file_name: "pix-0312.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.4 receipt".to_vec(),
        }
    );
}

#[tokio::test]
async fn receipt_without_disposition_gets_a_default_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/5/receipt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"img".to_vec(), "image/png"))
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let receipt = api.download_receipt(PaymentId::new(5)).await.unwrap();

    assert_eq!(receipt.file_name, "receipt-5");
    assert_eq!(receipt.content_type, "image/png");
}

#[tokio::test]
async fn notification_is_raised_and_marked_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notifications"))
        .and(body_json(json!({
            "title": "Pagamento recebido", "message": "PIX de R$ 2.000,00", "kind": "PAYMENT"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 31, "title": "Pagamento recebido", "message": "PIX de R$ 2.000,00",
            "kind": "PAYMENT", "read": false, "createdAt": "2026-03-10T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/notifications/31/read"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/notifications/read-all"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let raised = api
        .create_notification(&NewNotification {
            title: "Pagamento recebido".to_string(),
            message: "PIX de R$ 2.000,00".to_string(),
            kind: NotificationKind::Payment,
        })
        .await
        .unwrap();

    assert_eq!(raised.id, NotificationId::new(31));
    assert!(!raised.read);
    api.mark_notification_read(raised.id).await.unwrap();
    api.mark_all_notifications_read().await.unwrap();
}

#[tokio::test]
async fn items_are_created_and_updated() {
    let server = MockServer::start().await;
    let item = json!({
        "id": 12, "name": "Mesa redonda", "category": "Mesas",
        "quantityTotal": 20, "minStock": 4, "unitPrice": 35.0
    });
    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(body_json(json!({
            "name": "Mesa redonda", "category": "Mesas",
            "quantityTotal": 20, "minStock": 4, "unitPrice": 35.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(item))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/items/12"))
        .and(body_json(json!({
            "name": "Mesa redonda", "category": "Mesas",
            "quantityTotal": 24, "minStock": 4, "unitPrice": 35.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "name": "Mesa redonda", "category": "Mesas",
            "quantityTotal": 24, "minStock": 4, "unitPrice": 35.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let mut draft = ItemDraft {
        name: "Mesa redonda".to_string(),
        category: "Mesas".to_string(),
        quantity_total: 20,
        min_stock: 4,
        unit_price: Money::from_reais(35),
    };
    let created = api.create_item(&draft).await.unwrap();
    assert_eq!(created.id, ItemId::new(12));

    draft.quantity_total = 24;
    let updated = api.update_item(created.id, &draft).await.unwrap();
    assert_eq!(updated.quantity_total, 24);
}

#[tokio::test]
async fn reservations_of_one_event_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items/reservations/event/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 10, "itemId": 4, "eventId": 1, "eventDate": "2026-03-20", "quantity": 15, "status": "RESERVED" },
            { "id": 11, "itemId": 12, "eventId": 1, "eventDate": "2026-03-20T00:00:00", "quantity": 3, "status": "RETURNED" }
        ])))
        .mount(&server)
        .await;

    let (api, _) = client(&server, signed_in()).await;
    let reservations = api.reservations_by_event(EventId::new(1)).await.unwrap();

    assert_eq!(reservations.len(), 2);
    assert!(reservations.iter().all(|r| r.event_date == date(2026, 3, 20)));
    assert_eq!(reservations[1].status, ReservationStatus::Returned);
}
