//! Purchase invoice and creditor synchronization against a mock middleware.

#![cfg(feature = "sync")]

use std::time::Duration;

use chrono::NaiveDate;
use peppol_edi::client::*;
use peppol_edi::core::*;
use peppol_edi::sync::EdiService;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Service = EdiService<ReqwestTransport, MemoryStore>;

fn service(server: &MockServer) -> Service {
    let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();
    let company = CompanyBuilder::new("ACME Pte Ltd")
        .api_key("secret-key", Mode::Test)
        .edi_url(server.uri())
        .verified("1001", "access", "refresh")
        .build();
    EdiService::new(
        ApiClient::new(transport, EdiConfig::default()),
        MemoryStore::with_iso_countries(company),
    )
}

fn creditor(id: i64, name: &str, uen: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "creditor_number": format!("CR-{id}"),
        "country_code": "SG",
        "client_id": 7,
        "address": "1 Raffles Place",
        "zip_code": "048616",
        "city": "Singapore",
        "legal_entity_trn": uen,
        "state": null,
        "email": "ap@vendor.sg"
    })
}

fn purchase(id: i64, creditor_id: Option<i64>) -> Value {
    json!({
        "id": id,
        "creditor_id": creditor_id,
        "purchase_invoice_number": format!("PINV-{id}"),
        "purchase_invoice_date": "2024-05-02T00:00:00Z",
        "purchase_invoice_due_date": "2024-06-01T00:00:00Z",
        "purchase_invoice_uuid": format!("p-uuid-{id}"),
        "status": "incoming",
        "invoice_lines": [{
            "service_name": "Paper",
            "service_description": "A4 paper, 5 reams",
            "service_quantity": 5,
            "service_price": 4.2
        }]
    })
}

async fn mount_page(server: &MockServer, api: &str, page: u32, results: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(api))
        .and(query_param("client_number", "1001"))
        .and(query_param("page", page.to_string()))
        .and(query_param("size", "49"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .expect(1)
        .mount(server)
        .await;
}

// --- Pagination ---

#[tokio::test]
async fn page_of_exactly_ten_continues_listing() {
    let server = MockServer::start().await;
    let first: Vec<Value> = (1..=10)
        .map(|i| creditor(i, &format!("Vendor {i}"), &format!("UEN{i:04}")))
        .collect();
    mount_page(&server, "/api/v1/creditor", 0, first).await;
    mount_page(
        &server,
        "/api/v1/creditor",
        1,
        vec![creditor(11, "Vendor 11", "UEN0011")],
    )
    .await;

    let mut svc = service(&server);
    let partners = svc.fetch_creditors().await.unwrap();

    assert_eq!(partners.len(), 11);
}

#[tokio::test]
async fn short_page_ends_listing() {
    let server = MockServer::start().await;
    let first: Vec<Value> = (1..=9)
        .map(|i| creditor(i, &format!("Vendor {i}"), &format!("UEN{i:04}")))
        .collect();
    mount_page(&server, "/api/v1/creditor", 0, first).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/creditor"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let mut svc = service(&server);
    assert_eq!(svc.fetch_creditors().await.unwrap().len(), 9);
}

#[tokio::test]
async fn listing_error_carries_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/invoice/purchase"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let mut svc = service(&server);
    let err = svc.fetch_purchase_invoices().await.unwrap_err();

    assert_eq!(err, PeppolError::Access("Error occurred: bad gateway".into()));
    assert_eq!(svc.store().moves().count(), 0);
}

// --- Creditors ---

#[tokio::test]
async fn creditor_matching_archived_uen_is_reused() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/api/v1/creditor",
        0,
        vec![creditor(5, "Vendor Five", "201700005V")],
    )
    .await;

    let mut svc = service(&server);
    let archived = svc.store_mut().insert_partner(
        PartnerBuilder::new("Vendor Five (old)")
            .unique_entity_number("201700005V")
            .archived()
            .build(),
    );
    let partners = svc.fetch_creditors().await.unwrap();

    assert_eq!(partners, vec![archived]);
    assert_eq!(svc.store().partners().count(), 1);
}

#[tokio::test]
async fn new_creditor_is_created_as_supplier() {
    let server = MockServer::start().await;
    let mut record = creditor(6, "Vendor Six", "201700006W");
    record["state"] = json!("Central");
    mount_page(&server, "/api/v1/creditor", 0, vec![record]).await;

    let mut svc = service(&server);
    let sg = svc.store().country_by_code("SG").unwrap();
    let central = svc.store_mut().add_state(sg, "01", "Central");

    let partners = svc.fetch_creditors().await.unwrap();
    let partner = svc.store().get_partner(partners[0]).unwrap();

    assert_eq!(partner.name, "Vendor Six");
    assert_eq!(partner.creditor_id, Some(6));
    assert_eq!(partner.creditor_number.as_deref(), Some("CR-6"));
    assert_eq!(partner.supplier_rank, 1);
    assert_eq!(partner.country_id, Some(sg));
    assert_eq!(partner.state_id, Some(central));
    assert_eq!(partner.client_id, Some(7));
    assert_eq!(partner.street.as_deref(), Some("1 Raffles Place"));
    assert_eq!(partner.unique_entity_number.as_deref(), Some("201700006W"));
}

#[tokio::test]
async fn unknown_country_is_left_empty() {
    let server = MockServer::start().await;
    let mut record = creditor(8, "Vendor Eight", "201700008Y");
    record["country_code"] = json!("XX");
    mount_page(&server, "/api/v1/creditor", 0, vec![record]).await;

    let mut svc = service(&server);
    let partners = svc.fetch_creditors().await.unwrap();
    assert_eq!(svc.store().get_partner(partners[0]).unwrap().country_id, None);
}

// --- Vendor bills ---

#[tokio::test]
async fn vendor_bill_resolves_unknown_creditor() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/api/v1/invoice/purchase",
        0,
        vec![purchase(501, Some(12))],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/creditors/12"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(creditor(12, "Paper Co", "201700012K")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut svc = service(&server);
    let paper = svc.store_mut().add_product("Paper");
    let bills = svc.fetch_purchase_invoices().await.unwrap();

    let store = svc.store();
    let bill = store.get_move(bills[0]).unwrap();
    assert_eq!(bill.move_type, MoveType::InInvoice);
    assert_eq!(bill.name, "PINV-501");
    assert_eq!(bill.external_invoice_id.as_deref(), Some("501"));
    assert_eq!(bill.external_invoice_uuid.as_deref(), Some("p-uuid-501"));
    assert_eq!(bill.edi_status, Some(EdiStatus::Incoming));
    assert_eq!(bill.invoice_date, NaiveDate::from_ymd_opt(2024, 5, 2));
    assert_eq!(bill.invoice_date_due, NaiveDate::from_ymd_opt(2024, 6, 1));
    assert_eq!(bill.lines[0].product_id, Some(paper));
    assert_eq!(bill.lines[0].quantity, dec!(5));
    assert_eq!(bill.lines[0].price_unit, dec!(4.2));
    assert_eq!(bill.amount_total, dec!(21));

    let vendor = store.get_partner(bill.partner_id.unwrap()).unwrap();
    assert_eq!(vendor.name, "Paper Co");
    assert_eq!(vendor.creditor_id, Some(12));
}

#[tokio::test]
async fn known_creditor_is_not_fetched_again() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/api/v1/invoice/purchase",
        0,
        vec![purchase(502, Some(13)), purchase(503, None)],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/creditors/13"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut svc = service(&server);
    let vendor = svc
        .store_mut()
        .insert_partner(PartnerBuilder::new("Known Vendor").creditor_id(13).build());
    let bills = svc.fetch_purchase_invoices().await.unwrap();

    let store = svc.store();
    assert_eq!(store.get_move(bills[0]).unwrap().partner_id, Some(vendor));
    assert_eq!(store.get_move(bills[1]).unwrap().partner_id, None);
    assert_eq!(store.get_move(bills[1]).unwrap().lines[0].product_id, None);
}

#[tokio::test]
async fn existing_bill_only_gets_status_update() {
    let server = MockServer::start().await;
    let mut record = purchase(504, Some(14));
    record["status"] = json!("paid");
    mount_page(&server, "/api/v1/invoice/purchase", 0, vec![record]).await;

    let mut svc = service(&server);
    let existing = svc.store_mut().insert_move(
        MoveBuilder::new("PINV-504 (local)")
            .move_type(MoveType::InInvoice)
            .external_id("504")
            .status(EdiStatus::Incoming)
            .build(),
    );
    let bills = svc.fetch_purchase_invoices().await.unwrap();

    assert_eq!(bills, vec![existing]);
    let bill = svc.store().get_move(existing).unwrap();
    assert_eq!(bill.edi_status, Some(EdiStatus::Paid));
    assert_eq!(bill.name, "PINV-504 (local)");
    assert!(bill.lines.is_empty());
    assert_eq!(svc.store().moves().count(), 1);
}

#[tokio::test]
async fn unknown_remote_status_is_rejected() {
    let server = MockServer::start().await;
    let mut record = purchase(505, None);
    record["status"] = json!("lost_in_space");
    mount_page(&server, "/api/v1/invoice/purchase", 0, vec![record]).await;

    let mut svc = service(&server);
    let err = svc.fetch_purchase_invoices().await.unwrap_err();

    assert!(err.is_access());
    assert_eq!(svc.store().moves().count(), 0);
}

#[tokio::test]
async fn out_of_range_line_amount_is_rejected() {
    let server = MockServer::start().await;
    let mut record = purchase(506, None);
    record["invoice_lines"] = json!([{
        "service_name": "Paper",
        "service_quantity": 1e20,
        "service_price": 1e20
    }]);
    mount_page(&server, "/api/v1/invoice/purchase", 0, vec![record]).await;

    let mut svc = service(&server);
    let err = svc.fetch_purchase_invoices().await.unwrap_err();

    assert!(err.is_access());
    assert!(err.message().contains("506"));
    assert_eq!(svc.store().moves().count(), 0);
}
