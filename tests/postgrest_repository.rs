use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hielo_polar_admin::prelude::*;

const KEY: &str = "anon-test-key";

async fn dashboard(server: &MockServer) -> (Dashboard, tokio::sync::mpsc::UnboundedReceiver<Notification>) {
    let config = SupabaseConfig::new(&server.uri(), KEY.to_string()).unwrap();
    let (notifier, notifications) = ChannelNotifier::new();
    let dashboard = Dashboard::connect(&config, ClientOptions::default(), Arc::new(notifier)).unwrap();
    (dashboard, notifications)
}

fn client_row(id: &str, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "contact_person": "Juan Pérez",
        "phone": "555-123-4567",
        "email": "contacto@pescadosnorte.mx",
        "address": "Av. Marina 123, Puerto Vallarta",
        "assets_assigned": 3,
        "max_credit": 5,
        "active_credit": 3,
        "status": status,
        "image_src": "",
        "coordinates": "[-105.2333,20.6167]",
        "channel_type": "tradicional",
        "conserver_productivity": 85,
        "conserver": null
    })
}

#[tokio::test]
async fn list_sends_keys_and_newest_first_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/clients_extended"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", KEY))
        .and(header("authorization", "Bearer anon-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            client_row("CL-102", "Mariscos Sur", "active"),
            client_row("CL-101", "Pescados Norte", "inactive"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (dashboard, _) = dashboard(&server).await;
    let clients = dashboard.clients.list(None).await.unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].id, "CL-102");
    assert_eq!(clients[1].status, ClientStatus::Inactive);
    assert_eq!(clients[1].coordinates, Some(Coordinates::new(-105.2333, 20.6167)));

    // served from cache
    dashboard.clients.list(None).await.unwrap();
}

#[tokio::test]
async fn empty_table_is_seeded_then_reread() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/clients_extended"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/clients_extended"))
        .and(header("prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            client_row("CL-101", "Pescados Norte", "active"),
            client_row("CL-102", "Mariscos Sur", "active"),
            client_row("CL-103", "Hielos Centro", "inactive"),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/clients_extended"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            client_row("CL-101", "Pescados Norte", "active"),
            client_row("CL-102", "Mariscos Sur", "active"),
            client_row("CL-103", "Hielos Centro", "inactive"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (dashboard, _) = dashboard(&server).await;
    let clients = dashboard.clients.list(None).await.unwrap();
    assert_eq!(clients.len(), 3);

    let requests = server.received_requests().await.unwrap();
    let seeded: Vec<serde_json::Value> = requests
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert_eq!(seeded.len(), 3);
    assert_eq!(seeded[0]["id"], "CL-101");
    assert_eq!(seeded[2]["channel_type"], "industrial");
}

#[tokio::test]
async fn status_change_patches_only_status() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/clients_extended"))
        .and(query_param("id", "eq.CL-101"))
        .and(query_param("select", "*"))
        .and(header("accept", "application/vnd.pgrst.object+json"))
        .and(body_json(json!({ "status": "inactive" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(client_row("CL-101", "Pescados Norte", "inactive")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (dashboard, mut notifications) = dashboard(&server).await;
    let updated = dashboard
        .clients
        .update("CL-101", &ClientPatch::status(ClientStatus::Inactive))
        .await
        .unwrap();
    assert_eq!(updated.status, ClientStatus::Inactive);
    assert_eq!(updated.email, "contacto@pescadosnorte.mx");

    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.title, "Cliente actualizado");
}

#[tokio::test]
async fn repairs_of_one_asset_use_an_eq_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/repairs"))
        .and(query_param("asset_id", "eq.CON-002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "asset_id": "CON-002",
            "order_number": "REP-007",
            "customer_name": "Pescados Norte",
            "equipment_type": "Conservador",
            "problem_description": "No enfría",
            "status": "in_progress",
            "priority": "high",
            "repair_type": "corrective",
            "estimated_completion": "2024-06-01",
            "parts_used": ["compresor"],
            "created_at": "2024-05-20T10:00:00+00:00",
            "updated_at": "2024-05-21T10:00:00+00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let (dashboard, _) = dashboard(&server).await;
    let repairs = dashboard
        .repairs
        .list(Some(ListFilter::eq("asset_id", "CON-002")))
        .await
        .unwrap();
    assert_eq!(repairs.len(), 1);
    assert_eq!(repairs[0].id, "7");
    assert_eq!(repairs[0].status, RepairStatus::InProgress);
    assert_eq!(repairs[0].priority, RepairPriority::High);
    assert_eq!(repairs[0].parts_used, vec!["compresor".to_string()]);
}

#[tokio::test]
async fn rejected_insert_surfaces_api_error_and_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/maintenances"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"maintenances_pkey\"",
            "details": null,
            "hint": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (dashboard, mut notifications) = dashboard(&server).await;
    let draft = MaintenanceDraft {
        title: "Revisión trimestral".to_string(),
        client: "Pescados Norte".to_string(),
        asset: "CON-002".to_string(),
        date: "2024-07-01".to_string(),
        technician: "Luis Torres".to_string(),
        ..Default::default()
    };
    let err = dashboard.maintenances.add(&draft).await.unwrap_err();
    match err {
        Error::Api { details, status } => {
            assert_eq!(status.as_u16(), 409);
            assert_eq!(details.code.as_deref(), Some("23505"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
}

#[tokio::test]
async fn deleting_a_missing_row_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/assets"))
        .and(query_param("id", "eq.CON-404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (dashboard, _) = dashboard(&server).await;
    let err = dashboard.assets.delete("CON-404").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "{:?}", err);
}

#[tokio::test]
async fn unparsed_error_body_is_kept_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/assets"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let (dashboard, _) = dashboard(&server).await;
    let err = dashboard.assets.list(None).await.unwrap_err();
    assert!(err.to_string().contains("Bad Gateway"), "{}", err);
    assert!(dashboard.assets.state(None).error().is_some());
}
