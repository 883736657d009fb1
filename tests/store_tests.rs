use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;

use hielo_polar_admin::mapper::{AssetMapper, ClientMapper, MaintenanceMapper, RepairMapper};
use hielo_polar_admin::prelude::*;
use hielo_polar_admin::store::{AssetStore, ClientStore, MaintenanceStore, RepairStore};

fn silent() -> Arc<dyn Notifier> {
    Arc::new(TracingNotifier)
}

fn client_store() -> (Arc<MemoryRepository<ClientMapper>>, ClientStore) {
    let repository = Arc::new(MemoryRepository::<ClientMapper>::new());
    let store = ClientStore::new(repository.clone(), silent());
    (repository, store)
}

fn repair_draft(asset_id: &str, order_number: &str) -> RepairDraft {
    RepairDraft {
        asset_id: asset_id.to_string(),
        order_number: order_number.to_string(),
        customer_name: "Pescados Norte".to_string(),
        equipment_type: "Conservador".to_string(),
        problem_description: "No enfría".to_string(),
        estimated_completion: "2024-06-01".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn empty_tables_are_seeded_once() {
    let (clients_repo, clients) = client_store();
    let assets_repo = Arc::new(MemoryRepository::<AssetMapper>::new());
    let assets = AssetStore::new(assets_repo.clone(), silent());

    assert_eq!(clients.list(None).await.unwrap().len(), 3);
    assert_eq!(assets.list(None).await.unwrap().len(), 8);

    clients.invalidate();
    assets.invalidate();
    assert_eq!(clients.list(None).await.unwrap().len(), 3);
    assert_eq!(assets.list(None).await.unwrap().len(), 8);
    assert_eq!(clients_repo.len().await, 3);
    assert_eq!(assets_repo.len().await, 8);
}

#[tokio::test]
async fn seeded_client_keeps_its_id() {
    let (_, clients) = client_store();
    let found = clients.find("CL-102").await.unwrap().unwrap();
    assert_eq!(found.name, "Mariscos Sur");
    assert_eq!(found.channel_type, ChannelType::Moderno);
    assert!(clients.find("CL-999").await.unwrap().is_none());
}

#[tokio::test]
async fn status_toggle_twice_only_touches_status() {
    let (repository, clients) = client_store();
    clients.list(None).await.unwrap();

    clients
        .update("CL-101", &ClientPatch::status(ClientStatus::Inactive))
        .await
        .unwrap();
    let updated = clients
        .update("CL-101", &ClientPatch::status(ClientStatus::Active))
        .await
        .unwrap();
    assert_eq!(updated.status, ClientStatus::Active);
    assert_eq!(updated.email, "contacto@pescadosnorte.mx");

    let row = repository.raw_row("CL-101").await.unwrap();
    assert_eq!(row["status"], "active");
    assert_eq!(row["email"], "contacto@pescadosnorte.mx");
    assert_eq!(row["max_credit"], 5);
}

#[tokio::test]
async fn partial_update_leaves_unknown_columns_alone() {
    let (repository, clients) = client_store();
    repository
        .insert_raw(json!({
            "id": "CL-500",
            "name": "Congelados Bahía",
            "status": "active",
            "region": "Pacífico",
            "created_at": "2024-01-01T00:00:00.000000Z"
        }))
        .await;

    let patch = ClientPatch {
        phone: Some("555-000-1111".to_string()),
        ..Default::default()
    };
    let updated = clients.update("CL-500", &patch).await.unwrap();
    assert_eq!(updated.phone, "555-000-1111");

    let row = repository.raw_row("CL-500").await.unwrap();
    assert_eq!(row["region"], "Pacífico");
    assert_eq!(row["name"], "Congelados Bahía");
}

#[tokio::test]
async fn added_client_shows_up_in_next_list() {
    let (_, clients) = client_store();
    let before = clients.list(None).await.unwrap();
    assert_eq!(before.len(), 3);

    let draft = ClientDraft {
        name: "Mariscos del Golfo".to_string(),
        email: "ventas@golfo.mx".to_string(),
        max_credit: 4,
        coordinates: Some(Coordinates::new(-96.1342, 19.1738)),
        ..Default::default()
    };
    let created = clients.add(&draft).await.unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.coordinates, draft.coordinates);

    let after = clients.list(None).await.unwrap();
    assert_eq!(after.len(), 4);
    assert_eq!(after[0].id, created.id);
    assert_eq!(after[0].name, "Mariscos del Golfo");
}

#[tokio::test]
async fn overlapping_reads_share_one_fetch() {
    let repository = Arc::new(
        MemoryRepository::<MaintenanceMapper>::new().with_latency(Duration::from_millis(50)),
    );
    let store = MaintenanceStore::new(repository.clone(), silent());

    let (first, second, third) = tokio::join!(store.list(None), store.list(None), store.list(None));
    assert!(first.unwrap().is_empty());
    assert!(second.unwrap().is_empty());
    assert!(third.unwrap().is_empty());
    assert_eq!(repository.fetch_count(), 1);

    store.list(None).await.unwrap();
    assert_eq!(repository.fetch_count(), 1);
}

#[tokio::test]
async fn mutations_invalidate_filtered_and_unfiltered_lists() {
    let repository = Arc::new(MemoryRepository::<RepairMapper>::new());
    let store = RepairStore::new(repository.clone(), silent());
    let by_asset = ListFilter::eq("asset_id", "CON-002");

    store.add(&repair_draft("CON-002", "REP-001")).await.unwrap();
    assert_eq!(store.list(None).await.unwrap().len(), 1);
    assert_eq!(store.list(Some(by_asset.clone())).await.unwrap().len(), 1);
    assert!(store.state(Some(&by_asset)).data().is_some());

    let second = store.add(&repair_draft("CON-002", "REP-002")).await.unwrap();
    assert!(matches!(store.state(None), QueryState::Idle));
    assert!(matches!(store.state(Some(&by_asset)), QueryState::Idle));
    assert_eq!(store.list(Some(by_asset.clone())).await.unwrap().len(), 2);

    store.delete(&second.id).await.unwrap();
    assert_eq!(store.list(Some(by_asset)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn repairs_filtered_by_asset() {
    let repository = Arc::new(MemoryRepository::<RepairMapper>::new());
    let store = RepairStore::new(repository, silent());

    store.add(&repair_draft("CON-002", "REP-010")).await.unwrap();
    store.add(&repair_draft("CON-005", "REP-011")).await.unwrap();
    store.add(&repair_draft("CON-002", "REP-012")).await.unwrap();

    let repairs = store
        .list(Some(ListFilter::eq("asset_id", "CON-005")))
        .await
        .unwrap();
    assert_eq!(repairs.len(), 1);
    assert_eq!(repairs[0].repair_number(), "REP-011");
    assert_eq!(repairs[0].status, RepairStatus::Pending);

    let none = store
        .list(Some(ListFilter::eq("asset_id", "CON-404")))
        .await
        .unwrap();
    assert!(none.is_empty());
    // an empty filtered read never seeds
    assert_eq!(store.list(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn malformed_coordinates_fail_the_read() {
    let (repository, clients) = client_store();
    repository
        .insert_raw(json!({
            "id": "CL-900",
            "name": "Roto",
            "status": "active",
            "coordinates": "[-99.1,"
        }))
        .await;

    let err = clients.list(None).await.unwrap_err();
    assert!(err.to_string().contains("coordinates"), "{}", err);
    let state = clients.state(None);
    assert!(state.error().is_some());
    assert!(state.data().is_none());
}

#[tokio::test]
async fn failed_mutation_sends_error_notification() {
    let (notifier, mut notifications) = ChannelNotifier::new();
    let repository = Arc::new(MemoryRepository::<ClientMapper>::new());
    let clients = ClientStore::new(repository.clone(), Arc::new(notifier));

    clients
        .update("CL-999", &ClientPatch::status(ClientStatus::Active))
        .await
        .unwrap_err();
    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.title, "Error");
    assert_eq!(
        notification.description,
        "No se pudo actualizar el cliente. Por favor, intenta nuevamente."
    );

    repository.set_offline(true);
    let err = clients.add(&ClientDraft::default()).await.unwrap_err();
    assert!(matches!(err, Error::UnparsedApi { .. }));
    let notification = notifications.recv().await.unwrap();
    assert_eq!(
        notification.description,
        "No se pudo añadir el cliente. Por favor, intenta nuevamente."
    );

    repository.set_offline(false);
    clients.add(&ClientDraft::default()).await.unwrap();
    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.title, "Cliente añadido");
}

#[tokio::test]
async fn offline_list_reports_failed_state() {
    let (repository, clients) = client_store();
    repository.set_offline(true);
    let err = clients.list(None).await.unwrap_err();
    assert!(matches!(err, Error::Shared(_)));
    assert!(matches!(err.root(), Error::UnparsedApi { .. }));
    assert!(clients.state(None).error().is_some());

    repository.set_offline(false);
    assert_eq!(clients.list(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn new_asset_form_gets_next_id_and_default_image() {
    let repository = Arc::new(MemoryRepository::<AssetMapper>::new());
    let assets = AssetStore::new(repository, silent());
    let existing = assets.list(None).await.unwrap();

    let form = NewAssetForm {
        model: "Polar-4000XL".to_string(),
        serial_number: "P4XL-11111".to_string(),
        temperature_range: "-18°C a -22°C".to_string(),
        ..Default::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let asset = form.into_asset(&existing, today).unwrap();
    assert_eq!(asset.id, "CON-009");
    assert_eq!(asset.image_src, DEFAULT_ASSET_IMAGE);
    assert_eq!(asset.last_maintenance, "09/03/2024");

    let created = assets.add(&asset).await.unwrap();
    assert_eq!(created.status, AssetStatus::Available);
    assert_eq!(created.location, DEFAULT_ASSET_LOCATION);

    let assigned = assets
        .update("CON-009", &AssetPatch::assign("Mariscos Sur"))
        .await
        .unwrap();
    assert_eq!(assigned.assigned_to.as_deref(), Some("Mariscos Sur"));
    assert_eq!(assets.list(None).await.unwrap().len(), 9);
}

#[tokio::test]
async fn added_maintenance_lists_back_unchanged() {
    let repository = Arc::new(MemoryRepository::<MaintenanceMapper>::new());
    let store = MaintenanceStore::new(repository, silent());

    let draft = MaintenanceDraft {
        title: "Revisión trimestral".to_string(),
        client: "Pescados Norte".to_string(),
        asset: "CON-002".to_string(),
        date: "2024-07-01".to_string(),
        status: MaintenanceStatus::Delayed,
        technician: "Luis Torres".to_string(),
        kind: Some("preventivo".to_string()),
        notes: Some("Revisar sellos".to_string()),
    };
    let created = store.add(&draft).await.unwrap();
    let listed = store.list(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].title, draft.title);
    assert_eq!(listed[0].status, MaintenanceStatus::Delayed);
    assert_eq!(listed[0].kind, draft.kind);
    assert_eq!(listed[0].notes, draft.notes);

    let completed = store
        .update(&created.id, &MaintenancePatch::status(MaintenanceStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.status, MaintenanceStatus::Completed);
    assert_eq!(completed.technician, "Luis Torres");
    assert_eq!(store.list(None).await.unwrap()[0], completed);
}

#[tokio::test]
async fn added_repair_lists_back_unchanged() {
    let repository = Arc::new(MemoryRepository::<RepairMapper>::new());
    let store = RepairStore::new(repository, silent());

    let draft = RepairDraft {
        cost: Some(980.0),
        priority: RepairPriority::Urgent,
        parts_used: vec!["compresor".to_string(), "termostato".to_string()],
        ..repair_draft("CON-005", "REP-020")
    };
    let created = store.add(&draft).await.unwrap();
    let listed = store.list(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].asset_id, "CON-005");
    assert_eq!(listed[0].repair_number(), "REP-020");
    assert_eq!(listed[0].cost, Some(980.0));
    assert_eq!(listed[0].priority, RepairPriority::Urgent);
    assert_eq!(listed[0].parts_used, draft.parts_used);
}

#[tokio::test]
async fn repair_without_status_does_not_fail_the_list() {
    let repository = Arc::new(MemoryRepository::<RepairMapper>::new());
    let store = RepairStore::new(repository.clone(), silent());
    store.add(&repair_draft("CON-002", "REP-030")).await.unwrap();
    repository
        .insert_raw(json!({ "id": 99, "asset_id": "CON-002", "status": null }))
        .await;

    let repairs = store.list(None).await.unwrap();
    assert_eq!(repairs.len(), 2);
    let legacy = repairs.iter().find(|r| r.id == "99").unwrap();
    assert_eq!(legacy.status, RepairStatus::Unrecognized(String::new()));
}
