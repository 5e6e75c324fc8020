//! Integration tests for the sea-orm stores against SQLite.

#![cfg(all(feature = "sqlite", feature = "migrate"))]

use std::sync::Arc;

use chrono::NaiveDate;
use odoo_mirror::connect_and_migrate;
use odoo_mirror::entity::contact::ContactFields;
use odoo_mirror::entity::invoice::InvoiceFields;
use odoo_mirror::store::{ContactStore, EntityStore, InvoiceStore, Pagination};

async fn setup_db() -> Arc<sea_orm::DatabaseConnection> {
    Arc::new(
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate"),
    )
}

fn contact(odoo_id: i64, name: &str) -> ContactFields {
    ContactFields {
        odoo_id,
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        phone: None,
        street: None,
        city: Some("Brussels".to_string()),
        country: Some("Belgium".to_string()),
    }
}

fn invoice(odoo_id: i64, partner_id: i64) -> InvoiceFields {
    InvoiceFields {
        odoo_id,
        invoice_number: format!("INV/2026/{odoo_id:05}"),
        partner_id,
        partner_name: Some("Deco Addict".to_string()),
        invoice_date: NaiveDate::from_ymd_opt(2026, 1, odoo_id as u32 % 28 + 1),
        due_date: None,
        amount_total: 100.0 * odoo_id as f64,
        state: "posted".to_string(),
    }
}

#[tokio::test]
async fn create_assigns_identity_and_timestamps() {
    let store = ContactStore::new(setup_db().await);

    let created = store.create(contact(7, "Azure")).await.unwrap();

    assert_eq!(created.odoo_id, 7);
    assert!(!created.is_deleted);
    assert_eq!(created.created_at, created.updated_at);
    let found = store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.odoo_id, 7);
    assert_eq!(found.email.as_deref(), Some("azure@example.com"));
}

#[tokio::test]
async fn duplicate_odoo_id_is_rejected() {
    let store = ContactStore::new(setup_db().await);

    store.create(contact(1, "A")).await.unwrap();
    let err = store.create(contact(1, "B")).await;

    assert!(err.is_err(), "unique odoo_id index should reject duplicates");
}

#[tokio::test]
async fn update_overwrites_fields_and_keeps_identity() {
    let store = ContactStore::new(setup_db().await);
    let created = store.create(contact(1, "Old")).await.unwrap();

    let mut fields = contact(1, "New");
    fields.city = None;
    let updated = store.update(&created, fields).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.name, "New");
    assert_eq!(updated.city, None);
    assert_eq!(updated.country.as_deref(), Some("Belgium"));
}

#[tokio::test]
async fn soft_delete_hides_from_external_ids_but_not_lookup() {
    let store = ContactStore::new(setup_db().await);
    let a = store.create(contact(1, "A")).await.unwrap();
    store.create(contact(2, "B")).await.unwrap();

    let deleted = store.soft_delete(&a).await.unwrap();

    assert!(deleted.is_deleted);
    let ids = store.all_external_ids().await.unwrap();
    assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![2]);
    let found = store.get_by_external_id(1).await.unwrap().unwrap();
    assert!(found.is_deleted);
    assert_eq!(store.count(false).await.unwrap(), 1);
    assert_eq!(store.count(true).await.unwrap(), 2);
}

#[tokio::test]
async fn update_revives_soft_deleted_row() {
    let store = ContactStore::new(setup_db().await);
    let a = store.create(contact(1, "A")).await.unwrap();
    let deleted = store.soft_delete(&a).await.unwrap();

    let revived = store.update(&deleted, contact(1, "A")).await.unwrap();

    assert!(!revived.is_deleted);
    assert!(store.all_external_ids().await.unwrap().contains(&1));
}

#[tokio::test]
async fn list_paginates_and_filters_deleted() {
    let store = ContactStore::new(setup_db().await);
    for (id, name) in [(1, "Charlie"), (2, "Alice"), (3, "Bob")] {
        store.create(contact(id, name)).await.unwrap();
    }
    let bob = store.get_by_external_id(3).await.unwrap().unwrap();
    store.soft_delete(&bob).await.unwrap();

    let page = store.list(false, Pagination::new(0, 1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items[0].name, "Alice");
    assert!(page.has_next_page());

    let all = store.list(true, Pagination::new(0, 10)).await.unwrap();
    let names: Vec<_> = all.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
}

#[tokio::test]
async fn hard_delete_removes_the_row() {
    let store = ContactStore::new(setup_db().await);
    let a = store.create(contact(1, "A")).await.unwrap();

    assert_eq!(store.delete(a.id).await.unwrap(), 1);
    assert_eq!(store.delete(a.id).await.unwrap(), 0);
    assert!(store.get_by_external_id(1).await.unwrap().is_none());
}

#[tokio::test]
async fn invoice_store_round_trips_dates_and_amounts() {
    let store = InvoiceStore::new(setup_db().await);

    let created = store.create(invoice(4, 3)).await.unwrap();
    store.create(invoice(5, 3)).await.unwrap();
    store.create(invoice(6, 8)).await.unwrap();

    assert_eq!(created.invoice_date, NaiveDate::from_ymd_opt(2026, 1, 5));
    assert_eq!(created.amount_total, 400.0);
    assert!(!created.has_placeholder_number());

    let for_partner = store.find_by_partner(3).await.unwrap();
    assert_eq!(
        for_partner.iter().map(|i| i.odoo_id).collect::<Vec<_>>(),
        vec![4, 5]
    );

    let page = store.list(false, Pagination::default()).await.unwrap();
    assert_eq!(
        page.items.iter().map(|i| i.odoo_id).collect::<Vec<_>>(),
        vec![6, 5, 4]
    );
}
