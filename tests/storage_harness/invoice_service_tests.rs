//! Macro-generated test suite for `InvoiceService` + `CustomerService`
//! contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use dashboard::storage::InMemoryStore;
//!
//! invoice_service_tests!(InMemoryStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`
//! - `test_get_nonexistent`
//! - `test_create_with_unknown_customer`
//! - `test_update_keeps_id_and_date`
//! - `test_update_nonexistent`
//! - `test_delete_reports_removal`
//!
//! ## Search
//! - `test_search_matches_customer_fields`: name and email, case-insensitive
//! - `test_search_matches_status_and_amount`
//! - `test_search_orders_newest_first`
//! - `test_search_paginates`
//!
//! ## Other
//! - `test_summary_totals`
//! - `test_customers_sorted_by_name`
//! - `test_concurrent_creates`

/// Generate the storage conformance suite.
///
/// `$factory` must evaluate to an empty store implementing both
/// `InvoiceService` and `CustomerService`, plus `Clone + 'static`. It is
/// re-evaluated for each test.
#[macro_export]
macro_rules! invoice_service_tests {
    ($factory:expr) => {
        mod invoice_service_contract_tests {
            use super::*;
            use dashboard::core::error::StorageError;
            use dashboard::core::invoice::{InvoiceChanges, InvoiceStatus};
            use dashboard::core::service::{CustomerService, InvoiceService};
            use uuid::Uuid;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let store = $factory;
                seed_customers(&store).await;

                let invoice = test_invoice(LEE_ID, 15795, InvoiceStatus::Pending, day(2022, 12, 6));
                let created = InvoiceService::create(&store, invoice.clone()).await.unwrap();
                assert_eq!(created, invoice);

                let fetched = InvoiceService::get(&store, &invoice.id).await.unwrap().unwrap();
                assert_eq!(fetched, invoice);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                let fetched = InvoiceService::get(&store, &Uuid::new_v4()).await.unwrap();
                assert!(fetched.is_none());
            }

            #[tokio::test]
            async fn test_create_with_unknown_customer() {
                let store = $factory;
                seed_customers(&store).await;

                let invoice =
                    test_invoice(UNKNOWN_CUSTOMER_ID, 100, InvoiceStatus::Paid, day(2023, 1, 1));
                let err = InvoiceService::create(&store, invoice.clone()).await.unwrap_err();
                assert!(matches!(err, StorageError::ConstraintViolation { .. }), "{:?}", err);
                assert!(InvoiceService::get(&store, &invoice.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_update_keeps_id_and_date() {
                let store = $factory;
                seed_customers(&store).await;

                let invoice = test_invoice(LEE_ID, 500, InvoiceStatus::Pending, day(2023, 6, 9));
                InvoiceService::create(&store, invoice.clone()).await.unwrap();

                let updated = InvoiceService::update(
                    &store,
                    &invoice.id,
                    InvoiceChanges {
                        customer_id: RABBIT_ID.to_string(),
                        amount: 2000,
                        status: InvoiceStatus::Paid,
                    },
                )
                .await
                .unwrap();

                assert_eq!(updated.id, invoice.id);
                assert_eq!(updated.date, invoice.date);
                assert_eq!(updated.customer_id, RABBIT_ID);
                assert_eq!(updated.amount, 2000);
                assert_eq!(updated.status, InvoiceStatus::Paid);

                let fetched = InvoiceService::get(&store, &invoice.id).await.unwrap().unwrap();
                assert_eq!(fetched, updated);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                seed_customers(&store).await;

                let id = Uuid::new_v4();
                let err = InvoiceService::update(
                    &store,
                    &id,
                    InvoiceChanges {
                        customer_id: LEE_ID.to_string(),
                        amount: 1,
                        status: InvoiceStatus::Paid,
                    },
                )
                .await
                .unwrap_err();
                assert!(matches!(err, StorageError::NotFound { id: missing } if missing == id));
            }

            #[tokio::test]
            async fn test_delete_reports_removal() {
                let store = $factory;
                seed_customers(&store).await;

                let invoice = test_invoice(LEE_ID, 500, InvoiceStatus::Paid, day(2023, 6, 9));
                InvoiceService::create(&store, invoice.clone()).await.unwrap();

                assert!(InvoiceService::delete(&store, &invoice.id).await.unwrap());
                assert!(!InvoiceService::delete(&store, &invoice.id).await.unwrap());
                assert!(InvoiceService::get(&store, &invoice.id).await.unwrap().is_none());
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_matches_customer_fields() {
                let store = $factory;
                seed_customers(&store).await;
                InvoiceService::create(&store, test_invoice(LEE_ID, 100, InvoiceStatus::Paid, day(2023, 1, 1)))
                    .await
                    .unwrap();
                InvoiceService::create(&store, test_invoice(RABBIT_ID, 200, InvoiceStatus::Paid, day(2023, 1, 2)))
                    .await
                    .unwrap();

                let page = store.search("LEE", 1, 6).await.unwrap();
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.items[0].name, "Lee Robinson");
                assert_eq!(page.query, "LEE");

                let page = store.search("rabbit.com", 1, 6).await.unwrap();
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.items[0].email, "evil@rabbit.com");

                let page = store.search("", 1, 6).await.unwrap();
                assert_eq!(page.items.len(), 2);
            }

            #[tokio::test]
            async fn test_search_matches_status_and_amount() {
                let store = $factory;
                seed_customers(&store).await;
                InvoiceService::create(&store, test_invoice(LEE_ID, 4480, InvoiceStatus::Pending, day(2023, 3, 1)))
                    .await
                    .unwrap();
                InvoiceService::create(&store, test_invoice(LEE_ID, 34577, InvoiceStatus::Paid, day(2023, 3, 2)))
                    .await
                    .unwrap();

                let paid = store.search("paid", 1, 6).await.unwrap();
                assert_eq!(paid.items.len(), 1);
                assert_eq!(paid.items[0].status, InvoiceStatus::Paid);

                let by_amount = store.search("4480", 1, 6).await.unwrap();
                assert_eq!(by_amount.items.len(), 1);
                assert_eq!(by_amount.items[0].amount, 4480);

                let none = store.search("no such thing", 1, 6).await.unwrap();
                assert!(none.items.is_empty());
                assert_eq!(none.total_pages, 1);
            }

            #[tokio::test]
            async fn test_search_orders_newest_first() {
                let store = $factory;
                seed_customers(&store).await;
                for d in [3, 1, 2] {
                    InvoiceService::create(&store, test_invoice(LEE_ID, 100, InvoiceStatus::Paid, day(2023, 5, d)))
                        .await
                        .unwrap();
                }

                let page = store.search("", 1, 6).await.unwrap();
                let dates: Vec<_> = page.items.iter().map(|i| i.date).collect();
                assert_eq!(dates, vec![day(2023, 5, 3), day(2023, 5, 2), day(2023, 5, 1)]);
            }

            #[tokio::test]
            async fn test_search_paginates() {
                let store = $factory;
                seed_customers(&store).await;
                for d in 1..=8 {
                    InvoiceService::create(&store, test_invoice(LEE_ID, 100, InvoiceStatus::Paid, day(2023, 7, d)))
                        .await
                        .unwrap();
                }

                let first = store.search("", 1, 6).await.unwrap();
                assert_eq!(first.items.len(), 6);
                assert_eq!(first.total_pages, 2);
                assert_eq!(first.items[0].date, day(2023, 7, 8));

                let second = store.search("", 2, 6).await.unwrap();
                assert_eq!(second.items.len(), 2);
                assert_eq!(second.page, 2);
                assert_eq!(second.items[1].date, day(2023, 7, 1));

                let beyond = store.search("", 5, 6).await.unwrap();
                assert!(beyond.items.is_empty());
            }

            // ==================================================================
            // Other
            // ==================================================================

            #[tokio::test]
            async fn test_summary_totals() {
                let store = $factory;
                seed_customers(&store).await;
                for (amount, status) in [
                    (1000, InvoiceStatus::Paid),
                    (250, InvoiceStatus::Paid),
                    (999, InvoiceStatus::Pending),
                ] {
                    InvoiceService::create(&store, test_invoice(LEE_ID, amount, status, day(2023, 8, 1)))
                        .await
                        .unwrap();
                }

                let summary = store.summary().await.unwrap();
                assert_eq!(summary.invoice_count, 3);
                assert_eq!(summary.customer_count, 2);
                assert_eq!(summary.total_paid, 1250);
                assert_eq!(summary.total_pending, 999);
            }

            #[tokio::test]
            async fn test_customers_sorted_by_name() {
                let store = $factory;
                seed_customers(&store).await;

                let names: Vec<_> = CustomerService::list(&store)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|c| c.name)
                    .collect();
                assert_eq!(names, vec!["Evil Rabbit", "Lee Robinson"]);

                let lee = CustomerService::get(&store, LEE_ID).await.unwrap().unwrap();
                assert_eq!(lee.email, "lee@robinson.com");
            }

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = $factory;
                seed_customers(&store).await;

                let mut handles = Vec::new();
                for d in 1..=5 {
                    let s = store.clone();
                    handles.push(tokio::spawn(async move {
                        InvoiceService::create(&s, test_invoice(RABBIT_ID, 100, InvoiceStatus::Pending, day(2023, 9, d)))
                            .await
                            .unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                assert_eq!(store.summary().await.unwrap().invoice_count, 5);
            }
        }
    };
}
