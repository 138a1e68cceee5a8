use bigdecimal::BigDecimal;
use std::str::FromStr;
use tally_sales_model::{Customer, Sale, SaleItem};
use tally_sales_query::{fetch_sales_page, PageRequest, QueryErrorCode, QueryLimits};
use tally_sales_store::{MemorySaleStore, SaleStore};

fn sale(location: &str, quantity: i64) -> Sale {
    Sale {
        sale_date: "2024-05-20T08:15:00Z".parse().expect("timestamp"),
        items: vec![SaleItem {
            name: "envelopes".to_string(),
            tags: Vec::new(),
            price: BigDecimal::from_str("8.05").expect("decimal"),
            quantity,
        }],
        store_location: location.to_string(),
        customer: Customer {
            gender: "M".to_string(),
            age: 51,
            email: "contract@example.com".to_string(),
            satisfaction: 2,
        },
        coupon_used: true,
        purchase_method: "In store".to_string(),
    }
}

/// Every (page, perPage) combination inside bounds returns a page no
/// longer than perPage whose first record sits exactly `(page-1)*perPage`
/// records into the collection.
#[tokio::test]
async fn every_valid_page_respects_skip_and_limit() {
    let store = MemorySaleStore::default();
    // quantity doubles as a sequence number so skips are observable
    for i in 0..37 {
        store.insert(sale("NYC", i)).await.expect("seed insert");
    }
    let limits = QueryLimits::default();

    for per_page in [1_u64, 3, 7, 37, 100] {
        let total_pages = 37_u64.div_ceil(per_page);
        for page in 1..=total_pages {
            let result = fetch_sales_page(
                &store,
                &PageRequest {
                    page,
                    per_page,
                    store_location: None,
                },
                &limits,
            )
            .await
            .expect("in-bounds page");
            assert!(result.data.len() as u64 <= per_page);
            assert_eq!(result.total_records, 37);
            assert_eq!(result.total_pages, total_pages);
            assert_eq!(result.current_page, page);
            let skip = (page - 1) * per_page;
            assert_eq!(
                result.data[0].sale.items[0].quantity, skip as i64,
                "page {page} perPage {per_page} skips exactly {skip}"
            );
        }

        let past = fetch_sales_page(
            &store,
            &PageRequest {
                page: total_pages + 1,
                per_page,
                store_location: None,
            },
            &limits,
        )
        .await
        .expect_err("past the end");
        assert_eq!(past.code, QueryErrorCode::InvalidPage);
    }
}

#[tokio::test]
async fn per_page_101_is_rejected_at_any_page() {
    let store = MemorySaleStore::default();
    for i in 0..205 {
        store.insert(sale("NYC", i)).await.expect("seed insert");
    }
    for page in [1_u64, 2] {
        let err = fetch_sales_page(
            &store,
            &PageRequest {
                page,
                per_page: 101,
                store_location: None,
            },
            &QueryLimits::default(),
        )
        .await
        .expect_err("over the cap");
        assert_eq!(err.code, QueryErrorCode::PerPageTooLarge);
    }
}

#[tokio::test]
async fn planner_never_writes_to_the_store() {
    let store = MemorySaleStore::default();
    for i in 0..9 {
        store.insert(sale("NYC", i)).await.expect("seed insert");
    }
    let before = store.rows.lock().await.clone();
    let _ = fetch_sales_page(
        &store,
        &PageRequest {
            page: 2,
            per_page: 4,
            store_location: Some("NYC".to_string()),
        },
        &QueryLimits::default(),
    )
    .await
    .expect("page");
    let after = store.rows.lock().await.clone();
    assert_eq!(before, after);
}
