use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};
use uuid::Uuid;
use wholesale_marketplace_api::{
    entity::products::Entity as Products,
    models::retail_price,
    routes::params::{
        DEFAULT_LIMIT, DEFAULT_PRODUCT_LIMIT, MAX_LIMIT, Pagination, ProductQuery, ProductSort,
    },
    services::{
        favorite_service::favorites_of,
        product_service::{apply_sort, filter_condition},
    },
};

fn sql_for(query: &ProductQuery) -> String {
    Products::find()
        .filter(filter_condition(query))
        .build(DbBackend::Postgres)
        .to_string()
}

#[test]
fn pagination_defaults_and_clamping() {
    assert_eq!(Pagination::default().normalize(), (1, DEFAULT_LIMIT, 0));
    assert_eq!(Pagination::new(Some(3), Some(10)).normalize(), (3, 10, 20));
    assert_eq!(Pagination::new(Some(0), Some(0)).normalize(), (1, 1, 0));
    assert_eq!(
        Pagination::new(Some(2), Some(10_000)).normalize(),
        (2, MAX_LIMIT, MAX_LIMIT)
    );
}

#[test]
fn huge_page_saturates_the_offset() {
    let query = ProductQuery {
        page: Some(i64::MAX),
        limit: Some(50),
        ..Default::default()
    };
    let (page, limit, offset) = query.pagination();
    assert_eq!(page, i64::MAX);
    assert_eq!(limit, 50);
    assert_eq!(offset, i64::MAX);

    let (_, _, offset) = Pagination::new(Some(i64::MAX), Some(MAX_LIMIT)).normalize();
    assert_eq!(offset, i64::MAX);
}

#[test]
fn product_query_uses_catalog_page_size() {
    let query = ProductQuery::default();
    assert_eq!(query.pagination(), (1, DEFAULT_PRODUCT_LIMIT, 0));
}

#[test]
fn price_range_must_be_ordered_and_non_negative() {
    let ok = ProductQuery {
        min_price: Some(100),
        max_price: Some(200),
        ..Default::default()
    };
    assert!(ok.validate_price_range().is_ok());

    let equal = ProductQuery {
        min_price: Some(150),
        max_price: Some(150),
        ..Default::default()
    };
    assert!(equal.validate_price_range().is_ok());

    let inverted = ProductQuery {
        min_price: Some(300),
        max_price: Some(200),
        ..Default::default()
    };
    assert!(inverted.validate_price_range().is_err());

    let negative = ProductQuery {
        min_price: Some(-1),
        ..Default::default()
    };
    assert!(negative.validate_price_range().is_err());
}

#[test]
fn empty_query_has_no_filters() {
    let sql = sql_for(&ProductQuery::default());
    assert!(!sql.contains("WHERE"), "unexpected filter in {sql}");
}

#[test]
fn price_bounds_are_inclusive() {
    let sql = sql_for(&ProductQuery {
        min_price: Some(100),
        max_price: Some(200),
        ..Default::default()
    });
    assert!(sql.contains(r#""products"."price" >= 100"#), "{sql}");
    assert!(sql.contains(r#""products"."price" <= 200"#), "{sql}");
}

#[test]
fn category_is_an_exact_match() {
    let sql = sql_for(&ProductQuery {
        category: Some("grocery".into()),
        ..Default::default()
    });
    assert!(sql.contains(r#""products"."category" = 'grocery'"#), "{sql}");
}

#[test]
fn search_is_case_insensitive_over_name_and_description() {
    let sql = sql_for(&ProductQuery {
        q: Some("  rice ".into()),
        ..Default::default()
    });
    assert!(sql.contains(r#""products"."name" ILIKE '%rice%'"#), "{sql}");
    assert!(sql.contains(r#""products"."description" ILIKE '%rice%'"#), "{sql}");
    assert!(sql.contains(" OR "), "{sql}");
}

#[test]
fn blank_filters_are_ignored() {
    let sql = sql_for(&ProductQuery {
        category: Some(String::new()),
        q: Some("   ".into()),
        ..Default::default()
    });
    assert!(!sql.contains("WHERE"), "unexpected filter in {sql}");
}

#[test]
fn retail_price_applies_margin() {
    assert_eq!(retail_price(500, 20.0), 600.0);
    assert_eq!(retail_price(1000, 0.0), 1000.0);
    assert_eq!(retail_price(250, 10.0), 275.0);
}

fn order_clause(sort: ProductSort) -> String {
    let sql = apply_sort(Products::find(), sort)
        .build(DbBackend::Postgres)
        .to_string();
    let start = sql.find("ORDER BY").expect("order by clause");
    sql[start..].to_string()
}

#[test]
fn sort_orders_break_ties_by_id() {
    assert_eq!(
        order_clause(ProductSort::Newest),
        r#"ORDER BY "products"."created_at" DESC, "products"."id" ASC"#
    );
    assert_eq!(
        order_clause(ProductSort::Oldest),
        r#"ORDER BY "products"."created_at" ASC, "products"."id" ASC"#
    );
    assert_eq!(
        order_clause(ProductSort::PriceLow),
        r#"ORDER BY "products"."price" ASC, "products"."id" ASC"#
    );
    assert_eq!(
        order_clause(ProductSort::PriceHigh),
        r#"ORDER BY "products"."price" DESC, "products"."id" ASC"#
    );
}

#[test]
fn sort_defaults_to_newest() {
    assert_eq!(ProductSort::default(), ProductSort::Newest);
}

#[test]
fn favourites_listing_is_newest_first_with_id_tie_break() {
    let sql = favorites_of(Uuid::nil())
        .build(DbBackend::Postgres)
        .to_string();
    assert!(
        sql.ends_with(r#"ORDER BY "favorites"."created_at" DESC, "favorites"."id" ASC"#),
        "{sql}"
    );
    assert!(sql.contains(r#""favorites"."user_id" = '00000000-0000-0000-0000-000000000000'"#), "{sql}");
}
