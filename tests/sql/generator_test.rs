//! Integration tests for the SQL generator.

use std::sync::Arc;

use insta::assert_snapshot;
use stargen::model::{AggregateFunction, Database, Table};
use stargen::sql::{validate_sql, SqlGenerator};

struct Tables {
    sales: Arc<Table>,
    franchise: Arc<Table>,
    store: Arc<Table>,
}

fn tables() -> Tables {
    let mut db = Database::new("StarDB");
    db.add_table(Table::new("FactSales"));
    db.add_table(Table::new("DimFranchise").with_primary_key("id"));
    db.add_table(Table::new("DimStore").with_primary_key("id"));
    db.add_foreign_key("FactSales", "FranchiseId", "DimFranchise").unwrap();
    db.add_foreign_key("FactSales", "StoreId", "DimStore").unwrap();

    let get = |name: &str| Arc::clone(db.table(name).unwrap());
    Tables {
        sales: get("FactSales"),
        franchise: get("DimFranchise"),
        store: get("DimStore"),
    }
}

#[test]
fn test_single_table() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_select("Quantity", &t.sales);

    assert_snapshot!(generator.sql().unwrap(), @r"
select
    FactSales.Quantity
from FactSales
");
}

#[test]
fn test_one_dimension_joins_through_fact() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_table(&t.sales);
    generator.add_select("FranchiseName", &t.franchise);

    assert_snapshot!(generator.sql().unwrap(), @r"
select
    DimFranchise.FranchiseName
from FactSales
join DimFranchise on DimFranchise.id = FactSales.FranchiseId
");
}

#[test]
fn test_two_dimensions_join_in_registration_order() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_table(&t.sales);
    generator.add_select("StoreName", &t.store);
    generator.add_select("FranchiseName", &t.franchise);

    let sql = generator.sql().unwrap();
    assert!(sql.ends_with(
        "from FactSales\n\
         join DimStore on DimStore.id = FactSales.StoreId\n\
         join DimFranchise on DimFranchise.id = FactSales.FranchiseId"
    ));
}

#[test]
fn test_aggregate_with_dimension_groups_by_column() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_table(&t.sales);
    generator.add_select_as("StoreName", &t.store, "Store");
    generator.add_aggregate_as(AggregateFunction::Sum, "Quantity", &t.sales, "Units");

    assert_snapshot!(generator.sql().unwrap(), @r#"
select
    DimStore.StoreName as "Store",
    sum(FactSales.Quantity) as "Units"
from FactSales
join DimStore on DimStore.id = FactSales.StoreId
group by
    DimStore.StoreName
"#);
}

#[test]
fn test_no_group_by_without_aggregate() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_table(&t.sales);
    generator.add_select("StoreName", &t.store);

    assert!(!generator.sql().unwrap().contains("group by"));

    generator.set_force_group_by(true);
    assert!(generator.sql().unwrap().ends_with("\ngroup by\n    DimStore.StoreName"));
}

#[test]
fn test_no_group_by_with_only_aggregates() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.set_force_group_by(true);
    generator.add_aggregate("count", "id", &t.store);
    generator.add_aggregate("max", "Quantity", &t.sales);

    assert_eq!(
        generator.sql().unwrap(),
        "select\n    count(DimStore.id),\n    max(FactSales.Quantity)\nfrom DimStore"
    );
}

#[test]
fn test_group_by_keeps_plain_items_in_order() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_table(&t.sales);
    generator.add_select_as("StoreName", &t.store, "Store");
    generator.add_aggregate("sum", "Quantity", &t.sales);
    generator.add_select_as("FranchiseName", &t.franchise, "Franchise");

    let sql = generator.sql().unwrap();
    let group_by = sql.split("group by\n").nth(1).unwrap();
    assert_eq!(group_by, "    DimStore.StoreName,\n    DimFranchise.FranchiseName");
}

#[test]
fn test_case_sensitive_quotes_identifiers_only() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_table(&t.sales);
    generator.add_select_as("StoreName", &t.store, "Store Name");
    generator.add_aggregate_as("sum", "Quantity", &t.sales, "Units");

    let plain = generator.sql().unwrap();
    generator.set_case_sensitive(true);
    let quoted = generator.sql().unwrap();

    let unquoted = ["DimStore", "FactSales", "StoreName", "Quantity", "StoreId", "id"]
        .iter()
        .fold(quoted.clone(), |sql, ident| {
            sql.replace(&format!("\"{}\"", ident), ident)
        });
    assert_eq!(unquoted, plain);

    assert_snapshot!(quoted, @r#"
select
    "DimStore"."StoreName" as "Store Name",
    sum("FactSales"."Quantity") as "Units"
from "FactSales"
join "DimStore" on "DimStore"."id" = "FactSales"."StoreId"
group by
    "DimStore"."StoreName"
"#);
}

#[test]
fn test_alias_quote_is_escaped() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_select_as("StoreName", &t.store, "The \"Best\" Store");

    assert_eq!(
        generator.sql().unwrap(),
        "select\n    DimStore.StoreName as \"The \"\"Best\"\" Store\"\nfrom DimStore"
    );
}

#[test]
fn test_join_only_from_root_table() {
    let mut db = Database::new("StarDB");
    db.add_table(Table::new("FactSales"));
    db.add_table(Table::new("DimStore").with_primary_key("id"));
    db.add_table(Table::new("DimRegion").with_primary_key("id"));
    db.add_foreign_key("FactSales", "StoreId", "DimStore").unwrap();
    db.add_foreign_key("DimStore", "RegionId", "DimRegion").unwrap();

    let sales = db.table("FactSales").unwrap();
    let store = db.table("DimStore").unwrap();
    let region = db.table("DimRegion").unwrap();

    let mut generator = SqlGenerator::new();
    generator.add_table(sales);
    generator.add_select("StoreName", store);
    generator.add_select("RegionName", region);

    // DimRegion is only reachable through DimStore, so it gets no join.
    assert_snapshot!(generator.sql().unwrap(), @r"
select
    DimStore.StoreName,
    DimRegion.RegionName
from FactSales
join DimStore on DimStore.id = FactSales.StoreId
");
}

#[test]
fn test_root_is_first_table_added() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_select("StoreName", &t.store);
    generator.add_table(&t.sales);

    // The fact table is not the root here, so no joins can be derived.
    assert_eq!(
        generator.sql().unwrap(),
        "select\n    DimStore.StoreName\nfrom DimStore"
    );
}

#[test]
fn test_generated_sql_parses() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.set_case_sensitive(true);
    generator.add_table(&t.sales);
    generator.add_select_as("FranchiseName", &t.franchise, "Franchise Name");
    generator.add_select_as("StoreName", &t.store, "Store Name");
    generator.add_aggregate_as("avg", "UnitPrice", &t.sales, "Average Price");

    validate_sql(&generator.sql().unwrap()).unwrap();
}

#[test]
fn test_keys_declared_before_attaching_still_join() {
    let store = Table::new("DimStore").with_primary_key("id");
    let mut sales = Table::new("FactSales");
    sales.add_foreign_key("StoreId", &store);

    let mut db = Database::new("StarDB");
    let sales = db.add_table(sales);
    let store = db.add_table(store);

    let mut generator = SqlGenerator::new();
    generator.add_table(&sales);
    generator.add_select("StoreName", &store);
    generator.add_aggregate("sum", "Quantity", &sales);

    assert_snapshot!(generator.sql().unwrap(), @r"
select
    DimStore.StoreName,
    sum(FactSales.Quantity)
from FactSales
join DimStore on DimStore.id = FactSales.StoreId
group by
    DimStore.StoreName
");
}

#[test]
fn test_function_spelling_is_rendered_as_given() {
    let t = tables();
    let mut generator = SqlGenerator::new();
    generator.add_aggregate_as("SUM", "Quantity", &t.sales, "S");
    generator.add_aggregate_as("average", "Quantity", &t.sales, "A");

    assert_eq!(
        generator.sql().unwrap(),
        "select\n    SUM(FactSales.Quantity) as \"S\",\n    \
         average(FactSales.Quantity) as \"A\"\nfrom FactSales"
    );
}
