use set_stats::db::schema::builder::{ColumnType, EntityConfiguration, SchemaModel};
use set_stats::db::schema::schema_model;
use set_stats::db::schema::training_cycles::TrainingCycleConfiguration;

const EXPECTED_DDL: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS training_cycles (\n    id SERIAL PRIMARY KEY,\n    user_id INTEGER NOT NULL,\n    cycle_number INTEGER NOT NULL,\n    rounding_factor NUMERIC(4, 2) NOT NULL,\n    created_at TIMESTAMPTZ NOT NULL DEFAULT now()\n);",
    "CREATE UNIQUE INDEX IF NOT EXISTS ix_training_cycles_user_id_cycle_number ON training_cycles (user_id, cycle_number);",
];

#[test]
fn table_name_is_independent_of_entity_name() {
    let model = schema_model();

    assert_eq!(TrainingCycleConfiguration::ENTITY, "TrainingCycle");
    assert!(model.table("TrainingCycle").is_none());

    let table = model
        .table_for_entity("TrainingCycle")
        .expect("TrainingCycle is mapped");
    assert_eq!(table.name, "training_cycles");
}

#[test]
fn user_and_cycle_number_are_unique_together() {
    let model = schema_model();
    let table = model.table("training_cycles").expect("table exists");

    assert_eq!(table.indexes.len(), 1);
    let index = &table.indexes[0];
    assert!(index.unique);
    assert_eq!(index.columns, vec!["user_id", "cycle_number"]);
    assert_eq!(index.name(&table.name), "ix_training_cycles_user_id_cycle_number");
}

#[test]
fn rounding_factor_has_precision_four_scale_two() {
    let model = schema_model();
    let table = model.table("training_cycles").expect("table exists");

    let column = table.column("rounding_factor").expect("column exists");
    assert_eq!(column.ty, ColumnType::Numeric(Some((4, 2))));
    assert!(column.required);
}

#[test]
fn generated_ddl() {
    assert_eq!(schema_model().ddl_statements(), EXPECTED_DDL);
}

#[test]
fn applying_twice_yields_identical_schema() {
    let mut once = SchemaModel::new();
    once.apply::<TrainingCycleConfiguration>();

    let mut twice = SchemaModel::new();
    twice
        .apply::<TrainingCycleConfiguration>()
        .apply::<TrainingCycleConfiguration>();

    assert_eq!(once, twice);
    assert_eq!(once.ddl_statements(), twice.ddl_statements());
    assert_eq!(twice.tables().count(), 1);
}
