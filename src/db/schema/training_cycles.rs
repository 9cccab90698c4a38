use super::builder::{ColumnType, EntityBuilder, EntityConfiguration};

pub const TABLE: &str = "training_cycles";

/// Maps `TrainingCycle` onto `training_cycles`.
///
/// A user can't have two cycles with the same number, and the rounding factor
/// is stored as `NUMERIC(4, 2)`.
pub struct TrainingCycleConfiguration;

impl EntityConfiguration for TrainingCycleConfiguration {
    const ENTITY: &'static str = "TrainingCycle";

    fn configure(builder: &mut EntityBuilder) {
        builder.table_name(TABLE);

        builder.has_key("id");
        builder.property("user_id", ColumnType::Integer);
        builder.property("cycle_number", ColumnType::Integer);
        builder
            .property("rounding_factor", ColumnType::Numeric(None))
            .has_precision(4, 2);
        builder
            .property("created_at", ColumnType::Timestamptz)
            .has_default_sql("now()");

        builder.has_index(&["user_id", "cycle_number"]).is_unique();
    }
}
