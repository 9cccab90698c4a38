pub mod builder;
pub mod training_cycles;

use sqlx::{Executor, postgres::PgPool};
use tracing::{debug, info};

use builder::SchemaModel;
use training_cycles::TrainingCycleConfiguration;

/// Schema model holding every entity configuration of the application
pub fn schema_model() -> SchemaModel {
    let mut model = SchemaModel::new();
    model.apply::<TrainingCycleConfiguration>();
    model
}

/// Creates all tables and indexes that don't exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let model = schema_model();

    for table in model.tables() {
        pool.execute(table.create_table_sql().as_str()).await?;
        for statement in table.create_index_sql() {
            debug!(%statement, "Creating index");
            pool.execute(statement.as_str()).await?;
        }
        info!(table = %table.name, entity = %table.entity, "Table ready");
    }

    Ok(())
}
