use std::error::Error;
use txns::{model::Type, ColumnType, Frame, OnConflict, TableSchema};
use txns_sql::{
    sql::StatementBuilder, Session, UpsertRequest, Upserted, UpserterFactory,
};
use uuid::Uuid;

pub type Person = (i64, String, i64);

pub const CREATE_PEOPLE: &str =
    "CREATE TABLE people (id BIGINT PRIMARY KEY, name VARCHAR NOT NULL, age BIGINT)";

pub fn people_schema() -> TableSchema {
    TableSchema::new("people")
        .key("id", ColumnType::Int)
        .column("name", ColumnType::Text)
        .column("age", ColumnType::Int)
}

pub fn people(rows: &[(i64, &str, i64)]) -> Frame {
    let mut frame = Frame::new(["id", "name", "age"]).expect("valid columns");

    for (id, name, age) in rows {
        frame
            .push(vec![(*id).into(), (*name).into(), (*age).into()])
            .expect("valid row");
    }

    frame
}

pub fn person(id: i64, name: &str, age: i64) -> Person {
    (id, name.to_owned(), age)
}

pub fn checking(name: &str) -> Type {
    Type {
        id: Uuid::new_v4(),
        name: name.into(),
        tags: vec!["bank".into(), "daily".into()],
        description: format!("{name} accounts"),
        discriminator: "assets".into(),
        active: true,
        deleted_at: None,
    }
}

pub async fn run(session: &mut dyn Session, sql: &str) -> Result<(), Box<dyn Error>> {
    session.execute(&StatementBuilder::new(sql).build()).await?;
    session.commit().await?;
    Ok(())
}

pub async fn upsert_people(
    session: &mut dyn Session,
    rows: &[(i64, &str, i64)],
    on_conflict: OnConflict,
) -> Result<Upserted, Box<dyn Error>> {
    upsert_people_in_batches(session, rows, on_conflict, txns_sql::DEFAULT_BATCH_SIZE).await
}

pub async fn upsert_people_in_batches(
    session: &mut dyn Session,
    rows: &[(i64, &str, i64)],
    on_conflict: OnConflict,
    batch_size: usize,
) -> Result<Upserted, Box<dyn Error>> {
    let schema = people_schema();
    let frame = people(rows);
    let pks = schema.primary_key();
    let request = UpsertRequest::new(&schema, &pks, &frame)
        .on_conflict(on_conflict)
        .batch_size(batch_size);
    let factory = UpserterFactory::default();
    let upserter = factory.get_upserter(&*session)?;

    Ok(upserter.upsert(session, &request).await?)
}
