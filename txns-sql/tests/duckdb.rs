mod common;

use common::{
    scenario::{self, person, Person},
    TestResult,
};
use duckdb::Connection;
use txns::{model::Type, OnConflict, Value};
use txns_sql::{
    duckdb::DuckDbSession, repository::SqlRepository, service::SqlService, Session, SqlConnector,
    UpsertPath,
};

const CREATE_TYPES: &str = "CREATE SCHEMA papita_transactions;
CREATE TABLE papita_transactions.types (
    id UUID PRIMARY KEY,
    name VARCHAR NOT NULL,
    tags VARCHAR[] NOT NULL,
    description VARCHAR NOT NULL,
    discriminator VARCHAR NOT NULL,
    active BOOLEAN NOT NULL,
    deleted_at TIMESTAMP
);";

fn session() -> Result<DuckDbSession, duckdb::Error> {
    Ok(DuckDbSession::new(Connection::open_in_memory()?))
}

fn people_in(conn: &Connection) -> Result<Vec<Person>, duckdb::Error> {
    let mut select = conn.prepare("SELECT id, name, age FROM people ORDER BY id")?;
    let rows = select.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;

    rows.collect()
}

#[tokio::test]
async fn upsert_should_skip_existing_rows_with_nothing_policy() -> TestResult {
    // arrange
    let mut session = session()?;
    let rows = [(1, "Alice", 25), (2, "Bob", 30), (3, "Carol", 35)];

    scenario::run(&mut session, scenario::CREATE_PEOPLE).await?;
    let first = scenario::upsert_people(&mut session, &rows, OnConflict::Nothing).await?;

    // act
    let second = scenario::upsert_people(
        &mut session,
        &[(2, "Bobby", 31), (3, "Caroline", 36), (4, "Dan", 40)],
        OnConflict::Nothing,
    )
    .await?;

    // assert
    assert_eq!(first.rows(), 3);
    assert!(second.rows() > 0);
    assert_eq!(second.path(), &UpsertPath::Bulk);
    assert_eq!(
        people_in(session.connection())?,
        vec![
            person(1, "Alice", 25),
            person(2, "Bob", 30),
            person(3, "Carol", 35),
            person(4, "Dan", 40),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn upsert_should_overwrite_existing_rows_with_update_policy() -> TestResult {
    // arrange
    let mut session = session()?;
    let rows = [(1, "Alice", 25), (2, "Bob", 30), (3, "Carol", 35)];

    scenario::run(&mut session, scenario::CREATE_PEOPLE).await?;
    scenario::upsert_people(&mut session, &rows, OnConflict::Nothing).await?;

    // act
    scenario::upsert_people(
        &mut session,
        &[(2, "Bobby", 31), (3, "Caroline", 36), (4, "Dan", 40)],
        OnConflict::Update,
    )
    .await?;

    // assert
    assert_eq!(
        people_in(session.connection())?,
        vec![
            person(1, "Alice", 25),
            person(2, "Bobby", 31),
            person(3, "Caroline", 36),
            person(4, "Dan", 40),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn upsert_should_be_idempotent_with_nothing_policy() -> TestResult {
    // arrange
    let mut session = session()?;
    let rows = [(1, "Alice", 25), (2, "Bob", 30)];

    scenario::run(&mut session, scenario::CREATE_PEOPLE).await?;
    scenario::upsert_people(&mut session, &rows, OnConflict::Nothing).await?;

    // act
    scenario::upsert_people(&mut session, &rows, OnConflict::Nothing).await?;

    // assert
    assert_eq!(people_in(session.connection())?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn upsert_should_fall_back_to_batches_when_statement_fails() -> TestResult {
    // arrange
    let mut session = session()?;

    scenario::run(&mut session, scenario::CREATE_PEOPLE).await?;

    // act
    let upserted = scenario::upsert_people_in_batches(
        &mut session,
        &[(1, "Alice", 25), (1, "Alicia", 26)],
        OnConflict::Update,
        1,
    )
    .await?;

    // assert
    assert!(matches!(
        upserted.path(),
        UpsertPath::Batched { batches: 2, .. }
    ));
    assert_eq!(
        people_in(session.connection())?,
        vec![person(1, "Alicia", 26)]
    );
    Ok(())
}

#[tokio::test]
async fn connector_should_store_database_in_directory() -> TestResult {
    // arrange
    let dir = std::env::temp_dir().join(format!("txns-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir)?;
    let connector = SqlConnector::builder().url(dir.display().to_string()).build()?;
    let mut session = connector.session().await?;

    scenario::run(&mut *session, scenario::CREATE_PEOPLE).await?;

    // act
    scenario::upsert_people(&mut *session, &[(7, "Grace", 85)], OnConflict::Nothing).await?;
    drop(session);
    drop(connector);

    // assert
    let conn = Connection::open(dir.join("store.duckdb"))?;
    assert_eq!(people_in(&conn)?, vec![person(7, "Grace", 85)]);
    drop(conn);
    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn connector_should_share_in_memory_database_between_sessions() -> TestResult {
    // arrange
    let connector = SqlConnector::builder().url(":memory:").build()?;
    let mut writer = connector.session().await?;
    let mut reader = connector.session().await?;

    scenario::run(&mut *writer, scenario::CREATE_PEOPLE).await?;
    scenario::upsert_people(&mut *writer, &[(1, "Alice", 25)], OnConflict::Nothing).await?;

    // act
    let upserted =
        scenario::upsert_people(&mut *reader, &[(1, "Alice", 25)], OnConflict::Update).await?;

    // assert
    assert_eq!(connector.dialect(), "duckdb");
    assert_eq!(reader.dialect(), "duckdb");
    assert_eq!(upserted.path(), &UpsertPath::Bulk);
    Ok(())
}

#[tokio::test]
async fn service_should_upsert_and_delete_models() -> TestResult {
    // arrange
    let mut session = session()?;
    let service = SqlService::builder(SqlRepository::mapped::<Type>()).build()?;
    let types = vec![scenario::checking("checking"), scenario::checking("savings")];

    session.connection().execute_batch(CREATE_TYPES)?;

    // act
    let upserted = service.upsert_records(&mut session, &types).await?;
    let soft = service
        .delete(&mut session, &[Value::Uuid(types[0].id)], false)
        .await?;
    let hard = service
        .delete(&mut session, &[Value::Uuid(types[1].id)], true)
        .await?;

    // assert
    let (count, inactive): (i64, i64) = session.connection().query_row(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT active AND deleted_at IS NOT NULL)
         FROM papita_transactions.types",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    assert_eq!(upserted.rows(), 2);
    assert_eq!((soft, hard), (1, 1));
    assert_eq!((count, inactive), (1, 1));
    Ok(())
}

#[tokio::test]
async fn service_should_reject_invalid_models_before_writing() -> TestResult {
    // arrange
    let mut session = session()?;
    let service = SqlService::builder(SqlRepository::mapped::<Type>()).build()?;
    let mut invalid = scenario::checking("loans");

    invalid.name.clear();

    // act
    let result = service.upsert_records(&mut session, &[invalid]).await;

    // assert
    assert!(matches!(
        result,
        Err(txns_sql::service::ServiceError::Invalid { index: 0, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn service_should_accept_reload_of_same_frame() -> TestResult {
    // arrange
    let mut session = session()?;
    let service = SqlService::builder(SqlRepository::mapped::<Type>()).build()?;
    let types = vec![scenario::checking("checking"), scenario::checking("savings")];

    session.connection().execute_batch(CREATE_TYPES)?;
    service.upsert_records(&mut session, &types).await?;

    // act
    let reloaded = service.upsert_records(&mut session, &types).await?;

    // assert
    let count: i64 = session.connection().query_row(
        "SELECT COUNT(*) FROM papita_transactions.types",
        [],
        |row| row.get(0),
    )?;

    assert_eq!(reloaded.rows(), 2);
    assert_eq!(reloaded.path(), &UpsertPath::Bulk);
    assert_eq!(count, 2);
    Ok(())
}

#[tokio::test]
async fn service_should_read_stored_models() -> TestResult {
    // arrange
    let mut session = session()?;
    let service = SqlService::builder(SqlRepository::mapped::<Type>()).build()?;
    let checking = scenario::checking("checking");
    let mut loans = scenario::checking("loans");

    loans.discriminator = "liabilities".into();
    session.connection().execute_batch(CREATE_TYPES)?;
    service
        .upsert_records(&mut session, &[checking.clone(), loans])
        .await?;

    // act
    let found = service
        .get::<Type>(&mut session, Value::Uuid(checking.id))
        .await?;
    let assets = service
        .get_records::<Type>(&mut session, &[("discriminator", Value::from("assets"))])
        .await?;

    // assert
    assert_eq!(found, Some(checking.clone()));
    assert_eq!(assets, vec![checking]);
    Ok(())
}

#[tokio::test]
async fn service_should_create_missing_model_once() -> TestResult {
    // arrange
    let mut session = session()?;
    let service = SqlService::builder(SqlRepository::mapped::<Type>()).build()?;
    let checking = scenario::checking("checking");
    let mut renamed = checking.clone();

    renamed.description = "Renamed accounts".into();
    session.connection().execute_batch(CREATE_TYPES)?;

    // act
    let created = service.get_or_create(&mut session, &checking).await?;
    let existing = service.get_or_create(&mut session, &renamed).await?;

    // assert
    assert_eq!(created, checking);
    assert_eq!(existing.description, "checking accounts");
    Ok(())
}
