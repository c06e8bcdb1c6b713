use super::*;
use crate::fake::FakeSession;
use rstest::rstest;
use txns::{ColumnType, Frame, TableSchema, Value};

fn people_schema() -> TableSchema {
    TableSchema::new("people")
        .key("id", ColumnType::Int)
        .column("name", ColumnType::Text)
        .column("age", ColumnType::Int)
}

fn people(len: i64) -> Frame {
    let mut frame = Frame::new(["id", "name", "age"]).unwrap();

    for id in 1..=len {
        frame
            .push(vec![id.into(), format!("person {id}").into(), (20 + id).into()])
            .unwrap();
    }

    frame
}

fn pks() -> Vec<String> {
    vec!["id".to_owned()]
}

#[rstest]
#[case("postgresql")]
#[case("PostgreSQL")]
#[case("POSTGRESQL")]
fn factory_should_resolve_postgres_upserter(#[case] dialect: &'static str) {
    // arrange
    let factory = UpserterFactory::default();
    let session = FakeSession::new(dialect);

    // act
    let upserter = factory.get_upserter(&session).unwrap();

    // assert
    assert_eq!(upserter.dialect(), PostgresUpserter.dialect())
}

#[rstest]
#[case("duckdb")]
#[case("DuckDB")]
fn factory_should_resolve_duckdb_upserter(#[case] dialect: &'static str) {
    // arrange
    let factory = UpserterFactory::default();
    let session = FakeSession::new(dialect);

    // act
    let upserter = factory.get_upserter(&session).unwrap();

    // assert
    assert_eq!(upserter.dialect(), DuckDbUpserter.dialect())
}

#[test]
fn factory_should_reject_unknown_dialect() {
    // arrange
    let factory = UpserterFactory::default();
    let session = FakeSession::new("MySQL");

    // act
    let result = factory.get_upserter(&session);

    // assert
    match result {
        Err(UpsertError::UnsupportedDialect(name)) => assert_eq!(name, "MySQL"),
        _ => panic!("expected an unsupported dialect"),
    }
}

#[test]
fn factory_should_resolve_registered_upserter() {
    // arrange
    struct Sqlite;

    impl Upserter for Sqlite {
        fn dialect(&self) -> &'static str {
            "sqlite"
        }

        fn conflict_method(&self, conflict: OnConflict) -> ConflictMethod {
            match conflict {
                OnConflict::Nothing => on_conflict_do_nothing,
                OnConflict::Update => on_conflict_do_update,
            }
        }
    }

    let mut factory = UpserterFactory::empty();

    // act
    factory.register(Sqlite);

    // assert
    assert!(factory.for_dialect("SQLite").is_ok());
    assert!(factory.for_dialect("duckdb").is_err());
}

#[tokio::test]
async fn upsert_should_reject_session_of_another_dialect() {
    // arrange
    let mut session = FakeSession::new("duckdb");
    let frame = people(3);
    let pks = pks();
    let request = UpsertRequest::new("people", &pks, &frame);

    // act
    let result = PostgresUpserter.upsert(&mut session, &request).await;

    // assert
    assert!(matches!(result, Err(UpsertError::DialectMismatch { .. })));
    assert!(session.appended.is_empty());
    assert!(session.executed.is_empty());
}

#[tokio::test]
async fn upsert_should_write_all_rows_with_one_statement() {
    // arrange
    let mut session = FakeSession::new("postgresql");
    let frame = people(3);
    let pks = pks();
    let request = UpsertRequest::new("people", &pks, &frame).schema("main");

    // act
    let upserted = PostgresUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    assert_eq!(upserted.rows(), 3);
    assert!(!upserted.estimated());
    assert_eq!(upserted.path(), &UpsertPath::Bulk);
    assert_eq!(session.appended.len(), 1);
    assert!(session.appended[0]
        .sql()
        .starts_with(r#"INSERT INTO "main"."people""#));
    assert_eq!(session.commits, 0);
}

#[tokio::test]
async fn upsert_should_estimate_rows_when_bulk_count_is_unknown() {
    // arrange
    let mut session = FakeSession::new("duckdb").reporting(RowCount::Unknown);
    let frame = people(4);
    let pks = pks();
    let request = UpsertRequest::new("people", &pks, &frame);

    // act
    let upserted = DuckDbUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    assert_eq!(upserted.rows(), 4);
    assert!(upserted.estimated());
}

#[tokio::test]
async fn upsert_should_estimate_rows_when_bulk_write_skips_every_row() {
    // arrange
    let mut session = FakeSession::new("duckdb").reporting(RowCount::Exact(0));
    let frame = people(2);
    let pks = pks();
    let request = UpsertRequest::new("people", &pks, &frame);

    // act
    let upserted = DuckDbUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    assert_eq!(upserted.rows(), 2);
    assert!(upserted.estimated());
    assert_eq!(upserted.path(), &UpsertPath::Bulk);
}

#[tokio::test]
async fn upsert_should_fall_back_to_batches_when_bulk_write_fails() {
    // arrange
    let mut session = FakeSession::new("postgresql").rejecting_append();
    let schema = people_schema();
    let frame = people(10);
    let pks = pks();
    let request = UpsertRequest::new(&schema, &pks, &frame)
        .on_conflict(OnConflict::Update)
        .batch_size(4);

    // act
    let upserted = PostgresUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    assert_eq!(upserted.rows(), 10);
    assert!(!upserted.estimated());
    assert!(matches!(
        upserted.path(),
        UpsertPath::Batched { batches: 3, .. }
    ));
    assert_eq!(session.executed.len(), 3);
    assert_eq!(session.executed[2].params().len(), 6);
    assert!(session.executed[0].sql().contains("DO UPDATE SET"));
    assert_eq!(session.commits, 1);
}

#[tokio::test]
async fn upsert_should_record_why_bulk_write_failed() {
    // arrange
    let mut session = FakeSession::new("postgresql").rejecting_append();
    let schema = people_schema();
    let frame = people(2);
    let pks = pks();
    let request = UpsertRequest::new(TableRef::Mapped(&schema), &pks, &frame);

    // act
    let upserted = PostgresUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    match upserted.path() {
        UpsertPath::Batched { reason, batches } => {
            assert!(reason.contains("6 parameters"));
            assert_eq!(*batches, 1);
        }
        UpsertPath::Bulk => panic!("expected batches"),
    }
}

#[tokio::test]
async fn upsert_should_normalize_unknown_batch_counts() {
    // arrange
    let mut session = FakeSession::new("duckdb")
        .rejecting_append()
        .reporting(RowCount::Unknown);
    let schema = people_schema();
    let frame = people(7);
    let pks = pks();
    let request = UpsertRequest::new(&schema, &pks, &frame).batch_size(2);

    // act
    let upserted = DuckDbUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    assert_eq!(session.executed.len(), 4);
    assert_eq!(upserted.rows(), 7);
    assert!(upserted.estimated());
}

#[tokio::test]
async fn upsert_should_propagate_batch_error_without_commit() {
    // arrange
    let mut session = FakeSession::new("postgresql")
        .rejecting_append()
        .failing_execute_at(2);
    let schema = people_schema();
    let frame = people(10);
    let pks = pks();
    let request = UpsertRequest::new(&schema, &pks, &frame).batch_size(3);

    // act
    let result = PostgresUpserter.upsert(&mut session, &request).await;

    // assert
    assert!(matches!(
        result,
        Err(UpsertError::Session(SessionError::Database(_)))
    ));
    assert_eq!(session.executed.len(), 2);
    assert_eq!(session.commits, 0);
}

#[tokio::test]
async fn upsert_should_require_table_schema_to_write_batches() {
    // arrange
    let mut session = FakeSession::new("postgresql").rejecting_append();
    let frame = people(2);
    let pks = pks();
    let request = UpsertRequest::new("people", &pks, &frame);

    // act
    let result = PostgresUpserter.upsert(&mut session, &request).await;

    // assert
    assert!(matches!(result, Err(UpsertError::UnsupportedTable(name)) if name == "people"));
    assert!(session.executed.is_empty());
}

#[rstest]
#[case(vec![])]
#[case(vec!["email".to_owned()])]
#[case(vec!["id".to_owned(), "email".to_owned()])]
#[tokio::test]
async fn upsert_should_reject_invalid_primary_key(#[case] pks: Vec<String>) {
    // arrange
    let mut session = FakeSession::new("postgresql");
    let schema = people_schema();
    let frame = people(1);
    let request = UpsertRequest::new(&schema, &pks, &frame);

    // act
    let result = PostgresUpserter.upsert(&mut session, &request).await;

    // assert
    assert!(matches!(result, Err(UpsertError::InvalidPrimaryKey(_))));
}

#[tokio::test]
async fn upsert_should_reject_zero_batch_size() {
    // arrange
    let mut session = FakeSession::new("postgresql");
    let frame = people(1);
    let pks = pks();
    let request = UpsertRequest::new("people", &pks, &frame).batch_size(0);

    // act
    let result = PostgresUpserter.upsert(&mut session, &request).await;

    // assert
    assert!(matches!(result, Err(UpsertError::InvalidBatchSize)));
}

#[tokio::test]
async fn upsert_should_not_write_empty_frame() {
    // arrange
    let mut session = FakeSession::new("postgresql");
    let frame = people(0);
    let pks = pks();
    let request = UpsertRequest::new("people", &pks, &frame);

    // act
    let upserted = PostgresUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    assert_eq!(upserted.rows(), 0);
    assert!(session.appended.is_empty());
}

#[tokio::test]
async fn upsert_should_only_insert_mapped_columns_present_in_frame() {
    // arrange
    let mut session = FakeSession::new("postgresql");
    let schema = people_schema();
    let mut frame = Frame::new(["name", "id", "nickname"]).unwrap();
    frame
        .push(vec!["Alice".into(), 1.into(), "Al".into()])
        .unwrap();
    let pks = pks();
    let request = UpsertRequest::new(&schema, &pks, &frame);

    // act
    PostgresUpserter.upsert(&mut session, &request).await.unwrap();

    // assert
    assert_eq!(
        session.appended[0].sql(),
        r#"INSERT INTO "people" ("id", "name") VALUES ($1, $2) ON CONFLICT ("id") DO NOTHING"#
    );
    assert_eq!(
        session.appended[0].params(),
        &[Value::Int(1), Value::from("Alice")]
    );
}
