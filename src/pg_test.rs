use pgtest::TestPg;
use serde_json::json;

use crate::{query_json, query_one_json, query_typed, simple_query_json, Error, ToJson};

static SCHEMA: &str = include_str!("./sql/test_schema.sql");

#[tokio::test]
async fn test_result_set() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let doc = query_json(&**pg, "select id, name from letters order by id", &[])
        .await
        .expect("converting letters");
    assert_eq!(doc, json!({"data": [[1, "a"], [2, "b"]]}));

    let rows = pg
        .query("select id, name from letters order by id", &[])
        .await
        .expect("querying letters");
    assert_eq!(rows.as_slice().to_json().unwrap(), doc);
    assert_eq!((&rows).to_json().unwrap(), doc);
    assert_eq!(rows.to_json().unwrap(), doc);
}

#[tokio::test]
async fn test_empty_result_set() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let doc = query_json(&**pg, "select id from letters where id < $1", &[&0i32])
        .await
        .expect("converting letters");
    assert_eq!(doc, json!({"data": []}));
}

#[tokio::test]
async fn test_row() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let doc = query_one_json(&**pg, "select name, id from letters where id = $1", &[&2i32])
        .await
        .expect("converting letter");
    assert_eq!(doc, json!({"data": [["b", 2]]}));
}

#[tokio::test]
async fn test_cells() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let doc = query_one_json(
        &**pg,
        r#"
        select
            true,
            1::int2,
            2::int8,
            1.5::float8,
            'NaN'::float8,
            12.50::numeric,
            '-0.0012'::numeric,
            '\xdead'::bytea,
            '{"a": 1}'::jsonb,
            '2024-01-02'::date,
            '2024-01-02 03:04:05'::timestamp,
            '2024-01-02 03:04:05+00'::timestamptz,
            null::text,
            array[1, null, 3]::int4[],
            '00000000-0000-0000-0000-000000000001'::uuid
        "#,
        &[],
    )
    .await
    .expect("converting cells");
    assert_eq!(
        doc,
        json!({"data": [[
            true,
            1,
            2,
            1.5,
            "NaN",
            "12.50",
            "-0.0012",
            "0xdead",
            {"a": 1},
            "2024-01-02",
            "2024-01-02T03:04:05",
            "2024-01-02T03:04:05Z",
            null,
            [1, null, 3],
            "00000000-0000-0000-0000-000000000001"
        ]]})
    );
}

#[tokio::test]
async fn test_unsupported_cell() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let err = query_json(&**pg, "select 1, '(1,2)'::point", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unsupported { column: 1, .. }));
}

#[tokio::test]
async fn test_typed() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let rows = query_typed::<(i32, String), _>(
        &**pg,
        "select * from (values (1, 'x'), (2, 'y'), (3, 'z')) t order by 1",
        &[],
    )
    .await
    .expect("typed query");
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.to_json().unwrap(),
        json!({"data": [[1, "x"], [2, "y"], [3, "z"]], "status-code": 200})
    );
}

#[tokio::test]
async fn test_typed_arity() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let rows = query_typed::<(i32,), _>(&**pg, "select id, name from letters", &[])
        .await
        .expect("typed query");
    let err = rows.to_json().unwrap_err();
    assert!(matches!(
        err,
        Error::Arity {
            expected: 1,
            found: 2
        }
    ));
}

#[tokio::test]
async fn test_typed_query_error() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let res = query_typed::<(i32,), _>(&**pg, "select id from missing", &[]).await;
    assert!(matches!(res, Err(Error::Query(_))));
}

#[test_log::test(tokio::test)]
async fn test_simple_query() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let doc = simple_query_json(&**pg, "select id, null from letters order by id; select 'c'")
        .await
        .expect("simple query");
    assert_eq!(doc, json!({"data": [["1", null], ["2", null], ["c"]]}));
}

#[tokio::test]
async fn test_enum_column() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let doc = query_json(&**pg, "select id, feeling from letters order by id", &[])
        .await
        .expect("converting moods");
    assert_eq!(doc, json!({"data": [[1, "happy"], [2, null]]}));
}

#[tokio::test]
async fn test_infinite_and_far_dates() {
    let db = TestPg::start(SCHEMA).await;
    let pg = db.client().await;
    let doc = query_one_json(
        &**pg,
        r#"
        select
            'infinity'::date,
            '-infinity'::timestamp,
            'infinity'::timestamptz,
            '10000-01-01'::date,
            '0044-03-15 BC'::date
        "#,
        &[],
    )
    .await
    .expect("converting dates");
    assert_eq!(
        doc,
        json!({"data": [["infinity", "-infinity", "infinity", "10000-01-01", "0044-03-15 BC"]]})
    );
}
