use jotdb::{fs::FileBackend, prelude::*};
use serde_json::json;

fn reading(document: &SharedDocument) -> (f64, f64) {
    (
        document.get("temperature").and_then(Value::as_f64).unwrap_or(f64::NAN),
        document.get("humidity").and_then(Value::as_f64).unwrap_or(f64::NAN),
    )
}

#[tokio::test]
async fn insert_query_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weather.json");
    let db = jotdb::open(&path).await.unwrap();

    db.insert_one(json!({ "temperature": 20, "humidity": 50 })).await.unwrap();
    db.insert_one(json!({ "temperature": 25, "humidity": 40 })).await.unwrap();

    let warm = db
        .find_many(Query::builder().field("temperature", Filter::gt(22)))
        .await
        .unwrap();
    assert_eq!(warm.iter().map(reading).collect::<Vec<_>>(), vec![(25.0, 40.0)]);

    let removed = db.delete_one(Query::new()).await.unwrap().unwrap();
    assert_eq!(reading(&removed), (20.0, 50.0));

    let rest = db.find_many(Query::new()).await.unwrap();
    assert_eq!(rest.iter().map(reading).collect::<Vec<_>>(), vec![(25.0, 40.0)]);

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[\n\t{\n\t\t\"temperature\": 25,\n\t\t\"humidity\": 40\n\t}\n]"
    );
}

#[tokio::test]
async fn reopening_restores_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("weather.json");

    {
        let db = Database::builder()
            .backend(FileBackend::builder(&path).build().await.unwrap())
            .pretty(false)
            .build()
            .await
            .unwrap();

        db.insert_many(vec![
            json!({ "station": "north", "temperature": 18.5, "tags": ["roof"] }),
            json!({ "station": "south", "temperature": 23, "tags": [] }),
        ])
        .await
        .unwrap();
        db.update_many(
            Query::builder().field("tags", Filter::length(0)),
            Update::builder().set("tags", vec![Value::from("ground")]),
        )
        .await
        .unwrap();
    }

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"[{"station":"north","temperature":18.5,"tags":["roof"]},{"station":"south","temperature":23,"tags":["ground"]}]"#
    );

    let db = jotdb::open(&path).await.unwrap();
    assert_eq!(db.count(Query::new()).await.unwrap(), 2);
    assert_eq!(
        db.count(Query::builder().field("tags", Filter::includes("ground")))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn drop_clears_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weather.json");
    let db = Database::builder()
        .backend(FileBackend::new(&path))
        .pretty(false)
        .build()
        .await
        .unwrap();

    db.insert_one(json!({ "temperature": 20 })).await.unwrap();
    db.drop().await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    assert_eq!(db.count(Query::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn absent_values_never_reach_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weather.json");
    let db = Database::builder()
        .backend(FileBackend::new(&path))
        .pretty(false)
        .build()
        .await
        .unwrap();

    let mut document = Map::new();
    document.insert("temperature".to_string(), Value::from(20));
    document.insert("sensor".to_string(), Value::Absent);
    document.insert("history".to_string(), Value::Array(vec![Value::from(1), Value::Absent]));
    document.insert("drift".to_string(), Value::Number(f64::NAN));

    let stored = db.insert_one(document).await.unwrap();
    assert!(!stored.contains_key("sensor"));
    assert!(!stored.contains_key("drift"));

    db.update_one(
        Query::builder().field("temperature", 20),
        Update::builder().unset("temperature"),
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"history":[1,null]}]"#);
}
