mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestUser;

#[tokio::test]
async fn journal_entries_are_length_limited() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    let (status, _) = user.post("/journals", json!({ "entry": "a".repeat(1001) })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, entry) = user.post("/journals", json!({ "entry": "a".repeat(1000) })).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = entry["id"].as_i64().unwrap();

    let (status, _) = user
        .put(&format!("/journals/{}", id), Some(json!({ "entry": "b".repeat(1001) })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn journal_crud_newest_first() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    let (_, list) = user.get("/journals").await?;
    assert!(list.as_array().unwrap().is_empty());

    user.post("/journals", json!({ "entry": "older" })).await?;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let (_, newer) = user.post("/journals", json!({ "entry": "newer" })).await?;
    let id = newer["id"].as_i64().unwrap();

    let (_, list) = user.get("/journals").await?;
    assert_eq!(list[0]["entry"], "newer");
    assert_eq!(list[1]["entry"], "older");

    let (status, updated) = user
        .put(&format!("/journals/{}", id), Some(json!({ "entry": "edited" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["entry"], "edited");

    let (status, _) = user.delete(&format!("/journals/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = user.get(&format!("/journals/{}", id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn journal_task_must_be_owned() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let owner = TestUser::new(server)?;
    let stranger = TestUser::new(server)?;

    let (_, task) = owner.post("/tasks", json!({ "title": "Private" })).await?;

    let (status, _) = stranger
        .post("/journals", json!({ "entry": "peeking", "task_id": task["id"] }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_a_task_detaches_its_journals() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    let (_, task) = user.post("/tasks", json!({ "title": "Notes attached" })).await?;
    let (status, entry) = user
        .post("/journals", json!({ "entry": "progress", "task_id": task["id"] }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["task_id"], task["id"]);

    let (status, _) = user.delete(&format!("/tasks/{}", task["id"])).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, kept) = user.get(&format!("/journals/{}", entry["id"])).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(kept["task_id"].is_null());
    assert_eq!(kept["entry"], "progress");
    Ok(())
}
