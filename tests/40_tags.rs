mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestUser;

#[tokio::test]
async fn tag_names_are_unique_per_user() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;
    let other = TestUser::new(server)?;

    let (status, _) = user.post("/tags", json!({ "name": "focus" })).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = user.post("/tags", json!({ "name": "focus" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Tag already exists");

    let (status, _) = other.post("/tags", json!({ "name": "focus" })).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn tag_association_lifecycle() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    let (_, task) = user.post("/tasks", json!({ "title": "Read paper" })).await?;
    let (_, tag) = user.post("/tags", json!({ "name": "reading" })).await?;
    let (task_id, tag_id) = (task["id"].as_i64().unwrap(), tag["id"].as_i64().unwrap());
    let path = format!("/tasks/{}/tags", task_id);

    let (status, link) = user.post(&path, json!({ "tag_id": tag_id })).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["tag_id"].as_i64(), Some(tag_id));

    let (status, body) = user.post(&path, json!({ "tag_id": tag_id })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Tag is already associated with this task");

    let (_, tags) = user.get(&path).await?;
    assert_eq!(tags[0]["name"], "reading");

    let (status, _) = user.delete(&format!("{}/{}", path, tag_id)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = user.delete(&format!("{}/{}", path, tag_id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, renamed) = user
        .put(&format!("/tags/{}", tag_id), Some(json!({ "name": "papers" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "papers");

    let (status, _) = user.delete(&format!("/tags/{}", tag_id)).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, tags) = user.get("/tags").await?;
    assert!(tags.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn cannot_tag_another_users_task() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let owner = TestUser::new(server)?;
    let stranger = TestUser::new(server)?;

    let (_, task) = owner.post("/tasks", json!({ "title": "Owned" })).await?;
    let (_, tag) = stranger.post("/tags", json!({ "name": "sneaky" })).await?;

    let (status, _) = stranger
        .post(&format!("/tasks/{}/tags", task["id"]), json!({ "tag_id": tag["id"] }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn rename_onto_existing_name_is_rejected() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    user.post("/tags", json!({ "name": "urgent" })).await?;
    let (_, later) = user.post("/tags", json!({ "name": "later" })).await?;

    let (status, body) = user
        .put(&format!("/tags/{}", later["id"]), Some(json!({ "name": "urgent" })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Tag already exists");
    Ok(())
}

#[tokio::test]
async fn deleting_a_tag_unlinks_it_from_tasks() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    let (_, task) = user.post("/tasks", json!({ "title": "Tagged" })).await?;
    let (_, tag) = user.post("/tags", json!({ "name": "doomed" })).await?;
    let task_path = format!("/tasks/{}", task["id"]);

    let (status, _) = user
        .post(&format!("{}/tags", task_path), json!({ "tag_id": tag["id"] }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = user.delete(&format!("/tags/{}", tag["id"])).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, linked) = user.get(&format!("{}/tags", task_path)).await?;
    assert!(linked.as_array().unwrap().is_empty());
    let (_, fetched) = user.get(&task_path).await?;
    assert_eq!(fetched["tags"], json!([]));

    let pool = common::db_pool().await?;
    let (links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_tags WHERE tag_id = $1")
        .bind(tag["id"].as_i64().unwrap())
        .fetch_one(&pool)
        .await?;
    pool.close().await;
    assert_eq!(links, 0);
    Ok(())
}
