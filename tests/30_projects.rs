mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestUser;

#[tokio::test]
async fn project_crud() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    let (status, project) = user
        .post("/projects", json!({ "name": "Thesis", "description": "Chapter drafts" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = project["id"].as_i64().unwrap();

    let (status, updated) = user
        .put(&format!("/projects/{}", id), Some(json!({ "name": "Thesis v2" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Thesis v2");

    let (_, list) = user.get("/projects").await?;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = user.post("/projects", json!({ "name": "" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn deleting_a_project_keeps_its_tasks() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let user = TestUser::new(server)?;

    let (_, project) = user.post("/projects", json!({ "name": "Temp" })).await?;
    let (_, task) = user.post("/tasks", json!({ "title": "Survivor" })).await?;
    let (project_id, task_id) = (project["id"].as_i64().unwrap(), task["id"].as_i64().unwrap());
    user.put(&format!("/tasks/{}/project/{}", task_id, project_id), None)
        .await?;

    let (status, _) = user.delete(&format!("/projects/{}", project_id)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = user.get(&format!("/projects/{}/tasks", project_id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, survivor) = user.get(&format!("/tasks/{}", task_id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(survivor["project_id"].is_null());
    Ok(())
}

#[tokio::test]
async fn foreign_projects_cannot_be_assigned() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let owner = TestUser::new(server)?;
    let stranger = TestUser::new(server)?;

    let (_, project) = owner.post("/projects", json!({ "name": "Mine" })).await?;
    let (_, task) = stranger.post("/tasks", json!({ "title": "Theirs" })).await?;

    let (status, _) = stranger
        .put(
            &format!("/tasks/{}/project/{}", task["id"], project["id"]),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
