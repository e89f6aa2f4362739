mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::TestServer;

#[tokio::test]
async fn like_toggles_in_pairs() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice").await?;
    let song = server.create_song(&token, "Favourite").await?;
    let path = format!("/api/users/like/{song}");

    let (status, body) = server.post(&path, Some(&token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isLiked"], true);
    assert_eq!(body["data"]["likedSongs"], json!([song]));

    let (_, body) = server.get(&format!("/api/songs/{song}"), Some(&token)).await?;
    assert_eq!(body["data"]["isLiked"], true);

    let (status, body) = server.post(&path, Some(&token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isLiked"], false);
    assert_eq!(body["data"]["likedSongs"], json!([]));

    let (_, body) = server.get(&format!("/api/songs/{song}"), Some(&token)).await?;
    assert_eq!(body["data"]["isLiked"], false);
    Ok(())
}

#[tokio::test]
async fn liked_songs_are_listed_in_like_order() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice").await?;
    let a = server.create_song(&token, "A").await?;
    let b = server.create_song(&token, "B").await?;

    server.post(&format!("/api/users/like/{b}"), Some(&token), json!({})).await?;
    server.post(&format!("/api/users/like/{a}"), Some(&token), json!({})).await?;

    let (status, body) = server.get("/api/users/liked-songs", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], 2);
    assert_eq!(body["data"]["songs"][0]["id"], b.as_str());
    assert_eq!(body["data"]["songs"][1]["id"], a.as_str());

    let (_, body) = server.get("/api/auth/profile", Some(&token)).await?;
    assert_eq!(body["data"]["user"]["likedSongs"][0]["name"], "B");
    Ok(())
}

#[tokio::test]
async fn liking_requires_auth_and_an_existing_song() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice").await?;

    let (status, _) = server.get("/api/users/liked-songs", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server
        .post(&format!("/api/users/like/{}", Uuid::new_v4()), Some(&token), json!({}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Song not found");
    Ok(())
}

#[tokio::test]
async fn deleted_songs_disappear_from_likes() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice").await?;
    let song = server.create_song(&token, "Ephemeral").await?;

    server.post(&format!("/api/users/like/{song}"), Some(&token), json!({})).await?;
    server.delete(&format!("/api/songs/{song}"), Some(&token)).await?;

    let (_, body) = server.get("/api/users/liked-songs", Some(&token)).await?;
    assert_eq!(body["results"], 0);
    Ok(())
}
