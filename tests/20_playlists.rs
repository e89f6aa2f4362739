mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::TestServer;

#[tokio::test]
async fn alice_and_bob_end_to_end() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server
        .post(
            "/api/auth/register",
            None,
            json!({"username": "alice", "email": "alice@x.com", "password": "secret1"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let alice_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = server
        .post("/api/auth/login", None, json!({"email": "alice@x.com", "password": "secret1"}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let alice = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = server.get("/api/auth/profile", Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["playlists"], json!([]));
    assert_eq!(body["data"]["user"]["likedSongs"], json!([]));

    let (status, body) = server.post("/api/playlists", Some(&alice), json!({"name": "Road Trip"})).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["playlist"]["user"], alice_id.as_str());
    let playlist_id = body["data"]["playlist"]["id"].as_str().unwrap().to_string();

    let (_, bob) = server.register("bob").await?;
    let (status, body) = server.delete(&format!("/api/playlists/{playlist_id}"), Some(&bob)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only delete your own playlists");

    let (status, _) = server.get(&format!("/api/playlists/{playlist_id}"), Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn non_owners_cannot_mutate_owners_can() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice) = server.register("alice").await?;
    let (_, bob) = server.register("bob").await?;
    let song = server.create_song(&alice, "Highway").await?;
    let playlist = server.create_playlist(&alice, "Mix", true).await?;
    let path = format!("/api/playlists/{playlist}");

    let (status, body) = server.put(&path, Some(&bob), json!({"name": "Stolen"})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only update your own playlists");

    let (status, body) = server.post(&format!("{path}/songs"), Some(&bob), json!({"songId": song})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only add songs to your own playlists");

    let (status, body) = server.delete(&format!("{path}/songs/{song}"), Some(&bob)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only remove songs from your own playlists");

    let (status, body) = server.put(&path, Some(&alice), json!({"name": "Road Mix", "isPublic": false})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["playlist"]["name"], "Road Mix");
    assert_eq!(body["data"]["playlist"]["isPublic"], false);

    let (status, body) = server.post(&format!("{path}/songs"), Some(&alice), json!({"songId": song})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["playlist"]["songs"][0]["id"], song.as_str());
    assert_eq!(body["data"]["playlist"]["songs"][0]["name"], "Highway");

    let (status, body) = server.delete(&format!("{path}/songs/{song}"), Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["playlist"]["songs"], json!([]));

    let (status, body) = server.delete(&path, Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Playlist deleted successfully");
    Ok(())
}

#[tokio::test]
async fn private_playlists_are_only_visible_to_owner() -> Result<()> {
    let server = TestServer::start().await?;
    let (alice_id, alice) = server.register("alice").await?;
    let (_, bob) = server.register("bob").await?;

    let private = server.create_playlist(&alice, "Secret", false).await?;
    let public = server.create_playlist(&alice, "Shared", true).await?;

    let (status, body) = server.get(&format!("/api/playlists/{private}"), Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["playlist"]["user"]["id"], alice_id.as_str());
    assert_eq!(body["data"]["playlist"]["user"]["username"], "alice");
    assert!(body["data"]["playlist"]["user"].get("email").is_none());

    for token in [Some(bob.as_str()), None, Some("garbage")] {
        let (status, body) = server.get(&format!("/api/playlists/{private}"), token).await?;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "You do not have access to this playlist");

        let (status, _) = server.get(&format!("/api/playlists/{public}"), token).await?;
        assert_eq!(status, StatusCode::OK);
    }
    Ok(())
}

#[tokio::test]
async fn missing_playlists_are_404() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice) = server.register("alice").await?;

    let (status, body) = server.get(&format!("/api/playlists/{}", Uuid::new_v4()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Playlist not found");

    let (status, _) = server.get("/api/playlists/not-a-uuid", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.delete(&format!("/api/playlists/{}", Uuid::new_v4()), Some(&alice)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn add_song_validation() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice) = server.register("alice").await?;
    let song = server.create_song(&alice, "Track").await?;
    let playlist = server.create_playlist(&alice, "Mix", true).await?;
    let path = format!("/api/playlists/{playlist}/songs");

    let (status, body) = server.post(&path, Some(&alice), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Song ID is required");

    let (status, body) = server.post(&path, Some(&alice), json!({"songId": Uuid::new_v4()})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Song not found");

    let (status, _) = server.post(&path, Some(&alice), json!({"songId": song})).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server.post(&path, Some(&alice), json!({"songId": song})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Song already in playlist");

    let (status, body) = server.post("/api/playlists", Some(&alice), json!({"description": "no name"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Playlist name is required");
    Ok(())
}

#[tokio::test]
async fn list_and_profile_track_created_and_deleted_playlists() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice) = server.register("alice").await?;
    let (_, bob) = server.register("bob").await?;

    let first = server.create_playlist(&alice, "First", true).await?;
    let second = server.create_playlist(&alice, "Second", false).await?;
    server.create_playlist(&bob, "Bob's", true).await?;

    let (status, body) = server.get("/api/playlists", Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], 2);
    assert_eq!(body["data"]["playlists"][0]["id"], second.as_str());
    assert_eq!(body["data"]["playlists"][1]["id"], first.as_str());

    let (status, _) = server.delete(&format!("/api/playlists/{first}"), Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = server.get("/api/auth/profile", Some(&alice)).await?;
    let playlists = body["data"]["user"]["playlists"].as_array().unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0]["id"], second.as_str());

    let (status, body) = server.get(&format!("/api/playlists/{first}"), Some(&alice)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Playlist not found");
    Ok(())
}
