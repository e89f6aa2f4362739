use serde_json::json;

use crate::cli::output::output_success;
use crate::cli::OutputFormat;
use crate::database::models::NewSong;
use crate::database::SongRepository;
use crate::state::AppState;

/// (name, desc, album, artist, image, file, duration)
const DEMO_SONGS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("Song One", "Put a smile on your face with these happy tunes", "Album 1", "Artist 1", "img1.jpg", "song1.mp3", "3:00"),
    ("Song Two", "Catch up on the most recent tracks", "Album 2", "Artist 2", "img2.jpg", "song2.mp3", "2:20"),
    ("Song Three", "Get ready for some amazing beats", "Album 3", "Artist 3", "img3.jpg", "song3.mp3", "2:32"),
];

pub fn demo_songs() -> Vec<NewSong> {
    DEMO_SONGS
        .iter()
        .map(|&(name, desc, album, artist, image, file, duration)| NewSong {
            name: name.to_string(),
            desc: desc.to_string(),
            album: album.to_string(),
            artist: artist.to_string(),
            image: image.to_string(),
            file: file.to_string(),
            duration: duration.to_string(),
        })
        .collect()
}

/// Clears the catalogue and inserts the demo songs; returns how many were removed
pub async fn seed_catalogue(songs: &SongRepository) -> anyhow::Result<(u64, Vec<String>)> {
    let removed = songs.delete_all().await?;

    let mut seeded = Vec::new();
    for song in demo_songs() {
        let song = songs.create(song, None).await?;
        seeded.push(format!("{} - {}", song.name, song.artist));
    }
    Ok((removed, seeded))
}

pub async fn handle(state: &AppState, output_format: OutputFormat) -> anyhow::Result<()> {
    let (removed, seeded) = seed_catalogue(&state.songs).await?;
    tracing::info!("Seeded {} songs (removed {})", seeded.len(), removed);

    if output_format == OutputFormat::Text {
        for (index, line) in seeded.iter().enumerate() {
            println!("  {}. {}", index + 1, line);
        }
    }

    output_success(
        output_format,
        &format!("Seeded {} songs, removed {} existing", seeded.len(), removed),
        Some(json!({ "removed": removed, "songs": seeded })),
    )
}
