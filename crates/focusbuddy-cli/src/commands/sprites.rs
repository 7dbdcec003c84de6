use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use focusbuddy_core::assistant::build_sprite_set;
use focusbuddy_core::mood::Mood;
use focusbuddy_core::{Config, RemoteAssistant};
use serde_json::json;
use tracing::info;

#[derive(Args)]
pub struct SpritesArgs {
    /// Photo to turn into sprites
    photo: PathBuf,
    /// Output directory
    #[arg(long, default_value = "sprites")]
    out: PathBuf,
    /// Media type; guessed from the file extension when omitted
    #[arg(long)]
    mime_type: Option<String>,
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn run(args: SpritesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let photo = fs::read(&args.photo)?;
    let mime_type = args
        .mime_type
        .unwrap_or_else(|| guess_mime(&args.photo).to_string());
    let assistant = RemoteAssistant::from_config(&config.assistant)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let set = rt.block_on(build_sprite_set(
        &assistant,
        &photo,
        &mime_type,
        config.assistant.max_photo_bytes,
    ))?;

    fs::create_dir_all(&args.out)?;
    let mut files = Vec::new();
    for mood in Mood::ALL {
        let path = args.out.join(format!("{mood}.png"));
        fs::write(&path, set.for_mood(mood))?;
        files.push(path);
    }
    let background = args.out.join("background.png");
    fs::write(&background, &set.background)?;
    files.push(background);
    info!(dir = %args.out.display(), "sprites written");

    println!(
        "{}",
        json!({
            "description": set.description,
            "files": files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        })
    );
    Ok(())
}
