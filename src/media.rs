use std::path::Path;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::forms::ImageKind;

pub const POST_IMAGES: &str = "posts";

/// Writes a post image under the media root and returns its name relative to
/// it, which is what gets stored on the post.
pub async fn save_post_image(media_root: &Path, kind: ImageKind, bytes: &[u8]) -> std::io::Result<String> {
    let name = format!("{POST_IMAGES}/{}.{}", Uuid::now_v7().simple(), kind.extension());
    let path = media_root.join(&name);
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(&path, bytes).await?;

    debug!("saved {} bytes to {}", bytes.len(), path.display());
    Ok(name)
}

/// Removes an image saved by [`save_post_image`] whose post never got stored.
pub async fn discard_post_image(media_root: &Path, name: &str) {
    let path = media_root.join(name);
    if let Err(err) = tokio::fs::remove_file(&path).await {
        warn!("could not remove {}: {err}", path.display());
    }
}
