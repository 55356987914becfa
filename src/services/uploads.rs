use crate::error::{AppError, AppResult};
use crate::models::UserWithImage;
use crate::repositories::{ImageRepository, UserRepository};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Largest accepted profile picture
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Public URL prefix the uploads directory is served under
pub const UPLOADS_ROUTE: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Lower-cased extension of an accepted image file name
pub fn image_extension(filename: &str) -> AppResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| AppError::Validation("Image file has no extension".to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported image type .{} (expected jpg, jpeg or png)",
            ext
        )));
    }
    Ok(ext)
}

/// Stores uploaded profile pictures on disk and links them to users
pub struct UploadService {
    uploads_dir: PathBuf,
    user_repo: Arc<UserRepository>,
    image_repo: Arc<ImageRepository>,
}

impl UploadService {
    pub fn new(uploads_dir: PathBuf, user_repo: Arc<UserRepository>, image_repo: Arc<ImageRepository>) -> Self {
        Self {
            uploads_dir,
            user_repo,
            image_repo,
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Save `bytes` as the profile picture of `user_id`
    pub async fn store_profile_picture(
        &self,
        user_id: i32,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<UserWithImage> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Image file is empty".to_string()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation("Image must be at most 2MB".to_string()));
        }
        let ext = image_extension(filename)?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.uploads_dir.join(&stored_name);

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.uploads_dir.display()))?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        let image = self
            .image_repo
            .create(&format!("{}/{}", UPLOADS_ROUTE, stored_name))
            .await?;

        let user = self
            .user_repo
            .set_image(user_id, image.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        info!("Stored profile picture {} for user {}", stored_name, user_id);

        Ok(UserWithImage {
            user,
            image: Some(image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("me.PNG").unwrap(), "png");
        assert_eq!(image_extension("holiday.photo.jpeg").unwrap(), "jpeg");
        assert!(image_extension("avatar.gif").is_err());
        assert!(image_extension("README").is_err());
    }
}
