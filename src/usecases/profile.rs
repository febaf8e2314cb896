//! Profile editing: text fields and avatar upload, with local validation
//! ahead of any network call.

use crate::{
    api::ApiError,
    domain::identity::{Identity, Session},
};

/// Avatar payload ceiling, 5 MiB of raw image bytes.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

pub trait ProfileApi {
    fn update_profile(
        &self,
        display_name: &str,
        position: &str,
        department: &str,
    ) -> Result<Identity, ApiError>;
    fn upload_avatar(&self, image: &[u8], content_type: &str) -> Result<Identity, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("display name needs at least a first and last name")]
    NameIncomplete,
    #[error("avatar must be a JPEG, PNG, WebP or GIF image")]
    UnsupportedImageType,
    #[error("avatar exceeds the {} MiB limit", MAX_AVATAR_BYTES / (1024 * 1024))]
    AvatarTooLarge,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub position: String,
    pub department: String,
}

impl ProfileUpdate {
    /// Prefills the form from the current identity; empty optionals become
    /// empty strings the server treats as "unset".
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name.clone(),
            position: identity.position.clone().unwrap_or_default(),
            department: identity.department.clone().unwrap_or_default(),
        }
    }
}

pub struct ProfileController;

impl ProfileController {
    /// Sends the edited fields and merges the server's answer into the
    /// session wholesale. The server copy wins, including fields this form
    /// never touched.
    pub fn save(
        api: &dyn ProfileApi,
        session: &mut Session,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileError> {
        let name = update.display_name.trim();
        if name.split_whitespace().count() < 2 {
            return Err(ProfileError::NameIncomplete);
        }

        let identity = api.update_profile(
            name,
            update.position.trim(),
            update.department.trim(),
        )?;
        session.merge_identity(identity);
        Ok(())
    }

    /// Uploads a new avatar. Size and content type are checked locally so
    /// an oversized payload never leaves the machine.
    pub fn set_avatar(
        api: &dyn ProfileApi,
        session: &mut Session,
        image: &[u8],
        content_type: &str,
    ) -> Result<(), ProfileError> {
        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            return Err(ProfileError::UnsupportedImageType);
        }
        if image.len() > MAX_AVATAR_BYTES {
            return Err(ProfileError::AvatarTooLarge);
        }

        let identity = api.upload_avatar(image, content_type)?;
        session.merge_identity(identity);
        Ok(())
    }
}
