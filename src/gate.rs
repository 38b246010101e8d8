use crate::{
    error::{CatalogError, CatalogResult},
    models::{MovieDraft, Role, UserId},
    store::Store,
};

pub const TITLE_MAX_CHARS: usize = 150;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;

pub async fn authorize_read(store: &dyn Store, user_id: UserId) -> CatalogResult<Role> {
    store.user_role(user_id).await?.ok_or(CatalogError::UserNotFound)
}

pub async fn authorize_write(store: &dyn Store, user_id: UserId) -> CatalogResult<()> {
    if authorize_read(store, user_id).await?.is_admin() {
        Ok(())
    } else {
        Err(CatalogError::PermissionDenied)
    }
}

// Lengths are in code points.
pub fn validate_movie(draft: &MovieDraft) -> CatalogResult<()> {
    let title_len = draft.title.chars().count();
    if title_len == 0 || title_len > TITLE_MAX_CHARS {
        return Err(CatalogError::ValidationFailed("title must be 1 to 150 characters"));
    }
    if draft.description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(CatalogError::ValidationFailed(
            "description must be at most 1000 characters",
        ));
    }
    // NaN fails the range check too.
    if !(RATING_MIN..=RATING_MAX).contains(&draft.rating) {
        return Err(CatalogError::ValidationFailed("rating must be between 0 and 10"));
    }
    Ok(())
}
