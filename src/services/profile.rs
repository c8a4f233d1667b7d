//! Profile display-name update.
//!
//! The profile row is created by the store at sign-up; this core only
//! ever touches its `name` field.

use crate::error::CoreError;
use crate::store::RehabStore;
use crate::types::Identity;

/// Set the display name shown in the dashboard welcome line.
pub async fn update_display_name(
    store: &dyn RehabStore,
    who: &Identity,
    name: &str,
) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Enter a display name before saving.".to_string(),
        ));
    }

    store.update_profile_name(who, name).await?;
    log::info!("profile name updated for {}", who.user_id);
    Ok(())
}
