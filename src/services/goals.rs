//! Recovery goal controller.
//!
//! One goal per identity, replace-on-save. There is deliberately no delete
//! path — clearing a goal means replacing it. Uniqueness is an invariant
//! this controller enforces with a pre-read, not something delegated to
//! storage upsert semantics alone.

use crate::error::CoreError;
use crate::store::RehabStore;
use crate::types::{GoalInput, Identity, RecoveryGoal};

/// Check the form before any store traffic. A failure here keeps the
/// modal open with the message and the fields untouched.
pub fn validate_goal(input: &GoalInput) -> Result<RecoveryGoal, CoreError> {
    let description = input.goal_description.trim();
    if description.is_empty() {
        return Err(CoreError::Validation(
            "Describe your recovery goal before saving.".to_string(),
        ));
    }
    let target_date = input
        .target_date
        .ok_or_else(|| CoreError::Validation("Pick a target date for your goal.".to_string()))?;

    Ok(RecoveryGoal {
        goal_description: description.to_string(),
        target_date,
    })
}

/// Save the identity's goal, replacing any existing one, then re-fetch it.
///
/// The returned value is the refreshed goal as the store now reports it —
/// the caller swaps it into the view before dismissing the modal.
pub async fn save_goal(
    store: &dyn RehabStore,
    who: &Identity,
    input: &GoalInput,
) -> Result<Option<RecoveryGoal>, CoreError> {
    let goal = validate_goal(input)?;

    // Read-modify-write: the controller decides between insert and
    // replace, so one-goal-per-identity holds even if the store carries
    // no uniqueness constraint of its own.
    match store.fetch_goal(who).await? {
        Some(previous) => {
            log::debug!(
                "replacing goal '{}' (target {})",
                previous.goal_description,
                previous.target_date
            );
            store.update_goal(who, &goal).await?;
        }
        None => store.insert_goal(who, &goal).await?,
    }

    // Targeted refresh, strictly after the confirmed write.
    let refreshed = store.fetch_goal(who).await?;
    log::info!("goal saved for {}", who.user_id);
    Ok(refreshed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::{test_identity, MockStore};
    use chrono::NaiveDate;

    fn input(description: &str) -> GoalInput {
        GoalInput {
            goal_description: description.to_string(),
            target_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        }
    }

    #[tokio::test]
    async fn second_save_replaces_not_duplicates() {
        let store = MockStore::new();
        let who = test_identity();

        save_goal(&store, &who, &input("Jog 5k")).await.unwrap();
        let refreshed = save_goal(&store, &who, &input("Walk unaided"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(refreshed.goal_description, "Walk unaided");
        assert_eq!(
            store.stored_goal().unwrap().goal_description,
            "Walk unaided"
        );
    }

    #[tokio::test]
    async fn empty_description_is_caught_before_store_traffic() {
        let store = MockStore::new();
        let err = save_goal(&store, &test_identity(), &input("   "))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.call_count("insert_goal"), 0);
        assert_eq!(store.call_count("fetch_goal"), 0);
    }

    // The pre-read drives the write path: first save inserts, every save
    // after that replaces in place. The mock rejects a second insert, so
    // a controller that blindly inserts would fail here.
    #[tokio::test]
    async fn pre_read_picks_insert_then_replace() {
        let store = MockStore::new();
        let who = test_identity();

        save_goal(&store, &who, &input("Jog 5k")).await.unwrap();
        assert_eq!(store.call_count("insert_goal"), 1);
        assert_eq!(store.call_count("update_goal"), 0);

        save_goal(&store, &who, &input("Walk unaided")).await.unwrap();
        assert_eq!(store.call_count("insert_goal"), 1);
        assert_eq!(store.call_count("update_goal"), 1);
    }

    #[tokio::test]
    async fn missing_target_date_is_rejected() {
        let store = MockStore::new();
        let bad = GoalInput {
            goal_description: "Walk unaided".to_string(),
            target_date: None,
        };
        let err = save_goal(&store, &test_identity(), &bad).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn write_failure_leaves_prior_goal_untouched() {
        let store = MockStore::new()
            .with_goal(RecoveryGoal {
                goal_description: "Original".to_string(),
                target_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            })
            .fail_on("update_goal");

        let err = save_goal(&store, &test_identity(), &input("Replacement"))
            .await
            .unwrap_err();
        assert!(!err.is_validation());
        assert_eq!(store.stored_goal().unwrap().goal_description, "Original");
    }

    #[tokio::test]
    async fn refresh_follows_the_write() {
        let store = MockStore::new();
        save_goal(&store, &test_identity(), &input("Walk unaided"))
            .await
            .unwrap();
        // One pre-read plus one post-write refresh.
        assert_eq!(store.call_count("fetch_goal"), 2);
        assert_eq!(store.call_count("insert_goal"), 1);
    }
}
