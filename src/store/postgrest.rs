//! PostgREST-style store client.
//!
//! Direct HTTP via reqwest against the store's `/rest/v1/` surface. Every
//! request carries the public `apikey` header plus the session bearer
//! token; row-level scoping by `user_id` is repeated in each query filter
//! as defense in depth, never relied on alone (the services re-check
//! ownership before update/delete).
//!
//! No automatic retries: every failure surfaces once and the user
//! re-triggers the action.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::CoreError;
use crate::types::{
    CalendarEvent, EventFields, Identity, Measurement, Profile, RecoveryGoal,
};

pub struct PostgrestStore {
    http: reqwest::Client,
    rest_root: Url,
    anon_key: String,
    access_token: String,
}

impl PostgrestStore {
    pub fn new(config: &StoreConfig, access_token: String) -> Result<Self, CoreError> {
        let mut base = Url::parse(&config.store_url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let rest_root = base.join("rest/v1/")?;

        Ok(PostgrestStore {
            http: reqwest::Client::new(),
            rest_root,
            anon_key: config.anon_key.clone(),
            access_token,
        })
    }

    fn endpoint(&self, table: &str) -> Result<Url, CoreError> {
        Ok(self.rest_root.join(table)?)
    }

    fn req(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
    }

    /// Send a read and deserialize the row set. 401 maps to
    /// `Unauthenticated`; any other non-success is an `Api` error.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, CoreError> {
        let resp = request.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CoreError::Unauthenticated);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json().await?)
    }

    /// Send a write, discarding any response body.
    async fn execute(&self, request: RequestBuilder) -> Result<(), CoreError> {
        let resp = request.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CoreError::Unauthenticated);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl super::RehabStore for PostgrestStore {
    async fn fetch_profile(&self, who: &Identity) -> Result<Option<Profile>, CoreError> {
        let url = self.endpoint("profiles")?;
        let request = self.req(Method::GET, url).query(&[
            ("id", format!("eq.{}", who.user_id)),
            ("select", "id,name,email".to_string()),
            ("limit", "1".to_string()),
        ]);
        let mut rows: Vec<Profile> = self.fetch_rows(request).await?;
        Ok(rows.pop())
    }

    async fn fetch_latest_measurement(
        &self,
        who: &Identity,
    ) -> Result<Option<Measurement>, CoreError> {
        let url = self.endpoint("measurements")?;
        let request = self.req(Method::GET, url).query(&[
            ("user_id", format!("eq.{}", who.user_id)),
            ("order", "date.desc".to_string()),
            ("limit", "1".to_string()),
        ]);
        let mut rows: Vec<Measurement> = self.fetch_rows(request).await?;
        Ok(rows.pop())
    }

    async fn fetch_goal(&self, who: &Identity) -> Result<Option<RecoveryGoal>, CoreError> {
        let url = self.endpoint("recovery_goals")?;
        let request = self.req(Method::GET, url).query(&[
            ("user_id", format!("eq.{}", who.user_id)),
            ("select", "goal_description,target_date".to_string()),
            ("limit", "1".to_string()),
        ]);
        let mut rows: Vec<RecoveryGoal> = self.fetch_rows(request).await?;
        Ok(rows.pop())
    }

    async fn fetch_events(&self, who: &Identity) -> Result<Vec<CalendarEvent>, CoreError> {
        let url = self.endpoint("calendar_events")?;
        let request = self.req(Method::GET, url).query(&[
            ("user_id", format!("eq.{}", who.user_id)),
            ("order", "event_date.asc".to_string()),
        ]);
        let rows: Vec<EventRow> = self.fetch_rows(request).await?;
        Ok(rows.into_iter().map(CalendarEvent::from).collect())
    }

    async fn fetch_event(
        &self,
        who: &Identity,
        event_id: &str,
    ) -> Result<Option<CalendarEvent>, CoreError> {
        let url = self.endpoint("calendar_events")?;
        let request = self.req(Method::GET, url).query(&[
            ("id", format!("eq.{}", event_id)),
            ("user_id", format!("eq.{}", who.user_id)),
            ("limit", "1".to_string()),
        ]);
        let mut rows: Vec<EventRow> = self.fetch_rows(request).await?;
        Ok(rows.pop().map(CalendarEvent::from))
    }

    async fn insert_goal(&self, who: &Identity, goal: &RecoveryGoal) -> Result<(), CoreError> {
        let url = self.endpoint("recovery_goals")?;
        let payload = GoalInsertRow {
            user_id: who.user_id,
            goal_description: &goal.goal_description,
            target_date: goal.target_date,
        };
        let request = self.req(Method::POST, url).json(&payload);
        self.execute(request).await
    }

    async fn update_goal(&self, who: &Identity, goal: &RecoveryGoal) -> Result<(), CoreError> {
        let url = self.endpoint("recovery_goals")?;
        let payload = GoalUpdateRow {
            goal_description: &goal.goal_description,
            target_date: goal.target_date,
        };
        let request = self
            .req(Method::PATCH, url)
            .query(&[("user_id", format!("eq.{}", who.user_id))])
            .json(&payload);
        self.execute(request).await
    }

    async fn insert_event(&self, who: &Identity, fields: &EventFields) -> Result<(), CoreError> {
        let url = self.endpoint("calendar_events")?;
        let payload = EventInsertRow {
            user_id: who.user_id,
            event_name: &fields.event_name,
            event_date: fields.event_date,
            description: fields.description.as_deref(),
        };
        let request = self.req(Method::POST, url).json(&payload);
        self.execute(request).await
    }

    async fn update_event(
        &self,
        who: &Identity,
        event_id: &str,
        fields: &EventFields,
    ) -> Result<(), CoreError> {
        let url = self.endpoint("calendar_events")?;
        let payload = EventUpdateRow {
            event_name: &fields.event_name,
            event_date: fields.event_date,
            description: fields.description.as_deref(),
        };
        let request = self
            .req(Method::PATCH, url)
            .query(&[
                ("id", format!("eq.{}", event_id)),
                ("user_id", format!("eq.{}", who.user_id)),
            ])
            .json(&payload);
        self.execute(request).await
    }

    async fn delete_event(&self, who: &Identity, event_id: &str) -> Result<(), CoreError> {
        let url = self.endpoint("calendar_events")?;
        let request = self.req(Method::DELETE, url).query(&[
            ("id", format!("eq.{}", event_id)),
            ("user_id", format!("eq.{}", who.user_id)),
        ]);
        self.execute(request).await
    }

    async fn insert_measurement(
        &self,
        who: &Identity,
        measurement: &Measurement,
    ) -> Result<(), CoreError> {
        let url = self.endpoint("measurements")?;
        let payload = MeasurementWriteRow {
            user_id: who.user_id,
            date: measurement.date,
            rom_flexion: measurement.rom_flexion,
            rom_extension: measurement.rom_extension,
            quad_strength_ratio: measurement.quad_strength_ratio,
            pain_level: measurement.pain_level,
            swelling_circumference_cm: measurement.swelling_circumference_cm,
            single_leg_balance_seconds: measurement.single_leg_balance_seconds,
        };
        let request = self.req(Method::POST, url).json(&payload);
        self.execute(request).await
    }

    async fn update_profile_name(&self, who: &Identity, name: &str) -> Result<(), CoreError> {
        let url = self.endpoint("profiles")?;
        let request = self
            .req(Method::PATCH, url)
            .query(&[("id", format!("eq.{}", who.user_id))])
            .json(&serde_json::json!({ "name": name }));
        self.execute(request).await
    }
}

// ============================================================================
// Wire row types (store contract field names, snake_case)
// ============================================================================

/// Event row as returned by the store. The id column's concrete type is
/// the store's business; both numeric and string keys deserialize.
#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    event_name: String,
    event_date: chrono::NaiveDate,
    #[serde(default)]
    description: Option<String>,
}

impl From<EventRow> for CalendarEvent {
    fn from(row: EventRow) -> Self {
        CalendarEvent {
            id: row.id,
            event_name: row.event_name,
            event_date: row.event_date,
            description: row.description,
        }
    }
}

#[derive(Debug, Serialize)]
struct GoalInsertRow<'a> {
    user_id: Uuid,
    goal_description: &'a str,
    target_date: chrono::NaiveDate,
}

#[derive(Debug, Serialize)]
struct GoalUpdateRow<'a> {
    goal_description: &'a str,
    target_date: chrono::NaiveDate,
}

#[derive(Debug, Serialize)]
struct EventInsertRow<'a> {
    user_id: Uuid,
    event_name: &'a str,
    event_date: chrono::NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Update body. PATCH only touches columns present in the body, so
/// `description` is always serialized — clearing it must write an
/// explicit null, not leave the old text behind.
#[derive(Debug, Serialize)]
struct EventUpdateRow<'a> {
    event_name: &'a str,
    event_date: chrono::NaiveDate,
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct MeasurementWriteRow {
    user_id: Uuid,
    date: chrono::NaiveDate,
    rom_flexion: f64,
    rom_extension: f64,
    quad_strength_ratio: f64,
    pain_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    swelling_circumference_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    single_leg_balance_seconds: Option<f64>,
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Str(String),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_row_accepts_numeric_and_string_ids() {
        let numeric: EventRow = serde_json::from_str(
            r#"{"id": 42, "event_name": "PT session", "event_date": "2025-03-01"}"#,
        )
        .unwrap();
        assert_eq!(numeric.id, "42");

        let stringy: EventRow = serde_json::from_str(
            r#"{"id": "a1b2", "event_name": "Check-up", "event_date": "2025-03-02", "description": "bring scans"}"#,
        )
        .unwrap();
        assert_eq!(stringy.id, "a1b2");
        assert_eq!(stringy.description.as_deref(), Some("bring scans"));
    }

    #[test]
    fn rest_root_normalizes_trailing_slash() {
        let config = StoreConfig {
            store_url: "https://store.example".to_string(),
            anon_key: "anon".to_string(),
        };
        let store = PostgrestStore::new(&config, "tok".to_string()).unwrap();
        assert_eq!(
            store.endpoint("profiles").unwrap().as_str(),
            "https://store.example/rest/v1/profiles"
        );
    }

    #[test]
    fn insert_payload_omits_absent_description() {
        let row = EventInsertRow {
            user_id: Uuid::new_v4(),
            event_name: "PT",
            event_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("user_id").is_some());
        assert!(json.get("description").is_none());
    }

    // A blanked description must reach the wire as an explicit null on
    // update, otherwise the PATCH leaves the old text in place.
    #[test]
    fn clearing_description_patches_null() {
        let form = crate::types::EventInput {
            event_name: "PT session".to_string(),
            event_date: Some(chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            description: "   ".to_string(),
        };
        let fields = crate::services::events::validate_event(&form).unwrap();

        let row = EventUpdateRow {
            event_name: &fields.event_name,
            event_date: fields.event_date,
            description: fields.description.as_deref(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("user_id").is_none());
        assert_eq!(json.get("description"), Some(&serde_json::Value::Null));
    }
}
