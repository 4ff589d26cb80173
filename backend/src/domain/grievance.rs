//! Grievance records and their value types.
//!
//! A [`GrievanceRecord`] is created from a [`GrievanceDraft`] when a
//! complaint is submitted and is afterwards only touched by status updates.
//! Records are never deleted.
//!
//! Serialisation follows the snapshot file layout: snake_case keys except
//! `productValue` and `dealerInfo`, which keep the camelCase names existing
//! callers send.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// User identifier recorded when a submission does not name one.
pub const UNKNOWN_USER_ID: &str = "UNKNOWN";

const ID_PREFIX: &str = "GRV_";

/// Identifier of a grievance, formatted `GRV_####`.
///
/// The numeric part is zero-padded to four digits and grows beyond that
/// once the sequence passes 9999.
///
/// # Examples
/// ```
/// use grievance_backend::domain::GrievanceId;
///
/// assert_eq!(GrievanceId::from_sequence(7).as_str(), "GRV_0007");
/// assert_eq!(GrievanceId::from_sequence(12_345).as_str(), "GRV_12345");
/// assert_eq!(GrievanceId::new("GRV_0042").sequence(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrievanceId(String);

impl GrievanceId {
    /// Wrap an identifier received from a caller or a snapshot.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Format the identifier for counter value `sequence`.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("{ID_PREFIX}{sequence:04}"))
    }

    /// Counter value encoded in the identifier, if it has the `GRV_` shape.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(ID_PREFIX)?.parse().ok()
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for GrievanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a grievance.
///
/// `pending` is the only status the service assigns itself; updates may set
/// any caller-defined string such as `resolved` or `submitted`. A status may
/// also be unset: older snapshots carry `null` or omit the key, and updates
/// may leave it out. An unset status is never pending and serialises as
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrievanceStatus(#[serde(deserialize_with = "lenient_text")] Option<String>);

impl GrievanceStatus {
    /// Text of the status assigned at creation.
    pub const PENDING: &'static str = "pending";

    /// Wrap a caller-supplied status.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    /// Status assigned to newly created grievances.
    pub fn pending() -> Self {
        Self::new(Self::PENDING)
    }

    /// Whether the grievance still awaits filing.
    pub fn is_pending(&self) -> bool {
        self.as_str() == Some(Self::PENDING)
    }

    /// Borrow the status text, if one is set.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// ISO-8601 timestamp kept in its textual form.
///
/// Values produced by [`Timestamp::from_datetime`] are UTC with fixed
/// microsecond precision, so ordering the strings orders them in time.
/// Values read from older snapshots are kept verbatim.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Render `instant` as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Borrow the timestamp text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive fields gathered by a caller before submitting a grievance.
///
/// Every field is optional; defaults are applied when the record is built.
/// The descriptive values are opaque JSON, so a numeric `productValue` is
/// stored as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrievanceDraft {
    pub user_id: Option<String>,
    pub state: Option<Value>,
    pub city: Option<Value>,
    pub sector: Option<Value>,
    pub category: Option<Value>,
    pub company: Option<Value>,
    pub grievance: Option<Value>,
    pub product_value: Option<Value>,
    pub dealer_info: Option<Value>,
}

/// Requested status transition for an existing grievance.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub grievance_id: GrievanceId,
    pub status: GrievanceStatus,
    pub submission_data: Value,
}

fn unknown_user_id() -> String {
    UNKNOWN_USER_ID.to_owned()
}

/// Read a loosely typed JSON value as text.
///
/// Strings pass through, `null` reads as `None` and any other value is kept
/// as its compact JSON rendering, so `42` becomes `"42"`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_else(unknown_user_id))
}

/// A stored consumer grievance.
///
/// Loading is lenient so that snapshots written by earlier deployments keep
/// their records: a non-string `user_id` is rendered as text, a `null` one
/// reads as `UNKNOWN`, and a missing or `null` status stays unset.
///
/// ## Invariants
/// - `id` and `created_at` never change after creation.
/// - `updated_at` changes only through [`GrievanceRecord::apply_status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrievanceRecord {
    pub id: GrievanceId,
    #[serde(default = "unknown_user_id", deserialize_with = "lenient_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
    #[serde(default)]
    pub sector: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub company: Option<Value>,
    #[serde(default)]
    pub grievance: Option<Value>,
    #[serde(default, rename = "productValue")]
    pub product_value: Option<Value>,
    #[serde(default, rename = "dealerInfo")]
    pub dealer_info: Option<Value>,
    #[serde(default)]
    pub status: GrievanceStatus,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_data: Option<Value>,
}

impl GrievanceRecord {
    /// Build a pending record from `draft`, stamping both timestamps with `now`.
    pub fn from_draft(id: GrievanceId, draft: GrievanceDraft, now: Timestamp) -> Self {
        let GrievanceDraft {
            user_id,
            state,
            city,
            sector,
            category,
            company,
            grievance,
            product_value,
            dealer_info,
        } = draft;
        Self {
            id,
            user_id: user_id.unwrap_or_else(unknown_user_id),
            state,
            city,
            sector,
            category,
            company,
            grievance,
            product_value,
            dealer_info,
            status: GrievanceStatus::pending(),
            created_at: now.clone(),
            updated_at: now,
            submission_data: None,
        }
    }

    /// Move the record to `status`, recording the submission payload.
    pub fn apply_status(
        &mut self,
        status: GrievanceStatus,
        submission_data: Value,
        now: Timestamp,
    ) {
        self.status = status;
        self.submission_data = Some(submission_data);
        self.updated_at = now;
    }

    /// Whether the record still awaits filing.
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn instant(seconds: u32, micros: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, seconds)
            .single()
            .expect("valid fixture instant")
            + chrono::TimeDelta::microseconds(i64::from(micros))
    }

    #[rstest]
    #[case(1, "GRV_0001")]
    #[case(42, "GRV_0042")]
    #[case(9_999, "GRV_9999")]
    #[case(10_000, "GRV_10000")]
    fn ids_are_zero_padded_to_four_digits(#[case] sequence: u64, #[case] expected: &str) {
        assert_eq!(GrievanceId::from_sequence(sequence).as_str(), expected);
    }

    #[rstest]
    #[case("GRV_0042", Some(42))]
    #[case("GRV_10000", Some(10_000))]
    #[case("GRV_", None)]
    #[case("TICKET_7", None)]
    fn sequence_is_parsed_from_id(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(GrievanceId::new(raw).sequence(), expected);
    }

    #[rstest]
    fn timestamps_order_chronologically() {
        let earlier = Timestamp::from_datetime(instant(9, 999_999));
        let later = Timestamp::from_datetime(instant(10, 0));
        assert_eq!(earlier.as_str(), "2026-10-17T09:30:09.999999Z");
        assert!(earlier < later);
    }

    #[rstest]
    fn draft_without_user_defaults_to_unknown() {
        let now = Timestamp::from_datetime(instant(0, 0));
        let record = GrievanceRecord::from_draft(
            GrievanceId::from_sequence(1),
            GrievanceDraft::default(),
            now.clone(),
        );

        assert_eq!(record.user_id, UNKNOWN_USER_ID);
        assert!(record.is_pending());
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, now);
        assert!(record.submission_data.is_none());
    }

    #[rstest]
    fn apply_status_touches_only_status_fields() {
        let created = Timestamp::from_datetime(instant(0, 0));
        let updated = Timestamp::from_datetime(instant(5, 0));
        let mut record = GrievanceRecord::from_draft(
            GrievanceId::from_sequence(3),
            GrievanceDraft {
                company: Some(json!("ABC Electronics")),
                ..GrievanceDraft::default()
            },
            created.clone(),
        );

        record.apply_status(
            GrievanceStatus::new("submitted"),
            json!({"portal": "nch"}),
            updated.clone(),
        );

        assert_eq!(record.status.as_str(), Some("submitted"));
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, updated);
        assert_eq!(record.company, Some(json!("ABC Electronics")));
        assert_eq!(record.submission_data, Some(json!({"portal": "nch"})));
    }

    #[rstest]
    fn record_serialises_with_legacy_field_names() {
        let record = GrievanceRecord::from_draft(
            GrievanceId::from_sequence(1),
            GrievanceDraft {
                product_value: Some(json!("10000-25000")),
                ..GrievanceDraft::default()
            },
            Timestamp::from_datetime(instant(0, 0)),
        );

        let value = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(value["productValue"], json!("10000-25000"));
        assert_eq!(value["dealerInfo"], Value::Null);
        assert_eq!(value["status"], json!("pending"));
        assert!(value.get("submission_data").is_none());
    }

    #[rstest]
    fn legacy_records_load_with_defaults() {
        let raw = json!({
            "id": "GRV_0009",
            "_id": "GRV_0009",
            "status": "resolved",
            "created_at": "2025-01-02T03:04:05.678901"
        });

        let record: GrievanceRecord = serde_json::from_value(raw).expect("legacy record loads");
        assert_eq!(record.user_id, UNKNOWN_USER_ID);
        assert_eq!(record.created_at.as_str(), "2025-01-02T03:04:05.678901");
        assert_eq!(record.updated_at, Timestamp::default());
        assert!(record.state.is_none());
    }

    #[rstest]
    fn mixed_type_legacy_record_loads_verbatim() {
        let raw = json!({
            "id": "GRV_0004",
            "user_id": 991,
            "city": null,
            "productValue": 15000,
            "dealerInfo": {"name": "Sharma Traders", "gst": "29ABCDE1234F1Z5"},
            "status": null
        });

        let record: GrievanceRecord = serde_json::from_value(raw).expect("mixed record loads");
        assert_eq!(record.user_id, "991");
        assert_eq!(record.product_value, Some(json!(15000)));
        assert_eq!(
            record.dealer_info.as_ref().map(|dealer| &dealer["gst"]),
            Some(&json!("29ABCDE1234F1Z5"))
        );
        assert!(record.city.is_none());
        assert_eq!(record.status.as_str(), None);
        assert!(!record.is_pending());

        let value = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(value["productValue"], json!(15000));
        assert_eq!(value["status"], Value::Null);
    }

    #[rstest]
    #[case(json!({"id": "GRV_0005"}), None, UNKNOWN_USER_ID)]
    #[case(json!({"id": "GRV_0005", "user_id": null, "status": 3}), Some("3"), UNKNOWN_USER_ID)]
    #[case(json!({"id": "GRV_0005", "user_id": true, "status": "pending"}), Some("pending"), "true")]
    fn loose_status_and_user_values_load(
        #[case] raw: Value,
        #[case] status: Option<&str>,
        #[case] user_id: &str,
    ) {
        let record: GrievanceRecord = serde_json::from_value(raw).expect("record loads");
        assert_eq!(record.status.as_str(), status);
        assert_eq!(record.user_id, user_id);
    }
}
