use chrono::NaiveTime;
use infra::models::UserRow;
use infra::slots::Slot;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

/// User shape returned over the wire; never the row itself, which carries
/// the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct ApiUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub owner_id: Option<Uuid>,
    pub is_active: bool,
}

impl From<UserRow> for ApiUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            phone: row.phone,
            role: row.role,
            owner_id: row.owner_id,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiSlot {
    pub start: String,
    pub end: String,
}

impl From<Slot> for ApiSlot {
    fn from(slot: Slot) -> Self {
        Self {
            start: minutes_to_hhmm(slot.start_minute),
            end: minutes_to_hhmm(slot.end_minute),
        }
    }
}

pub fn minutes_to_hhmm(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse "HH:MM" into minutes past midnight. "24:00" is accepted as the
/// end-of-day sentinel for booking end times.
pub fn hhmm_to_minutes(value: &str) -> Result<i32, AppError> {
    if value == "24:00" {
        return Ok(1440);
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::BadRequest(format!("invalid time '{value}', expected HH:MM")))?;
    Ok(time.signed_duration_since(NaiveTime::MIN).num_minutes() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_conversions() {
        assert_eq!(hhmm_to_minutes("06:00").unwrap(), 360);
        assert_eq!(hhmm_to_minutes("23:30").unwrap(), 1410);
        assert_eq!(hhmm_to_minutes("24:00").unwrap(), 1440);
        assert!(hhmm_to_minutes("25:00").is_err());
        assert!(hhmm_to_minutes("junk").is_err());

        assert_eq!(minutes_to_hhmm(360), "06:00");
        assert_eq!(minutes_to_hhmm(1410), "23:30");
    }
}
