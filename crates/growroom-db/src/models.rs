//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the growroom-types API models.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use growroom_types::models::{GrowPhase, Plant, PlantType, Room, User};

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub location: String,
    pub is_active: bool,
    pub created_at: String,
}

pub struct RoomRow {
    pub id: i64,
    pub id_user: i64,
    pub name_room: String,
    pub created_at: String,
}

pub struct PlantRow {
    pub id: i64,
    pub id_room: i64,
    pub name_plant: String,
    pub type_plant: i64,
    pub grow_phase: i64,
    pub sensor_number: i64,
    pub created_at: String,
}

/// Shared shape of the two seeded reference tables.
pub struct LookupRow {
    pub id: i64,
    pub name: String,
}

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS" without timezone.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            location: row.location,
            is_active: row.is_active,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id,
            user_id: row.id_user,
            name: row.name_room,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

impl From<PlantRow> for Plant {
    fn from(row: PlantRow) -> Self {
        Self {
            id: row.id,
            room_id: row.id_room,
            name: row.name_plant,
            type_id: row.type_plant,
            grow_phase_id: row.grow_phase,
            // CHECK constraint keeps this within u32
            sensor_count: u32::try_from(row.sensor_number).unwrap_or_default(),
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

impl From<LookupRow> for PlantType {
    fn from(row: LookupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<LookupRow> for GrowPhase {
    fn from(row: LookupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
