use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of an account. The password hash never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub location: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    #[serde(rename = "id_user")]
    pub user_id: i64,
    #[serde(rename = "name_room")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    #[serde(rename = "id_room")]
    pub room_id: i64,
    #[serde(rename = "name_plant")]
    pub name: String,
    #[serde(rename = "type_plant")]
    pub type_id: i64,
    #[serde(rename = "grow_phase")]
    pub grow_phase_id: i64,
    #[serde(rename = "sensor_number")]
    pub sensor_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Read-only reference row, seeded by the schema migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantType {
    pub id: i64,
    pub name: String,
}

/// Read-only reference row, seeded by the schema migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowPhase {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_uses_wire_field_names() {
        let plant = Plant {
            id: 7,
            room_id: 3,
            name: "Basil".into(),
            type_id: 1,
            grow_phase_id: 2,
            sensor_count: 4,
            created_at: DateTime::default(),
        };

        let value = serde_json::to_value(&plant).unwrap();
        assert_eq!(value["id_room"], 3);
        assert_eq!(value["name_plant"], "Basil");
        assert_eq!(value["type_plant"], 1);
        assert_eq!(value["grow_phase"], 2);
        assert_eq!(value["sensor_number"], 4);
    }

    #[test]
    fn user_has_no_password_field() {
        let user = User {
            id: 1,
            username: "alice".into(),
            email: "a@x.com".into(),
            location: "NY".into(),
            is_active: true,
            created_at: DateTime::default(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "a@x.com");
    }
}
