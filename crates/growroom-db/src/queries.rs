//! Per-record create/read/update/delete statements.
//!
//! The free functions take a `&Connection` so callers can compose several of
//! them inside one [`Database::transaction`]. The `Database` methods are
//! shortcuts for single reads.

use rusqlite::{Connection, Row};

use crate::models::{LookupRow, PlantRow, RoomRow, UserRow};
use crate::{Database, Result};

impl Database {
    // -- Users --

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_id(conn, id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_email(conn, email))
    }

    pub fn get_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(list_users)
    }

    // -- Reference tables --

    pub fn get_plant_types(&self) -> Result<Vec<LookupRow>> {
        self.with_conn(list_plant_types)
    }

    pub fn get_grow_phases(&self) -> Result<Vec<LookupRow>> {
        self.with_conn(list_grow_phases)
    }
}

// -- Users --

const USER_COLUMNS: &str = "id, username, email, password, location, is_active, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        location: row.get(4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    location: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password, location, is_active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        (username, email, password_hash, location),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    conn.query_row(&sql, [id], map_user).optional()
}

pub fn user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    conn.query_row(&sql, [email], map_user).optional()
}

pub fn user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
    conn.query_row(&sql, [username], map_user).optional()
}

pub fn list_users(conn: &Connection) -> Result<Vec<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], map_user)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -- Rooms --

fn map_room(row: &Row<'_>) -> rusqlite::Result<RoomRow> {
    Ok(RoomRow {
        id: row.get(0)?,
        id_user: row.get(1)?,
        name_room: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn insert_room(conn: &Connection, id_user: i64, name_room: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO rooms (id_user, name_room) VALUES (?1, ?2)",
        (id_user, name_room),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn room_by_id(conn: &Connection, id: i64) -> Result<Option<RoomRow>> {
    conn.query_row(
        "SELECT id, id_user, name_room, created_at FROM rooms WHERE id = ?1",
        [id],
        map_room,
    )
    .optional()
}

pub fn rooms_by_user(conn: &Connection, id_user: i64) -> Result<Vec<RoomRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, id_user, name_room, created_at FROM rooms WHERE id_user = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([id_user], map_room)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Returns the number of rows changed (0 when the room does not exist).
pub fn update_room_name(conn: &Connection, id: i64, name_room: &str) -> Result<usize> {
    Ok(conn.execute(
        "UPDATE rooms SET name_room = ?2 WHERE id = ?1",
        (id, name_room),
    )?)
}

pub fn delete_room(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM rooms WHERE id = ?1", [id])?)
}

// -- Plants --

const PLANT_COLUMNS: &str =
    "id, id_room, name_plant, type_plant, grow_phase, sensor_number, created_at";

fn map_plant(row: &Row<'_>) -> rusqlite::Result<PlantRow> {
    Ok(PlantRow {
        id: row.get(0)?,
        id_room: row.get(1)?,
        name_plant: row.get(2)?,
        type_plant: row.get(3)?,
        grow_phase: row.get(4)?,
        sensor_number: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn insert_plant(
    conn: &Connection,
    id_room: i64,
    name_plant: &str,
    type_plant: i64,
    grow_phase: i64,
    sensor_number: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO plants (id_room, name_plant, type_plant, grow_phase, sensor_number)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id_room, name_plant, type_plant, grow_phase, sensor_number],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Looks a plant up only within the given room.
pub fn plant_in_room(conn: &Connection, id: i64, id_room: i64) -> Result<Option<PlantRow>> {
    let sql = format!("SELECT {PLANT_COLUMNS} FROM plants WHERE id = ?1 AND id_room = ?2");
    conn.query_row(&sql, [id, id_room], map_plant).optional()
}

pub fn plants_by_room(conn: &Connection, id_room: i64) -> Result<Vec<PlantRow>> {
    let sql = format!("SELECT {PLANT_COLUMNS} FROM plants WHERE id_room = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([id_room], map_plant)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_plants_in_room(conn: &Connection, id_room: i64) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM plants WHERE id_room = ?1",
        [id_room],
        |row| row.get(0),
    )?)
}

pub fn delete_plant(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM plants WHERE id = ?1", [id])?)
}

// -- Reference tables --

fn map_lookup(row: &Row<'_>) -> rusqlite::Result<LookupRow> {
    Ok(LookupRow {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub fn plant_type_by_id(conn: &Connection, id: i64) -> Result<Option<LookupRow>> {
    conn.query_row(
        "SELECT id, name FROM plant_types WHERE id = ?1",
        [id],
        map_lookup,
    )
    .optional()
}

pub fn grow_phase_by_id(conn: &Connection, id: i64) -> Result<Option<LookupRow>> {
    conn.query_row(
        "SELECT id, name FROM grow_phases WHERE id = ?1",
        [id],
        map_lookup,
    )
    .optional()
}

pub fn list_plant_types(conn: &Connection) -> Result<Vec<LookupRow>> {
    let mut stmt = conn.prepare("SELECT id, name FROM plant_types ORDER BY id")?;
    let rows = stmt
        .query_map([], map_lookup)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_grow_phases(conn: &Connection) -> Result<Vec<LookupRow>> {
    let mut stmt = conn.prepare("SELECT id, name FROM grow_phases ORDER BY id")?;
    let rows = stmt
        .query_map([], map_lookup)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
