use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            location    TEXT NOT NULL,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS plant_types (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS grow_phases (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS rooms (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            id_user     INTEGER NOT NULL REFERENCES users(id),
            name_room   TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_rooms_user
            ON rooms(id_user);

        -- Rooms with plants cannot be deleted
        CREATE TABLE IF NOT EXISTS plants (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            id_room         INTEGER NOT NULL REFERENCES rooms(id) ON DELETE RESTRICT,
            name_plant      TEXT NOT NULL,
            type_plant      INTEGER NOT NULL REFERENCES plant_types(id),
            grow_phase      INTEGER NOT NULL REFERENCES grow_phases(id),
            sensor_number   INTEGER NOT NULL DEFAULT 0
                            CHECK (sensor_number BETWEEN 0 AND 4294967295),
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_plants_room
            ON plants(id_room);

        -- Seed the reference tables
        INSERT OR IGNORE INTO plant_types (id, name) VALUES
            (1, 'Herb'),
            (2, 'Vegetable'),
            (3, 'Fruit'),
            (4, 'Flower'),
            (5, 'Succulent');

        INSERT OR IGNORE INTO grow_phases (id, name) VALUES
            (1, 'Germination'),
            (2, 'Seedling'),
            (3, 'Vegetative'),
            (4, 'Flowering'),
            (5, 'Harvest');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
