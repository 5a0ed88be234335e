//! Users own rooms, rooms own plants.
//!
//! Every operation runs in one transaction and resolves rooms through their
//! owner, so a room id belonging to someone else behaves exactly like an
//! unknown one.

use rusqlite::Connection;
use tracing::info;

use growroom_db::models::RoomRow;
use growroom_db::{Database, queries};
use growroom_types::api::{CreatePlantRequest, CreateRoomRequest, RenameRoomRequest};
use growroom_types::models::{GrowPhase, Plant, PlantType, Room};

use crate::accounts::required;
use crate::error::ApiError;

fn owned_room(conn: &Connection, user_id: i64, room_id: i64) -> Result<RoomRow, ApiError> {
    queries::room_by_id(conn, room_id)?
        .filter(|room| room.id_user == user_id)
        .ok_or_else(|| ApiError::not_found(format!("Room {room_id} not found")))
}

// -- Rooms --

pub fn create_room(
    db: &Database,
    user_id: i64,
    req: &CreateRoomRequest,
) -> Result<Room, ApiError> {
    let name = required(&req.name_room, "name room")?;
    match req.id_user {
        Some(id) if id == user_id => {}
        Some(_) => {
            return Err(ApiError::validation("id_user does not match the user in the path"));
        }
        None => return Err(ApiError::validation("You need to specify the id user")),
    }

    let room = db.transaction(|conn| {
        if queries::user_by_id(conn, user_id)?.is_none() {
            return Err(ApiError::not_found(format!("User {user_id} not found")));
        }
        let id = queries::insert_room(conn, user_id, name)?;
        owned_room(conn, user_id, id)
    })?;

    info!("User {} created room {} ({})", user_id, room.name_room, room.id);
    Ok(room.into())
}

pub fn list_rooms(db: &Database, user_id: i64) -> Result<Vec<Room>, ApiError> {
    let rows = db.with_conn(|conn| queries::rooms_by_user(conn, user_id))?;
    Ok(rows.into_iter().map(Room::from).collect())
}

pub fn rename_room(
    db: &Database,
    user_id: i64,
    room_id: i64,
    req: &RenameRoomRequest,
) -> Result<Room, ApiError> {
    let name = required(&req.name_room, "name room")?;

    let room = db.transaction(|conn| {
        owned_room(conn, user_id, room_id)?;
        queries::update_room_name(conn, room_id, name)?;
        owned_room(conn, user_id, room_id)
    })?;

    Ok(room.into())
}

/// Rooms that still hold plants are not deleted; the plants must go first.
pub fn delete_room(db: &Database, user_id: i64, room_id: i64) -> Result<Room, ApiError> {
    let room = db.transaction(|conn| {
        let room = owned_room(conn, user_id, room_id)?;

        let plants = queries::count_plants_in_room(conn, room_id)?;
        if plants > 0 {
            return Err(ApiError::Conflict(format!(
                "Room {room_id} still has {plants} plant(s); remove them first"
            )));
        }

        queries::delete_room(conn, room_id)?;
        Ok(room)
    })?;

    info!("User {} deleted room {}", user_id, room_id);
    Ok(room.into())
}

// -- Plants --

pub fn create_plant(
    db: &Database,
    user_id: i64,
    room_id: i64,
    req: &CreatePlantRequest,
) -> Result<Plant, ApiError> {
    match req.id_room {
        Some(id) if id == room_id => {}
        Some(_) => {
            return Err(ApiError::validation("id_room does not match the room in the path"));
        }
        None => return Err(ApiError::validation("You need to specify the id room")),
    }
    let name = required(&req.name_plant, "name of the plant")?;
    let type_id = req
        .type_plant
        .ok_or_else(|| ApiError::validation("You need to specify the type of plant"))?;
    let grow_phase_id = req
        .grow_phase
        .ok_or_else(|| ApiError::validation("You need to specify the grow phase"))?;
    let sensor_number = u32::try_from(req.sensor_number.unwrap_or(0)).map_err(|_| {
        ApiError::validation(format!(
            "sensor_number must be between 0 and {}",
            u32::MAX
        ))
    })?;

    let plant = db.transaction(|conn| {
        owned_room(conn, user_id, room_id)?;
        if queries::plant_type_by_id(conn, type_id)?.is_none() {
            return Err(ApiError::not_found(format!("Plant type {type_id} not found")));
        }
        if queries::grow_phase_by_id(conn, grow_phase_id)?.is_none() {
            return Err(ApiError::not_found(format!(
                "Grow phase {grow_phase_id} not found"
            )));
        }

        let id = queries::insert_plant(
            conn,
            room_id,
            name,
            type_id,
            grow_phase_id,
            i64::from(sensor_number),
        )?;
        queries::plant_in_room(conn, id, room_id)?
            .ok_or_else(|| ApiError::Internal(format!("plant {id} vanished after insert")))
    })?;

    info!(
        "Added plant {} ({}) to room {}",
        plant.name_plant, plant.id, room_id
    );
    Ok(plant.into())
}

pub fn list_plants(
    db: &Database,
    user_id: i64,
    room_id: i64,
) -> Result<Vec<Plant>, ApiError> {
    let rows = db.transaction(|conn| {
        owned_room(conn, user_id, room_id)?;
        Ok::<_, ApiError>(queries::plants_by_room(conn, room_id)?)
    })?;
    Ok(rows.into_iter().map(Plant::from).collect())
}

pub fn get_plant(
    db: &Database,
    user_id: i64,
    room_id: i64,
    plant_id: i64,
) -> Result<Plant, ApiError> {
    let plant = db.transaction(|conn| {
        owned_room(conn, user_id, room_id)?;
        queries::plant_in_room(conn, plant_id, room_id)?.ok_or_else(|| {
            ApiError::not_found(format!("Plant {plant_id} not found in room {room_id}"))
        })
    })?;
    Ok(plant.into())
}

pub fn delete_plant(
    db: &Database,
    user_id: i64,
    room_id: i64,
    plant_id: i64,
) -> Result<Plant, ApiError> {
    let plant = db.transaction(|conn| {
        owned_room(conn, user_id, room_id)?;
        let plant = queries::plant_in_room(conn, plant_id, room_id)?.ok_or_else(|| {
            ApiError::not_found(format!("Plant {plant_id} not found in room {room_id}"))
        })?;
        queries::delete_plant(conn, plant_id)?;
        Ok::<_, ApiError>(plant)
    })?;

    info!("Removed plant {} from room {}", plant_id, room_id);
    Ok(plant.into())
}

// -- Reference tables --

pub fn list_grow_phases(db: &Database) -> Result<Vec<GrowPhase>, ApiError> {
    Ok(db
        .get_grow_phases()?
        .into_iter()
        .map(GrowPhase::from)
        .collect())
}

pub fn list_plant_types(db: &Database) -> Result<Vec<PlantType>, ApiError> {
    Ok(db
        .get_plant_types()?
        .into_iter()
        .map(PlantType::from)
        .collect())
}
