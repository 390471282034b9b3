use crate::error::{RateEngineError, Result};
use crate::schema::{HotelSnapshot, Reservation, Room, RoomType, Service, ServiceOrder};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// Read side of the hosted document store, scoped to one hotel.
///
/// Implementations return complete collections already converted to plain
/// records (see [`crate::ingestion`]); the aggregators never see partial or
/// streamed data.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn rooms(&self, hotel_id: &str) -> Result<Vec<Room>>;

    async fn room_types(&self, hotel_id: &str) -> Result<Vec<RoomType>>;

    async fn reservations(&self, hotel_id: &str) -> Result<Vec<Reservation>>;

    async fn service_orders(&self, hotel_id: &str) -> Result<Vec<ServiceOrder>>;

    async fn services(&self, hotel_id: &str) -> Result<Vec<Service>>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    hotels: RwLock<HashMap<String, HotelSnapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`InMemoryStore::insert_hotel`]. The store is owned
    /// here, so a poisoned lock is recovered rather than reported.
    pub fn with_hotel(mut self, hotel_id: impl Into<String>, snapshot: HotelSnapshot) -> Self {
        self.hotels
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hotel_id.into(), snapshot);
        self
    }

    pub fn insert_hotel(&self, hotel_id: impl Into<String>, snapshot: HotelSnapshot) -> Result<()> {
        self.hotels
            .write()
            .map_err(|_| RateEngineError::StoreError("store lock poisoned".to_string()))?
            .insert(hotel_id.into(), snapshot);
        Ok(())
    }

    /// Loads one hotel's snapshot from a JSON file shaped like [`HotelSnapshot`].
    pub fn load_hotel_file(&self, hotel_id: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let snapshot: HotelSnapshot = serde_json::from_str(&json)?;
        self.insert_hotel(hotel_id, snapshot)
    }

    fn read<T>(&self, hotel_id: &str, select: impl FnOnce(&HotelSnapshot) -> Vec<T>) -> Result<Vec<T>> {
        let hotels = self
            .hotels
            .read()
            .map_err(|_| RateEngineError::StoreError("store lock poisoned".to_string()))?;
        hotels
            .get(hotel_id)
            .map(select)
            .ok_or_else(|| RateEngineError::StoreError(format!("unknown hotel '{}'", hotel_id)))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn rooms(&self, hotel_id: &str) -> Result<Vec<Room>> {
        self.read(hotel_id, |h| h.rooms.clone())
    }

    async fn room_types(&self, hotel_id: &str) -> Result<Vec<RoomType>> {
        self.read(hotel_id, |h| h.room_types.clone())
    }

    async fn reservations(&self, hotel_id: &str) -> Result<Vec<Reservation>> {
        self.read(hotel_id, |h| h.reservations.clone())
    }

    async fn service_orders(&self, hotel_id: &str) -> Result<Vec<ServiceOrder>> {
        self.read(hotel_id, |h| h.service_orders.clone())
    }

    async fn services(&self, hotel_id: &str) -> Result<Vec<Service>> {
        self.read(hotel_id, |h| h.services.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn snapshot() -> HotelSnapshot {
        HotelSnapshot {
            rooms: vec![Room {
                id: "101".to_string(),
                hotel_id: "h1".to_string(),
                room_number: Some("101".to_string()),
                room_type_id: None,
            }],
            room_types: vec![RoomType::new("rt", "Standard", 90.0)],
            ..HotelSnapshot::default()
        }
    }

    #[test]
    fn test_reads_by_hotel() {
        let store = InMemoryStore::new().with_hotel("h1", snapshot());

        let rooms = block_on(store.rooms("h1")).unwrap();
        assert_eq!(rooms.len(), 1);
        let room_types = block_on(store.room_types("h1")).unwrap();
        assert_eq!(room_types[0].name, "Standard");
        assert!(block_on(store.reservations("h1")).unwrap().is_empty());
    }

    #[test]
    fn test_with_hotel_recovers_poisoned_lock() {
        let store = InMemoryStore::new();
        std::thread::scope(|s| {
            let handle = s.spawn(|| {
                let _guard = store.hotels.write().unwrap();
                panic!("writer died holding the lock");
            });
            assert!(handle.join().is_err());
        });
        assert!(store.hotels.is_poisoned());

        let store = store.with_hotel("h1", snapshot());
        let hotels = store.hotels.into_inner().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(hotels["h1"].rooms[0].id, "101");
    }

    #[test]
    fn test_unknown_hotel_is_store_error() {
        let store = InMemoryStore::new();
        assert!(matches!(
            block_on(store.rooms("nope")),
            Err(RateEngineError::StoreError(_))
        ));
    }

    #[test]
    fn test_load_hotel_file() {
        let path = std::env::temp_dir().join("hotel-rate-analytics-store-test.json");
        std::fs::write(&path, serde_json::to_string(&snapshot()).unwrap()).unwrap();

        let store = InMemoryStore::new();
        store.load_hotel_file("h1", &path).unwrap();
        assert_eq!(block_on(store.rooms("h1")).unwrap()[0].id, "101");

        std::fs::remove_file(&path).ok();
    }
}
