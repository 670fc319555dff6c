use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use booking_models::{Club, Court, Slot, Zone};
use chrono::NaiveDate;
use origin_client::{OriginClient, OriginError, OriginResult};
use tokio::time::sleep;

/// [`OriginClient`] spy with canned data and per-method call counters.
///
/// Failure injection is per entity so tests can fail exactly one fetch in
/// the middle of a fan-out. Optional latency forces overlap between
/// concurrent callers, which is how the stampede behavior gets exercised.
#[derive(Default)]
pub struct RecordingOrigin {
    zones: Vec<Zone>,
    clubs_by_place: HashMap<String, Vec<Club>>,
    clubs_by_id: HashMap<i64, Club>,
    courts_by_club: HashMap<i64, Vec<Court>>,
    slots: HashMap<(i64, i64, NaiveDate), Vec<Slot>>,
    failing_places: HashSet<String>,
    failing_clubs: HashSet<i64>,
    failing_court_lists: HashSet<i64>,
    latency: Option<Duration>,
    pub calls: OriginCallCounts,
}

#[derive(Default)]
pub struct OriginCallCounts {
    pub list_zones: AtomicUsize,
    pub list_clubs: AtomicUsize,
    pub get_club: AtomicUsize,
    pub list_courts: AtomicUsize,
    pub list_slots: AtomicUsize,
}

impl OriginCallCounts {
    pub fn total(&self) -> usize {
        self.list_zones.load(Ordering::SeqCst)
            + self.list_clubs.load(Ordering::SeqCst)
            + self.get_club.load(Ordering::SeqCst)
            + self.list_courts.load(Ordering::SeqCst)
            + self.list_slots.load(Ordering::SeqCst)
    }
}

impl RecordingOrigin {
    pub fn new() -> Self { Self::default() }

    pub fn with_zone(mut self, place_id: &str) -> Self {
        self.zones.push(Zone {
            place_id: place_id.to_string(),
        });
        self
    }

    /// Seed the clubs of a place; each club also becomes fetchable by id.
    pub fn with_clubs(mut self, place_id: &str, clubs: Vec<Club>) -> Self {
        for club in &clubs {
            self.clubs_by_id.insert(club.id, club.clone());
        }
        self.clubs_by_place.insert(place_id.to_string(), clubs);
        self
    }

    /// Seed or replace a single club record.
    pub fn with_club(mut self, club: Club) -> Self {
        self.clubs_by_id.insert(club.id, club);
        self
    }

    pub fn with_courts(mut self, club_id: i64, courts: Vec<Court>) -> Self {
        self.courts_by_club.insert(club_id, courts);
        self
    }

    pub fn with_slots(
        mut self, club_id: i64, court_id: i64, date: NaiveDate,
        slots: Vec<Slot>,
    ) -> Self {
        self.slots.insert((club_id, court_id, date), slots);
        self
    }

    pub fn failing_list_clubs(mut self, place_id: &str) -> Self {
        self.failing_places.insert(place_id.to_string());
        self
    }

    pub fn failing_get_club(mut self, club_id: i64) -> Self {
        self.failing_clubs.insert(club_id);
        self
    }

    pub fn failing_list_courts(mut self, club_id: i64) -> Self {
        self.failing_court_lists.insert(club_id);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            sleep(latency).await;
        }
    }
}

#[async_trait]
impl OriginClient for RecordingOrigin {
    async fn list_zones(&self) -> OriginResult<Vec<Zone>> {
        self.calls.list_zones.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        Ok(self.zones.clone())
    }

    async fn list_clubs(&self, place_id: &str) -> OriginResult<Vec<Club>> {
        self.calls.list_clubs.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.failing_places.contains(place_id) {
            return Err(OriginError::Other(format!(
                "list_clubs({place_id}) rigged to fail"
            )));
        }
        Ok(self
            .clubs_by_place
            .get(place_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_club(&self, club_id: i64) -> OriginResult<Club> {
        self.calls.get_club.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.failing_clubs.contains(&club_id) {
            return Err(OriginError::Other(format!(
                "get_club({club_id}) rigged to fail"
            )));
        }
        self.clubs_by_id.get(&club_id).cloned().ok_or_else(|| {
            OriginError::Other(format!("no club {club_id} seeded"))
        })
    }

    async fn list_courts(&self, club_id: i64) -> OriginResult<Vec<Court>> {
        self.calls.list_courts.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.failing_court_lists.contains(&club_id) {
            return Err(OriginError::Other(format!(
                "list_courts({club_id}) rigged to fail"
            )));
        }
        Ok(self
            .courts_by_club
            .get(&club_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_slots(
        &self, club_id: i64, court_id: i64, date: NaiveDate,
    ) -> OriginResult<Vec<Slot>> {
        self.calls.list_slots.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        Ok(self
            .slots
            .get(&(club_id, court_id, date))
            .cloned()
            .unwrap_or_default())
    }
}
