use kv_store::cache_key;

// Key shapes are load-bearing: the invalidation handlers pattern-match on
// them, so changing a format string here changes eviction behavior.

// Index of club ids per place - cached separately from the club records
// themselves, so an index may reference an id whose item entry expired.
cache_key!(ClubsInPlaceKey::<Vec<i64>> => "clubsInPlace-{}"[place_id: str]);

// Individual club records, addressable outside any place index.
cache_key!(ClubKey::<booking_models::Club> => "club-{}"[club_id: i64]);

// Whole per-club court list; there is no per-court entry.
cache_key!(CourtsKey::<Vec<booking_models::Court>> => "courts-{}"[club_id: i64]);

// Per court-day availability list.
cache_key!(SlotsKey::<Vec<booking_models::Slot>> => "slots:{}:{}:{}"[club_id: i64, court_id: i64, date: chrono::NaiveDate]);

/// Scan pattern matching every cached slot day of every court of a club.
pub fn club_slots_pattern(club_id: i64) -> String {
    format!("slots:{club_id}:*")
}
