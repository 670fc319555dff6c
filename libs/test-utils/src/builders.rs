use booking_models::{Club, Court, OpenHours, Slot};
use chrono::NaiveDate;

pub fn club(id: i64) -> Club {
    Club {
        id,
        name: format!("Club {id}"),
        permalink: None,
        open_hours: None,
    }
}

pub fn club_with_open_hours(id: i64) -> Club {
    Club {
        open_hours: Some(vec![OpenHours {
            day_of_week: 1,
            open_time: "09:00".to_string(),
            close_time: "22:00".to_string(),
        }]),
        ..club(id)
    }
}

pub fn court(id: i64) -> Court {
    Court {
        id,
        name: format!("Court {id}"),
        sports: None,
    }
}

pub fn slot(datetime: &str) -> Slot {
    Slot {
        price: 1200.0,
        duration: 60,
        datetime: datetime.parse().expect("test datetime parses"),
        start: "09:00".to_string(),
        end: "10:00".to_string(),
        priority: 0,
    }
}

pub fn date(value: &str) -> NaiveDate {
    value.parse().expect("test date parses")
}
