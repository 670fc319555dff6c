use async_trait::async_trait;
use booking_models::{Club, Court, Slot, Zone};
use chrono::NaiveDate;
use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::{OriginClient, OriginConfig, OriginResult};

/// HTTP implementation of [`OriginClient`].
///
/// Paths mirror the upstream API: `/zones`, `/clubs?placeId=`,
/// `/clubs/{id}`, `/clubs/{id}/courts`,
/// `/clubs/{id}/courts/{id}/slots?date=`.
pub struct HttpOriginClient {
    http: Client,
    base_url: Url,
}

impl HttpOriginClient {
    pub fn new(config: &OriginConfig) -> OriginResult<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(&config.base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> OriginResult<Url> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl OriginClient for HttpOriginClient {
    #[instrument(skip(self))]
    async fn list_zones(&self) -> OriginResult<Vec<Zone>> {
        let url = self.endpoint("zones")?;
        let zones = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(zones)
    }

    #[instrument(skip(self))]
    async fn list_clubs(&self, place_id: &str) -> OriginResult<Vec<Club>> {
        let url = self.endpoint("clubs")?;
        let clubs = self
            .http
            .get(url)
            .query(&[("placeId", place_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(clubs)
    }

    #[instrument(skip(self))]
    async fn get_club(&self, club_id: i64) -> OriginResult<Club> {
        let url = self.endpoint(&format!("clubs/{club_id}"))?;
        let club = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(club)
    }

    #[instrument(skip(self))]
    async fn list_courts(&self, club_id: i64) -> OriginResult<Vec<Court>> {
        let url = self.endpoint(&format!("clubs/{club_id}/courts"))?;
        let courts = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(courts)
    }

    #[instrument(skip(self))]
    async fn list_slots(
        &self, club_id: i64, court_id: i64, date: NaiveDate,
    ) -> OriginResult<Vec<Slot>> {
        let url = self
            .endpoint(&format!("clubs/{club_id}/courts/{court_id}/slots"))?;
        let slots = self
            .http
            .get(url)
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_base_url() {
        let client = HttpOriginClient::new(&OriginConfig::default()).unwrap();

        assert_eq!(
            client.endpoint("clubs/22/courts/3/slots").unwrap().as_str(),
            "http://localhost:4000/clubs/22/courts/3/slots"
        );
        assert_eq!(
            client.endpoint("zones").unwrap().as_str(),
            "http://localhost:4000/zones"
        );
    }
}
