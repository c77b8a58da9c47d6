//! Tournament creation, lookup, and deletion.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use super::models::{CreateTournament, Tournament, TournamentId};
use crate::db::repository::{StoreError, TournamentStore};

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found")]
    NotFound,

    #[error("A tournament with the name {0} already exists")]
    NameTaken(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    tournaments: Arc<dyn TournamentStore>,
}

impl TournamentManager {
    pub fn new(tournaments: Arc<dyn TournamentStore>) -> Self {
        Self { tournaments }
    }

    /// Create a new tournament. Names are unique.
    pub async fn create_tournament(
        &self,
        request: CreateTournament,
    ) -> TournamentResult<Tournament> {
        if self
            .tournaments
            .find_by_name(&request.name)
            .await?
            .is_some()
        {
            return Err(TournamentError::NameTaken(request.name));
        }

        match self
            .tournaments
            .create(
                &request.name,
                request.start_date,
                request.end_date,
                request.registration_deadline,
                request.max_participants,
            )
            .await
        {
            Ok(tournament) => Ok(tournament),
            Err(StoreError::Duplicate) => Err(TournamentError::NameTaken(request.name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a tournament; its registrations and matches cascade away.
    pub async fn delete_tournament(&self, tournament_id: TournamentId) -> TournamentResult<()> {
        if self.tournaments.delete(tournament_id).await? {
            Ok(())
        } else {
            Err(TournamentError::NotFound)
        }
    }

    /// All tournaments. An empty system reports not-found, the way the
    /// dashboard expects.
    pub async fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        let tournaments = self.tournaments.list_all().await?;
        if tournaments.is_empty() {
            return Err(TournamentError::NotFound);
        }
        Ok(tournaments)
    }

    /// Look a tournament up by its unique name.
    pub async fn tournament_by_name(&self, name: &str) -> TournamentResult<Tournament> {
        self.tournaments
            .find_by_name(name)
            .await?
            .ok_or(TournamentError::NotFound)
    }

    /// Tournaments whose start date is strictly after the given date.
    pub async fn tournaments_starting_after(
        &self,
        date: NaiveDate,
    ) -> TournamentResult<Vec<Tournament>> {
        let tournaments: Vec<Tournament> = self
            .tournaments
            .list_all()
            .await?
            .into_iter()
            .filter(|t| t.start_date > date)
            .collect();

        if tournaments.is_empty() {
            return Err(TournamentError::NotFound);
        }
        Ok(tournaments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::mock::MockTournamentStore;

    fn request(name: &str, start: NaiveDate) -> CreateTournament {
        CreateTournament {
            name: name.to_string(),
            start_date: start,
            end_date: start + chrono::Duration::days(7),
            registration_deadline: None,
            max_participants: 32,
        }
    }

    fn manager() -> TournamentManager {
        TournamentManager::new(Arc::new(MockTournamentStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let manager = manager();
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        let created = manager.create_tournament(request("Open", start)).await.unwrap();
        assert_eq!(created.name, "Open");

        let found = manager.tournament_by_name("Open").await.unwrap();
        assert_eq!(found.id, created.id);

        let result = manager.tournament_by_name("Masters").await;
        assert!(matches!(result, Err(TournamentError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let manager = manager();
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        manager.create_tournament(request("Open", start)).await.unwrap();
        let result = manager.create_tournament(request("Open", start)).await;
        assert!(matches!(result, Err(TournamentError::NameTaken(_))));
    }

    #[tokio::test]
    async fn test_listing_and_date_filter() {
        let manager = manager();

        let result = manager.list_tournaments().await;
        assert!(matches!(result, Err(TournamentError::NotFound)));

        manager
            .create_tournament(request("Spring Open", NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()))
            .await
            .unwrap();
        manager
            .create_tournament(request("Autumn Cup", NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()))
            .await
            .unwrap();

        assert_eq!(manager.list_tournaments().await.unwrap().len(), 2);

        let later = manager
            .tournaments_starting_after(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].name, "Autumn Cup");

        let result = manager
            .tournaments_starting_after(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap())
            .await;
        assert!(matches!(result, Err(TournamentError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete() {
        let manager = manager();
        let created = manager
            .create_tournament(request("Open", NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()))
            .await
            .unwrap();

        manager.delete_tournament(created.id).await.unwrap();
        let result = manager.delete_tournament(created.id).await;
        assert!(matches!(result, Err(TournamentError::NotFound)));
    }
}
