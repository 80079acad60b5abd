//! Scripted in-memory Riot API for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Account, AccountApi, MatchApi, MatchFilter, RiotError};
use crate::models::{ExternalId, MatchDetail, MatchId, Participant};

/// One scripted response for a match-detail call.
#[derive(Debug, Clone)]
pub enum Outcome {
    Ok(MatchDetail),
    RateLimited,
    NotFound,
    Status(u16),
}

impl Outcome {
    fn into_result(self, match_id: &MatchId) -> Result<MatchDetail, RiotError> {
        match self {
            Outcome::Ok(detail) => Ok(detail),
            Outcome::RateLimited => Err(RiotError::RateLimited {
                retry_after_secs: None,
            }),
            Outcome::NotFound => Err(RiotError::NotFound(match_id.to_string())),
            Outcome::Status(status) => Err(RiotError::HttpStatus {
                status,
                message: "scripted".to_string(),
            }),
        }
    }
}

/// Build a match where `puuid` took part with the given result.
pub fn match_with(id: &str, puuid: &str, won: bool) -> MatchDetail {
    let mut participants = vec![Participant::new(puuid, won, "Ahri", "Target")];
    for i in 0..9 {
        participants.push(Participant::new(
            format!("filler-{}-{}", id, i),
            i % 2 == 0,
            "Garen",
            format!("Filler{}", i),
        ));
    }
    MatchDetail {
        match_id: id.into(),
        queue_id: 420,
        queue_name: "Ranked Solo/Duo".to_string(),
        participants,
    }
}

/// Build a match the target did not take part in.
pub fn match_without(id: &str) -> MatchDetail {
    MatchDetail {
        match_id: id.into(),
        queue_id: 450,
        queue_name: "ARAM".to_string(),
        participants: vec![Participant::new("someone-else", true, "Sona", "Other")],
    }
}

/// Scripted API. Each match id has a queue of outcomes; the last one repeats.
#[derive(Default)]
pub struct MockMatchApi {
    scripts: Mutex<HashMap<MatchId, VecDeque<Outcome>>>,
    match_ids: Mutex<HashMap<ExternalId, Vec<MatchId>>>,
    accounts: Mutex<HashMap<(String, String), ExternalId>>,
    latency: Duration,
    detail_calls: AtomicUsize,
    list_calls: AtomicUsize,
    account_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockMatchApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated network time per detail call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn script(self, id: &str, outcomes: Vec<Outcome>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(id.into(), outcomes.into_iter().collect());
        self
    }

    pub fn ok(self, detail: MatchDetail) -> Self {
        let id = detail.match_id.to_string();
        self.script(&id, vec![Outcome::Ok(detail)])
    }

    pub fn history(self, puuid: &str, ids: &[&str]) -> Self {
        self.match_ids
            .lock()
            .unwrap()
            .insert(puuid.into(), ids.iter().map(|s| MatchId::from(*s)).collect());
        self
    }

    pub fn account(self, gamer_name: &str, tag_line: &str, puuid: &str) -> Self {
        self.accounts.lock().unwrap().insert(
            (gamer_name.to_lowercase(), tag_line.to_lowercase()),
            puuid.into(),
        );
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_outcome(&self, match_id: &MatchId) -> Outcome {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(match_id) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Outcome::NotFound),
            None => Outcome::NotFound,
        }
    }
}

#[async_trait]
impl MatchApi for MockMatchApi {
    async fn list_match_ids(
        &self,
        puuid: &ExternalId,
        count: u32,
        _filter: &MatchFilter,
    ) -> Result<Vec<MatchId>, RiotError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let ids = self.match_ids.lock().unwrap();
        match ids.get(puuid) {
            Some(list) => Ok(list.iter().take(count as usize).cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    async fn get_match_detail(&self, match_id: &MatchId) -> Result<MatchDetail, RiotError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let outcome = self.next_outcome(match_id);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome.into_result(match_id)
    }
}

#[async_trait]
impl AccountApi for MockMatchApi {
    async fn account_by_riot_id(
        &self,
        gamer_name: &str,
        tag_line: &str,
    ) -> Result<Account, RiotError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.lock().unwrap();
        accounts
            .get(&(gamer_name.to_lowercase(), tag_line.to_lowercase()))
            .map(|puuid| Account {
                puuid: puuid.clone(),
                game_name: Some(gamer_name.to_string()),
                tag_line: Some(tag_line.to_string()),
            })
            .ok_or_else(|| RiotError::NotFound(format!("{}#{}", gamer_name, tag_line)))
    }
}
