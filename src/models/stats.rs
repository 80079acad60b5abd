//! Win-rate statistics models.

use serde::{Deserialize, Serialize};

use super::{PlayerId, TeamId};

/// Running wins/total accumulator.
///
/// Fields are private so `wins <= total` holds for every reachable value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRateSample {
    wins: u32,
    total: u32,
}

impl WinRateSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one match outcome.
    pub fn record(&mut self, won: bool) {
        self.total += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Combine two samples (used by order-independent reductions).
    pub fn merge(self, other: WinRateSample) -> WinRateSample {
        WinRateSample {
            wins: self.wins + other.wins,
            total: self.total + other.total,
        }
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Win percentage in `[0, 100]`, or `None` for an empty sample.
    pub fn percentage(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(100.0 * self.wins as f64 / self.total as f64)
        }
    }
}

/// A computed per-player win rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinRate {
    /// Percentage (0.0 to 100.0)
    pub percentage: f64,

    /// Matches in which the player was found
    pub sample_size: u32,
}

/// One player's contribution to a team figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerWinRate {
    pub player_id: PlayerId,
    pub gamer_name: String,
    pub win_rate: WinRate,
}

/// Team win rate: unweighted mean of per-player percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWinRate {
    pub team_id: TeamId,
    pub percentage: f64,
    pub players: Vec<PlayerWinRate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample_has_no_percentage() {
        let sample = WinRateSample::new();
        assert!(sample.is_empty());
        assert_eq!(sample.percentage(), None);
    }

    #[test]
    fn test_record_and_percentage() {
        let mut sample = WinRateSample::new();
        sample.record(true);
        sample.record(false);
        sample.record(true);
        sample.record(true);

        assert_eq!(sample.wins(), 3);
        assert_eq!(sample.total(), 4);
        assert_eq!(sample.percentage(), Some(75.0));
    }

    #[test]
    fn test_merge() {
        let mut a = WinRateSample::new();
        a.record(true);
        let mut b = WinRateSample::new();
        b.record(false);
        b.record(true);

        let merged = a.merge(b);
        assert_eq!(merged.wins(), 2);
        assert_eq!(merged.total(), 3);
    }

    #[test]
    fn test_all_losses_is_zero_not_none() {
        let mut sample = WinRateSample::new();
        sample.record(false);
        assert_eq!(sample.percentage(), Some(0.0));
    }
}
