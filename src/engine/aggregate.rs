//! Win-rate aggregation.
//!
//! Reductions here are sums over independent matches, so the order in which
//! the collector returns details never changes the result.

use super::{EngineError, EngineObserver, NoopObserver};
use crate::models::{ExternalId, MatchDetail, WinRate, WinRateSample};

/// Count wins and appearances of `target` across `matches`, reporting each counted match.
pub fn tally(matches: &[MatchDetail], target: &ExternalId, observer: &dyn EngineObserver) -> WinRateSample {
    matches
        .iter()
        .filter_map(|detail| {
            let participant = detail.participant(target)?;
            observer.match_counted(detail, participant);
            let mut sample = WinRateSample::new();
            sample.record(participant.won);
            Some(sample)
        })
        .fold(WinRateSample::new(), WinRateSample::merge)
}

/// Win rate of `target` over `matches`.
///
/// An empty sample is `NoValidMatches`, never a 0% rate.
pub fn win_rate(matches: &[MatchDetail], target: &ExternalId) -> Result<WinRate, EngineError> {
    win_rate_observed(matches, target, &NoopObserver)
}

pub fn win_rate_observed(
    matches: &[MatchDetail],
    target: &ExternalId,
    observer: &dyn EngineObserver,
) -> Result<WinRate, EngineError> {
    let sample = tally(matches, target, observer);
    match sample.percentage() {
        Some(percentage) => Ok(WinRate {
            percentage,
            sample_size: sample.total(),
        }),
        None => Err(EngineError::NoValidMatches {
            fetched: matches.len(),
        }),
    }
}

/// Unweighted mean of per-player percentages.
///
/// Every player counts once no matter how many matches back their figure.
pub fn team_win_rate(per_player: &[WinRate]) -> Result<f64, EngineError> {
    if per_player.is_empty() {
        return Err(EngineError::EmptyTeam);
    }
    let sum: f64 = per_player.iter().map(|r| r.percentage).sum();
    Ok(sum / per_player.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Observed, RecordingObserver};
    use crate::models::Participant;
    use crate::riot::mock::{match_with, match_without};

    fn me() -> ExternalId {
        ExternalId::from("me")
    }

    fn rate(percentage: f64, sample_size: u32) -> WinRate {
        WinRate {
            percentage,
            sample_size,
        }
    }

    #[test]
    fn test_all_wins_is_100() {
        let matches: Vec<_> = (0..4).map(|i| match_with(&format!("M{}", i), "me", true)).collect();
        let result = win_rate(&matches, &me()).unwrap();
        assert_eq!(result.percentage, 100.0);
        assert_eq!(result.sample_size, 4);
    }

    #[test]
    fn test_all_losses_is_0() {
        let matches: Vec<_> = (0..3).map(|i| match_with(&format!("M{}", i), "me", false)).collect();
        let result = win_rate(&matches, &me()).unwrap();
        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.sample_size, 3);
    }

    #[test]
    fn test_matches_without_target_contribute_nothing() {
        let matches = vec![
            match_with("M1", "me", true),
            match_without("M2"),
            match_with("M3", "me", false),
            match_without("M4"),
        ];
        let result = win_rate(&matches, &me()).unwrap();
        assert_eq!(result.percentage, 50.0);
        assert_eq!(result.sample_size, 2);
    }

    #[test]
    fn test_only_first_occurrence_counts() {
        let mut detail = match_with("M1", "me", true);
        detail
            .participants
            .push(Participant::new("me", false, "Lux", "Duplicate"));

        let result = win_rate(&[detail], &me()).unwrap();
        assert_eq!(result.percentage, 100.0);
        assert_eq!(result.sample_size, 1);
    }

    #[test]
    fn test_empty_input_is_no_valid_matches() {
        match win_rate(&[], &me()) {
            Err(EngineError::NoValidMatches { fetched }) => assert_eq!(fetched, 0),
            other => panic!("Expected NoValidMatches, got {:?}", other),
        }
    }

    #[test]
    fn test_target_absent_everywhere_is_no_valid_matches() {
        let matches = vec![match_without("M1"), match_without("M2")];
        match win_rate(&matches, &me()) {
            Err(EngineError::NoValidMatches { fetched }) => assert_eq!(fetched, 2),
            other => panic!("Expected NoValidMatches, got {:?}", other),
        }
    }

    #[test]
    fn test_order_independent() {
        let mut matches = vec![
            match_with("M1", "me", true),
            match_with("M2", "me", false),
            match_with("M3", "me", true),
            match_without("M4"),
            match_with("M5", "me", false),
            match_with("M6", "me", true),
        ];
        let expected = win_rate(&matches, &me()).unwrap();

        for _ in 0..matches.len() {
            matches.rotate_left(1);
            assert_eq!(win_rate(&matches, &me()).unwrap(), expected);
        }
        matches.reverse();
        assert_eq!(win_rate(&matches, &me()).unwrap(), expected);
    }

    #[test]
    fn test_percentage_bounds() {
        for wins in 0..=7u32 {
            let matches: Vec<_> = (0..7u32)
                .map(|i| match_with(&format!("M{}", i), "me", i < wins))
                .collect();
            let result = win_rate(&matches, &me()).unwrap();
            assert!((0.0..=100.0).contains(&result.percentage));
        }
    }

    #[test]
    fn test_observer_sees_counted_matches() {
        let observer = RecordingObserver::new();
        let matches = vec![match_with("M1", "me", true), match_without("M2")];

        win_rate_observed(&matches, &me(), &observer).unwrap();

        assert_eq!(
            observer.events(),
            vec![Observed::Counted {
                match_id: "M1".into(),
                won: true
            }]
        );
    }

    #[test]
    fn test_team_unweighted_mean() {
        let rates = vec![rate(100.0, 2), rate(50.0, 50), rate(0.0, 10)];
        assert_eq!(team_win_rate(&rates).unwrap(), 50.0);
    }

    #[test]
    fn test_team_mean_ignores_sample_size() {
        let small = vec![rate(80.0, 1), rate(40.0, 100)];
        let big = vec![rate(80.0, 100), rate(40.0, 1)];
        assert_eq!(team_win_rate(&small).unwrap(), team_win_rate(&big).unwrap());
    }

    #[test]
    fn test_empty_team_is_error() {
        assert!(matches!(team_win_rate(&[]), Err(EngineError::EmptyTeam)));
    }
}
