//! Queue id to display-name mapping.
//!
//! The match payload only carries a numeric `queueId`; names follow the
//! published queue list.

/// Known queue ids and their display names.
const QUEUES: &[(u32, &str)] = &[
    (0, "Custom"),
    (400, "Normal Draft"),
    (420, "Ranked Solo/Duo"),
    (430, "Normal Blind"),
    (440, "Ranked Flex"),
    (450, "ARAM"),
    (490, "Quickplay"),
    (700, "Clash"),
    (720, "ARAM Clash"),
    (830, "Co-op vs AI Intro"),
    (840, "Co-op vs AI Beginner"),
    (850, "Co-op vs AI Intermediate"),
    (900, "ARURF"),
    (1020, "One for All"),
    (1300, "Nexus Blitz"),
    (1700, "Arena"),
    (1900, "URF"),
];

/// Human-readable name for a queue id.
pub fn queue_name(queue_id: u32) -> String {
    QUEUES
        .iter()
        .find(|(id, _)| *id == queue_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("Unknown queue {}", queue_id))
}
