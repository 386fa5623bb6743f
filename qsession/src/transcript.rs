//! Append-only transcript of turns and their provider outcomes.

use std::sync::Mutex;

use qcommon::TurnId;
use qdispatch::{Outcome, Turn};

/// One transcript row. Turns and outcomes interleave in arrival order, so a
/// turn's outcomes always appear after the turn itself but may be separated
/// by entries from a later turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    Turn(Turn),
    Outcome(Outcome),
}

impl TranscriptEntry {
    pub fn turn_id(&self) -> TurnId {
        match self {
            Self::Turn(turn) => turn.id,
            Self::Outcome(outcome) => outcome.turn_id,
        }
    }
}

/// Entries are only ever appended; nothing rewrites or reorders history.
/// Readers take point-in-time snapshots and never block appenders for long.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Mutex<Vec<TranscriptEntry>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_turn(&self, turn: Turn) {
        self.append(TranscriptEntry::Turn(turn));
    }

    pub fn append_outcome(&self, outcome: Outcome) {
        self.append(TranscriptEntry::Outcome(outcome));
    }

    fn append(&self, entry: TranscriptEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    /// Point-in-time copy of the whole transcript. Reading never mutates,
    /// so repeated snapshots without intervening appends are identical.
    pub fn snapshot(&self) -> Vec<TranscriptEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Entries belonging to one turn, in arrival order.
    pub fn entries_for(&self, turn_id: TurnId) -> Vec<TranscriptEntry> {
        self.snapshot()
            .into_iter()
            .filter(|entry| entry.turn_id() == turn_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use qcommon::TurnIdGenerator;
    use qdispatch::ProviderSelection;
    use qprovider::{ProviderId, VersionId};

    use super::*;

    fn turn(turns: &TurnIdGenerator, text: &str) -> Turn {
        let selection =
            ProviderSelection::new().with_provider(ProviderId::OpenAi, VersionId::from("gpt-4o"));
        Turn::new(turns.next_id(), text, "general", selection)
    }

    #[test]
    fn entries_interleave_in_arrival_order() {
        let turns = TurnIdGenerator::new();
        let transcript = Transcript::new();

        let first = turn(&turns, "first question");
        let second = turn(&turns, "second question");

        transcript.append_turn(first.clone());
        transcript.append_outcome(
            Outcome::pending(first.id, ProviderId::OpenAi, VersionId::from("gpt-4o"))
                .complete_ok("first answer"),
        );
        transcript.append_turn(second.clone());
        transcript.append_outcome(
            Outcome::pending(first.id, ProviderId::Gemini, VersionId::from("gemini-1.5-pro"))
                .complete_ok("late answer for the first turn"),
        );

        let snapshot = transcript.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert!(matches!(&snapshot[0], TranscriptEntry::Turn(t) if t.id == first.id));
        assert!(matches!(&snapshot[2], TranscriptEntry::Turn(t) if t.id == second.id));
        // A straggler outcome lands after the next turn but keeps its turn id.
        assert_eq!(snapshot[3].turn_id(), first.id);

        assert_eq!(transcript.entries_for(first.id).len(), 3);
        assert_eq!(transcript.entries_for(second.id).len(), 1);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let turns = TurnIdGenerator::new();
        let transcript = Transcript::new();
        transcript.append_turn(turn(&turns, "hello"));

        let first = transcript.snapshot();
        let second = transcript.snapshot();
        assert_eq!(first, second);
        assert_eq!(transcript.len(), 1);
    }
}
