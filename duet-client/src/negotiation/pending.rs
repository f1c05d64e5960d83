use crate::engine::ContextKind;
use duet_core::IceCandidate;

/// Remote candidates that arrived before their target context had a remote
/// description. Arrival order is kept per target.
#[derive(Debug, Default)]
pub struct PendingCandidates {
    entries: Vec<(ContextKind, IceCandidate)>,
}

impl PendingCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len_for(&self, target: ContextKind) -> usize {
        self.entries.iter().filter(|(kind, _)| *kind == target).count()
    }

    pub fn push(&mut self, target: ContextKind, candidate: IceCandidate) {
        self.entries.push((target, candidate));
    }

    /// Remove and return every buffered candidate for `target`, oldest first.
    pub fn take_for(&mut self, target: ContextKind) -> Vec<IceCandidate> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(kind, _)| *kind == target);
        self.entries = kept;

        taken.into_iter().map(|(_, candidate)| candidate).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
