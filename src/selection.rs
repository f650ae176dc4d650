//! Single writer for the preview selection.
//!
//! Both presentation modes go through [`SelectionSynchronizer::select`]; the
//! selection only changes when a resolution for the newest request commits.
//! Ordering is last-requested-wins: a resolution whose ticket is no longer
//! the pending one is discarded, however late it arrives.

use tracing::debug;

use crate::media::{OrientationResolver, Resolution, ResolveTicket, ResolvedMedia};
use crate::models::{CatalogEntry, SelectionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Already active or already being resolved.
    Unchanged,
    /// Resolved without waiting (video or cached image) and committed.
    Committed,
    /// Waiting on the resolver under this ticket.
    Pending(ResolveTicket),
    /// The active entry was re-selected; the pending request was dropped.
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Superseded,
}

pub struct SelectionSynchronizer {
    state: SelectionState,
    resolver: OrientationResolver,
    generation: u64,
    pending: Option<ResolveTicket>,
}

impl SelectionSynchronizer {
    pub fn new(resolver: OrientationResolver) -> Self {
        Self {
            state: SelectionState::default(),
            resolver,
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&ResolveTicket> {
        self.pending.as_ref()
    }

    pub fn resolver(&self) -> &OrientationResolver {
        &self.resolver
    }

    /// Requests `entry` as the previewed entry.
    pub fn select(&mut self, entry: &CatalogEntry) -> SelectOutcome {
        if self.pending.as_ref().is_some_and(|p| p.entry_id == entry.id) {
            return SelectOutcome::Unchanged;
        }

        if self.state.active_entry_id.as_deref() == Some(entry.id.as_str()) {
            return match self.pending.take() {
                Some(stale) => {
                    let generation = self.bump_generation();
                    self.resolver.supersede(generation);
                    debug!(entry = %entry.id, withdrawn = %stale.entry_id, "Selection returned to active entry");
                    SelectOutcome::Withdrawn
                }
                None => SelectOutcome::Unchanged,
            };
        }

        let ticket = ResolveTicket {
            generation: self.bump_generation(),
            entry_id: entry.id.clone(),
        };

        if let Some(resolution) = self.resolver.cached(&entry.media) {
            self.resolver.supersede(ticket.generation);
            self.pending = None;
            self.apply(&ticket, resolution);
            return SelectOutcome::Committed;
        }

        self.pending = Some(ticket.clone());
        self.resolver.submit(ticket.clone(), entry.media.clone());
        SelectOutcome::Pending(ticket)
    }

    /// Commits `resolved` if it answers the pending request.
    pub fn commit(&mut self, resolved: ResolvedMedia) -> CommitOutcome {
        if self.pending.as_ref() != Some(&resolved.ticket) {
            debug!(
                generation = resolved.ticket.generation,
                entry = %resolved.ticket.entry_id,
                "Discarding superseded resolution"
            );
            return CommitOutcome::Superseded;
        }
        self.pending = None;
        self.apply(&resolved.ticket, resolved.resolution);
        CommitOutcome::Applied
    }

    /// Commits every resolution that has already arrived. Returns how many
    /// were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(resolved) = self.resolver.try_next() {
            if self.commit(resolved) == CommitOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the pending request, if any, to resolve and commits it.
    pub async fn settle(&mut self) -> bool {
        while self.pending.is_some() {
            let Some(resolved) = self.resolver.next().await else {
                return false;
            };
            if self.commit(resolved) == CommitOutcome::Applied {
                return true;
            }
        }
        false
    }

    fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn apply(&mut self, ticket: &ResolveTicket, resolution: Resolution) {
        debug!(
            entry = %ticket.entry_id,
            url = %resolution.media.url,
            vertical = resolution.is_vertical(),
            status = ?resolution.status,
            "Preview updated"
        );
        self.state = SelectionState {
            active_entry_id: Some(ticket.entry_id.clone()),
            is_vertical: resolution.is_vertical(),
            is_ready: true,
            media_status: resolution.status,
            active_media: Some(resolution.media),
        };
    }
}
