use log::debug;

use crate::api::{Aggregate, Result};

/// Identifies one issued request. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Failed(String),
    Empty,
    Populated(Aggregate),
}

/// UI side state of a supporters list.
///
/// Every fetch starts with [`SupportersView::begin`]; its result is only
/// applied if no newer fetch was started meanwhile, so a slow stale response
/// can never overwrite a fresher one.
#[derive(Debug)]
pub struct SupportersView {
    issued: u64,
    state: ViewState,
}

impl Default for SupportersView {
    fn default() -> Self {
        SupportersView {
            issued: 0,
            state: ViewState::Idle,
        }
    }
}

impl SupportersView {
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.state = ViewState::Loading;
        Ticket(self.issued)
    }

    /// Returns `false` when `ticket` is stale and the result was discarded.
    pub fn apply(&mut self, ticket: Ticket, result: Result<Aggregate>) -> bool {
        if ticket.0 != self.issued {
            debug!("Discarding stale result {} (latest {})", ticket.0, self.issued);
            return false;
        }
        self.state = match result {
            Ok(aggregate) if aggregate.is_empty() => ViewState::Empty,
            Ok(aggregate) => ViewState::Populated(aggregate),
            Err(err) => ViewState::Failed(err.to_string()),
        };
        true
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }
}
