//! Deferred animation steps.
//!
//! A game never sleeps. When it needs "do X after 600ms" it schedules a step
//! on its `Timeline` and the board markup carries an HTMX delayed trigger
//! that posts the step's ticket back. `resume` only honours the ticket that
//! is currently pending, so cancelled steps (screen torn down, round
//! restarted) are dropped when their request finally arrives.

use std::cell::Cell;

thread_local! {
    static NEXT_TICKET: Cell<u64> = const { Cell::new(1) };
}

/// Identifier for one scheduled step. Unique for the lifetime of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    fn next() -> Self {
        NEXT_TICKET.with(|n| {
            let id = n.get();
            n.set(id + 1);
            Ticket(id)
        })
    }

    /// Rebuild a ticket from the value posted back by the page.
    pub fn from_raw(raw: u64) -> Self {
        Ticket(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A step waiting for its delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub ticket: Ticket,
    pub delay_ms: u32,
}

/// At most one pending step per game.
#[derive(Debug, Clone)]
pub struct Timeline<S> {
    pending: Option<(Deferred, S)>,
}

impl<S> Default for Timeline<S> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<S: Copy> Timeline<S> {
    /// Schedule `step`, replacing whatever was pending.
    pub fn schedule(&mut self, step: S, delay_ms: u32) -> Deferred {
        let deferred = Deferred {
            ticket: Ticket::next(),
            delay_ms,
        };
        self.pending = Some((deferred, step));
        deferred
    }

    /// Claim the pending step if `ticket` is the one scheduled.
    pub fn resume(&mut self, ticket: Ticket) -> Option<S> {
        match self.pending {
            Some((d, step)) if d.ticket == ticket => {
                self.pending = None;
                Some(step)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        if let Some((d, _)) = self.pending.take() {
            tracing::debug!(ticket = d.ticket.raw(), "cancelled pending step");
        }
    }

    pub fn pending(&self) -> Option<Deferred> {
        self.pending.map(|(d, _)| d)
    }
}
