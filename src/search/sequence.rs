// SPDX-License-Identifier: MPL-2.0
//! Ordering guard for responses that arrive out of order.
//!
//! Every request for a region takes a [`Ticket`] from that region's
//! [`RequestFence`]. When the response arrives it is applied only if its
//! ticket is still the newest one issued; older responses are dropped.

/// Sequence number of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter for one region of the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFence {
    latest: u64,
}

impl RequestFence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the next ticket, making every earlier one stale.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Whether a response carrying `ticket` may still be applied.
    #[must_use]
    pub fn accept(&self, ticket: Ticket) -> bool {
        ticket.0 >= self.latest
    }

    /// Makes every outstanding ticket stale without starting a request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}
