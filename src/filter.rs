//! Ticket search filtering

use crate::state::Ticket;

/// True when `needle` (already lowercased) occurs in any single field of the ticket
fn ticket_matches(ticket: &Ticket, needle: &str) -> bool {
    [
        &ticket.key,
        &ticket.summary,
        &ticket.issue_type,
        &ticket.status,
        &ticket.created_at,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Order-preserving, case-insensitive substring filter. An empty term keeps everything.
pub fn filter_tickets(all_tickets: &[Ticket], term: &str) -> Vec<Ticket> {
    if term.is_empty() {
        return all_tickets.to_vec();
    }
    let needle = term.to_lowercase();
    let filtered: Vec<Ticket> = all_tickets
        .iter()
        .filter(|ticket| ticket_matches(ticket, &needle))
        .cloned()
        .collect();
    tracing::debug!(term, matched = filtered.len(), "filtered tickets");
    filtered
}
