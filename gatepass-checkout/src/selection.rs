use std::collections::HashMap;

use uuid::Uuid;

use gatepass_shared::Event;

/// One selectable category row, in the order the event lists them
#[derive(Debug, Clone)]
struct CategoryRow {
    category_id: Uuid,
    price: f64,
    available_quantity: i32,
    bookable: bool,
}

/// Per-category quantity stepper state for one event.
///
/// Invariant: the total selected across all categories never exceeds the
/// event's `max_quantity_per_booking`, and no category exceeds its own
/// availability.
#[derive(Debug, Clone)]
pub struct TicketSelection {
    max_per_booking: i32,
    rows: Vec<CategoryRow>,
    selected: HashMap<Uuid, i32>,
}

impl TicketSelection {
    pub fn for_event(event: &Event) -> Self {
        let rows = event
            .ticket_categories
            .iter()
            .map(|c| CategoryRow {
                category_id: c.category_id,
                price: c.price,
                available_quantity: c.available_quantity,
                bookable: c.is_bookable(),
            })
            .collect();

        Self {
            max_per_booking: event.max_quantity_per_booking,
            rows,
            selected: HashMap::new(),
        }
    }

    pub fn total_selected(&self) -> i32 {
        self.selected.values().sum()
    }

    pub fn quantity(&self, category_id: &Uuid) -> i32 {
        self.selected.get(category_id).copied().unwrap_or(0)
    }

    /// Step a category up by one, within the per-booking cap and the
    /// category's own availability.
    pub fn increment(&mut self, category_id: &Uuid) -> Result<i32, SelectionError> {
        let row = self
            .rows
            .iter()
            .find(|r| r.category_id == *category_id)
            .ok_or_else(|| SelectionError::UnknownCategory(category_id.to_string()))?;

        if !row.bookable {
            return Err(SelectionError::CategoryUnavailable(category_id.to_string()));
        }

        if self.total_selected() >= self.max_per_booking {
            return Err(SelectionError::BookingLimitReached {
                max: self.max_per_booking,
            });
        }

        let current = self.quantity(category_id);
        if current >= row.available_quantity {
            return Err(SelectionError::InsufficientAvailability {
                requested: current + 1,
                available: row.available_quantity,
            });
        }

        self.selected.insert(*category_id, current + 1);
        Ok(current + 1)
    }

    /// Step a category down by one; never goes below zero.
    pub fn decrement(&mut self, category_id: &Uuid) -> Result<i32, SelectionError> {
        if !self.rows.iter().any(|r| r.category_id == *category_id) {
            return Err(SelectionError::UnknownCategory(category_id.to_string()));
        }

        let current = self.quantity(category_id);
        if current <= 1 {
            self.selected.remove(category_id);
            return Ok(0);
        }
        self.selected.insert(*category_id, current - 1);
        Ok(current - 1)
    }

    /// Nonzero picks keyed by category
    pub fn selections(&self) -> HashMap<Uuid, i32> {
        self.selected.clone()
    }

    /// Nonzero picks in the event's category order. The first entry is
    /// what gets submitted under the single-category booking contract.
    pub fn selections_ordered(&self) -> Vec<(Uuid, i32)> {
        self.rows
            .iter()
            .filter_map(|r| {
                let qty = self.quantity(&r.category_id);
                (qty > 0).then_some((r.category_id, qty))
            })
            .collect()
    }

    /// Restore previously saved quantities, clamping each to what the
    /// invariants allow today (availability may have changed meanwhile).
    pub fn restore(&mut self, saved: &HashMap<Uuid, i32>) {
        let ids: Vec<Uuid> = self.rows.iter().map(|r| r.category_id).collect();
        for id in ids {
            let Some(&qty) = saved.get(&id) else { continue };
            for _ in 0..qty {
                if self.increment(&id).is_err() {
                    break;
                }
            }
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.price * self.quantity(&r.category_id) as f64)
            .sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Unknown ticket category: {0}")]
    UnknownCategory(String),

    #[error("Ticket category is not available: {0}")]
    CategoryUnavailable(String),

    #[error("Maximum of {max} tickets per booking")]
    BookingLimitReached { max: i32 },

    #[error("Insufficient availability: requested {requested}, available {available}")]
    InsufficientAvailability { requested: i32, available: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gatepass_shared::{EventStatus, PricingType, TicketCategory};

    fn event(max_per_booking: i32, categories: Vec<(f64, i32)>) -> Event {
        Event {
            event_id: Uuid::new_v4(),
            name: "Test Event".to_string(),
            description: None,
            location: "Hall A".to_string(),
            date: Utc::now(),
            event_type: "concert".to_string(),
            pricing_type: PricingType::Paid,
            image: None,
            max_quantity_per_booking: max_per_booking,
            ticket_categories: categories
                .into_iter()
                .enumerate()
                .map(|(i, (price, available))| TicketCategory {
                    category_id: Uuid::new_v4(),
                    name: format!("Tier {}", i),
                    price,
                    max_tickets: 100,
                    description: None,
                    is_active: true,
                    is_sold_out: false,
                    available_quantity: available,
                })
                .collect(),
            status: EventStatus::Verified,
        }
    }

    #[test]
    fn test_total_never_exceeds_booking_cap() {
        let ev = event(3, vec![(1000.0, 10), (2000.0, 10)]);
        let a = ev.ticket_categories[0].category_id;
        let b = ev.ticket_categories[1].category_id;
        let mut sel = TicketSelection::for_event(&ev);

        sel.increment(&a).unwrap();
        sel.increment(&a).unwrap();
        sel.increment(&b).unwrap();
        assert_eq!(sel.total_selected(), 3);

        // Cap reached across categories, not per category
        assert!(matches!(
            sel.increment(&b),
            Err(SelectionError::BookingLimitReached { max: 3 })
        ));
    }

    #[test]
    fn test_category_availability_bounds_increment() {
        let ev = event(10, vec![(1000.0, 2)]);
        let a = ev.ticket_categories[0].category_id;
        let mut sel = TicketSelection::for_event(&ev);

        sel.increment(&a).unwrap();
        sel.increment(&a).unwrap();
        assert!(matches!(
            sel.increment(&a),
            Err(SelectionError::InsufficientAvailability { available: 2, .. })
        ));
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let ev = event(5, vec![(1000.0, 5)]);
        let a = ev.ticket_categories[0].category_id;
        let mut sel = TicketSelection::for_event(&ev);

        assert_eq!(sel.decrement(&a).unwrap(), 0);
        sel.increment(&a).unwrap();
        assert_eq!(sel.decrement(&a).unwrap(), 0);
        assert_eq!(sel.decrement(&a).unwrap(), 0);
        assert_eq!(sel.total_selected(), 0);
    }

    #[test]
    fn test_sold_out_category_rejects_increment() {
        let mut ev = event(5, vec![(1000.0, 5)]);
        ev.ticket_categories[0].is_sold_out = true;
        let a = ev.ticket_categories[0].category_id;
        let mut sel = TicketSelection::for_event(&ev);

        assert!(matches!(
            sel.increment(&a),
            Err(SelectionError::CategoryUnavailable(_))
        ));
    }

    #[test]
    fn test_subtotal_and_ordering() {
        let ev = event(5, vec![(1000.0, 5), (2500.0, 5)]);
        let a = ev.ticket_categories[0].category_id;
        let b = ev.ticket_categories[1].category_id;
        let mut sel = TicketSelection::for_event(&ev);

        // Select the second category first; ordering still follows the event
        sel.increment(&b).unwrap();
        sel.increment(&a).unwrap();
        sel.increment(&b).unwrap();

        assert_eq!(sel.subtotal(), 1000.0 + 2.0 * 2500.0);
        let ordered = sel.selections_ordered();
        assert_eq!(ordered, vec![(a, 1), (b, 2)]);
    }

    #[test]
    fn test_restore_clamps_to_current_limits() {
        let ev = event(3, vec![(1000.0, 2)]);
        let a = ev.ticket_categories[0].category_id;
        let mut sel = TicketSelection::for_event(&ev);

        let mut saved = HashMap::new();
        saved.insert(a, 5); // more than availability and cap allow
        sel.restore(&saved);

        assert_eq!(sel.quantity(&a), 2);
    }
}
