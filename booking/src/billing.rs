//! Payment totals per event.

use crate::types::{Event, Money, Payment, PaymentStatus};
use chrono::NaiveDate;

/// What has been paid towards an event and what is still owed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaymentSummary {
    /// Agreed total of the event
    pub total: Money,
    /// Sum of `PAID` payments
    pub paid: Money,
    /// `total - paid`, never below zero
    pub outstanding: Money,
    /// `OVERDUE` payments plus `PENDING` ones whose due date is before today
    pub overdue_count: usize,
}

impl PaymentSummary {
    /// Whether the event is fully paid
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.outstanding.is_zero()
    }
}

/// Summarize the payments of `event` as of `today`.
///
/// Payments of other events in `payments` are ignored.
#[must_use]
pub fn summarize(event: &Event, payments: &[Payment], today: NaiveDate) -> PaymentSummary {
    let own = || payments.iter().filter(|payment| payment.event_id == event.id);

    let paid = own()
        .filter(|payment| payment.status == PaymentStatus::Paid)
        .fold(Money::ZERO, |sum, payment| sum.saturating_add(payment.amount));

    PaymentSummary {
        total: event.total_value,
        paid,
        outstanding: event.total_value.saturating_sub(paid),
        overdue_count: own()
            .filter(|payment| is_overdue(payment, today))
            .count(),
    }
}

fn is_overdue(payment: &Payment, today: NaiveDate) -> bool {
    match payment.status {
        PaymentStatus::Overdue => true,
        PaymentStatus::Pending => payment.due_date.is_some_and(|due| due < today),
        PaymentStatus::Paid | PaymentStatus::Cancelled => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::fixtures::event_on;
    use crate::types::{EventId, EventStatus, PaymentId, PaymentMethod};
    use venue_testing::date;

    fn payment(id: u64, event_id: u64, reais: u64, status: PaymentStatus) -> Payment {
        Payment {
            id: PaymentId::new(id),
            event_id: EventId::new(event_id),
            amount: Money::from_reais(reais),
            method: PaymentMethod::Pix,
            status,
            due_date: None,
            paid_at: None,
            receipt_url: None,
        }
    }

    #[test]
    fn only_paid_payments_of_the_event_count() {
        let event = event_on(1, date(2026, 3, 15), EventStatus::Confirmed);
        let payments = vec![
            payment(1, 1, 3_000, PaymentStatus::Paid),
            payment(2, 1, 2_000, PaymentStatus::Pending),
            payment(3, 1, 1_000, PaymentStatus::Overdue),
            payment(4, 2, 9_000, PaymentStatus::Paid),
        ];

        let summary = summarize(&event, &payments, date(2026, 3, 10));

        assert_eq!(summary.paid, Money::from_reais(3_000));
        assert_eq!(summary.outstanding, Money::from_reais(7_000));
        assert_eq!(summary.overdue_count, 1);
        assert!(!summary.is_settled());
    }

    #[test]
    fn overpayment_leaves_nothing_outstanding() {
        let event = event_on(1, date(2026, 3, 15), EventStatus::Confirmed);
        let payments = vec![payment(1, 1, 12_000, PaymentStatus::Paid)];

        assert!(summarize(&event, &payments, date(2026, 3, 10)).is_settled());
    }

    #[test]
    fn pending_payment_past_due_date_is_overdue() {
        let event = event_on(1, date(2026, 3, 15), EventStatus::Confirmed);
        let mut late = payment(1, 1, 2_000, PaymentStatus::Pending);
        late.due_date = Some(date(2026, 3, 9));
        let mut due_today = payment(2, 1, 2_000, PaymentStatus::Pending);
        due_today.due_date = Some(date(2026, 3, 10));
        let mut paid_late = payment(3, 1, 2_000, PaymentStatus::Paid);
        paid_late.due_date = Some(date(2026, 3, 1));

        let summary = summarize(&event, &[late, due_today, paid_late], date(2026, 3, 10));

        assert_eq!(summary.overdue_count, 1);
    }
}
