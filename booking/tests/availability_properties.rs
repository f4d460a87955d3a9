//! Property tests for the availability engine.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use proptest::test_runner::Config;
use venue_booking::availability::{
    check_availability, is_date_available, is_date_occupied, remaining_quantity,
};
use venue_booking::types::{
    ClientId, Event, EventId, EventStatus, Item, ItemId, ItemReservation, Money, ReservationId,
    ReservationStatus,
};
use venue_testing::date;

fn day(offset: u64) -> NaiveDate {
    date(2026, 3, 1) + Days::new(offset)
}

fn event_status() -> impl Strategy<Value = EventStatus> {
    prop_oneof![
        Just(EventStatus::Quote),
        Just(EventStatus::Confirmed),
        Just(EventStatus::Completed),
        Just(EventStatus::Cancelled),
    ]
}

fn reservation_status() -> impl Strategy<Value = ReservationStatus> {
    prop_oneof![
        Just(ReservationStatus::Reserved),
        Just(ReservationStatus::Confirmed),
        Just(ReservationStatus::Returned),
    ]
}

fn events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0_u64..10, event_status()), 0..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (offset, status))| Event {
                id: EventId::new(index as u64 + 1),
                title: format!("Event {index}"),
                event_date: day(offset),
                start_time: None,
                end_time: None,
                guest_count: 0,
                event_type: String::new(),
                status,
                client_id: Some(ClientId::new(1)),
                total_value: Money::ZERO,
                deposit_value: Money::ZERO,
                notes: None,
            })
            .collect()
    })
}

fn reservations() -> impl Strategy<Value = Vec<ItemReservation>> {
    prop::collection::vec((1_u64..3, 0_u64..4, 1_u32..20, reservation_status()), 0..16).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(index, (item, offset, quantity, status))| ItemReservation {
                    id: ReservationId::new(index as u64 + 1),
                    item_id: ItemId::new(item),
                    event_id: EventId::new(1),
                    event_date: day(offset),
                    quantity,
                    status,
                })
                .collect()
        },
    )
}

fn chairs(quantity_total: u32) -> Item {
    Item {
        id: ItemId::new(1),
        name: "Cadeira".to_string(),
        category: String::new(),
        quantity_total,
        min_stock: 0,
        unit_price: Money::ZERO,
    }
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn occupied_iff_a_blocking_event_holds_the_date(events in events(), offset in 0_u64..10) {
        let target = day(offset);
        let expected = events.iter().any(|event| {
            event.event_date == target
                && matches!(event.status, EventStatus::Confirmed | EventStatus::Completed)
        });
        prop_assert_eq!(is_date_occupied(target, &events), expected);
    }

    #[test]
    fn available_means_not_past_and_not_occupied(
        events in events(),
        offset in 0_u64..10,
        today_offset in 0_u64..10,
    ) {
        let target = day(offset);
        let today = day(today_offset);
        prop_assert_eq!(
            is_date_available(target, today, &events),
            target >= today && !is_date_occupied(target, &events)
        );
    }

    #[test]
    fn stock_check_matches_free_units(
        total in 0_u32..60,
        reservations in reservations(),
        offset in 0_u64..4,
        quantity in 0_u32..80,
    ) {
        let item = chairs(total);
        let target = day(offset);
        let reserved: i64 = reservations
            .iter()
            .filter(|r| r.item_id == item.id && r.event_date == target)
            .filter(|r| r.status != ReservationStatus::Returned)
            .map(|r| i64::from(r.quantity))
            .sum();

        prop_assert_eq!(
            check_availability(&item, target, quantity, &reservations),
            i64::from(total) - reserved >= i64::from(quantity)
        );
        prop_assert_eq!(
            i64::from(remaining_quantity(&item, target, &reservations)),
            (i64::from(total) - reserved).max(0)
        );
    }

    #[test]
    fn stock_check_is_repeatable(
        total in 0_u32..60,
        reservations in reservations(),
        offset in 0_u64..4,
        quantity in 0_u32..80,
    ) {
        let item = chairs(total);
        let first = check_availability(&item, day(offset), quantity, &reservations);
        let second = check_availability(&item, day(offset), quantity, &reservations);
        prop_assert_eq!(first, second);
    }
}
