//! Builders for unit tests.

#![allow(clippy::missing_docs_in_private_items)]

use crate::types::{
    Client, ClientId, Event, EventId, EventStatus, Item, ItemId, ItemReservation, Money,
    ReservationId, ReservationStatus,
};
use chrono::NaiveDate;

pub fn event_on(id: u64, date: NaiveDate, status: EventStatus) -> Event {
    Event {
        id: EventId::new(id),
        title: format!("Event {id}"),
        event_date: date,
        start_time: None,
        end_time: None,
        guest_count: 100,
        event_type: "WEDDING".to_string(),
        status,
        client_id: Some(ClientId::new(id)),
        total_value: Money::from_reais(10_000),
        deposit_value: Money::from_reais(3_000),
        notes: None,
    }
}

pub fn item(id: u64, quantity_total: u32) -> Item {
    Item {
        id: ItemId::new(id),
        name: format!("Item {id}"),
        category: "FURNITURE".to_string(),
        quantity_total,
        min_stock: 0,
        unit_price: Money::from_reais(10),
    }
}

pub fn reservation(
    id: u64,
    item_id: u64,
    event_id: u64,
    date: NaiveDate,
    quantity: u32,
    status: ReservationStatus,
) -> ItemReservation {
    ItemReservation {
        id: ReservationId::new(id),
        item_id: ItemId::new(item_id),
        event_id: EventId::new(event_id),
        event_date: date,
        quantity,
        status,
    }
}

pub fn client(id: u64, events_count: u32) -> Client {
    Client {
        id: ClientId::new(id),
        name: format!("Client {id}"),
        email: format!("client{id}@example.com"),
        phone: None,
        document: None,
        events_count,
    }
}
