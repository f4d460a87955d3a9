//! Item stock per date.
//!
//! Free units are never stored: they are `quantity_total` minus the
//! quantities of active (not `RETURNED`) reservations of the item on that
//! calendar day. `RESERVED` and `CONFIRMED` count the same.

use crate::types::{Item, ItemId, ItemReservation};
use chrono::NaiveDate;

/// Stock of one item on one date
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockLevel {
    /// Item
    pub item_id: ItemId,
    /// Item name, for display
    pub name: String,
    /// Units owned
    pub total: u32,
    /// Units held by active reservations
    pub reserved: u64,
    /// Units free, never below zero
    pub remaining: u32,
    /// Remaining stock is under the item's minimum
    pub low_stock: bool,
}

fn active_on<'a>(
    item_id: ItemId,
    date: NaiveDate,
    reservations: &'a [ItemReservation],
) -> impl Iterator<Item = &'a ItemReservation> {
    reservations.iter().filter(move |reservation| {
        reservation.item_id == item_id
            && reservation.event_date == date
            && reservation.status.is_active()
    })
}

/// Units of `item_id` held by active reservations on `date`.
#[must_use]
pub fn reserved_quantity(item_id: ItemId, date: NaiveDate, reservations: &[ItemReservation]) -> u64 {
    active_on(item_id, date, reservations)
        .map(|reservation| u64::from(reservation.quantity))
        .sum()
}

/// Free units of `item` on `date`, negative when already overbooked.
#[must_use]
pub fn free_units(item: &Item, date: NaiveDate, reservations: &[ItemReservation]) -> i64 {
    let reserved = i64::try_from(reserved_quantity(item.id, date, reservations)).unwrap_or(i64::MAX);
    i64::from(item.quantity_total).saturating_sub(reserved)
}

/// Free units of `item` on `date`, stopping at zero.
#[must_use]
pub fn remaining_quantity(item: &Item, date: NaiveDate, reservations: &[ItemReservation]) -> u32 {
    u32::try_from(free_units(item, date, reservations).max(0)).unwrap_or(u32::MAX)
}

/// Whether `quantity` more units of `item` fit on `date`.
///
/// `quantity` is not validated; zero always fits unless the item is already
/// overbooked.
#[must_use]
pub fn check_availability(
    item: &Item,
    date: NaiveDate,
    quantity: u32,
    reservations: &[ItemReservation],
) -> bool {
    free_units(item, date, reservations) >= i64::from(quantity)
}

/// Stock of every item on `date`, in input order.
#[must_use]
pub fn stock_levels(
    items: &[Item],
    date: NaiveDate,
    reservations: &[ItemReservation],
) -> Vec<StockLevel> {
    items
        .iter()
        .map(|item| {
            let remaining = remaining_quantity(item, date, reservations);
            StockLevel {
                item_id: item.id,
                name: item.name.clone(),
                total: item.quantity_total,
                reserved: reserved_quantity(item.id, date, reservations),
                remaining,
                low_stock: remaining < item.min_stock,
            }
        })
        .collect()
}
