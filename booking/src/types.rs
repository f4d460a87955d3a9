//! Domain types for the venue booking system.
//!
//! Mirrors the backend's JSON DTOs (camelCase fields, SCREAMING_SNAKE_CASE
//! statuses) with closed enums in place of status strings. Calendar dates are
//! [`NaiveDate`]s: an event happens on a day, not at an instant, and nothing in
//! this crate converts them between timezones.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[doc = concat!("Wraps a backend identifier as a `", stringify!($name), "`")]
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// The raw backend identifier
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a venue event (a booking)
    EventId
);
numeric_id!(
    /// Identifier of a rentable inventory item
    ItemId
);
numeric_id!(
    /// Identifier of an item reservation
    ReservationId
);
numeric_id!(
    /// Identifier of a client
    ClientId
);
numeric_id!(
    /// Identifier of a payment
    PaymentId
);
numeric_id!(
    /// Identifier of a generated boleto
    BoletoId
);
numeric_id!(
    /// Identifier of a notification
    NotificationId
);
numeric_id!(
    /// Identifier of a signed-in user
    UserId
);

// ============================================================================
// Value Objects
// ============================================================================

/// Amount of money in centavos.
///
/// The backend exchanges amounts as decimal numbers of reais (`1500.5`);
/// they are rounded to the nearest centavo on decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero reais
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from centavos
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole reais, saturating on overflow
    #[must_use]
    pub const fn from_reais(reais: u64) -> Self {
        Self(reais.saturating_mul(100))
    }

    /// Returns the amount in centavos
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, saturating on overflow
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts two amounts, stopping at zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiplies by a quantity, saturating on overflow
    #[must_use]
    pub const fn saturating_mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[allow(clippy::cast_precision_loss)]
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let reais = f64::deserialize(deserializer)?;
        if !reais.is_finite() || reais < 0.0 {
            return Err(serde::de::Error::custom(format!("invalid amount: {reais}")));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self((reais * 100.0).round() as u64))
    }
}

/// Serde adapter for calendar dates.
///
/// Encodes `YYYY-MM-DD`. Decodes either a bare date or any ISO-8601
/// timestamp, keeping only its calendar part: `2026-03-15T00:00:00-03:00`
/// and `2026-03-15T23:30:00Z` are both the 15th.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    /// Parse the calendar day out of a date or timestamp string.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the first ten characters are not a date.
    pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, FORMAT)
    }

    /// Serialize as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    /// Deserialize from a date or timestamp string.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string starting with a date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Same encoding for optional dates; `null` and a missing field are `None`.
    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize as `YYYY-MM-DD` or `null`.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize from a date string, timestamp string or `null`.
        ///
        /// # Errors
        ///
        /// Fails if a present value does not start with a date.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .filter(|raw| !raw.is_empty())
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Serde adapter for optional wall-clock times sent as `HH:MM` or `HH:MM:SS`.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `HH:MM` or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.collect_str(&time.format("%H:%M")),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from `HH:MM`, `HH:MM:SS` or `null`.
    ///
    /// # Errors
    ///
    /// Fails if a present value is not a time of day.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Events
// ============================================================================

/// Event lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// Requested by a client, not yet accepted
    Quote,
    /// Accepted by the venue
    Confirmed,
    /// Took place
    Completed,
    /// Called off
    Cancelled,
}

impl EventStatus {
    /// Whether an event in this status holds its date on the calendar.
    ///
    /// Quotes never block a date; several clients may ask for the same day.
    #[must_use]
    pub const fn blocks_calendar(self) -> bool {
        matches!(self, Self::Confirmed | Self::Completed)
    }

    /// Whether items can still be reserved for an event in this status
    #[must_use]
    pub const fn accepts_reservations(self) -> bool {
        matches!(self, Self::Quote | Self::Confirmed)
    }

    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the owner may move an event from `self` to `next`
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Quote, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Completed | Self::Cancelled)
        )
    }

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "QUOTE",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked or proposed use of the venue on one calendar date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Backend identifier
    pub id: EventId,
    /// Display title ("Ana & Leo wedding")
    pub title: String,
    /// Day of the event
    #[serde(with = "calendar_date")]
    pub event_date: NaiveDate,
    /// Start time, if scheduled
    #[serde(default, with = "clock_time")]
    pub start_time: Option<NaiveTime>,
    /// End time, if scheduled
    #[serde(default, with = "clock_time")]
    pub end_time: Option<NaiveTime>,
    /// Expected number of guests
    #[serde(default)]
    pub guest_count: u32,
    /// Free-form type ("WEDDING", "BIRTHDAY", ...)
    #[serde(default)]
    pub event_type: String,
    /// Lifecycle status
    pub status: EventStatus,
    /// Client who booked the event
    #[serde(default)]
    pub client_id: Option<ClientId>,
    /// Agreed total price
    #[serde(default)]
    pub total_value: Money,
    /// Deposit required to confirm
    #[serde(default)]
    pub deposit_value: Money,
    /// Notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields of an event being created or edited
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Display title
    pub title: String,
    /// Day of the event
    #[serde(with = "calendar_date")]
    pub event_date: NaiveDate,
    /// Start time
    #[serde(default, with = "clock_time")]
    pub start_time: Option<NaiveTime>,
    /// End time
    #[serde(default, with = "clock_time")]
    pub end_time: Option<NaiveTime>,
    /// Expected number of guests
    pub guest_count: u32,
    /// Free-form type
    pub event_type: String,
    /// Requested status
    pub status: EventStatus,
    /// Client the event belongs to
    pub client_id: Option<ClientId>,
    /// Agreed total price
    pub total_value: Money,
    /// Deposit required to confirm
    pub deposit_value: Money,
    /// Notes
    pub notes: Option<String>,
}

impl EventDraft {
    /// A client-side booking request: always a quote for the given day.
    #[must_use]
    pub fn quote(title: impl Into<String>, event_date: NaiveDate, client_id: ClientId) -> Self {
        Self {
            title: title.into(),
            event_date,
            start_time: None,
            end_time: None,
            guest_count: 0,
            event_type: String::new(),
            status: EventStatus::Quote,
            client_id: Some(client_id),
            total_value: Money::ZERO,
            deposit_value: Money::ZERO,
            notes: None,
        }
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// A rentable inventory item (furniture, decoration, utensil).
///
/// Stock on a given day is always derived from reservations; the
/// `quantityAvailable` field some backend payloads carry is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Backend identifier
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Category ("FURNITURE", "DECORATION", ...)
    #[serde(default)]
    pub category: String,
    /// Units owned by the venue
    pub quantity_total: u32,
    /// Remaining stock below which the item is flagged
    #[serde(default)]
    pub min_stock: u32,
    /// Rental price per unit
    #[serde(default)]
    pub unit_price: Money,
}

/// Fields of an item being created or edited
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    /// Display name
    pub name: String,
    /// Category
    pub category: String,
    /// Units owned by the venue
    pub quantity_total: u32,
    /// Low-stock threshold
    pub min_stock: u32,
    /// Rental price per unit
    pub unit_price: Money,
}

/// Reservation lifecycle status
///
/// ```text
/// RESERVED ──► CONFIRMED ──► RETURNED
///     └──────────────────────────▲
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Units set aside for the event
    Reserved,
    /// Reservation confirmed with the client
    Confirmed,
    /// Units back in stock (terminal)
    Returned,
}

impl ReservationStatus {
    /// Whether the reservation counts against stock.
    ///
    /// `RESERVED` and `CONFIRMED` are treated identically here.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Returned)
    }

    /// Whether `self → next` is a legal transition
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Reserved, Self::Confirmed | Self::Returned) | (Self::Confirmed, Self::Returned)
        )
    }

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "RESERVED",
            Self::Confirmed => "CONFIRMED",
            Self::Returned => "RETURNED",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commitment of N units of an item to an event on its date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReservation {
    /// Backend identifier
    pub id: ReservationId,
    /// Reserved item
    pub item_id: ItemId,
    /// Event the units are for
    pub event_id: EventId,
    /// Day the units are committed
    #[serde(with = "calendar_date")]
    pub event_date: NaiveDate,
    /// Number of units
    pub quantity: u32,
    /// Lifecycle status
    pub status: ReservationStatus,
}

/// Request body for a new reservation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    /// Item to reserve
    pub item_id: ItemId,
    /// Event the units are for
    pub event_id: EventId,
    /// Day the units are committed
    #[serde(with = "calendar_date")]
    pub event_date: NaiveDate,
    /// Number of units
    pub quantity: u32,
    /// Always `RESERVED` on creation
    pub status: ReservationStatus,
}

impl NewReservation {
    /// Whether `reservation` is what the backend stored for this request
    #[must_use]
    pub fn matches(&self, reservation: &ItemReservation) -> bool {
        self.item_id == reservation.item_id
            && self.event_id == reservation.event_id
            && self.event_date == reservation.event_date
            && self.quantity == reservation.quantity
    }
}

// ============================================================================
// Clients
// ============================================================================

/// A venue client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Backend identifier
    pub id: ClientId,
    /// Full name
    pub name: String,
    /// Contact e-mail
    pub email: String,
    /// Contact phone, as entered
    #[serde(default)]
    pub phone: Option<String>,
    /// Tax document (CPF), as entered
    #[serde(default)]
    pub document: Option<String>,
    /// Number of events linked to the client
    #[serde(default)]
    pub events_count: u32,
}

/// Fields of a client being created or edited
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    /// Full name
    pub name: String,
    /// Contact e-mail
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Tax document
    pub document: Option<String>,
}

// ============================================================================
// Payments
// ============================================================================

/// How a payment is made
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Instant transfer
    Pix,
    /// Credit card
    CreditCard,
    /// Bank slip
    Boleto,
    /// Cash at the venue
    Cash,
    /// Wire transfer
    BankTransfer,
}

/// Payment status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting payment
    Pending,
    /// Settled
    Paid,
    /// Past its due date
    Overdue,
    /// Voided
    Cancelled,
}

/// A payment towards an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Backend identifier
    pub id: PaymentId,
    /// Event being paid for
    pub event_id: EventId,
    /// Amount due
    pub amount: Money,
    /// Payment method
    pub method: PaymentMethod,
    /// Status
    pub status: PaymentStatus,
    /// Due date
    #[serde(default, with = "calendar_date::option")]
    pub due_date: Option<NaiveDate>,
    /// When it was settled
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// Link to an uploaded receipt
    #[serde(default)]
    pub receipt_url: Option<String>,
}

/// Request body for creating or updating a payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    /// Event being paid for
    pub event_id: EventId,
    /// Amount due
    pub amount: Money,
    /// Payment method
    pub method: PaymentMethod,
    /// Status
    pub status: PaymentStatus,
    /// Due date
    #[serde(default, with = "calendar_date::option")]
    pub due_date: Option<NaiveDate>,
}

/// A bank slip issued by the backend for a payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boleto {
    /// Backend identifier
    pub id: BoletoId,
    /// Payment the slip settles
    pub payment_id: PaymentId,
    /// Barcode number
    pub barcode: String,
    /// Typeable line printed on the slip
    pub digitable_line: String,
    /// Due date
    #[serde(with = "calendar_date")]
    pub due_date: NaiveDate,
    /// Amount
    pub amount: Money,
    /// Printable version, if hosted
    #[serde(default)]
    pub url: Option<String>,
}

/// A receipt file attached to a payment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Original file name
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

// ============================================================================
// Notifications
// ============================================================================

/// What a notification is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Booking requests and status changes
    Booking,
    /// Payments received or overdue
    Payment,
    /// Low stock and returns
    Inventory,
    /// Everything else
    System,
}

/// An in-app notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Backend identifier
    pub id: NotificationId,
    /// Headline
    pub title: String,
    /// Body
    pub message: String,
    /// Category
    pub kind: NotificationKind,
    /// Whether the user has seen it
    #[serde(default)]
    pub read: bool,
    /// When it was raised
    pub created_at: DateTime<Utc>,
}

/// Request body for raising a notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    /// Headline
    pub title: String,
    /// Body
    pub message: String,
    /// Category
    pub kind: NotificationKind,
}

// ============================================================================
// Users
// ============================================================================

/// Role of a signed-in user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Venue owner
    Owner,
    /// Venue staff
    Staff,
    /// Client booking the venue
    Client,
}

impl Role {
    /// Whether the role manages the venue (owner or staff)
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Owner | Self::Staff)
    }
}

/// The signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login e-mail
    pub email: String,
    /// Role
    pub role: Role,
    /// Client record of a `CLIENT` user
    #[serde(default)]
    pub client_id: Option<ClientId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_date_keeps_calendar_day_of_timestamps() {
        let event: Event = serde_json::from_value(json!({
            "id": 1,
            "title": "Wedding",
            "eventDate": "2026-03-15T23:30:00-03:00",
            "startTime": "18:00",
            "endTime": "23:30:00",
            "status": "CONFIRMED",
            "totalValue": 12500.5
        }))
        .unwrap();

        assert_eq!(event.event_date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(event.start_time, NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(event.end_time, NaiveTime::from_hms_opt(23, 30, 0));
        assert_eq!(event.total_value, Money::from_cents(1_250_050));
        assert_eq!(event.deposit_value, Money::ZERO);
        assert!(event.client_id.is_none());
    }

    #[test]
    fn item_ignores_cached_quantity_available() {
        let item: Item = serde_json::from_value(json!({
            "id": 4,
            "name": "Cadeira Tiffany",
            "category": "FURNITURE",
            "quantityTotal": 30,
            "quantityAvailable": 2,
            "minStock": 5,
            "unitPrice": 12.0
        }))
        .unwrap();

        assert_eq!(item.quantity_total, 30);
        let encoded = serde_json::to_value(&item).unwrap();
        assert!(encoded.get("quantityAvailable").is_none());
    }

    #[test]
    fn statuses_use_wire_names() {
        assert_eq!(serde_json::to_value(EventStatus::Quote).unwrap(), json!("QUOTE"));
        assert_eq!(
            serde_json::to_value(PaymentMethod::CreditCard).unwrap(),
            json!("CREDIT_CARD")
        );
        assert_eq!(
            serde_json::from_value::<ReservationStatus>(json!("RETURNED")).unwrap(),
            ReservationStatus::Returned
        );
    }

    #[test]
    fn reservation_transitions() {
        use ReservationStatus::{Confirmed, Reserved, Returned};

        assert!(Reserved.can_transition_to(Confirmed));
        assert!(Reserved.can_transition_to(Returned));
        assert!(Confirmed.can_transition_to(Returned));
        assert!(!Confirmed.can_transition_to(Reserved));
        assert!(!Returned.can_transition_to(Reserved));
        assert!(!Returned.can_transition_to(Confirmed));
        assert!(!Reserved.can_transition_to(Reserved));
    }

    #[test]
    fn event_transitions() {
        use EventStatus::{Cancelled, Completed, Confirmed, Quote};

        assert!(Quote.can_transition_to(Confirmed));
        assert!(Quote.can_transition_to(Cancelled));
        assert!(!Quote.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn money_rejects_negative_and_formats_reais() {
        assert!(serde_json::from_value::<Money>(json!(-1.0)).is_err());
        assert_eq!(Money::from_cents(150_005).to_string(), "R$ 1500.05");
        assert_eq!(
            Money::from_reais(10).saturating_sub(Money::from_reais(15)),
            Money::ZERO
        );
    }

    #[test]
    fn optional_dates_accept_null() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 9,
            "eventId": 1,
            "amount": 500,
            "method": "PIX",
            "status": "PENDING",
            "dueDate": null
        }))
        .unwrap();
        assert!(payment.due_date.is_none());
        assert!(payment.paid_at.is_none());
    }
}
