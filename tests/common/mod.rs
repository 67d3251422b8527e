#![allow(dead_code)]

use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use estate_store::models::*;
use estate_store::store::{LoggingOptions, StoreOptions};

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Store options without persistence and with store logging routed to tracing
pub fn options<T: Entity>() -> StoreOptions<T> {
    init_tracing();
    StoreOptions::for_entity().logging(LoggingOptions::default())
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| panic!("bad timestamp {}: {}", s, e))
}

pub fn task(id: &str, title: &str, status: TaskStatus, priority: TaskPriority) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        status,
        task_type: TaskType::PropertyMaintenance,
        priority,
        labels: Vec::new(),
        due_date: None,
        completed_at: None,
        created_by_id: None,
        assigned_to_id: None,
        property_id: None,
        agency_id: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn expense(id: &str, status: ExpenseStatus, amount: Decimal, created_at: DateTime<Utc>) -> Expense {
    Expense {
        id: id.to_string(),
        expense_type: ExpenseType::Maintenance,
        amount,
        currency_id: "EUR".to_string(),
        status,
        due_date: Some(created_at + Duration::days(30)),
        paid_date: None,
        notes: None,
        property_id: Some("property-1".to_string()),
        tenant_id: None,
        agency_id: None,
        created_at: Some(created_at),
        updated_at: None,
        deleted_at: None,
    }
}

pub fn hotel(id: &str, name: &str, city_location: &str) -> Hotel {
    Hotel {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(format!("{} near the old town", name)),
        hotel_type: HotelType::Hotel,
        status: HotelStatus::Active,
        featured: false,
        star_rating: Some(4),
        amenities: vec!["wifi".to_string()],
        location_id: Some(city_location.to_string()),
        listing_id: None,
        availability_date: None,
        check_in_time: None,
        check_out_time: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn reservation(id: &str, user_id: &str, check_in: DateTime<Utc>, nights: i64, amount: i64) -> Reservation {
    Reservation {
        id: id.to_string(),
        user_id: user_id.to_string(),
        guest_id: None,
        property_id: Some("property-1".to_string()),
        hotel_id: None,
        listing_id: None,
        status: ReservationStatus::Confirmed,
        payment_status: PaymentStatus::Pending,
        check_in_date: check_in,
        check_out_date: check_in + Duration::days(nights),
        guests: 2,
        amount: Decimal::from(amount),
        payments: Vec::new(),
        reviews: Vec::new(),
        review_count: 0,
        average_rating: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn notification(id: &str, user_id: &str) -> Notification {
    Notification {
        id: id.to_string(),
        user_id: user_id.to_string(),
        notification_type: NotificationType::Message,
        title: format!("Message {}", id),
        content: "New message".to_string(),
        link: None,
        is_read: false,
        read_at: None,
        listing_id: None,
        reservation_id: None,
        payment_id: None,
        task_id: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}
