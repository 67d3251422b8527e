// Fixture builders for unit tests

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::*;

/// Minimal entity for exercising the generic store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Note, "note-store");

pub fn note(id: &str, title: &str) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        pinned: false,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn account(id: &str, user_id: &str, account_type: AccountType) -> Account {
    Account {
        id: id.to_string(),
        user_id: user_id.to_string(),
        account_type,
        provider: format!("{:?}", account_type).to_lowercase(),
        provider_account_id: format!("{}-{}", user_id, id),
        refresh_token: None,
        access_token: None,
        expires_at: None,
        token_type: None,
        scope: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn calendar_day(id: &str, listing_id: &str, date: NaiveDate) -> Calendar {
    Calendar {
        id: id.to_string(),
        listing_id: listing_id.to_string(),
        date,
        is_blocked: false,
        is_booked: false,
        min_nights: None,
        max_nights: None,
        max_guests: Some(4),
        base_rate: Decimal::from(100),
        weekend_rate: None,
        weekday_rate: None,
        seasonal_multiplier: None,
        available_units: 1,
        minimum_stay: 1,
        maximum_stay: None,
        property_id: None,
        hotel_id: None,
        reservation_id: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn expense(id: &str, expense_type: ExpenseType, amount: i64) -> Expense {
    Expense {
        id: id.to_string(),
        expense_type,
        amount: Decimal::from(amount),
        currency_id: "EUR".to_string(),
        status: ExpenseStatus::Pending,
        due_date: None,
        paid_date: None,
        notes: None,
        property_id: None,
        tenant_id: None,
        agency_id: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn hotel(id: &str, name: &str, hotel_type: HotelType) -> Hotel {
    Hotel {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        hotel_type,
        status: HotelStatus::Active,
        featured: false,
        star_rating: None,
        amenities: Vec::new(),
        location_id: None,
        listing_id: None,
        availability_date: None,
        check_in_time: None,
        check_out_time: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn listing(id: &str, provider_id: &str, title: &str) -> Listing {
    Listing {
        id: id.to_string(),
        provider_id: provider_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        slug: title.to_lowercase().replace(' ', "-"),
        category: None,
        listing_type: None,
        published_status: PublishedStatus::Draft,
        likes_count: 0,
        review_count: 0,
        average_rating: None,
        featured_image: None,
        enabled: true,
        featured: false,
        user_id: None,
        location_id: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn location(id: &str, city: &str, country: &str, latitude: f64, longitude: f64) -> Location {
    Location {
        id: id.to_string(),
        title: format!("{} office", city),
        address: format!("1 Main Street, {}", city),
        street: "Main Street".to_string(),
        city: city.to_string(),
        state: String::new(),
        post_code: String::new(),
        country: country.to_string(),
        country_code: String::new(),
        latitude: Some(latitude),
        longitude: Some(longitude),
        slug: id.to_string(),
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn notification(id: &str, user_id: &str, notification_type: NotificationType) -> Notification {
    Notification {
        id: id.to_string(),
        user_id: user_id.to_string(),
        notification_type,
        title: format!("Notification {}", id),
        content: String::new(),
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

pub fn reservation(id: &str, user_id: &str, check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Reservation {
    Reservation {
        id: id.to_string(),
        user_id: user_id.to_string(),
        guest_id: None,
        property_id: None,
        hotel_id: None,
        listing_id: None,
        status: ReservationStatus::Pending,
        payment_status: PaymentStatus::Pending,
        check_in_date: check_in,
        check_out_date: check_out,
        guests: 2,
        amount: Decimal::from(500),
        payments: Vec::new(),
        reviews: Vec::new(),
        review_count: 0,
        average_rating: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub fn review(id: &str, rating: f64) -> Review {
    Review {
        id: id.to_string(),
        user_id: "reviewer".to_string(),
        rating,
        comment: None,
        created_at: None,
    }
}

pub fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        status: TaskStatus::Todo,
        task_type: TaskType::PropertyMaintenance,
        priority: TaskPriority::Medium,
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
