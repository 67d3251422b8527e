use chrono::{Duration, NaiveDate, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::cli::commands::store::open_store;
use crate::cli::utils::output_success;
use crate::cli::{with_entity, EntityKind, OutputFormat};
use crate::models::*;
use crate::store::FileStorage;

#[derive(Subcommand)]
pub enum FixtureCommands {
    #[command(about = "Generate sample entities into a persisted store")]
    Generate {
        #[arg(value_enum, help = "Entity kind")]
        kind: EntityKind,
        #[arg(long, help = "Number of entities to generate", default_value = "10")]
        count: usize,
        #[arg(long, help = "Append to the existing store instead of replacing it")]
        append: bool,
    },
}

pub async fn handle(cmd: FixtureCommands, storage: &FileStorage, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        FixtureCommands::Generate { kind, count, append } => {
            with_entity!(kind, E => handle_generate::<E>(storage, count, append, &output_format).await)
        }
    }
}

async fn handle_generate<T: Sample>(
    storage: &FileStorage,
    count: usize,
    append: bool,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut store = open_store::<T>(storage).await?;
    let samples: Vec<T> = (0..count).map(T::sample).collect();

    if append {
        store.add_items(samples);
    } else {
        store.set_items(samples);
    }
    store.save(storage).await?;

    tracing::info!(store = store.name(), count, total = store.len(), "Generated fixtures");
    output_success(
        output_format,
        &format!("Generated {} {} ({} total)", count, store.name(), store.len()),
        Some(json!({ "store": store.name(), "generated": count, "total": store.len() })),
    )
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn pick<T: Copy>(options: &[T], index: usize) -> T {
    options[index % options.len()]
}

/// Deterministic sample data, varied by index
pub trait Sample: Entity {
    fn sample(index: usize) -> Self;
}

const CITIES: &[(&str, &str, f64, f64)] = &[
    ("Lisbon", "Portugal", 38.7223, -9.1393),
    ("Porto", "Portugal", 41.1579, -8.6291),
    ("Barcelona", "Spain", 41.3874, 2.1686),
    ("Valencia", "Spain", 39.4699, -0.3763),
    ("Marseille", "France", 43.2965, 5.3698),
];

impl Sample for Account {
    fn sample(index: usize) -> Self {
        let account_type = pick(&[AccountType::Google, AccountType::Credentials, AccountType::Email], index);
        Account {
            id: new_id(),
            user_id: format!("user-{}", index % 4),
            account_type,
            provider: format!("{:?}", account_type).to_lowercase(),
            provider_account_id: format!("acct-{}", index),
            refresh_token: None,
            access_token: None,
            expires_at: None,
            token_type: Some("bearer".to_string()),
            scope: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Sample for Calendar {
    fn sample(index: usize) -> Self {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default();
        Calendar {
            id: new_id(),
            listing_id: format!("listing-{}", index % 3),
            date: start + Duration::days((index / 3) as i64),
            is_blocked: index % 7 == 0,
            is_booked: index % 5 == 0,
            min_nights: Some(1),
            max_nights: Some(14),
            max_guests: Some(pick(&[2, 4, 6], index)),
            base_rate: Decimal::from(80 + (index % 4) as i64 * 20),
            weekend_rate: None,
            weekday_rate: None,
            seasonal_multiplier: (index % 2 == 0).then(|| Decimal::new(12, 1)),
            available_units: 1,
            minimum_stay: 1,
            maximum_stay: Some(30),
            property_id: None,
            hotel_id: None,
            reservation_id: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Sample for Expense {
    fn sample(index: usize) -> Self {
        let status = pick(&[ExpenseStatus::Pending, ExpenseStatus::Paid, ExpenseStatus::Overdue], index);
        Expense {
            id: new_id(),
            expense_type: pick(
                &[ExpenseType::Maintenance, ExpenseType::Cleaning, ExpenseType::Utilities, ExpenseType::Tax],
                index,
            ),
            amount: Decimal::new(2500 + index as i64 * 1075, 2),
            currency_id: "EUR".to_string(),
            status,
            due_date: Some(Utc::now() + Duration::days(index as i64 - 5)),
            paid_date: (status == ExpenseStatus::Paid).then(Utc::now),
            notes: None,
            property_id: Some(format!("property-{}", index % 3)),
            tenant_id: None,
            agency_id: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Sample for Hotel {
    fn sample(index: usize) -> Self {
        let (city, _, _, _) = pick(CITIES, index);
        Hotel {
            id: new_id(),
            name: format!("{} {}", city, pick(&["Grand", "Harbour", "Garden", "Plaza"], index)),
            description: Some(format!("Hotel in central {}", city)),
            hotel_type: pick(&[HotelType::Hotel, HotelType::Resort, HotelType::BoutiqueHotel], index),
            status: pick(&[HotelStatus::Active, HotelStatus::Active, HotelStatus::Inactive], index),
            featured: index % 4 == 0,
            star_rating: Some(3 + (index % 3) as u8),
            amenities: ["wifi", "pool", "spa", "parking"]
                .iter()
                .take(1 + index % 4)
                .map(|a| a.to_string())
                .collect(),
            location_id: Some(format!("location-{}", index % CITIES.len())),
            listing_id: None,
            availability_date: NaiveDate::from_ymd_opt(2025, 7, 1 + (index % 28) as u32),
            check_in_time: chrono::NaiveTime::from_hms_opt(15, 0, 0),
            check_out_time: chrono::NaiveTime::from_hms_opt(11, 0, 0),
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Sample for Listing {
    fn sample(index: usize) -> Self {
        let (city, _, _, _) = pick(CITIES, index);
        let kind = pick(&["Apartment", "Villa", "Studio", "Loft"], index);
        let title = format!("{} in {}", kind, city);
        Listing {
            id: new_id(),
            provider_id: format!("provider-{}", index % 3),
            slug: format!("{}-{}", title.to_lowercase().replace(' ', "-"), index),
            title,
            description: format!("A bright {} close to the centre of {}", kind.to_lowercase(), city),
            category: Some("RENTAL".to_string()),
            listing_type: Some(kind.to_uppercase()),
            published_status: pick(&[PublishedStatus::Active, PublishedStatus::Draft], index),
            likes_count: (index * 7 % 50) as u32,
            review_count: (index % 6) as u32,
            average_rating: (index % 6 != 0).then(|| 3.0 + (index % 3) as f64 * 0.5),
            featured_image: None,
            enabled: true,
            featured: index % 5 == 0,
            user_id: None,
            location_id: Some(format!("location-{}", index % CITIES.len())),
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Sample for Location {
    fn sample(index: usize) -> Self {
        let (city, country, latitude, longitude) = pick(CITIES, index);
        Location {
            id: new_id(),
            title: format!("{} #{}", city, index),
            address: format!("{} Rua Principal, {}", index + 1, city),
            street: "Rua Principal".to_string(),
            city: city.to_string(),
            state: String::new(),
            post_code: format!("{:05}", 1000 + index),
            country: country.to_string(),
            country_code: country[..2].to_uppercase(),
            latitude: Some(latitude + index as f64 * 0.001),
            longitude: Some(longitude),
            slug: format!("{}-{}", city.to_lowercase(), index),
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Sample for Notification {
    fn sample(index: usize) -> Self {
        let notification_type = pick(
            &[NotificationType::Message, NotificationType::Reservation, NotificationType::Payment],
            index,
        );
        Notification {
            id: new_id(),
            user_id: format!("user-{}", index % 4),
            notification_type,
            title: format!("{:?} update", notification_type),
            content: format!("You have a new {:?} event", notification_type).to_lowercase(),
            link: None,
            is_read: index % 3 == 0,
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
}

impl Sample for Reservation {
    fn sample(index: usize) -> Self {
        let check_in = Utc::now() + Duration::days(index as i64 * 3 - 10);
        Reservation {
            id: new_id(),
            user_id: format!("user-{}", index % 4),
            guest_id: None,
            property_id: Some(format!("property-{}", index % 3)),
            hotel_id: None,
            listing_id: None,
            status: pick(
                &[ReservationStatus::Confirmed, ReservationStatus::Pending, ReservationStatus::Completed, ReservationStatus::Cancelled],
                index,
            ),
            payment_status: pick(&[PaymentStatus::Paid, PaymentStatus::Pending], index),
            check_in_date: check_in,
            check_out_date: check_in + Duration::days(2 + (index % 5) as i64),
            guests: 1 + (index % 4) as u32,
            amount: Decimal::from(180 + index as i64 * 45),
            payments: Vec::new(),
            reviews: Vec::new(),
            review_count: 0,
            average_rating: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Sample for Task {
    fn sample(index: usize) -> Self {
        Task {
            id: new_id(),
            title: pick(&["Inspect boiler", "Replace locks", "Deep clean", "Renew listing photos"], index).to_string(),
            description: None,
            status: pick(&[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed], index),
            task_type: pick(&[TaskType::PropertyMaintenance, TaskType::ListingReview, TaskType::ClientFollowUp], index),
            priority: pick(&[TaskPriority::Low, TaskPriority::Medium, TaskPriority::High, TaskPriority::Urgent], index),
            labels: Vec::new(),
            due_date: Some(Utc::now() + Duration::days(index as i64 - 3)),
            completed_at: None,
            created_by_id: Some("user-0".to_string()),
            assigned_to_id: Some(format!("user-{}", index % 4)),
            property_id: Some(format!("property-{}", index % 3)),
            agency_id: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}
