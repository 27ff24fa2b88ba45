//! Repository layer: one thin CRUD accessor per entity, each issuing
//! parameterized queries against the shared pool. Handlers receive the
//! whole container through app data instead of reaching for a global
//! connection.

use sqlx::PgPool;

pub mod activity_log_repository;
pub mod airline_repository;
pub mod booking_repository;
pub mod country_repository;
pub mod settings_repository;
pub mod ticket_batch_repository;
pub mod ticket_repository;
pub mod user_repository;

pub use activity_log_repository::{ActivityLogRepository, NewActivityLog};
pub use airline_repository::AirlineRepository;
pub use booking_repository::BookingRepository;
pub use country_repository::CountryRepository;
pub use settings_repository::SettingsRepository;
pub use ticket_batch_repository::{BatchFilters, NewTicket, TicketBatchRepository};
pub use ticket_repository::{TicketFilters, TicketRepository};
pub use user_repository::UserRepository;

/// Repository container handed to the HTTP layer.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub countries: CountryRepository,
    pub airlines: AirlineRepository,
    pub batches: TicketBatchRepository,
    pub tickets: TicketRepository,
    pub bookings: BookingRepository,
    pub settings: SettingsRepository,
    pub activity: ActivityLogRepository,
}

impl Repositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            countries: CountryRepository::new(pool.clone()),
            airlines: AirlineRepository::new(pool.clone()),
            batches: TicketBatchRepository::new(pool.clone()),
            tickets: TicketRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            activity: ActivityLogRepository::new(pool),
        }
    }
}
