//! First-run data: reference countries and airlines, the three default
//! accounts, and company settings. Sample inventory is only seeded outside
//! production.

use rand::Rng;
use sqlx::PgPool;
use ticketpro_shared::default_selling_price;

use crate::error::AppError;

const COUNTRIES: &[(&str, &str, &str)] = &[
    ("KSA", "Saudi Arabia", "\u{1F1F8}\u{1F1E6}"),
    ("UAE", "United Arab Emirates", "\u{1F1E6}\u{1F1EA}"),
    ("QAT", "Qatar", "\u{1F1F6}\u{1F1E6}"),
    ("KWT", "Kuwait", "\u{1F1F0}\u{1F1FC}"),
    ("OMN", "Oman", "\u{1F1F4}\u{1F1F2}"),
    ("BHR", "Bahrain", "\u{1F1E7}\u{1F1ED}"),
    ("JOR", "Jordan", "\u{1F1EF}\u{1F1F4}"),
    ("LBN", "Lebanon", "\u{1F1F1}\u{1F1E7}"),
];

const AIRLINES: &[(&str, &str)] = &[
    ("Air Arabia", "G9"),
    ("Emirates", "EK"),
    ("Qatar Airways", "QR"),
    ("Saudi Airlines", "SV"),
    ("Flydubai", "FZ"),
    ("Kuwait Airways", "KU"),
    ("Oman Air", "WY"),
    ("Gulf Air", "GF"),
];

const DEFAULT_USERS: &[(&str, &str, &str, &str, &str, &str)] = &[
    (
        "admin",
        "admin123",
        "Admin User",
        "admin@ticketpro.example",
        "+8801234567890",
        "admin",
    ),
    (
        "manager",
        "manager123",
        "Manager User",
        "manager@ticketpro.example",
        "+8801234567891",
        "manager",
    ),
    (
        "staff",
        "staff123",
        "Staff User",
        "staff@ticketpro.example",
        "+8801234567892",
        "staff",
    ),
];

const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("company_name", "BD TicketPro"),
    ("company_email", "info@ticketpro.example"),
    ("company_phone", "+880-123-456-7890"),
    ("company_address", "Dhanmondi, Dhaka, Bangladesh"),
    ("default_currency", "BDT"),
    ("timezone", "Asia/Dhaka"),
    ("language", "en"),
    ("auto_backup", "true"),
    ("email_notifications", "true"),
    ("sms_notifications", "false"),
    ("booking_timeout", "24"),
];

const SAMPLE_BATCHES: &[(&str, &str, &str, &str, i64, i32, &str, &str)] = &[
    (
        "KSA",
        "Air Arabia",
        "2024-12-25",
        "14:30",
        18_000,
        20,
        "Ahmed Travel",
        "+8801234567890",
    ),
    (
        "UAE",
        "Emirates",
        "2024-12-26",
        "09:15",
        38_000,
        15,
        "Gulf Air Agency",
        "+8801987654321",
    ),
    (
        "QAT",
        "Qatar Airways",
        "2024-12-27",
        "20:10",
        44_000,
        10,
        "Royal Travel",
        "+8801555666777",
    ),
];

/// Populate an empty database. Safe to call on every startup; a database
/// that already has users is left untouched.
pub async fn seed(pool: &PgPool, include_samples: bool) -> Result<(), AppError> {
    let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if user_count > 0 {
        tracing::debug!("database already seeded");
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for (code, name, flag) in COUNTRIES {
        sqlx::query("INSERT INTO countries (code, name, flag) VALUES ($1, $2, $3)")
            .bind(code)
            .bind(name)
            .bind(flag)
            .execute(&mut *tx)
            .await?;
    }

    for (name, code) in AIRLINES {
        sqlx::query("INSERT INTO airlines (name, code) VALUES ($1, $2)")
            .bind(name)
            .bind(code)
            .execute(&mut *tx)
            .await?;
    }

    for (username, password, name, email, phone, role) in DEFAULT_USERS {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;
        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, name, email, phone, role, status)
            VALUES ($1, $2, $3, $4, $5, $6::user_role, 'active')
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(role)
        .execute(&mut *tx)
        .await?;
    }

    for (key, value) in DEFAULT_SETTINGS {
        sqlx::query("INSERT INTO system_settings (key, value) VALUES ($1, $2)")
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
    }

    if include_samples {
        let admin_id = sqlx::query_scalar::<_, uuid::Uuid>(
            "SELECT id FROM users WHERE role = 'admin' LIMIT 1",
        )
        .fetch_one(&mut *tx)
        .await?;

        let mut rng = rand::thread_rng();
        for (country, airline, flight_date, flight_time, buying_price, quantity, agent, contact) in
            SAMPLE_BATCHES
        {
            let batch_id = sqlx::query_scalar::<_, uuid::Uuid>(
                r#"
                INSERT INTO ticket_batches
                    (country_code, airline_name, flight_date, flight_time, buying_price,
                     quantity, agent_name, agent_contact, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id
                "#,
            )
            .bind(country)
            .bind(airline)
            .bind(flight_date)
            .bind(flight_time)
            .bind(buying_price)
            .bind(quantity)
            .bind(agent)
            .bind(contact)
            .bind(admin_id)
            .fetch_one(&mut *tx)
            .await?;

            let airline_code = AIRLINES
                .iter()
                .find(|(name, _)| name == airline)
                .map(|(_, code)| *code)
                .unwrap_or("XX");
            let aircraft = crate::models::Airline::default_aircraft(airline);
            let selling_price = default_selling_price(*buying_price);

            for _ in 0..*quantity {
                sqlx::query(
                    r#"
                    INSERT INTO tickets
                        (batch_id, flight_number, selling_price, aircraft, terminal,
                         arrival_time, duration, available_seats, total_seats)
                    VALUES ($1, $2, $3, $4, $5, '18:45', '4h 15m', 1, 1)
                    "#,
                )
                .bind(batch_id)
                .bind(format!("{} {}", airline_code, rng.gen_range(100..1000)))
                .bind(selling_price)
                .bind(aircraft)
                .bind(format!("Terminal {}", rng.gen_range(1..4)))
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    tx.commit().await?;
    tracing::info!("database seeded (samples: {include_samples})");
    Ok(())
}
