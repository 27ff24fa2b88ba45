use actix_web::{get, http::header, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;
use ticketpro_shared::{
    ApiResponse, Permission, SettingEntry, SettingValueRequest, UpdateSettingsRequest,
    ALLOWED_SETTING_KEYS, DEFAULT_ACTIVITY_LOG_LIMIT, OPEN_SETTING_KEYS, PUBLIC_SETTING_KEYS,
};
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::database::Database;
use crate::error::AppError;
use crate::handlers::request_meta;
use crate::middleware::AuthenticatedUser;
use crate::repositories::{NewActivityLog, Repositories};

/// Process-level facts reported by the system-info endpoint.
#[derive(Clone)]
pub struct ServerInfo {
    pub started_at: Instant,
}

impl ServerInfo {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[get("")]
pub async fn get_settings(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let settings = repos.settings.find_all().await?;

    let can_view_all = user.has_permission(Permission::SystemSettings);
    let settings: Vec<SettingEntry> = settings
        .into_iter()
        .filter(|s| can_view_all || PUBLIC_SETTING_KEYS.contains(&s.key.as_str()))
        .map(|s| SettingEntry {
            key: s.key,
            value: s.value,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "System settings retrieved successfully",
        serde_json::json!({ "settings": settings }),
    )))
}

#[put("")]
pub async fn update_settings(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    request: web::Json<UpdateSettingsRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::SystemSettings)?;
    request.validate()?;

    let mut entries: Vec<(String, String)> = Vec::new();
    let mut push = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            entries.push((key.to_string(), value));
        }
    };
    push("company_name", request.company_name.clone());
    push("company_email", request.company_email.clone());
    push("company_phone", request.company_phone.clone());
    push("company_address", request.company_address.clone());
    push("default_currency", request.default_currency.clone());
    push("timezone", request.timezone.clone());
    push("language", request.language.clone());
    push("auto_backup", request.auto_backup.map(|v| v.to_string()));
    push(
        "email_notifications",
        request.email_notifications.map(|v| v.to_string()),
    );
    push(
        "sms_notifications",
        request.sms_notifications.map(|v| v.to_string()),
    );
    push(
        "booking_timeout",
        request.booking_timeout.map(|v| v.to_string()),
    );

    repos.settings.set_many(&entries).await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "update_settings", "system_settings")
                .details(serde_json::json!({
                    "updates": entries.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
                    "updated_by": user.name,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "System settings updated successfully",
    )))
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[get("/export/data")]
pub async fn export_data(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    query: web::Query<ExportQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::SystemSettings)?;

    let settings = repos.settings.find_all().await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "export_data", "system")
                .details(serde_json::json!({
                    "format": query.format.as_deref().unwrap_or("json"),
                    "exported_by": user.name,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    if query.format.as_deref() == Some("csv") {
        let mut csv = String::from("key,value\n");
        for setting in &settings {
            csv.push_str(&format!("{},{}\n", setting.key, setting.value));
        }
        return Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "text/csv"))
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ticketpro-export.csv\"",
            ))
            .body(csv));
    }

    let settings_map: serde_json::Map<String, serde_json::Value> = settings
        .into_iter()
        .map(|s| (s.key, serde_json::Value::String(s.value)))
        .collect();
    let export = serde_json::json!({
        "exported_at": Utc::now(),
        "exported_by": user.name,
        "version": env!("CARGO_PKG_VERSION"),
        "data": { "settings": settings_map },
    });

    Ok(HttpResponse::Ok()
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"ticketpro-export.json\"",
        ))
        .json(export))
}

#[derive(Debug, Deserialize)]
pub struct ActivityLogQuery {
    pub limit: Option<i64>,
    pub user_id: Option<Uuid>,
}

#[get("/logs/activity")]
pub async fn activity_logs(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    query: web::Query<ActivityLogQuery>,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::SystemSettings)?;

    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LOG_LIMIT).clamp(1, 1000);
    let logs = match query.user_id {
        Some(user_id) => repos.activity.find_by_user(user_id, limit).await?,
        None => repos.activity.find_recent(limit).await?,
    };

    let total = logs.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Activity logs retrieved successfully",
        serde_json::json!({ "logs": logs, "total": total }),
    )))
}

#[get("/system-info")]
pub async fn system_info(
    _user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    server: web::Data<ServerInfo>,
) -> Result<HttpResponse, AppError> {
    let total_users = repos.users.count().await?;
    let total_bookings = repos.bookings.count_total().await?;
    let database_size = db
        .size_bytes()
        .await
        .map(|bytes| format_bytes(bytes as u64))
        .unwrap_or_else(|_| "Unknown".to_string());

    let info = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": format_uptime(server.started_at.elapsed().as_secs()),
        "database_size": database_size,
        "total_users": total_users,
        "total_bookings": total_bookings,
        "last_backup": last_backup_time(&config.backup_dir),
    });

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "System information retrieved successfully",
        info,
    )))
}

#[post("/backup")]
pub async fn create_backup(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    config: web::Data<AppConfig>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::SystemSettings)?;

    let settings = repos.settings.find_all().await?;
    let settings_map: serde_json::Map<String, serde_json::Value> = settings
        .into_iter()
        .map(|s| (s.key, serde_json::Value::String(s.value)))
        .collect();

    let snapshot = serde_json::json!({
        "created_at": Utc::now(),
        "created_by": user.name,
        "version": env!("CARGO_PKG_VERSION"),
        "settings": settings_map,
        "counts": {
            "users": repos.users.count().await?,
            "ticket_batches": repos.batches.count().await?,
            "tickets": repos.tickets.count().await?,
            "bookings": repos.bookings.count_total().await?,
        },
    });

    let timestamp = Utc::now()
        .to_rfc3339()
        .replace([':', '.'], "-");
    let backup_dir = PathBuf::from(&config.backup_dir);
    std::fs::create_dir_all(&backup_dir)?;
    let backup_file = backup_dir.join(format!("backup-{timestamp}.json"));
    std::fs::write(&backup_file, serde_json::to_vec_pretty(&snapshot).unwrap_or_default())?;
    let size = std::fs::metadata(&backup_file)?.len();

    tracing::info!("backup written to {}", backup_file.display());

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "create_backup", "system")
                .entity_id("backup")
                .details(serde_json::json!({
                    "backup_file": backup_file.display().to_string(),
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Backup created successfully",
        serde_json::json!({
            "backup_file": backup_file.display().to_string(),
            "timestamp": timestamp,
            "size": size,
        }),
    )))
}

#[get("/{key}")]
pub async fn get_setting(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();

    if !OPEN_SETTING_KEYS.contains(&key.as_str()) {
        user.require(Permission::SystemSettings)
            .map_err(|_| AppError::Authorization("Access denied".to_string()))?;
    }

    let value = repos
        .settings
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("Setting not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Setting retrieved successfully",
        serde_json::json!({ "key": key, "value": value }),
    )))
}

#[put("/{key}")]
pub async fn put_setting(
    user: AuthenticatedUser,
    repos: web::Data<Repositories>,
    path: web::Path<String>,
    request: web::Json<SettingValueRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    user.require(Permission::SystemSettings)?;

    let key = path.into_inner();
    if !ALLOWED_SETTING_KEYS.contains(&key.as_str()) {
        return Err(AppError::Validation("Invalid setting key".to_string()));
    }

    let value = match &request.value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return Err(AppError::Validation("Value is required".to_string())),
    };

    let old_value = repos.settings.get(&key).await?;
    repos.settings.set(&key, &value).await?;

    repos
        .activity
        .record(
            NewActivityLog::new(user.id, "update_setting", "system_settings")
                .details(serde_json::json!({
                    "key": key,
                    "old_value": old_value,
                    "new_value": value,
                    "updated_by": user.name,
                }))
                .meta(request_meta(&http_req)),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Setting updated successfully")))
}

fn format_uptime(uptime_secs: u64) -> String {
    let days = uptime_secs / 86_400;
    let hours = (uptime_secs % 86_400) / 3_600;
    let minutes = (uptime_secs % 3_600) / 60;
    format!("{days}d {hours}h {minutes}m")
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{} {}", (value * 100.0).round() / 100.0, UNITS[exp])
}

fn last_backup_time(backup_dir: &str) -> String {
    let entries = match std::fs::read_dir(backup_dir) {
        Ok(entries) => entries,
        Err(_) => return "Never".to_string(),
    };

    entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("backup-") && name.ends_with(".json")
        })
        .filter_map(|e| e.metadata().ok().and_then(|m| m.modified().ok()))
        .max()
        .map(|time| chrono::DateTime::<Utc>::from(time).to_rfc3339())
        .unwrap_or_else(|| "Never".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formats_days_hours_minutes() {
        assert_eq!(format_uptime(0), "0d 0h 0m");
        assert_eq!(format_uptime(86_400 + 3_600 * 2 + 60 * 5), "1d 2h 5m");
    }

    #[test]
    fn bytes_format_scales_units() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn missing_backup_dir_reports_never() {
        assert_eq!(last_backup_time("/nonexistent/backups"), "Never");
    }
}
