use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// User-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Staff,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Staff => write!(f, "staff"),
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "staff" => Ok(UserRole::Staff),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl FromStr for UserStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(()),
        }
    }
}

// Ticket-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Available,
    Booked,
    Locked,
    Sold,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Available => write!(f, "available"),
            TicketStatus::Booked => write!(f, "booked"),
            TicketStatus::Locked => write!(f, "locked"),
            TicketStatus::Sold => write!(f, "sold"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(TicketStatus::Available),
            "booked" => Ok(TicketStatus::Booked),
            "locked" => Ok(TicketStatus::Locked),
            "sold" => Ok(TicketStatus::Sold),
            _ => Err(()),
        }
    }
}

// Booking-related enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    /// The ticket status a booking drags its ticket to when it enters this
    /// state. `Pending` leaves the ticket untouched.
    pub fn cascaded_ticket_status(self) -> Option<TicketStatus> {
        match self {
            BookingStatus::Confirmed => Some(TicketStatus::Sold),
            BookingStatus::Cancelled | BookingStatus::Expired => Some(TicketStatus::Available),
            BookingStatus::Pending => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "expired" => Ok(BookingStatus::Expired),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Full,
    Partial,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Full => write!(f, "full"),
            PaymentType::Partial => write!(f, "partial"),
        }
    }
}

// Permission model: each role maps to a fixed capability set. Checks are
// plain set membership; there is no inheritance between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewBuyingPrice,
    EditBatches,
    DeleteBatches,
    CreateBatches,
    ViewProfit,
    OverrideLocks,
    ManageUsers,
    ViewAllBookings,
    ConfirmBookings,
    ConfirmSales,
    SystemSettings,
    ViewTickets,
    CreateBookings,
    PartialPayments,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewBuyingPrice => "view_buying_price",
            Permission::EditBatches => "edit_batches",
            Permission::DeleteBatches => "delete_batches",
            Permission::CreateBatches => "create_batches",
            Permission::ViewProfit => "view_profit",
            Permission::OverrideLocks => "override_locks",
            Permission::ManageUsers => "manage_users",
            Permission::ViewAllBookings => "view_all_bookings",
            Permission::ConfirmBookings => "confirm_bookings",
            Permission::ConfirmSales => "confirm_sales",
            Permission::SystemSettings => "system_settings",
            Permission::ViewTickets => "view_tickets",
            Permission::CreateBookings => "create_bookings",
            Permission::PartialPayments => "partial_payments",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl UserRole {
    /// The static permission table for this role.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            UserRole::Admin => &[
                Permission::ViewBuyingPrice,
                Permission::EditBatches,
                Permission::DeleteBatches,
                Permission::CreateBatches,
                Permission::ViewProfit,
                Permission::OverrideLocks,
                Permission::ManageUsers,
                Permission::ViewAllBookings,
                Permission::ConfirmBookings,
                Permission::ConfirmSales,
                Permission::SystemSettings,
            ],
            UserRole::Manager => &[
                Permission::ViewTickets,
                Permission::CreateBookings,
                Permission::ConfirmBookings,
                Permission::ConfirmSales,
                Permission::ViewAllBookings,
            ],
            UserRole::Staff => &[
                Permission::ViewTickets,
                Permission::CreateBookings,
                Permission::PartialPayments,
            ],
        }
    }

    pub fn has_permission(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_confirm_and_manage() {
        assert!(UserRole::Admin.has_permission(Permission::ConfirmSales));
        assert!(UserRole::Admin.has_permission(Permission::ManageUsers));
        assert!(UserRole::Admin.has_permission(Permission::ViewBuyingPrice));
    }

    #[test]
    fn staff_cannot_confirm_sales_or_view_all_bookings() {
        assert!(!UserRole::Staff.has_permission(Permission::ConfirmSales));
        assert!(!UserRole::Staff.has_permission(Permission::ViewAllBookings));
        assert!(UserRole::Staff.has_permission(Permission::CreateBookings));
    }

    #[test]
    fn manager_confirms_but_does_not_manage_users() {
        assert!(UserRole::Manager.has_permission(Permission::ConfirmSales));
        assert!(UserRole::Manager.has_permission(Permission::ViewAllBookings));
        assert!(!UserRole::Manager.has_permission(Permission::ManageUsers));
        assert!(!UserRole::Manager.has_permission(Permission::ViewProfit));
    }

    #[test]
    fn booking_status_cascades_to_ticket_status() {
        assert_eq!(
            BookingStatus::Confirmed.cascaded_ticket_status(),
            Some(TicketStatus::Sold)
        );
        assert_eq!(
            BookingStatus::Cancelled.cascaded_ticket_status(),
            Some(TicketStatus::Available)
        );
        assert_eq!(
            BookingStatus::Expired.cascaded_ticket_status(),
            Some(TicketStatus::Available)
        );
        assert_eq!(BookingStatus::Pending.cascaded_ticket_status(), None);
    }

    #[test]
    fn status_round_trips_through_wire_strings() {
        assert_eq!("locked".parse::<TicketStatus>(), Ok(TicketStatus::Locked));
        assert_eq!(
            "confirmed".parse::<BookingStatus>(),
            Ok(BookingStatus::Confirmed)
        );
        assert!("reserved".parse::<TicketStatus>().is_err());
        assert_eq!(TicketStatus::Sold.to_string(), "sold");
    }
}
