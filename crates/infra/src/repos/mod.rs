pub mod bookings;
pub mod dashboard;
pub mod notifications;
pub mod players;
pub mod revenue_models;
pub mod staff;
pub mod subscriptions;
pub mod turfs;
pub mod users;

pub use bookings::{BookingAttempt, BookingFilter, BookingRepo, CreateBooking, StatusChange};
pub use dashboard::DashboardRepo;
pub use notifications::NotificationRepo;
pub use players::{CreatePlayer, PlayerRepo, UpdatePlayer};
pub use revenue_models::{CreateRevenueModel, RevenueModelRepo, UpdateRevenueModel};
pub use staff::{CreateStaff, StaffRepo, UpdateStaff};
pub use subscriptions::{CreateSubscription, SubscriptionRepo};
pub use turfs::{CreateTurf, TurfFilter, TurfRepo, UpdateTurf};
pub use users::{CreateUser, UpdateUser, UserFilter, UserRepo};

/// Result of a check-then-insert guarded by a plan limit. The check and the
/// insert run in one transaction holding a row lock on the owner, so two
/// concurrent creates cannot both pass the check.
#[derive(Debug)]
pub enum GateOutcome<T> {
    Created(T),
    OwnerNotFound,
    LimitReached { current: i64, max: i64 },
}
