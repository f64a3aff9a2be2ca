pub mod datetime;
pub mod notification;
