pub mod csv;
pub mod notification;
