pub use super::account::Entity as Account;
pub use super::booking::Entity as Booking;
pub use super::patient::Entity as Patient;
pub use super::payment::Entity as Payment;
pub use super::slot::Entity as Slot;
