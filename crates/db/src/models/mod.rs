pub mod child;
pub mod child_medication;
pub mod event;
pub mod medication;
pub mod tag;
pub mod user;
