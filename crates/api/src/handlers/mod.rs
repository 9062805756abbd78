pub mod child_medications;
pub mod children;
pub mod events;
pub mod tags;
pub mod timeline;
