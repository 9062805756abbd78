pub mod child_medication_repo;
pub mod child_repo;
pub mod event_repo;
pub mod medication_repo;
pub mod tag_repo;
pub mod user_repo;

pub use child_medication_repo::ChildMedicationRepo;
pub use child_repo::ChildRepo;
pub use event_repo::EventRepo;
pub use medication_repo::MedicationRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
