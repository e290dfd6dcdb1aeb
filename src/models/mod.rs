pub mod rental;
pub mod salon;
pub mod students;
pub mod users;
