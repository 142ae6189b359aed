pub mod assignments;
pub mod files;
pub mod groups;
pub mod submissions;
pub mod subjects;
pub mod users;
