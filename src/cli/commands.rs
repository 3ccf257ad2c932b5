pub mod graph;
pub mod initdb;
pub mod profiles;
pub mod users;
