pub mod connection;
pub mod crosswalk_repository;

pub use connection::connect_pool;
pub use crosswalk_repository::CrosswalkRepository;
