pub mod dao;

pub use dao::Repository;
