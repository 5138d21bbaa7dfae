pub mod postgres_db;
