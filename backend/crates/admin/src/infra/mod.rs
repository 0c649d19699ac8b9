pub mod postgres;

pub use postgres::PgAdminRepository;
