//! Infrastructure layer - External systems integration
//!
//! Database connection and migrations, repositories, and the Unit of Work
//! for transaction management.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use unit_of_work::{Persistence, Repositories, TransactionContext, TxFuture, UnitOfWork};
