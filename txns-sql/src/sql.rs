/// Contains the SQL commands issued against bookkeeping tables.
pub mod command;

mod ident;
mod statement;

pub use ident::Ident;
pub use statement::{Statement, StatementBuilder};
