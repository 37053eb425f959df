//! Semi-monthly payroll engine
//!
//! This crate computes per-employee payroll for a construction company:
//! basic pay, approved overtime, SSS, PhilHealth and Pag-IBIG contributions,
//! graduated withholding tax and loan amortization, producing one itemised
//! payroll record per employee per pay period.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
