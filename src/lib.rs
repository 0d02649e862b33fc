//! lodge-dues - Membership dues ledger for lodges
//!
//! This library provides the record keeping behind the `lodge` command: a
//! member roll, a per-member fiscal-year ledger of monthly dues, and the
//! allocation engine that decides how a payment is spread across that ledger.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (members, dues entries, fiscal calendar, money)
//! - `storage`: JSON file storage layer and the `DuesStore` seam
//! - `services`: Ledger queries, payment allocation, bulk strategies, receipts
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `export`: CSV export
//! - `cli`: Command handlers for the `lodge` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use lodge_dues::config::{paths::LodgePaths, settings::Settings};
//! use lodge_dues::models::{DuesMonth, Money};
//! use lodge_dues::services::{PaymentPreview, PaymentService};
//! use lodge_dues::storage::Storage;
//!
//! let paths = LodgePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let payments = PaymentService::new(&storage, &settings);
//! let preview = payments.preview(member_id, DuesMonth::new(2025, 9), Money::parse("120")?)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LodgeError, LodgeResult};
