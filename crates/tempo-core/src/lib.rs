//! Core library for TempoVale.
//!
//! This crate provides:
//! - Work-time conversion (purchase value to hours and minutes of paid work)
//! - Receipt total extraction from OCR text (Brazilian receipts, BRL)
//! - OCR.space response model
//! - Purchase history storage (in-memory and JSON file)
//! - User, purchase and configuration models

pub mod error;
pub mod models;
pub mod worktime;
pub mod receipt;
pub mod ocr;
pub mod storage;

pub use error::{TempoError, Result};
pub use models::profile::{RateProfile, User, NewUser, ProfileUpdate};
pub use models::purchase::{Purchase, NewPurchase, PurchaseKind, PurchaseSummary, HistoryQuery, SortKey};
pub use worktime::{WorkTime, WorkTimeConversion, convert, daily_rate, format_work_time, hourly_rate};
pub use receipt::{ReceiptTotalExtractor, ExtractionResult, build_result, extract_total};
pub use ocr::{OcrImage, OcrSpaceResponse};
pub use storage::{Storage, MemoryStorage, JsonFileStorage};
