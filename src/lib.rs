//! # fhir-emr-intake
//!
//! Converts a FHIR Bundle of clinical-encounter resources into the fixed
//! clinical-intake record the EKA EMR API consumes.
//!
//! The input is an open, per-resource-type schema where the same clinical
//! fact can be encoded several ways; the output is a closed set of
//! presentation buckets (symptoms, diagnoses, medications, lab orders and
//! results, structured history, vitals, ...). Each bucket has its own
//! classification rule over category and coding metadata, and every
//! extracted field degrades to a documented placeholder when the source
//! record does not carry it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fhir_emr_intake::*;
//!
//! # fn example() -> Result<()> {
//! let bundle: Bundle = serde_json::from_str(r#"{"resourceType": "Bundle"}"#)?;
//! let converter = IntakeConverter::new();
//! let record = converter.convert(&bundle)?;
//! let payload = serde_json::to_string(&record)?;
//! # let _ = payload;
//! # Ok(())
//! # }
//! ```
//!
//! Conversions are reproducible when run with a pinned context:
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use fhir_emr_intake::*;
//!
//! # fn example(bundle: &Bundle) -> Result<()> {
//! let mut context =
//!     ConversionContext::with_parts(Utc::now(), Box::new(SequentialIds::default()));
//! let record = IntakeConverter::new().convert_with_context(bundle, &mut context)?;
//! # let _ = record;
//! # Ok(())
//! # }
//! ```

pub mod converter;
pub mod error;
pub mod types;

pub use converter::*;
pub use error::Result;
pub use error::IntakeError;
pub use types::*;
