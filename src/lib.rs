//! This crate is an encoder for the IAB Transparency and Consent Framework (TCF) v2
//! [TC string](https://github.com/InteractiveAdvertisingBureau/GDPR-Transparency-and-Consent-Framework),
//! and for the CCPA [US Privacy string](https://github.com/InteractiveAdvertisingBureau/USPrivacy).
//!
//! It turns the consent choices collected by a Consent Management Platform (CMP) into the
//! compact strings that ad-tech vendors read downstream.
//!
//! NOTE: This is not an official IAB library.
//!
//! # Encoding TC strings
//!
//! A TC string is made of a mandatory core segment and a list of optional segments.
//!
//! The [`TcStringEncoderV2`](sections/tcfeuv2/struct.TcStringEncoderV2.html) type is configured
//! once with the metadata of the CMP, then encodes consent decisions.
//!
//! ```
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use iab_tcf_encoder::sections::tcfeuv2::{CmpMetadata, ConsentDecision, TcStringEncoderV2};
//!
//! let metadata = CmpMetadata {
//!     created: 1_650_412_800_000,
//!     last_updated: 1_650_412_800_000,
//!     cmp_id: 31,
//!     cmp_version: 640,
//!     consent_screen: 1,
//!     consent_language: "EN".to_string(),
//!     vendor_list_version: 126,
//!     policy_version: 2,
//!     is_service_specific: true,
//!     publisher_country_code: "DE".to_string(),
//!     ..Default::default()
//! };
//! let encoder = TcStringEncoderV2::new(metadata);
//!
//! // the user consents to purpose 3 for vendor Google Advertising Products
//! let decision = ConsentDecision {
//!     purpose_consents: [3].into(),
//!     vendor_consents: [755].into(),
//!     ..Default::default()
//! };
//!
//! let tc_string = encoder.encode(&decision)?;
//! assert_eq!(tc_string, "CPXuQIAPXuQIAAfKABENB-CgACAAAAAAAAYgF5wAQF5gAAAA");
//! # Ok(())
//! # }
//! ```
//!
//! # Encoding US Privacy strings
//!
//! ```
//! use iab_tcf_encoder::sections::uspv1::{ANALYTICS, UsPrivacyEncoder};
//!
//! let encoder = UsPrivacyEncoder::new(
//!     [(ANALYTICS.to_string(), vec!["p1".to_string()])].into_iter().collect(),
//! );
//! let consents = [("p1".to_string(), true)].into_iter().collect();
//!
//! assert_eq!(encoder.encode(&consents, false, false).to_string(), "1NYN");
//! ```
//!
//! # Error handling
//!
//! Encoding the core segment of a TC string is all or nothing: if any of its fields cannot be
//! written, for example an invalid language code or a value too large for its field, the whole
//! string fails to encode.
//!
//! Optional segments are more lenient. A segment without data is simply left out of the string,
//! and the reason is logged at debug level with [`tracing`](https://docs.rs/tracing).
//!
pub(crate) mod core;
pub mod sections;
pub mod signals;
