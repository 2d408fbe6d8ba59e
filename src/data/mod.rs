//! Core data models for the rail customer profile resolver
//!
//! This module contains the strongly-typed domain records produced by the
//! normalizer and cached by the resolver, plus the customer preferences
//! model owned by the preferences service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A resolved rail customer profile.
///
/// Produced fresh on every cache miss by the normalizer, then written into
/// the cache with a TTL. A customer never carries more than one loyalty
/// program; rail passes keep the partner's input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier for the customer (never empty)
    pub customer_id: String,
    /// First name, when the partner supplied personal information
    pub first_name: Option<String>,
    /// Last name, when the partner supplied personal information
    pub last_name: Option<String>,
    /// Birth date, when present and well-formed
    pub birth_date: Option<NaiveDate>,
    /// Contact email address
    pub email: Option<String>,
    /// Contact cell phone number
    pub phone_number: Option<String>,
    /// At most one active loyalty program
    pub loyalty_program: Option<LoyaltyProgram>,
    /// Active rail passes, in partner input order (possibly empty)
    pub rail_passes: Vec<RailPass>,
}

/// An active loyalty program membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyProgram {
    /// Program card number (never blank)
    pub number: String,
    /// Program status tier
    pub status: LoyaltyStatus,
    /// Display label; falls back to the status name when the partner
    /// supplied none
    pub label: String,
    /// Start of the validity period, if known
    pub validity_start: Option<NaiveDate>,
    /// End of the validity period, if known
    pub validity_end: Option<NaiveDate>,
}

/// Loyalty program status tiers.
///
/// The variants carry the partner's literal status codes, which is why the
/// names do not follow Rust casing. Unknown codes never reach this type:
/// the normalizer drops records whose status fails [`LoyaltyStatus::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum LoyaltyStatus {
    CD7F32,
    E0E0E0,
    FFD700,
    B0B0B0,
    _019875,
    DBD4E0_B38BB3,
}

impl LoyaltyStatus {
    /// Parses a partner status code into a status tier.
    ///
    /// Matching is exact; returns `None` for any code outside the closed set.
    pub fn from_code(code: &str) -> Option<LoyaltyStatus> {
        match code {
            "CD7F32" => Some(LoyaltyStatus::CD7F32),
            "E0E0E0" => Some(LoyaltyStatus::E0E0E0),
            "FFD700" => Some(LoyaltyStatus::FFD700),
            "B0B0B0" => Some(LoyaltyStatus::B0B0B0),
            "_019875" => Some(LoyaltyStatus::_019875),
            "DBD4E0_B38BB3" => Some(LoyaltyStatus::DBD4E0_B38BB3),
            _ => None,
        }
    }

    /// Returns the symbolic name, used as the display label fallback.
    pub fn name(&self) -> &'static str {
        match self {
            LoyaltyStatus::CD7F32 => "CD7F32",
            LoyaltyStatus::E0E0E0 => "E0E0E0",
            LoyaltyStatus::FFD700 => "FFD700",
            LoyaltyStatus::B0B0B0 => "B0B0B0",
            LoyaltyStatus::_019875 => "_019875",
            LoyaltyStatus::DBD4E0_B38BB3 => "DBD4E0_B38BB3",
        }
    }
}

/// An active rail pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailPass {
    /// Pass number (never blank)
    pub number: String,
    /// Product type of the pass
    pub pass_type: PassType,
    /// Display label; falls back to the pass type name when the partner
    /// supplied none
    pub label: String,
    /// Start of the validity period, if known
    pub validity_start: Option<NaiveDate>,
    /// End of the validity period, if known
    pub validity_end: Option<NaiveDate>,
}

/// Rail pass product types, matching the partner's product codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum PassType {
    YOUTH,
    FAMILY,
    SENIOR,
    PRO_SECOND,
    PRO_FIRST,
    FROM_OUTER_SPACE,
}

impl PassType {
    /// Parses a partner product code into a pass type.
    ///
    /// Matching is exact; returns `None` for any code outside the closed set.
    pub fn from_code(code: &str) -> Option<PassType> {
        match code {
            "YOUTH" => Some(PassType::YOUTH),
            "FAMILY" => Some(PassType::FAMILY),
            "SENIOR" => Some(PassType::SENIOR),
            "PRO_SECOND" => Some(PassType::PRO_SECOND),
            "PRO_FIRST" => Some(PassType::PRO_FIRST),
            "FROM_OUTER_SPACE" => Some(PassType::FROM_OUTER_SPACE),
            _ => None,
        }
    }

    /// Returns the symbolic name, used as the display label fallback.
    pub fn name(&self) -> &'static str {
        match self {
            PassType::YOUTH => "YOUTH",
            PassType::FAMILY => "FAMILY",
            PassType::SENIOR => "SENIOR",
            PassType::PRO_SECOND => "PRO_SECOND",
            PassType::PRO_FIRST => "PRO_FIRST",
            PassType::FROM_OUTER_SPACE => "FROM_OUTER_SPACE",
        }
    }
}

/// A named travel preferences profile owned by a customer.
///
/// One customer may own many named profiles; each creation is a new record
/// with a generated id. Preferences live in durable storage and are never
/// cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPreferences {
    /// Generated identifier of this profile
    pub id: String,
    /// Owning customer
    pub customer_id: String,
    /// Preferred seat placement
    pub seat_preference: SeatPreference,
    /// Preferred travel class (1 or 2)
    pub class_preference: i32,
    /// Display name of the profile (1-50 chars, letters/spaces/hyphens)
    pub profile_name: String,
    /// Preferred language, if any
    pub language: Option<Language>,
}

/// Seat placement preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatPreference {
    NoPreference,
    NearWindow,
    NearCorridor,
}

impl SeatPreference {
    /// Parses user input into a seat preference.
    ///
    /// Matching is case-insensitive and supports aliases:
    /// - "none" | "no_preference" -> NoPreference
    /// - "window" | "near_window" -> NearWindow
    /// - "corridor" | "aisle" | "near_corridor" -> NearCorridor
    ///
    /// Returns `None` if the input doesn't match any preference.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<SeatPreference> {
        match s.to_lowercase().trim() {
            "none" | "no_preference" => Some(SeatPreference::NoPreference),
            "window" | "near_window" => Some(SeatPreference::NearWindow),
            "corridor" | "aisle" | "near_corridor" => Some(SeatPreference::NearCorridor),
            _ => None,
        }
    }
}

/// Supported preference languages (ISO 639-1 codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    De,
    Es,
    En,
    It,
    Pt,
}

impl Language {
    /// Parses a lowercase ISO 639-1 code into a supported language.
    ///
    /// Returns `None` for codes outside the supported set.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Language> {
        match s.to_lowercase().trim() {
            "fr" => Some(Language::Fr),
            "de" => Some(Language::De),
            "es" => Some(Language::Es),
            "en" => Some(Language::En),
            "it" => Some(Language::It),
            "pt" => Some(Language::Pt),
            _ => None,
        }
    }

    /// Returns the ISO 639-1 code for the language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::De => "de",
            Language::Es => "es",
            Language::En => "en",
            Language::It => "it",
            Language::Pt => "pt",
        }
    }
}
