//! Normalizer — maps the partner's raw customer payload to a typed [`Customer`]
//!
//! This is a total function: every input maps to some customer, and no input
//! raises. Records in the schemaless "misc" bags that do not satisfy the
//! acceptance rules for their target entity are dropped silently; that is
//! deliberate information loss, not an error condition. Present-but-malformed
//! dates degrade to `None` without rejecting the record that carries them.

use chrono::NaiveDate;
use tracing::warn;

use crate::data::{Customer, LoyaltyProgram, LoyaltyStatus, PassType, RailPass};
use crate::partner::{RawCustomer, RawMisc, RawRecord, LOYALTY_TYPE, RAIL_PASS_TYPE};

const LOYALTY_NUMBER_FIELD: &str = "loyalty_number";
const LOYALTY_STATUS_FIELD: &str = "loyalty_status";
const LOYALTY_LABEL_FIELD: &str = "loyalty_status_label";
const LOYALTY_VALIDITY_START_FIELD: &str = "validity_start";
const LOYALTY_VALIDITY_END_FIELD: &str = "validity_end";
const LOYALTY_DISABLE_STATUS_FIELD: &str = "disable_status";

const PASS_NUMBER_FIELD: &str = "pass_number";
const PASS_PRODUCT_CODE_FIELD: &str = "new_product_code";
const PASS_LABEL_FIELD: &str = "pass_label";
const PASS_VALIDITY_START_FIELD: &str = "pass_validity_start";
const PASS_VALIDITY_END_FIELD: &str = "pass_validity_end";
const PASS_ACTIVE_STATUS_FIELD: &str = "pass_is_active";

/// The literal marker value meaning "this record is currently active"
const ACTIVE_FIELD_VALUE: &str = "000";

/// Normalizes a raw partner payload into a typed customer.
pub fn normalize(raw: &RawCustomer) -> Customer {
    let (first_name, last_name, birth_date) = match &raw.personal_information {
        Some(info) => (
            info.first_name.clone(),
            info.last_name.clone(),
            parse_date_or_none(info.birthdate.as_deref()),
        ),
        None => (None, None, None),
    };

    let (email, phone_number) = match &raw.personal_details {
        Some(details) => (
            details.email.as_ref().and_then(|e| e.address.clone()),
            details.cell.as_ref().and_then(|c| c.number.clone()),
        ),
        None => (None, None),
    };

    Customer {
        customer_id: raw.id.clone(),
        first_name,
        last_name,
        birth_date,
        email,
        phone_number,
        loyalty_program: extract_loyalty_program(raw),
        rail_passes: extract_rail_passes(raw),
    }
}

/// Extracts the customer's loyalty program, if any.
///
/// Only groups tagged "LOYALTY" with at least one record are considered, and
/// within them only records tagged "LOYALTY" that pass the acceptance rules.
/// When the partner sends several valid candidates the first by input order
/// wins; that inconsistency is worth a warning but not an error.
fn extract_loyalty_program(raw: &RawCustomer) -> Option<LoyaltyProgram> {
    let candidates: Vec<LoyaltyProgram> = raw
        .misc
        .iter()
        .filter(|group| group.group_tag() == Some(LOYALTY_TYPE) && group.count > 0)
        .flat_map(|group: &RawMisc| group.records.iter())
        .filter(|record| record.type_tag() == Some(LOYALTY_TYPE))
        .filter_map(loyalty_from_record)
        .collect();

    if candidates.len() > 1 {
        warn!(
            customer_id = %raw.id,
            candidates = candidates.len(),
            "partner sent several valid loyalty programs, keeping the first"
        );
    }

    candidates.into_iter().next()
}

/// Builds a loyalty program from one record, or rejects it.
///
/// A record is accepted only when its number is non-blank, its active marker
/// equals the active value, and its status is a known status code.
fn loyalty_from_record(record: &RawRecord) -> Option<LoyaltyProgram> {
    let fields = record.field_map();

    // field_map drops blank values, so presence means non-blank
    let number = fields.get(LOYALTY_NUMBER_FIELD)?;
    if fields.get(LOYALTY_DISABLE_STATUS_FIELD).copied() != Some(ACTIVE_FIELD_VALUE) {
        return None;
    }
    let status = LoyaltyStatus::from_code(fields.get(LOYALTY_STATUS_FIELD)?)?;

    Some(LoyaltyProgram {
        number: (*number).to_string(),
        status,
        label: fields
            .get(LOYALTY_LABEL_FIELD)
            .map_or_else(|| status.name().to_string(), |label| (*label).to_string()),
        validity_start: parse_date_or_none(fields.get(LOYALTY_VALIDITY_START_FIELD).copied()),
        validity_end: parse_date_or_none(fields.get(LOYALTY_VALIDITY_END_FIELD).copied()),
    })
}

/// Extracts all of the customer's rail passes, preserving input order.
///
/// Same shape as the loyalty extraction, except every accepted record is
/// kept rather than just the first.
fn extract_rail_passes(raw: &RawCustomer) -> Vec<RailPass> {
    raw.misc
        .iter()
        .filter(|group| group.group_tag() == Some(RAIL_PASS_TYPE))
        .flat_map(|group| group.records.iter())
        .filter(|record| record.type_tag() == Some(RAIL_PASS_TYPE))
        .filter_map(rail_pass_from_record)
        .collect()
}

/// Builds a rail pass from one record, or rejects it.
fn rail_pass_from_record(record: &RawRecord) -> Option<RailPass> {
    let fields = record.field_map();

    let number = fields.get(PASS_NUMBER_FIELD)?;
    if fields.get(PASS_ACTIVE_STATUS_FIELD).copied() != Some(ACTIVE_FIELD_VALUE) {
        return None;
    }
    let pass_type = PassType::from_code(fields.get(PASS_PRODUCT_CODE_FIELD)?)?;

    Some(RailPass {
        number: (*number).to_string(),
        pass_type,
        label: fields
            .get(PASS_LABEL_FIELD)
            .map_or_else(|| pass_type.name().to_string(), |label| (*label).to_string()),
        validity_start: parse_date_or_none(fields.get(PASS_VALIDITY_START_FIELD).copied()),
        validity_end: parse_date_or_none(fields.get(PASS_VALIDITY_END_FIELD).copied()),
    })
}

/// Parses an ISO `YYYY-MM-DD` date, degrading to `None` when absent or malformed.
fn parse_date_or_none(maybe_date: Option<&str>) -> Option<NaiveDate> {
    maybe_date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}
