//! Form payloads and their validation, decoupled from the handlers that
//! render the outcome. Each `validate` returns either the cleaned value or
//! the complete list of field-level errors, never just the first one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The bookable half-hour slots for the dining room.
pub const TIME_SLOTS: [&str; 9] = [
    "17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00", "20:30", "21:00",
];

pub const MAX_PARTY_SIZE: i32 = 6;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub special_instructions: Option<String>,
}

/// A checkout form that passed validation; fields are trimmed.
#[derive(Debug, Clone)]
pub struct CheckoutContact {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub special_instructions: String,
}

impl CheckoutForm {
    pub fn validate(self) -> Result<CheckoutContact, Vec<FieldError>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            errors.push(FieldError::new("full_name", "This field is required"));
        } else if full_name.chars().count() > 200 {
            errors.push(FieldError::new(
                "full_name",
                "Must be at most 200 characters",
            ));
        }

        let email = self.email.trim().to_string();
        if email.is_empty() {
            errors.push(FieldError::new("email", "This field is required"));
        } else if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }

        let address = self.address.trim().to_string();
        if address.is_empty() {
            errors.push(FieldError::new("address", "This field is required"));
        }

        let phone = self.phone.trim().to_string();
        if phone.is_empty() {
            errors.push(FieldError::new("phone", "This field is required"));
        } else if phone.chars().count() > 20 {
            errors.push(FieldError::new("phone", "Must be at most 20 characters"));
        } else if !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
        {
            errors.push(FieldError::new("phone", "Enter a valid phone number"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CheckoutContact {
            full_name,
            email,
            address,
            phone,
            special_instructions: self
                .special_instructions
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReservationForm {
    pub name: String,
    pub email: String,
    /// ISO date, e.g. 2026-09-14.
    pub date: NaiveDate,
    pub time_slot: String,
    pub party_size: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub party_size: i32,
    pub special_requests: String,
}

impl ReservationForm {
    pub fn validate(self, today: NaiveDate) -> Result<ReservationRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "This field is required"));
        }

        let email = self.email.trim().to_string();
        if email.is_empty() {
            errors.push(FieldError::new("email", "This field is required"));
        } else if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }

        if self.date < today {
            errors.push(FieldError::new("date", "Date cannot be in the past"));
        }

        if !TIME_SLOTS.contains(&self.time_slot.as_str()) {
            errors.push(FieldError::new("time_slot", "Choose one of the open slots"));
        }

        if !(1..=MAX_PARTY_SIZE).contains(&self.party_size) {
            errors.push(FieldError::new(
                "party_size",
                format!("Party size must be between 1 and {MAX_PARTY_SIZE}"),
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ReservationRequest {
            name,
            email,
            date: self.date,
            time_slot: self.time_slot,
            party_size: self.party_size,
            special_requests: self
                .special_requests
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // Enough for a contact form; delivery failures are the real validator.
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_checkout() -> CheckoutForm {
        CheckoutForm {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            address: "12 Analytical Way".into(),
            phone: "+44 20 7946 0123".into(),
            special_instructions: None,
        }
    }

    #[test]
    fn checkout_form_accepts_valid_input() {
        let contact = valid_checkout().validate().expect("should validate");
        assert_eq!(contact.full_name, "Ada Lovelace");
        assert_eq!(contact.special_instructions, "");
    }

    #[test]
    fn checkout_form_trims_whitespace() {
        let mut form = valid_checkout();
        form.full_name = "  Ada Lovelace  ".into();
        form.special_instructions = Some("  ring the bell  ".into());
        let contact = form.validate().expect("should validate");
        assert_eq!(contact.full_name, "Ada Lovelace");
        assert_eq!(contact.special_instructions, "ring the bell");
    }

    #[test]
    fn checkout_form_collects_all_missing_fields() {
        let form = CheckoutForm {
            full_name: " ".into(),
            email: "".into(),
            address: "".into(),
            phone: "".into(),
            special_instructions: None,
        };
        let errors = form.validate().expect_err("should fail");
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["full_name", "email", "address", "phone"]);
    }

    #[test]
    fn checkout_form_rejects_bad_email() {
        for bad in ["not-an-email", "@example.com", "ada@", "ada@nodot", "ada@.com"] {
            let mut form = valid_checkout();
            form.email = bad.into();
            let errors = form.validate().expect_err("should fail");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "email");
        }
    }

    #[test]
    fn checkout_form_rejects_bad_phone() {
        let mut form = valid_checkout();
        form.phone = "call me maybe".into();
        let errors = form.validate().expect_err("should fail");
        assert_eq!(errors[0].field, "phone");
    }

    fn valid_reservation() -> ReservationForm {
        ReservationForm {
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            time_slot: "19:00".into(),
            party_size: 4,
            special_requests: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn reservation_form_accepts_valid_input() {
        let req = valid_reservation().validate(today()).expect("should validate");
        assert_eq!(req.time_slot, "19:00");
        assert_eq!(req.party_size, 4);
    }

    #[test]
    fn reservation_form_rejects_past_date() {
        let mut form = valid_reservation();
        form.date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let errors = form.validate(today()).expect_err("should fail");
        assert_eq!(errors[0].field, "date");
    }

    #[test]
    fn reservation_form_rejects_unknown_slot() {
        let mut form = valid_reservation();
        form.time_slot = "03:00".into();
        let errors = form.validate(today()).expect_err("should fail");
        assert_eq!(errors[0].field, "time_slot");
    }

    #[test]
    fn reservation_form_rejects_party_size_out_of_range() {
        for size in [0, -2, 7] {
            let mut form = valid_reservation();
            form.party_size = size;
            let errors = form.validate(today()).expect_err("should fail");
            assert_eq!(errors[0].field, "party_size");
        }
    }
}
