use std::ops::RangeInclusive;

use super::*;

/// Where each guard attaches and what it checks.
///
/// `Default` reproduces the registration, payment and apply-pass pages as
/// served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuardConfig {
    pub registration: RegistrationRules,
    pub payment: PaymentRules,
    pub route: RouteRules,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRules {
    /// Substring of the form's `action` attribute.
    pub action_fragment: String,
    /// Element id of the password input.
    pub password_field: String,
    /// Element id of the phone number input.
    pub phone_field: String,
    /// Minimum password length in UTF-16 code units.
    pub min_password_len: usize,
    pub phone_digits: RangeInclusive<usize>,
}

impl Default for RegistrationRules {
    fn default() -> Self {
        Self {
            action_fragment: "/register".into(),
            password_field: "password".into(),
            phone_field: "phone_number".into(),
            min_password_len: 6,
            phone_digits: 10..=15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRules {
    pub action_fragment: String,
    /// Selector for the pay button, resolved inside the payment form.
    pub button_selector: String,
    pub processing_label: String,
}

impl Default for PaymentRules {
    fn default() -> Self {
        Self {
            action_fragment: "/payment".into(),
            button_selector: ".button.primary".into(),
            processing_label: "Processing Payment...".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRules {
    pub action_fragment: String,
    /// `name` of the start point `<select>`.
    pub start_select: String,
    /// `name` of the destination `<select>`.
    pub end_select: String,
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            action_fragment: "/apply_pass".into(),
            start_select: "start_point".into(),
            end_select: "end_point".into(),
        }
    }
}

impl GuardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registration(mut self, rules: RegistrationRules) -> Self {
        self.registration = rules;
        self
    }

    pub fn with_payment(mut self, rules: PaymentRules) -> Self {
        self.payment = rules;
        self
    }

    pub fn with_route(mut self, rules: RouteRules) -> Self {
        self.route = rules;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let registration = &self.registration;
        require_non_empty("registration.action_fragment", &registration.action_fragment)?;
        require_non_empty("registration.password_field", &registration.password_field)?;
        require_non_empty("registration.phone_field", &registration.phone_field)?;
        if registration.phone_digits.is_empty() {
            return Err(Error::Config(format!(
                "registration.phone_digits is empty: {}..={}",
                registration.phone_digits.start(),
                registration.phone_digits.end()
            )));
        }

        require_non_empty("payment.action_fragment", &self.payment.action_fragment)?;
        require_non_empty("payment.button_selector", &self.payment.button_selector)?;
        parse_selector_groups(&self.payment.button_selector).map_err(|err| {
            Error::Config(format!("payment.button_selector: {err}"))
        })?;

        require_non_empty("route.action_fragment", &self.route.action_fragment)?;
        require_non_empty("route.start_select", &self.route.start_select)?;
        require_non_empty("route.end_select", &self.route.end_select)?;
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{field} must not be empty")));
    }
    Ok(())
}
