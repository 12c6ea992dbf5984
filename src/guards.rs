use super::*;

/// Console line written when the registration form passes every check.
pub const REGISTRATION_OK_MESSAGE: &str = "Registration form validated successfully (client-side).";

/// A submit-time interceptor attached to one form.
///
/// Implementations read what they need from the page, and either leave the
/// event alone or alert and call [`SubmitEvent::prevent_default`]. Returning
/// an error aborts the dispatch; a missing element is not an error.
pub trait SubmitGuard {
    fn name(&self) -> &'static str;

    fn on_submit(&self, page: &mut Page, event: &mut SubmitEvent) -> Result<()>;
}

/// Why a submission was blocked. `Display` renders the alert text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    PasswordTooShort { min_len: usize },
    InvalidPhoneNumber { min_digits: usize, max_digits: usize },
    SameRoutePoints,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordTooShort { min_len } => {
                write!(f, "Password must be at least {min_len} characters long.")
            }
            Self::InvalidPhoneNumber {
                min_digits,
                max_digits,
            } => write!(
                f,
                "Please enter a valid phone number ({min_digits}-{max_digits} digits only)."
            ),
            Self::SameRoutePoints => write!(
                f,
                "Start point and Destination point cannot be the same. Please select a valid route."
            ),
        }
    }
}

/// Compiled registration checks.
#[derive(Debug, Clone)]
pub struct RegistrationPolicy {
    min_password_len: usize,
    min_phone_digits: usize,
    max_phone_digits: usize,
    phone_pattern: Regex,
}

impl RegistrationPolicy {
    pub fn new(rules: &RegistrationRules) -> Result<Self> {
        let min_phone_digits = *rules.phone_digits.start();
        let max_phone_digits = *rules.phone_digits.end();
        let phone_pattern = Regex::new(&bounded_digits_pattern(min_phone_digits, max_phone_digits))?;
        Ok(Self {
            min_password_len: rules.min_password_len,
            min_phone_digits,
            max_phone_digits,
            phone_pattern,
        })
    }

    /// Password length as a browser counts it (UTF-16 code units).
    pub fn password_len(password: &str) -> usize {
        password.encode_utf16().count()
    }

    pub fn phone_pattern(&self) -> &str {
        self.phone_pattern.as_str()
    }

    /// Password first, then phone. Only the first failure is reported.
    pub fn check(&self, password: &str, phone: &str) -> Result<Option<Rejection>> {
        self.check_fields(password, Some(phone))
    }

    /// Like [`RegistrationPolicy::check`], for a phone element that may
    /// carry no value at all. A missing value never matches the pattern.
    pub(crate) fn check_fields(
        &self,
        password: &str,
        phone: Option<&str>,
    ) -> Result<Option<Rejection>> {
        if Self::password_len(password) < self.min_password_len {
            return Ok(Some(Rejection::PasswordTooShort {
                min_len: self.min_password_len,
            }));
        }
        let phone_matches = match phone {
            Some(phone) => self.phone_pattern.is_match(phone)?,
            None => false,
        };
        if !phone_matches {
            return Ok(Some(Rejection::InvalidPhoneNumber {
                min_digits: self.min_phone_digits,
                max_digits: self.max_phone_digits,
            }));
        }
        Ok(None)
    }
}

/// Start and destination must differ. Two empty selections count as equal.
pub fn check_route(start_point: &str, end_point: &str) -> Option<Rejection> {
    (start_point == end_point).then_some(Rejection::SameRoutePoints)
}

fn block(page: &mut Page, event: &mut SubmitEvent, rejection: &Rejection) {
    page.alert(&rejection.to_string());
    event.prevent_default();
}

fn skip(page: &mut Page, guard: &str, missing: &str) {
    tracing::warn!(guard, missing, "guard skipped: field not found");
    page.trace(format!("[guard] skip {guard}: missing {missing}"));
}

#[derive(Debug, Clone)]
pub struct RegistrationGuard {
    rules: RegistrationRules,
    policy: RegistrationPolicy,
}

impl RegistrationGuard {
    pub fn new(rules: RegistrationRules) -> Result<Self> {
        let policy = RegistrationPolicy::new(&rules)?;
        Ok(Self { rules, policy })
    }

    pub(crate) fn with_policy(rules: RegistrationRules, policy: RegistrationPolicy) -> Self {
        Self { rules, policy }
    }
}

impl SubmitGuard for RegistrationGuard {
    fn name(&self) -> &'static str {
        "registration"
    }

    fn on_submit(&self, page: &mut Page, event: &mut SubmitEvent) -> Result<()> {
        // Both elements are resolved before either value is checked. An
        // absent element, or a password element without a value, skips the
        // guard; a phone element without a value fails the phone check.
        let password_field = &self.rules.password_field;
        let phone_field = &self.rules.phone_field;
        let Some(password_node) = page.element_by_id(password_field) else {
            skip(page, self.name(), &format!("#{password_field}"));
            return Ok(());
        };
        let Some(phone_node) = page.element_by_id(phone_field) else {
            skip(page, self.name(), &format!("#{phone_field}"));
            return Ok(());
        };
        let Some(password) = page.node_value(password_node) else {
            skip(page, self.name(), &format!("value of #{password_field}"));
            return Ok(());
        };
        let phone = page.node_value(phone_node);

        match self.policy.check_fields(&password, phone.as_deref())? {
            Some(rejection) => block(page, event, &rejection),
            None => page.console_log(REGISTRATION_OK_MESSAGE),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaymentGuard {
    rules: PaymentRules,
}

impl PaymentGuard {
    pub fn new(rules: PaymentRules) -> Self {
        Self { rules }
    }
}

impl SubmitGuard for PaymentGuard {
    fn name(&self) -> &'static str {
        "payment"
    }

    fn on_submit(&self, page: &mut Page, event: &mut SubmitEvent) -> Result<()> {
        let Some(button) = page.query_selector_within(event.form(), &self.rules.button_selector)?
        else {
            return Ok(());
        };
        page.set_node_text(button, &self.rules.processing_label)?;
        page.set_node_disabled(button, true)?;
        page.trace(format!(
            "[guard] payment button set to {:?}",
            self.rules.processing_label
        ));
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteSelectionGuard {
    rules: RouteRules,
}

impl RouteSelectionGuard {
    pub fn new(rules: RouteRules) -> Self {
        Self { rules }
    }
}

impl SubmitGuard for RouteSelectionGuard {
    fn name(&self) -> &'static str {
        "route_selection"
    }

    fn on_submit(&self, page: &mut Page, event: &mut SubmitEvent) -> Result<()> {
        let Some(start_point) = page.select_value_by_name(&self.rules.start_select)? else {
            skip(page, self.name(), &format!("select[name={}]", self.rules.start_select));
            return Ok(());
        };
        let Some(end_point) = page.select_value_by_name(&self.rules.end_select)? else {
            skip(page, self.name(), &format!("select[name={}]", self.rules.end_select));
            return Ok(());
        };

        if let Some(rejection) = check_route(&start_point, &end_point) {
            block(page, event, &rejection);
        }
        Ok(())
    }
}
