//! Submit-time guards for the bus pass registration pages.
//!
//! [`FormGuard`] attaches three independent listeners once the page has
//! loaded: a registration guard (password length and phone format), a
//! payment guard (disables the pay button while the page navigates) and a
//! route selection guard (start and destination must differ). Guards run
//! against a deterministic in-memory [`Page`], so the same code drives
//! production markup and tests.
//!
//! ```
//! use bus_pass_guard::{FormGuard, Result};
//!
//! fn main() -> Result<()> {
//!     let html = r#"
//!       <form action="/register" method="post">
//!         <input id="password" name="password" type="password">
//!         <input id="phone_number" name="phone_number" type="tel">
//!         <button type="submit">Register</button>
//!       </form>
//!     "#;
//!
//!     let mut page = FormGuard::with_defaults()?.load_page(html)?;
//!     page.type_text("#password", "abc12")?;
//!     assert!(page.submit("form")?.is_blocked());
//!     assert_eq!(
//!         page.take_alert_messages(),
//!         vec!["Password must be at least 6 characters long.".to_string()]
//!     );
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;

mod config;
mod dom;
mod form_guard;
mod guards;
mod html;
mod js_regex;
mod page;
mod runtime_state;
mod selector;

use dom::{Dom, Element, input_type, is_form_control, is_submit_control, truncate_chars};
use html::{is_void_tag, parse_html};
use js_regex::{Regex, bounded_digits_pattern};
use runtime_state::{LoadListener, PlatformMockState, SubmitListener, TraceState};
use selector::{
    SelectorCombinator, SelectorPart, SelectorStep, css_string_literal, parse_selector_groups,
};

pub use config::{GuardConfig, PaymentRules, RegistrationRules, RouteRules};
pub use dom::NodeId;
pub use form_guard::{BOOT_MESSAGE, FormGuard, InstalledGuards};
pub use guards::{
    PaymentGuard, REGISTRATION_OK_MESSAGE, RegistrationGuard, RegistrationPolicy, Rejection,
    RouteSelectionGuard, SubmitGuard, check_route,
};
pub use page::Page;
pub use runtime_state::{FormSubmission, ReadyState, SubmitEvent, SubmitOutcome};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    DomRuntime(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    Pattern(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::DomRuntime(msg) => write!(f, "dom runtime error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
            Self::Pattern(msg) => write!(f, "pattern error: {msg}"),
            Self::Config(msg) => write!(f, "invalid guard config: {msg}"),
        }
    }
}

impl StdError for Error {}
