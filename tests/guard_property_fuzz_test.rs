use bus_pass_guard::{FormGuard, Page, RegistrationPolicy, RegistrationRules, Rejection, check_route};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};

const GUARD_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/guard_property_fuzz_test.txt";
const DEFAULT_GUARD_PROPTEST_CASES: u32 = 128;

const REGISTER_HTML: &str = r#"
<form action="/register" method="post">
  <input id="password" name="password" type="password">
  <input id="phone_number" name="phone_number" type="tel">
  <button type="submit">Register</button>
</form>
"#;

const ROUTE_POINTS: [&str; 9] = [
    "",
    "Majestic",
    "Jayanagar",
    "Whitefield",
    "Koramangala",
    "Electronic City",
    "Indiranagar",
    "Marathahalli",
    "Yeshwanthpur",
];

fn guard_proptest_cases() -> u32 {
    std::env::var("BUS_PASS_GUARD_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_GUARD_PROPTEST_CASES)
}

fn route_page_html() -> String {
    let options = ROUTE_POINTS
        .iter()
        .map(|point| format!("<option value=\"{point}\">{point}</option>"))
        .collect::<String>();
    format!(
        r#"<form action="/apply_pass">
             <select id="start_point" name="start_point">{options}</select>
             <select id="end_point" name="end_point">{options}</select>
           </form>"#
    )
}

fn failed(err: bus_pass_guard::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn short_password_strategy() -> BoxedStrategy<String> {
    vec(any::<char>(), 0..=5)
        .prop_map(|chars| chars.into_iter().collect::<String>())
        .prop_filter("fewer than 6 UTF-16 units", |password| {
            RegistrationPolicy::password_len(password) < 6
        })
        .boxed()
}

fn long_password_strategy() -> BoxedStrategy<String> {
    "[a-zA-Z0-9!@#$%^&*]{6,24}".boxed()
}

fn valid_phone_strategy() -> BoxedStrategy<String> {
    "[0-9]{10,15}".boxed()
}

fn invalid_phone_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        "[0-9]{0,9}",
        "[0-9]{16,24}",
        "[0-9]{4,8}[^0-9\r\n][0-9]{4,8}",
        "[+ ()-]{1,2}[0-9]{10,13}",
    ]
    .boxed()
}

fn route_point_strategy() -> BoxedStrategy<&'static str> {
    proptest::sample::select(ROUTE_POINTS.to_vec()).boxed()
}

fn submit_registration(password: &str, phone: &str) -> Result<bool, TestCaseError> {
    let mut page = FormGuard::with_defaults()
        .and_then(|guard| guard.load_page(REGISTER_HTML))
        .map_err(failed)?;
    page.type_text("#password", password).map_err(failed)?;
    page.type_text("#phone_number", phone).map_err(failed)?;
    let outcome = page.submit("form").map_err(failed)?;
    Ok(outcome.is_blocked())
}

fn assert_route_outcome(page: &mut Page, start: &str, end: &str) -> TestCaseResult {
    page.select_option("#start_point", start).map_err(failed)?;
    page.select_option("#end_point", end).map_err(failed)?;
    let blocked = page.submit("form").map_err(failed)?.is_blocked();
    prop_assert_eq!(blocked, start == end, "start={:?} end={:?}", start, end);
    prop_assert_eq!(check_route(start, end).is_some(), start == end);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: guard_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(GUARD_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn short_password_is_blocked_whatever_the_phone(
        password in short_password_strategy(),
        phone in prop_oneof![valid_phone_strategy(), invalid_phone_strategy()],
    ) {
        let policy = RegistrationPolicy::new(&RegistrationRules::default()).map_err(failed)?;
        prop_assert_eq!(
            policy.check(&password, &phone).map_err(failed)?,
            Some(Rejection::PasswordTooShort { min_len: 6 })
        );
        prop_assert!(submit_registration(&password, &phone)?);
    }

    #[test]
    fn long_password_with_valid_phone_is_allowed(
        password in long_password_strategy(),
        phone in valid_phone_strategy(),
    ) {
        prop_assert!(!submit_registration(&password, &phone)?);
    }

    #[test]
    fn invalid_phone_is_blocked_with_valid_password(
        password in long_password_strategy(),
        phone in invalid_phone_strategy(),
    ) {
        let policy = RegistrationPolicy::new(&RegistrationRules::default()).map_err(failed)?;
        prop_assert_eq!(
            policy.check(&password, &phone).map_err(failed)?,
            Some(Rejection::InvalidPhoneNumber { min_digits: 10, max_digits: 15 })
        );
        prop_assert!(submit_registration(&password, &phone)?);
    }

    #[test]
    fn route_is_blocked_exactly_when_points_match(
        pairs in vec((route_point_strategy(), route_point_strategy()), 1..=8),
    ) {
        let mut page = FormGuard::with_defaults()
            .and_then(|guard| guard.load_page(&route_page_html()))
            .map_err(failed)?;
        for (start, end) in pairs {
            assert_route_outcome(&mut page, start, end)?;
        }
    }
}
