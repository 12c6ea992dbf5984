use bus_pass_guard::{
    BOOT_MESSAGE, FormGuard, REGISTRATION_OK_MESSAGE, Result, SubmitOutcome,
};

const REGISTER_HTML: &str = include_str!("fixtures/register.html");

const PASSWORD_MESSAGE: &str = "Password must be at least 6 characters long.";
const PHONE_MESSAGE: &str = "Please enter a valid phone number (10-15 digits only).";

fn register_page() -> Result<bus_pass_guard::Page> {
    let mut page = FormGuard::with_defaults()?.load_page(REGISTER_HTML)?;
    assert_eq!(page.take_console_messages(), vec![BOOT_MESSAGE.to_string()]);
    Ok(page)
}

#[test]
fn short_password_blocks_with_password_alert() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "abc12")?;
    page.type_text("#phone_number", "9845012345")?;

    assert_eq!(page.click("button[type=submit]")?, Some(SubmitOutcome::Blocked));
    assert_eq!(page.take_alert_messages(), vec![PASSWORD_MESSAGE.to_string()]);
    assert!(page.take_submissions().is_empty());
    assert!(page.take_console_messages().is_empty());
    Ok(())
}

#[test]
fn short_password_is_reported_even_when_phone_is_invalid() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "abc")?;
    page.type_text("#phone_number", "call me")?;

    assert!(page.submit("form")?.is_blocked());
    assert_eq!(page.take_alert_messages(), vec![PASSWORD_MESSAGE.to_string()]);
    Ok(())
}

#[test]
fn bad_phone_blocks_with_phone_alert() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "abcdef")?;
    page.type_text("#phone_number", "12345")?;

    assert!(page.submit("#phone_number")?.is_blocked());
    assert_eq!(page.take_alert_messages(), vec![PHONE_MESSAGE.to_string()]);
    Ok(())
}

#[test]
fn formatted_phone_numbers_are_rejected() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "s3cret!")?;

    for phone in ["+91 98450 12345", "98450-12345", "984501234a", "1234567890123456"] {
        page.type_text("#phone_number", phone)?;
        assert!(page.submit("form")?.is_blocked(), "{phone}");
        assert_eq!(
            page.take_alert_messages(),
            vec![PHONE_MESSAGE.to_string()],
            "{phone}"
        );
    }
    Ok(())
}

#[test]
fn valid_registration_submits_and_logs_to_console() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "abcdef")?;
    page.type_text("#phone_number", "1234567890")?;

    let outcome = page.click("button.button.primary")?;
    let submission = match outcome {
        Some(SubmitOutcome::Submitted(submission)) => submission,
        other => panic!("expected submission, got: {other:?}"),
    };
    assert_eq!(submission.action, "/register");
    assert_eq!(submission.method, "post");
    assert_eq!(submission.entry("name"), Some("Asha Rao"));
    assert_eq!(submission.entry("email"), Some("asha@example.com"));
    assert_eq!(submission.entry("password"), Some("abcdef"));
    assert_eq!(submission.entry("address"), Some("12 MG Road, Bengaluru"));
    assert_eq!(submission.entry("phone_number"), Some("1234567890"));
    assert_eq!(submission.entry("photo"), None);

    assert!(page.take_alert_messages().is_empty());
    assert_eq!(
        page.take_console_messages(),
        vec![REGISTRATION_OK_MESSAGE.to_string()]
    );
    assert_eq!(page.take_submissions(), vec![submission]);
    Ok(())
}

#[test]
fn fifteen_digit_phone_is_accepted() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "abcdef")?;
    page.type_text("#phone_number", "919845012345678")?;
    assert!(page.submit("form")?.is_submitted());
    Ok(())
}

#[test]
fn pasted_newline_in_phone_is_stripped_before_validation() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "abcdef")?;
    page.type_text("#phone_number", "98450\n12345")?;
    page.assert_value("#phone_number", "9845012345")?;
    assert!(page.submit("form")?.is_submitted());
    Ok(())
}

#[test]
fn resubmitting_after_a_fix_succeeds() -> Result<()> {
    let mut page = register_page()?;
    page.type_text("#password", "abc")?;
    page.type_text("#phone_number", "9845012345")?;
    assert!(page.submit("form")?.is_blocked());

    page.type_text("#password", "abcdefg")?;
    assert!(page.submit("form")?.is_submitted());
    assert_eq!(page.take_alert_messages(), vec![PASSWORD_MESSAGE.to_string()]);
    assert_eq!(page.take_submissions().len(), 1);
    Ok(())
}

#[test]
fn missing_phone_field_skips_the_guard() -> Result<()> {
    let html = r#"
        <form action="/register" method="post">
          <input id="password" name="password" type="password">
          <button type="submit">Register</button>
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    page.enable_trace(true);
    page.type_text("#password", "abc")?;

    assert!(page.submit("form")?.is_submitted());
    assert!(page.take_alert_messages().is_empty());
    let logs = page.take_trace_logs();
    assert!(
        logs.iter()
            .any(|line| line == "[guard] skip registration: missing #phone_number"),
        "unexpected trace: {logs:?}"
    );
    Ok(())
}

#[test]
fn non_input_element_with_field_id_skips_the_guard() -> Result<()> {
    let html = r#"
        <form action="/register">
          <div id="password">hunter</div>
          <input id="phone_number" name="phone_number">
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    assert!(page.submit("form")?.is_submitted());
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn non_input_phone_element_fails_the_phone_check() -> Result<()> {
    let html = r#"
        <form action="/register">
          <input id="password" name="password" type="password">
          <span id="phone_number">98450 12345</span>
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;

    page.type_text("#password", "abcdef")?;
    assert!(page.submit("form")?.is_blocked());
    assert_eq!(page.take_alert_messages(), vec![PHONE_MESSAGE.to_string()]);

    page.type_text("#password", "abc")?;
    assert!(page.submit("form")?.is_blocked());
    assert_eq!(page.take_alert_messages(), vec![PASSWORD_MESSAGE.to_string()]);
    assert!(page.take_submissions().is_empty());
    Ok(())
}

#[test]
fn required_fields_stop_submission_before_the_guard_runs() -> Result<()> {
    let html = r#"
        <form action="/register">
          <input id="password" name="password" type="password" required>
          <input id="phone_number" name="phone_number" type="tel">
          <button id="save" type="submit">Register</button>
          <button id="draft" type="submit" formnovalidate>Save draft</button>
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    let password = page.element_by_id("password");

    match page.click("#save")? {
        Some(SubmitOutcome::Invalid { control }) => assert_eq!(Some(control), password),
        other => panic!("expected invalid outcome, got: {other:?}"),
    }
    assert!(page.take_alert_messages().is_empty());

    // Skipping constraint validation still dispatches `submit`.
    assert_eq!(page.click("#draft")?, Some(SubmitOutcome::Blocked));
    assert_eq!(page.take_alert_messages(), vec![PASSWORD_MESSAGE.to_string()]);
    Ok(())
}

#[test]
fn guard_only_attaches_to_the_registration_form() -> Result<()> {
    let html = r#"
        <form id="login" action="/login">
          <input id="password" type="password">
          <input id="phone_number">
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    assert_eq!(page.submit_listener_count(), 0);
    assert!(page.submit("#login")?.is_submitted());
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}
