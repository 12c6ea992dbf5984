use bus_pass_guard::{FormGuard, GuardConfig, PaymentRules, Result, SubmitOutcome};

const PAYMENT_HTML: &str = include_str!("fixtures/payment.html");

#[test]
fn pay_button_shows_processing_and_disables() -> Result<()> {
    let mut page = FormGuard::with_defaults()?.load_page(PAYMENT_HTML)?;
    page.assert_text("#pay", "Pay ₹500.00")?;
    page.assert_disabled("#pay", false)?;

    let outcome = page.click("#pay")?;
    let submission = match outcome {
        Some(SubmitOutcome::Submitted(submission)) => submission,
        other => panic!("expected submission, got: {other:?}"),
    };
    assert_eq!(submission.action, "/payment/42");
    assert_eq!(submission.method, "post");
    assert_eq!(submission.entry("card_number"), Some("4111111111111111"));

    page.assert_text("#pay", "Processing Payment...")?;
    page.assert_disabled("#pay", true)?;
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn secondary_button_is_untouched() -> Result<()> {
    let mut page = FormGuard::with_defaults()?.load_page(PAYMENT_HTML)?;
    assert_eq!(page.click("#back")?, None);
    page.assert_text("#pay", "Pay ₹500.00")?;

    page.submit("form")?;
    page.assert_text("#back", "Back")?;
    page.assert_disabled("#back", false)?;
    Ok(())
}

#[test]
fn payment_without_primary_button_still_submits() -> Result<()> {
    let html = r#"
        <form action="/payment/7" method="post">
          <input name="upi_id" value="asha@okbank">
          <input type="submit" value="Pay">
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    let outcome = page.click("input[type=submit]")?;
    assert!(outcome.is_some_and(|outcome| outcome.is_submitted()));
    assert_eq!(page.take_submissions().len(), 1);
    Ok(())
}

#[test]
fn primary_button_outside_the_form_is_ignored() -> Result<()> {
    let html = r#"
        <button class="button primary" id="outside">Help</button>
        <form action="/payment/9">
          <button id="pay" type="submit">Pay</button>
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    assert!(page.submit("form")?.is_submitted());
    page.assert_text("#outside", "Help")?;
    page.assert_disabled("#outside", false)?;
    Ok(())
}

#[test]
fn disabled_pay_button_ignores_further_clicks() -> Result<()> {
    let mut page = FormGuard::with_defaults()?.load_page(PAYMENT_HTML)?;
    page.click("#pay")?;
    assert_eq!(page.click("#pay")?, None);
    assert_eq!(page.take_submissions().len(), 1);
    Ok(())
}

#[test]
fn configured_label_and_selector_are_used() -> Result<()> {
    let config = GuardConfig::new().with_payment(PaymentRules {
        button_selector: "#pay".into(),
        processing_label: "Please wait...".into(),
        ..PaymentRules::default()
    });
    let mut page = FormGuard::new(config)?.load_page(PAYMENT_HTML)?;
    page.submit("#card_number")?;
    page.assert_text("#pay", "Please wait...")?;
    page.assert_disabled("#pay", true)?;
    Ok(())
}
