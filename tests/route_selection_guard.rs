use bus_pass_guard::{FormGuard, Page, Result, SubmitOutcome};

const APPLY_PASS_HTML: &str = include_str!("fixtures/apply_pass.html");

const SAME_ROUTE_MESSAGE: &str =
    "Start point and Destination point cannot be the same. Please select a valid route.";

const ROUTE_POINTS: [&str; 8] = [
    "Majestic",
    "Jayanagar",
    "Whitefield",
    "Koramangala",
    "Electronic City",
    "Indiranagar",
    "Marathahalli",
    "Yeshwanthpur",
];

fn apply_pass_page() -> Result<Page> {
    FormGuard::with_defaults()?.load_page(APPLY_PASS_HTML)
}

#[test]
fn fixture_offers_every_route_point_in_both_selects() -> Result<()> {
    let page = apply_pass_page()?;
    for point in ROUTE_POINTS {
        for select in ["#start_point", "#end_point"] {
            page.assert_exists(&format!("{select} option[value=\"{point}\"]"))?;
        }
    }
    page.assert_value("#start_point", "")?;
    page.assert_value("#end_point", "")?;
    Ok(())
}

#[test]
fn same_start_and_end_is_blocked() -> Result<()> {
    let mut page = apply_pass_page()?;
    page.select_option("#start_point", "Majestic")?;
    page.select_option("#end_point", "Majestic")?;

    assert_eq!(page.click("#apply")?, Some(SubmitOutcome::Blocked));
    assert_eq!(page.take_alert_messages(), vec![SAME_ROUTE_MESSAGE.to_string()]);
    assert!(page.take_submissions().is_empty());
    Ok(())
}

#[test]
fn different_points_submit_the_route() -> Result<()> {
    let mut page = apply_pass_page()?;
    page.select_option("#start_point", "Electronic City")?;
    page.select_option("#end_point", "Whitefield")?;

    let SubmitOutcome::Submitted(submission) = page.submit("form")? else {
        panic!("expected route to be submitted");
    };
    assert_eq!(submission.action, "/apply_pass");
    assert_eq!(submission.entry("start_point"), Some("Electronic City"));
    assert_eq!(submission.entry("end_point"), Some("Whitefield"));
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn untouched_placeholders_count_as_the_same_point() -> Result<()> {
    let mut page = apply_pass_page()?;
    assert!(page.submit("form")?.is_blocked());
    assert_eq!(page.take_alert_messages(), vec![SAME_ROUTE_MESSAGE.to_string()]);
    Ok(())
}

#[test]
fn one_placeholder_and_one_point_is_allowed() -> Result<()> {
    let mut page = apply_pass_page()?;
    page.select_option("#end_point", "Koramangala")?;
    assert!(page.submit("form")?.is_submitted());
    Ok(())
}

#[test]
fn every_identical_pair_is_blocked() -> Result<()> {
    let mut page = apply_pass_page()?;
    for point in ROUTE_POINTS {
        page.select_option("#start_point", point)?;
        page.select_option("#end_point", point)?;
        assert!(page.submit("form")?.is_blocked(), "{point}");
    }
    assert_eq!(page.take_alert_messages().len(), ROUTE_POINTS.len());
    Ok(())
}

#[test]
fn missing_destination_select_skips_the_guard() -> Result<()> {
    let html = r#"
        <form action="/apply_pass" method="post">
          <select name="start_point"><option>Majestic</option></select>
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    page.enable_trace(true);
    assert!(page.submit("form")?.is_submitted());
    assert!(page.take_alert_messages().is_empty());
    assert!(
        page.take_trace_logs()
            .iter()
            .any(|line| line == "[guard] skip route_selection: missing select[name=end_point]")
    );
    Ok(())
}

#[test]
fn selects_are_resolved_by_name() -> Result<()> {
    let html = r#"
        <form action="/apply_pass">
          <select id="from" name="start_point">
            <option value="Jayanagar" selected>Jayanagar</option>
          </select>
          <select id="to" name="end_point">
            <option value="Majestic">Majestic</option>
            <option value="Jayanagar" selected>Jayanagar</option>
          </select>
        </form>
        "#;
    let mut page = FormGuard::with_defaults()?.load_page(html)?;
    assert!(page.submit("form")?.is_blocked());
    page.select_option("#to", "Majestic")?;
    assert!(page.submit("form")?.is_submitted());
    Ok(())
}
