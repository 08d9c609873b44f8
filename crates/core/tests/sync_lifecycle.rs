use chrono::NaiveDate;
use insta::assert_snapshot;
use mhdsync_core::marker::{
    extract_best_before, extract_from_title, update_best_before, update_single_ean, update_title,
};
use mhdsync_core::sync::{FieldSynchronizer, TextVariant};
use mhdsync_core::token::{self, FixedClock};
use mhdsync_core::token::Clock;
use rstest::rstest;

const DATE_KEY: &str = "custom_product_mhd_date";
const DAYS_KEY: &str = "custom_product_mhd_days";

fn today() -> NaiveDate {
    FixedClock(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()).today()
}

fn resync(sync: &FieldSynchronizer, token: Option<&str>, variant: &TextVariant) -> TextVariant {
    sync.synchronize(token, today(), variant).into_variant()
}

#[test]
fn title_lifecycle_set_replace_clear() {
    let sync = FieldSynchronizer::default();
    let milk = TextVariant::new("de", "Milk");

    let set = resync(&sync, Some("311224"), &milk);
    assert_eq!(set.title, "Milk MHD 31.12.24");

    let replaced = resync(&sync, Some("150125"), &set);
    assert_eq!(replaced.title, "Milk MHD 15.01.25");

    let cleared = resync(&sync, None, &replaced);
    assert_eq!(cleared.title, "Milk");
    assert!(!cleared.custom_fields.contains_key(DATE_KEY));
    assert!(!cleared.custom_fields.contains_key(DAYS_KEY));
}

#[test]
fn empty_title_stays_empty() {
    let sync = FieldSynchronizer::default();
    let result = sync.synchronize(Some("311224"), today(), &TextVariant::new("de", ""));
    assert_eq!(result.title, "");
    assert!(result.has_date());
}

#[test]
fn derived_custom_fields() {
    let sync = FieldSynchronizer::default();
    let result = sync.synchronize(Some("311224"), today(), &TextVariant::new("de", "Milk"));

    assert_eq!(result.days_remaining, Some(30));
    assert_eq!(result.custom_fields[DATE_KEY], "2024-12-31 00:00:00.000");
    assert_eq!(result.custom_fields[DAYS_KEY], 30);
    assert_eq!(
        result.structured_date,
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap().and_hms_opt(0, 0, 0)
    );
}

#[test]
fn invalid_token_clears_stale_markers() {
    let sync = FieldSynchronizer::default();
    let stale = resync(&sync, Some("311224"), &TextVariant::new("de", "Milk").with_description("<p>Fresh</p>"));

    let cleared = resync(&sync, Some("300229"), &stale);
    assert_eq!(cleared.title, "Milk");
    assert_eq!(cleared.description, "<p>Fresh</p>");
}

#[test]
fn resync_with_same_token_is_noop() {
    let sync = FieldSynchronizer::default();
    let first = resync(&sync, Some("311224"), &TextVariant::new("de", "Milk").with_description("<p>Fresh</p>"));

    let again = sync.synchronize(Some("311224"), today(), &first);
    assert!(again.is_noop(&first));
    assert!(again.update_for(&first).is_none());
}

#[rstest]
#[case("Milk")]
#[case("Milk MHD 01.01.24")]
#[case("Milk MHD: 01.01.2024")]
#[case("   Milk   ")]
fn title_upsert_is_idempotent(#[case] title: &str) {
    let once = update_title(title, "31.12.24");
    assert_eq!(update_title(&once, "31.12.24"), once);
    assert_eq!(extract_from_title(&once).as_deref(), Some("31.12.24"));
}

#[rstest]
#[case("")]
#[case("<p>Frische Vollmilch</p>")]
#[case("<p>a</p><span class=\"invisible-date\">Mindestens haltbar bis: 01.01.2024</span><p>b</p>")]
#[case("<p>a</p><span class=\"invisible-date\">Notiz: bitte kuehl lagern")]
#[case("<span class='invisible-date'>x <span class='single-ean'>Einzel EAN: 40063813</span><p>b</p>")]
#[case("<span class=\"invisible-date\">Mindestens haltbar bis: <span>01.01.2024</span></span>")]
fn description_upsert_is_idempotent(#[case] description: &str) {
    let once = update_best_before(description, Some("31.12.2024"));
    assert_eq!(update_best_before(&once, Some("31.12.2024")), once);
    assert_eq!(extract_best_before(&once).as_deref(), Some("31.12.2024"));

    let removed = update_best_before(&once, None);
    assert_eq!(update_best_before(&removed, None), removed);
}

#[test]
fn resync_keeps_text_after_unclosed_date_span() {
    let sync = FieldSynchronizer::default();
    let variant = TextVariant::new("de", "Milk")
        .with_description("<p>Intro</p><span class=\"invisible-date\">Notiz: bitte kuehl lagern");

    let first = resync(&sync, Some("311224"), &variant);
    let second = resync(&sync, Some("311224"), &first);
    assert_eq!(second, first);
    assert!(second.description.contains("Notiz: bitte kuehl lagern"));

    let cleared = resync(&sync, None, &second);
    assert_eq!(cleared.description, variant.description);
}

#[test]
fn leap_day_tokens() {
    assert!(token::decode("290224").is_some());
    assert!(token::decode("290225").is_none());
    assert!(token::decode("300229").is_none());
}

#[test]
fn golden_description_appended_span() {
    let sync = FieldSynchronizer::default();
    let variant = TextVariant::new("de", "Milk").with_description("<p>Frische Vollmilch</p>");
    let result = sync.synchronize(Some("311224"), today(), &variant);

    assert_snapshot!(result.description, @r#"
    <p>Frische Vollmilch</p>

    <span class="invisible-date">Mindestens haltbar bis: 31.12.2024</span>
    "#);
}

#[test]
fn golden_description_span_replaced_in_place() {
    let description = concat!(
        "<p>Intro</p>",
        "<span class='invisible-date extra'>Mindestens haltbar bis: 01.01.2024</span>",
        "<p>Outro</p>",
    );
    let result = update_best_before(description, Some("15.01.2025"));

    assert_snapshot!(result, @r#"<p>Intro</p><span class="invisible-date">Mindestens haltbar bis: 15.01.2025</span><p>Outro</p>"#);
}

#[test]
fn golden_both_spans_then_date_removed() {
    let with_ean = update_single_ean("<p>Milk</p>", Some("4006381333931"));
    let with_date = update_best_before(&with_ean, Some("31.12.2024"));
    let without_date = update_best_before(&with_date, None);

    assert_snapshot!(without_date, @r#"
    <p>Milk</p>

    <span class="single-ean">Einzel EAN: 4006381333931</span>
    "#);
}
