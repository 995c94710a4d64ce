use std::sync::Arc;

use adminform::form::FocusPoll;
use adminform::prelude::*;
use adminform::remote::{Translator, translate_all};
use async_trait::async_trait;
use serde_json::json;

struct Dictionary;

#[async_trait]
impl Translator for Dictionary {
    async fn translate(&self, text: &str, target_locale: &str) -> anyhow::Result<String> {
        match (text, target_locale) {
            ("Hello", "ar") => Ok("مرحبا".to_string()),
            ("Hello", "fr") => Ok("Bonjour".to_string()),
            _ => anyhow::bail!("no translation for {text} -> {target_locale}"),
        }
    }
}

fn title_form(locales: &[&str], sub_kind: FieldKind) -> FormOrchestrator {
    let form = FormDescriptor::new(vec![
        FieldDescriptor::new(FieldKind::MultiLanguage, "title").with_options(
            WidgetOptions::MultiLanguage {
                locales: locales.iter().map(|locale| locale.to_string()).collect(),
                sub_kind,
                auto_translate: true,
            },
        ),
        FieldDescriptor::new(FieldKind::Text, "slug"),
    ]);
    let schema = ValidationSchema::from_descriptor(&form, Messages::english()).unwrap();
    FormOrchestrator::new(form, schema, &json!({}), FormOptions::default()).unwrap()
}

#[tokio::test]
async fn blur_translates_into_the_empty_locale() {
    let mut form = title_form(&["en", "ar"], FieldKind::Text);
    form.set_value("title_en", json!("Hello")).unwrap();
    let jobs = form.blur();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].target, "title_ar");

    let outcomes = translate_all(Arc::new(Dictionary), jobs).await;
    assert!(form.apply_translation(&outcomes[0]));
    assert_eq!(form.value("title_ar"), Some(&json!("مرحبا")));
}

#[test]
fn focusing_a_sibling_locale_leaves_the_typed_one() {
    let mut form = title_form(&["en", "ar"], FieldKind::Text);
    form.set_value("title_en", json!("Hello")).unwrap();
    let jobs = form.focus("title_ar");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].target_locale, "ar");
    assert_eq!(jobs[0].text, "Hello");
    assert!(form.focus("title_ar").is_empty());
}

#[tokio::test]
async fn late_translation_does_not_clobber_typed_text() {
    let mut form = title_form(&["en", "ar"], FieldKind::Text);
    form.set_value("title_en", json!("Hello")).unwrap();
    let jobs = form.blur();

    form.focus("title_ar");
    form.set_value("title_ar", json!("أهلا")).unwrap();

    let outcomes = translate_all(Arc::new(Dictionary), jobs).await;
    assert!(!form.apply_translation(&outcomes[0]));
    assert_eq!(form.value("title_ar"), Some(&json!("أهلا")));
}

#[tokio::test]
async fn failed_translations_are_ignored() {
    let mut form = title_form(&["en", "ar", "de"], FieldKind::Text);
    form.set_value("title_en", json!("Hello")).unwrap();
    let jobs = form.blur();
    assert_eq!(jobs.len(), 2);

    let outcomes = translate_all(Arc::new(Dictionary), jobs).await;
    let applied: Vec<bool> = outcomes
        .iter()
        .map(|outcome| form.apply_translation(outcome))
        .collect();
    assert_eq!(applied.iter().filter(|applied| **applied).count(), 1);
    assert_eq!(form.value("title_de"), Some(&json!("")));
}

#[test]
fn every_locale_keeps_its_sub_entry() {
    let locales = ["en", "ar", "fr", "de"];
    let mut form = title_form(&locales, FieldKind::Text);
    for index in 0..locales.len() {
        form.select_locale_tab("title", index);
        let object = form.values().as_object().unwrap();
        let subs = object.keys().filter(|key| key.starts_with("title_")).count();
        assert_eq!(subs, locales.len());
    }
}

#[test]
fn completion_ignores_blank_rich_text() {
    let mut form = title_form(&["en", "ar"], FieldKind::RichText);
    form.set_value("title_en", json!("<p></p>")).unwrap();
    form.set_value("title_ar", json!("<p>نص</p>")).unwrap();
    assert_eq!(form.completion("title"), vec![false, true]);

    form.focus("title_en");
    assert!(form.blur().is_empty());
}

#[test]
fn invalid_submit_opens_the_first_invalid_tab() {
    let form = FormDescriptor::new(vec![
        FieldDescriptor::new(FieldKind::MultiLanguage, "title")
            .with_options(WidgetOptions::MultiLanguage {
                locales: vec!["en".into(), "ar".into()],
                sub_kind: FieldKind::Text,
                auto_translate: false,
            })
            .required(),
    ]);
    let schema = ValidationSchema::from_descriptor(&form, Messages::english()).unwrap();
    let mut form =
        FormOrchestrator::new(form, schema, &json!({ "title_en": "Hello" }), FormOptions::default())
            .unwrap();

    let _ = form.begin_submit();
    assert_eq!(form.tabs("title").map(|tabs| tabs.active()), Some(1));
    assert_eq!(form.pending_focus(), Some("title_ar"));
    assert_eq!(form.tick(|_| false), Some(FocusPoll::Pending));
    assert_eq!(form.tick(|name| name == "title_ar"), Some(FocusPoll::Focused));
    assert_eq!(form.pending_focus(), None);
}

#[test]
fn focus_request_gives_up_after_its_budget() {
    let mut form = title_form(&["en", "ar"], FieldKind::RichText);
    form.select_locale_tab("title", 1);
    let budget = form.options().focus_retry_budget;
    let mut polls = Vec::new();
    while let Some(poll) = form.tick(|_| false) {
        polls.push(poll);
        assert!(polls.len() <= budget as usize + 1, "focus retry never stopped");
    }
    assert_eq!(polls.last(), Some(&FocusPoll::GaveUp));
}
