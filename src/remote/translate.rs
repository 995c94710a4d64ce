use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinSet};
use tracing::warn;

use crate::form::{TranslationJob, TranslationOutcome};

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_locale: &str) -> Result<String>;
}

async fn run_job(translator: Arc<dyn Translator>, job: TranslationJob) -> TranslationOutcome {
    let result = match translator.translate(&job.text, &job.target_locale).await {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(field = %job.field, locale = %job.target_locale, error = %err, "translation failed");
            Err(err.to_string())
        }
    };
    TranslationOutcome { job, result }
}

/// Run every job concurrently and collect outcomes in completion order.
pub async fn translate_all(
    translator: Arc<dyn Translator>,
    jobs: Vec<TranslationJob>,
) -> Vec<TranslationOutcome> {
    let mut set = JoinSet::new();
    for job in jobs {
        set.spawn(run_job(Arc::clone(&translator), job));
    }
    let mut outcomes = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => warn!(error = %err, "translation task aborted"),
        }
    }
    outcomes
}

/// Spawn one task per job, each sending its outcome as soon as it finishes.
pub fn spawn_translations(
    translator: Arc<dyn Translator>,
    jobs: Vec<TranslationJob>,
    outcomes: mpsc::UnboundedSender<TranslationOutcome>,
) {
    for job in jobs {
        let translator = Arc::clone(&translator);
        let outcomes = outcomes.clone();
        tokio::spawn(async move {
            let _ = outcomes.send(run_job(translator, job).await);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    #[async_trait]
    impl Translator for Upper {
        async fn translate(&self, text: &str, target_locale: &str) -> Result<String> {
            if target_locale == "xx" {
                anyhow::bail!("unsupported locale");
            }
            Ok(format!("{}:{}", target_locale, text.to_uppercase()))
        }
    }

    fn job(target: &str) -> TranslationJob {
        TranslationJob {
            field: "title".into(),
            source_locale: "en".into(),
            target_locale: target.into(),
            target: format!("title_{target}"),
            text: "hi".into(),
        }
    }

    #[tokio::test]
    async fn failures_become_err_outcomes() {
        let mut outcomes = translate_all(Arc::new(Upper), vec![job("ar"), job("xx")]).await;
        outcomes.sort_by(|a, b| a.job.target_locale.cmp(&b.job.target_locale));
        assert_eq!(outcomes[0].result, Ok("ar:HI".to_string()));
        assert!(outcomes[1].result.is_err());
    }
}
