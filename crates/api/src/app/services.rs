use std::sync::Arc;

use anyhow::Context;
use rand::Rng;

use trivia_core::{pick_question, Question, QuizRequest};
use trivia_infra::{
    demo_dataset, InMemoryQuestionBank, PostgresQuestionBank, QuestionBank, StoreResult,
};

use crate::config::{AppConfig, StoreConfig};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    bank: Arc<dyn QuestionBank>,
}

impl AppServices {
    pub fn new(bank: Arc<dyn QuestionBank>) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &dyn QuestionBank {
        self.bank.as_ref()
    }

    /// One quiz round: materialize the candidates, draw one, fetch it.
    ///
    /// The two reads are not isolated; a question deleted in between counts
    /// as "no question".
    pub async fn next_quiz_question<R>(
        &self,
        request: &QuizRequest,
        rng: &mut R,
    ) -> StoreResult<Option<Question>>
    where
        R: Rng + Send + ?Sized,
    {
        let candidates = self.bank.quiz_candidates(request).await?;
        let Some(id) = pick_question(&candidates, rng) else {
            tracing::debug!(excluded = request.previous_questions.len(), "no quiz candidates left");
            return Ok(None);
        };
        self.bank.get_question(id).await
    }
}

/// Pick and prepare the store selected by `config`.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let bank: Arc<dyn QuestionBank> = match &config.store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory question bank");
            Arc::new(InMemoryQuestionBank::new())
        }
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            tracing::info!(max_connections, "connecting to postgres question bank");
            let bank = PostgresQuestionBank::connect(database_url, *max_connections)
                .await
                .context("failed to connect to DATABASE_URL")?;
            bank.migrate()
                .await
                .context("failed to bootstrap the question bank schema")?;
            Arc::new(bank)
        }
    };

    if config.seed_demo_data {
        let loaded = bank
            .seed(&demo_dataset())
            .await
            .context("failed to load the demo dataset")?;
        if loaded {
            tracing::info!("demo dataset loaded");
        }
    }

    Ok(AppServices::new(bank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use trivia_core::{CategoryId, QuestionId};

    async fn seeded() -> AppServices {
        let config = AppConfig::default();
        build_services(&config).await.unwrap()
    }

    #[tokio::test]
    async fn default_config_serves_the_demo_dataset() {
        let services = seeded().await;
        assert_eq!(services.bank().categories().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn quiz_round_draws_from_the_remaining_candidates() {
        let services = seeded().await;
        let mut rng = StdRng::seed_from_u64(3);
        let request = QuizRequest::new(vec![QuestionId::new(11)], Some(CategoryId::new(6)));

        for _ in 0..10 {
            let q = services
                .next_quiz_question(&request, &mut rng)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(q.id, QuestionId::new(10));
        }
    }

    #[tokio::test]
    async fn quiz_round_never_repeats_previous_questions() {
        let services = seeded().await;
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = Vec::new();

        while let Some(q) = services
            .next_quiz_question(&QuizRequest::new(seen.clone(), None), &mut rng)
            .await
            .unwrap()
        {
            assert!(!seen.contains(&q.id));
            seen.push(q.id);
        }
        assert_eq!(seen.len(), 19);
    }

    #[tokio::test]
    async fn unseeded_store_has_no_quiz_question() {
        let config = AppConfig {
            seed_demo_data: false,
            ..AppConfig::default()
        };
        let services = build_services(&config).await.unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let picked = services
            .next_quiz_question(&QuizRequest::default(), &mut rng)
            .await
            .unwrap();
        assert!(picked.is_none());
    }
}
