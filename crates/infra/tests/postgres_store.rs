//! Postgres adapter tests.
//!
//! These need a disposable database: run with
//! `DATABASE_URL=postgres://localhost/trivia_test cargo test -p trivia-infra -- --ignored`.

use trivia_core::{CategoryId, NewQuestion, PageRequest, QuestionFilter, QuestionId, QuizRequest};
use trivia_infra::{demo_dataset, PostgresQuestionBank, QuestionBank, StoreError};

async fn connect() -> PostgresQuestionBank {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    let bank = PostgresQuestionBank::connect(&url, 2).await.unwrap();
    bank.migrate().await.unwrap();
    bank.seed(&demo_dataset()).await.unwrap();
    bank
}

fn new_question(text: &str, category: i32) -> NewQuestion {
    NewQuestion {
        question: text.to_string(),
        answer: "42".to_string(),
        category_id: CategoryId::new(category),
        difficulty: 1,
    }
}

#[tokio::test]
#[ignore]
async fn insert_search_and_delete_round_trip() {
    let bank = connect().await;

    let marker = format!("Postgres marker {}?", std::process::id());
    let created = bank.insert_question(new_question(&marker, 5)).await.unwrap();

    let found = bank
        .list_questions(&QuestionFilter::search(marker.to_uppercase()), PageRequest::first())
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].id, created.id);

    let removed = bank.delete_question(created.id).await.unwrap();
    assert_eq!(removed, Some(created.clone()));
    assert_eq!(bank.get_question(created.id).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn unknown_category_is_a_foreign_key_violation() {
    let bank = connect().await;
    let err = bank
        .insert_question(new_question("Orphan?", 9_999))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey(_)));
}

#[tokio::test]
#[ignore]
async fn quiz_candidates_honor_category_and_exclusions() {
    let bank = connect().await;
    let candidates = bank
        .quiz_candidates(&QuizRequest::new(vec![QuestionId::new(11)], Some(CategoryId::new(6))))
        .await
        .unwrap();
    assert!(!candidates.contains(&QuestionId::new(11)));
    assert!(candidates.contains(&QuestionId::new(10)));
}

#[tokio::test]
#[ignore]
async fn percent_in_search_term_matches_literally() {
    let bank = connect().await;
    let found = bank
        .list_questions(&QuestionFilter::search("%"), PageRequest::first())
        .await
        .unwrap();
    assert!(found.items.iter().all(|q| q.question.contains('%')));
}
