use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use trivia_core::{
    Category, CategoryId, NewQuestion, Page, PageRequest, Question, QuestionFilter, QuestionId,
    QuizRequest,
};

use super::{QuestionBank, StoreError, StoreResult};
use crate::seed::SeedData;

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Category>,
    questions: BTreeMap<QuestionId, Question>,
    // Like a SERIAL sequence: ids are never handed out twice, even after deletes.
    last_category_id: i32,
    last_question_id: i32,
}

impl Tables {
    fn check_category(&self, category_id: CategoryId) -> StoreResult<()> {
        if self.categories.contains_key(&category_id) {
            Ok(())
        } else {
            Err(StoreError::ForeignKey(format!(
                "category {category_id} does not exist"
            )))
        }
    }
}

fn next_id(last: &mut i32, table: &str) -> StoreResult<i32> {
    *last = last
        .checked_add(1)
        .ok_or_else(|| StoreError::Constraint(format!("{table} id sequence exhausted")))?;
    Ok(*last)
}

/// In-memory question bank for tests/dev.
///
/// Enforces the same referential integrity as the Postgres schema.
#[derive(Debug, Default)]
pub struct InMemoryQuestionBank {
    inner: RwLock<Tables>,
}

impl InMemoryQuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl QuestionBank for InMemoryQuestionBank {
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    async fn insert_category(&self, kind: &str) -> StoreResult<Category> {
        let mut tables = self.write()?;
        let id = CategoryId::new(next_id(&mut tables.last_category_id, "categories")?);
        let category = Category::new(id, kind);
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Question>> {
        let mut matching: Vec<Question> = self
            .read()?
            .questions
            .values()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect();
        matching.sort_by(Question::listing_cmp);
        Ok(Page::slice(matching, page))
    }

    async fn get_question(&self, id: QuestionId) -> StoreResult<Option<Question>> {
        Ok(self.read()?.questions.get(&id).cloned())
    }

    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question> {
        let mut tables = self.write()?;
        tables.check_category(question.category_id)?;
        let id = QuestionId::new(next_id(&mut tables.last_question_id, "questions")?);
        let stored = question.with_id(id);
        tables.questions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_question(&self, question: &Question) -> StoreResult<Option<Question>> {
        let mut tables = self.write()?;
        if !tables.questions.contains_key(&question.id) {
            return Ok(None);
        }
        tables.check_category(question.category_id)?;
        tables.questions.insert(question.id, question.clone());
        Ok(Some(question.clone()))
    }

    async fn delete_question(&self, id: QuestionId) -> StoreResult<Option<Question>> {
        Ok(self.write()?.questions.remove(&id))
    }

    async fn quiz_candidates(&self, request: &QuizRequest) -> StoreResult<Vec<QuestionId>> {
        Ok(self
            .read()?
            .questions
            .values()
            .filter(|q| request.admits(q))
            .map(|q| q.id)
            .collect())
    }

    async fn seed(&self, data: &SeedData) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if !tables.categories.is_empty() {
            return Ok(false);
        }
        for category in &data.categories {
            tables.categories.insert(category.id, category.clone());
            tables.last_category_id = tables.last_category_id.max(category.id.get());
        }
        for question in &data.questions {
            tables.check_category(question.category_id)?;
            tables.questions.insert(question.id, question.clone());
            tables.last_question_id = tables.last_question_id.max(question.id.get());
        }
        Ok(true)
    }
}
