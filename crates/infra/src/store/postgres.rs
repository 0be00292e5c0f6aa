//! Postgres-backed question bank.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (foreign key violation) | `23503` | `ForeignKey` |
//! | Database (not-null / unique / check violation) | `23502` / `23505` / `23514` | `Constraint` |
//! | Database (other) | Any other | `Database` |
//! | PoolClosed / PoolTimedOut | N/A | `Unavailable` |
//! | Other | N/A | `Database` |
//!
//! ## Thread Safety
//!
//! `PostgresQuestionBank` is `Send + Sync`; the SQLx pool hands out connections.
//! Every write is a single auto-committed statement, except `seed()` which loads
//! the fixtures in one transaction.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;

use trivia_core::{
    Category, CategoryId, NewQuestion, Page, PageRequest, Question, QuestionFilter, QuestionId,
    QuizRequest,
};

use super::{QuestionBank, StoreError, StoreResult};
use crate::seed::SeedData;

const SCHEMA: &str = include_str!("schema.sql");

const QUESTION_COLUMNS: &str = "id, question, answer, category_id, difficulty";

#[derive(Debug, Clone)]
pub struct PostgresQuestionBank {
    pool: PgPool,
}

impl PostgresQuestionBank {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl QuestionBank for PostgresQuestionBank {
    #[instrument(skip(self), err)]
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, type FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("categories", e))?;

        rows.iter()
            .map(category_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("categories", e))
    }

    #[instrument(skip(self), err)]
    async fn insert_category(&self, kind: &str) -> StoreResult<Category> {
        let row = sqlx::query("INSERT INTO categories (type) VALUES ($1) RETURNING id, type")
            .bind(kind)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_category", e))?;

        category_from_row(&row).map_err(|e| map_sqlx_error("insert_category", e))
    }

    #[instrument(skip(self), err)]
    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Question>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM questions");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build()
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get(0))
            .map_err(|e| map_sqlx_error("count_questions", e))?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {QUESTION_COLUMNS} FROM questions"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY question DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_questions", e))?;
        let items = rows
            .iter()
            .map(question_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("list_questions", e))?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or_default(),
            request: page,
        })
    }

    #[instrument(skip(self), err)]
    async fn get_question(&self, id: QuestionId) -> StoreResult<Option<Question>> {
        let row = sqlx::query(&format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_question", e))?;

        row.as_ref()
            .map(question_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("get_question", e))
    }

    #[instrument(skip(self), err)]
    async fn insert_question(&self, question: NewQuestion) -> StoreResult<Question> {
        let row = sqlx::query(
            r#"
            INSERT INTO questions (question, answer, category_id, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category_id.get())
        .bind(question.difficulty)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_question", e))?;

        let id: i32 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("insert_question", e))?;
        Ok(question.with_id(QuestionId::new(id)))
    }

    #[instrument(skip(self), err)]
    async fn update_question(&self, question: &Question) -> StoreResult<Option<Question>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE questions
            SET question = $2, answer = $3, category_id = $4, difficulty = $5
            WHERE id = $1
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(question.id.get())
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category_id.get())
        .bind(question.difficulty)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_question", e))?;

        row.as_ref()
            .map(question_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("update_question", e))
    }

    #[instrument(skip(self), err)]
    async fn delete_question(&self, id: QuestionId) -> StoreResult<Option<Question>> {
        let row = sqlx::query(&format!(
            "DELETE FROM questions WHERE id = $1 RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_question", e))?;

        row.as_ref()
            .map(question_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("delete_question", e))
    }

    #[instrument(skip(self), err)]
    async fn quiz_candidates(&self, request: &QuizRequest) -> StoreResult<Vec<QuestionId>> {
        let previous: Vec<i32> = request.previous_questions.iter().map(|id| id.get()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id
            FROM questions
            WHERE ($1::INTEGER IS NULL OR category_id = $1)
              AND NOT (id = ANY($2))
            ORDER BY id
            "#,
        )
        .bind(request.category.map(CategoryId::get))
        .bind(previous)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("quiz_candidates", e))?;

        rows.iter()
            .map(|row| row.try_get::<i32, _>("id").map(QuestionId::new))
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("quiz_candidates", e))
    }

    #[instrument(skip(self, data), err)]
    async fn seed(&self, data: &SeedData) -> StoreResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("seed", e))?;

        let existing: i64 = sqlx::query("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await
            .and_then(|row| row.try_get(0))
            .map_err(|e| map_sqlx_error("seed", e))?;
        if existing > 0 {
            return Ok(false);
        }

        for category in &data.categories {
            sqlx::query("INSERT INTO categories (id, type) VALUES ($1, $2)")
                .bind(category.id.get())
                .bind(&category.kind)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("seed", e))?;
        }
        for question in &data.questions {
            sqlx::query(&format!(
                "INSERT INTO questions ({QUESTION_COLUMNS}) VALUES ($1, $2, $3, $4, $5)"
            ))
            .bind(question.id.get())
            .bind(&question.question)
            .bind(&question.answer)
            .bind(question.category_id.get())
            .bind(question.difficulty)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("seed", e))?;
        }

        // Explicit ids bypass the SERIAL sequences; move them past the loaded rows.
        for table in ["categories", "questions"] {
            sqlx::query(&format!(
                "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
            ))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("seed", e))?;
        }

        tx.commit().await.map_err(|e| map_sqlx_error("seed", e))?;
        tracing::info!(
            categories = data.categories.len(),
            questions = data.questions.len(),
            "seeded question bank"
        );
        Ok(true)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &QuestionFilter) {
    let mut separator = " WHERE ";
    if let Some(category) = filter.category {
        builder
            .push(separator)
            .push("category_id = ")
            .push_bind(category.get());
        separator = " AND ";
    }
    if let Some(term) = &filter.search_term {
        builder
            .push(separator)
            .push("question ILIKE ")
            .push_bind(like_pattern(term))
            .push(" ESCAPE '\\'");
    }
}

/// `%term%` with LIKE metacharacters escaped, so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category::new(
        CategoryId::new(row.try_get("id")?),
        row.try_get::<String, _>("type")?,
    ))
}

fn question_from_row(row: &PgRow) -> Result<Question, sqlx::Error> {
    Ok(Question {
        id: QuestionId::new(row.try_get("id")?),
        question: row.try_get("question")?,
        answer: row.try_get("answer")?,
        category_id: CategoryId::new(row.try_get("category_id")?),
        difficulty: row.try_get("difficulty")?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("{} ({})", db_err.message(), operation);
            match db_err.code().as_deref() {
                Some("23503") => StoreError::ForeignKey(msg),
                Some("23502") | Some("23505") | Some("23514") => StoreError::Constraint(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        other => StoreError::Database(format!("sqlx error in {operation}: {other}")),
    }
}
