//! Demo dataset: the canonical trivia categories and questions.
//!
//! Ids are fixed so that fixtures, front-end demos and tests can refer to
//! specific records.

use trivia_core::{Category, CategoryId, Question, QuestionId};

/// Records to load into an empty store, ids included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
}

const CATEGORIES: &[(i32, &str)] = &[
    (1, "Science"),
    (2, "Art"),
    (3, "Geography"),
    (4, "History"),
    (5, "Entertainment"),
    (6, "Sports"),
];

// (id, question, answer, category, difficulty)
const QUESTIONS: &[(i32, &str, &str, i32, i32)] = &[
    (2, "What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
    (4, "What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", 5, 4),
    (5, "Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
    (6, "What was the title of the 1990 fantasy directed by Tim Burton about a young man with multi-bladed appendages?", "Edward Scissorhands", 5, 3),
    (9, "What boxer's original name is Cassius Clay?", "Muhammad Ali", 4, 1),
    (10, "Which is the only team to play in every soccer World Cup tournament?", "Brazil", 6, 3),
    (11, "Which country won the first ever soccer World Cup in 1930?", "Uruguay", 6, 4),
    (12, "Who invented Peanut Butter?", "George Washington Carver", 4, 2),
    (13, "What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    (14, "In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
    (15, "The Taj Mahal is located in which Indian city?", "Agra", 3, 2),
    (16, "Which Dutch graphic artist-initials M C was a creator of optical illusions?", "Escher", 2, 1),
    (17, "La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    (18, "How many paintings did Van Gogh sell in his lifetime?", "One", 2, 4),
    (19, "Which American artist was a pioneer of Abstract Expressionism, and a leading exponent of action painting?", "Jackson Pollock", 2, 2),
    (20, "What is the heaviest organ in the human body?", "The Liver", 1, 4),
    (21, "Who discovered penicillin?", "Alexander Fleming", 1, 3),
    (22, "Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
    (23, "Which is the only country to have a non-rectangular national flag?", "Nepal", 3, 3),
];

/// The 6 categories and 19 questions served by a fresh development instance.
pub fn demo_dataset() -> SeedData {
    SeedData {
        categories: CATEGORIES
            .iter()
            .map(|&(id, kind)| Category::new(CategoryId::new(id), kind))
            .collect(),
        questions: QUESTIONS
            .iter()
            .map(|&(id, question, answer, category, difficulty)| Question {
                id: QuestionId::new(id),
                question: question.to_string(),
                answer: answer.to_string(),
                category_id: CategoryId::new(category),
                difficulty,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_dataset_is_referentially_sound() {
        let data = demo_dataset();
        let categories: HashSet<CategoryId> = data.categories.iter().map(|c| c.id).collect();
        let ids: HashSet<QuestionId> = data.questions.iter().map(|q| q.id).collect();

        assert_eq!(categories.len(), 6);
        assert_eq!(ids.len(), 19);
        assert!(data.questions.iter().all(|q| categories.contains(&q.category_id)));
    }
}
