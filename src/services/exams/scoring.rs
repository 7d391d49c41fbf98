//! 模拟考试评分

use std::collections::{HashMap, HashSet};

use crate::errors::{Result, StaarError};
use crate::models::exams::{
    entities::PerformanceLevel,
    requests::{ExamAnswer, ExamScore},
    responses::QuestionReview,
};
use crate::models::questions::entities::Question;
use crate::services::questions::generator::normalize_answer_letter;

/// 对照题目给作答评分。
///
/// 未作答的题计为错误；作答了不在本场考试中的题、同一题作答多次、
/// 答案不是 A-D 都视为非法提交。
pub fn score_exam(
    questions: &[Question],
    answers: &[ExamAnswer],
) -> Result<(ExamScore, Vec<QuestionReview>)> {
    let exam_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();
    let mut selected: HashMap<i64, String> = HashMap::with_capacity(answers.len());

    for answer in answers {
        if !exam_ids.contains(&answer.question_id) {
            return Err(StaarError::validation(format!(
                "Question {} is not part of this exam",
                answer.question_id
            )));
        }
        let letter = normalize_answer_letter(&answer.selected_answer).ok_or_else(|| {
            StaarError::validation(format!(
                "Answer for question {} must be one of A, B, C, D",
                answer.question_id
            ))
        })?;
        if selected.insert(answer.question_id, letter).is_some() {
            return Err(StaarError::validation(format!(
                "Question {} was answered more than once",
                answer.question_id
            )));
        }
    }

    let review: Vec<QuestionReview> = questions
        .iter()
        .map(|question| {
            let selected_answer = selected.remove(&question.id);
            let is_correct = selected_answer
                .as_deref()
                .is_some_and(|letter| question.is_correct(letter));
            QuestionReview {
                question_id: question.id,
                selected_answer,
                correct_answer: question.correct_answer.clone(),
                is_correct,
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    let total = review.len() as i32;
    let correct = review.iter().filter(|r| r.is_correct).count() as i32;
    let score_percent = score_percent(correct, total);

    Ok((
        ExamScore {
            correct_count: correct,
            total_questions: total,
            score_percent,
            performance_level: PerformanceLevel::from_score(score_percent),
        },
        review,
    ))
}

/// 百分制，保留一位小数
pub fn score_percent(correct: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (f64::from(correct) / f64::from(total) * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{QuestionSource, Subject};

    fn question(id: i64, correct: &str) -> Question {
        Question {
            id,
            grade_level: 4,
            subject: Subject::Math,
            teks_standard: "4.4H".into(),
            category: None,
            question_text: format!("Question {id}"),
            answer_choices: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            correct_answer: correct.into(),
            explanation: "Because.".into(),
            has_image: false,
            image_description: None,
            source: QuestionSource::Manual,
            provider: None,
            created_by: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn answer(question_id: i64, selected: &str) -> ExamAnswer {
        ExamAnswer {
            question_id,
            selected_answer: selected.into(),
        }
    }

    #[test]
    fn test_unanswered_questions_count_as_wrong() {
        let questions = vec![question(1, "A"), question(2, "B"), question(3, "C")];
        let (score, review) =
            score_exam(&questions, &[answer(1, "a"), answer(2, "B)")]).unwrap();

        assert_eq!(score.total_questions, 3);
        assert_eq!(score.correct_count, 2);
        assert_eq!(score.score_percent, 66.7);
        assert_eq!(score.performance_level, PerformanceLevel::Approaches);
        assert_eq!(review[2].selected_answer, None);
        assert!(!review[2].is_correct);
        assert_eq!(review[0].selected_answer.as_deref(), Some("A"));
    }

    #[test]
    fn test_perfect_and_empty_submissions() {
        let questions: Vec<Question> = (1..=10).map(|id| question(id, "D")).collect();
        let all: Vec<ExamAnswer> = (1..=10).map(|id| answer(id, "D")).collect();
        let (perfect, _) = score_exam(&questions, &all).unwrap();
        assert_eq!(perfect.score_percent, 100.0);
        assert_eq!(perfect.performance_level, PerformanceLevel::Masters);

        let (blank, _) = score_exam(&questions, &[]).unwrap();
        assert_eq!(blank.correct_count, 0);
        assert_eq!(blank.performance_level, PerformanceLevel::DidNotMeet);
    }

    #[test]
    fn test_rejects_foreign_duplicate_and_malformed_answers() {
        let questions = vec![question(1, "A"), question(2, "B")];

        let err = score_exam(&questions, &[answer(99, "A")]).unwrap_err();
        assert!(err.message().contains("not part of this exam"));

        let err = score_exam(&questions, &[answer(1, "A"), answer(1, "B")]).unwrap_err();
        assert!(err.message().contains("more than once"));

        assert!(score_exam(&questions, &[answer(1, "E")]).is_err());
    }

    #[test]
    fn test_score_percent_rounding() {
        assert_eq!(score_percent(7, 10), 70.0);
        assert_eq!(score_percent(1, 3), 33.3);
        assert_eq!(score_percent(0, 0), 0.0);
    }
}
