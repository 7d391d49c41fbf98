use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::PracticeService;
use crate::middlewares::RequireJWT;
use crate::models::practice::{
    entities::{AccuracyBreakdown, AttemptOutcome, accuracy_percent},
    responses::PracticeStats,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_stats(
    service: &PracticeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    match storage.list_attempt_outcomes(user_id).await {
        Ok(outcomes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summarize_outcomes(&outcomes),
            "Practice stats retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to compute stats: {e}"),
            )),
        ),
    }
}

/// 汇总作答结果；分组按正确率升序，正确率相同时作答多的在前
pub fn summarize_outcomes(outcomes: &[AttemptOutcome]) -> PracticeStats {
    let total = outcomes.len() as i64;
    let correct = outcomes.iter().filter(|o| o.is_correct).count() as i64;

    PracticeStats {
        total_attempts: total,
        correct_attempts: correct,
        accuracy: accuracy_percent(correct, total),
        by_subject: breakdown(outcomes, |o| o.subject.to_string()),
        by_teks: breakdown(outcomes, |o| o.teks_standard.clone()),
    }
}

fn breakdown<F>(outcomes: &[AttemptOutcome], key_of: F) -> Vec<AccuracyBreakdown>
where
    F: Fn(&AttemptOutcome) -> String,
{
    let mut tallies: HashMap<String, (i64, i64)> = HashMap::new();
    for outcome in outcomes {
        let entry = tallies.entry(key_of(outcome)).or_default();
        entry.0 += 1;
        if outcome.is_correct {
            entry.1 += 1;
        }
    }

    let mut rows: Vec<AccuracyBreakdown> = tallies
        .into_iter()
        .map(|(key, (attempts, correct))| AccuracyBreakdown {
            key,
            attempts,
            correct,
            accuracy: accuracy_percent(correct, attempts),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.accuracy
            .total_cmp(&b.accuracy)
            .then_with(|| b.attempts.cmp(&a.attempts))
            .then_with(|| a.key.cmp(&b.key))
    });
    rows
}
