use crate::models::questions::entities::Subject;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考试状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub enum ExamStatus {
    InProgress,
    Submitted,
}

impl std::fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamStatus::InProgress => write!(f, "in_progress"),
            ExamStatus::Submitted => write!(f, "submitted"),
        }
    }
}

impl std::str::FromStr for ExamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ExamStatus::InProgress),
            "submitted" => Ok(ExamStatus::Submitted),
            _ => Err(format!("Invalid exam status: {s}")),
        }
    }
}

// STAAR 表现等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub enum PerformanceLevel {
    Masters,
    Meets,
    Approaches,
    DidNotMeet,
}

impl PerformanceLevel {
    /// ≥90 masters，≥70 meets，≥50 approaches
    pub fn from_score(score_percent: f64) -> Self {
        if score_percent >= 90.0 {
            PerformanceLevel::Masters
        } else if score_percent >= 70.0 {
            PerformanceLevel::Meets
        } else if score_percent >= 50.0 {
            PerformanceLevel::Approaches
        } else {
            PerformanceLevel::DidNotMeet
        }
    }
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceLevel::Masters => write!(f, "masters"),
            PerformanceLevel::Meets => write!(f, "meets"),
            PerformanceLevel::Approaches => write!(f, "approaches"),
            PerformanceLevel::DidNotMeet => write!(f, "did_not_meet"),
        }
    }
}

impl std::str::FromStr for PerformanceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masters" => Ok(PerformanceLevel::Masters),
            "meets" => Ok(PerformanceLevel::Meets),
            "approaches" => Ok(PerformanceLevel::Approaches),
            "did_not_meet" => Ok(PerformanceLevel::DidNotMeet),
            _ => Err(format!("Invalid performance level: {s}")),
        }
    }
}

// 模拟考试
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    pub id: i64,
    pub user_id: i64,
    pub grade_level: i32,
    pub subject: Subject,
    pub question_ids: Vec<i64>,
    pub status: ExamStatus,
    pub total_questions: i32,
    pub correct_count: Option<i32>,
    pub score_percent: Option<f64>,
    pub performance_level: Option<PerformanceLevel>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_level_thresholds() {
        assert_eq!(PerformanceLevel::from_score(100.0), PerformanceLevel::Masters);
        assert_eq!(PerformanceLevel::from_score(90.0), PerformanceLevel::Masters);
        assert_eq!(PerformanceLevel::from_score(89.9), PerformanceLevel::Meets);
        assert_eq!(PerformanceLevel::from_score(70.0), PerformanceLevel::Meets);
        assert_eq!(PerformanceLevel::from_score(69.9), PerformanceLevel::Approaches);
        assert_eq!(PerformanceLevel::from_score(50.0), PerformanceLevel::Approaches);
        assert_eq!(PerformanceLevel::from_score(49.9), PerformanceLevel::DidNotMeet);
        assert_eq!(PerformanceLevel::from_score(0.0), PerformanceLevel::DidNotMeet);
    }

    #[test]
    fn test_performance_level_string_round_trip() {
        for level in [
            PerformanceLevel::Masters,
            PerformanceLevel::Meets,
            PerformanceLevel::Approaches,
            PerformanceLevel::DidNotMeet,
        ] {
            assert_eq!(level.to_string().parse::<PerformanceLevel>().unwrap(), level);
        }
    }
}
