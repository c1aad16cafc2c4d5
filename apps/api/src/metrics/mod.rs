//! Review metrics across the caller's projects.
//!
//! `compute_metrics` is a pure aggregation over rows that were already
//! fetched; `collect_activity` does the fetching.

pub mod handlers;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::{ProjectRow, QuestionRow, QuestionStatus, StakeholderRow};
use crate::store::Store;

/// Hours of meeting time a resolved async question is assumed to save.
const HOURS_SAVED_PER_RESOLVED_QUESTION: f64 = 0.5;

/// One project's rows, as input to `compute_metrics`.
#[derive(Debug, Clone)]
pub struct ProjectActivity {
    pub project: ProjectRow,
    pub stakeholders: Vec<StakeholderRow>,
    pub questions: Vec<QuestionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleQuestions {
    pub role: String,
    pub questions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResolutionTime {
    pub project_id: Uuid,
    pub project_name: String,
    /// `None` until the project has a resolved question.
    pub avg_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderEngagement {
    pub stakeholder_id: Uuid,
    pub name: String,
    pub role: String,
    pub questions: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub project_count: usize,
    pub total_questions: usize,
    pub resolved_questions: usize,
    /// Whole percent, 0 when there are no questions.
    pub resolution_rate: u32,
    pub meetings_avoided: usize,
    pub hours_saved: u64,
    pub questions_by_role: Vec<RoleQuestions>,
    pub resolution_time: Vec<ProjectResolutionTime>,
    pub stakeholders: Vec<StakeholderEngagement>,
}

fn is_resolved(q: &QuestionRow) -> bool {
    q.status == QuestionStatus::Resolved
}

/// Mean hours from asking to resolving, rounded to one decimal.
fn average_resolution_hours(questions: &[QuestionRow]) -> Option<f64> {
    let hours: Vec<f64> = questions
        .iter()
        .filter(|q| is_resolved(q))
        .filter_map(|q| q.resolved_at.map(|at| at - q.created_at))
        .map(|elapsed| elapsed.num_seconds().max(0) as f64 / 3600.0)
        .collect();
    if hours.is_empty() {
        return None;
    }
    let mean = hours.iter().sum::<f64>() / hours.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

pub fn compute_metrics(activity: &[ProjectActivity]) -> Metrics {
    let total_questions: usize = activity.iter().map(|a| a.questions.len()).sum();
    let resolved_questions: usize = activity
        .iter()
        .map(|a| a.questions.iter().filter(|q| is_resolved(q)).count())
        .sum();
    let resolution_rate = if total_questions == 0 {
        0
    } else {
        (resolved_questions as f64 * 100.0 / total_questions as f64).round() as u32
    };

    let mut questions_by_role: Vec<RoleQuestions> = Vec::new();
    let mut stakeholders = Vec::new();
    for a in activity {
        for s in &a.stakeholders {
            let asked: Vec<&QuestionRow> = a
                .questions
                .iter()
                .filter(|q| q.stakeholder_id == s.id)
                .collect();
            stakeholders.push(StakeholderEngagement {
                stakeholder_id: s.id,
                name: s.name.clone(),
                role: s.role.clone(),
                questions: asked.len(),
                resolved: asked.iter().filter(|q| is_resolved(q)).count(),
            });

            if asked.is_empty() {
                continue;
            }
            match questions_by_role.iter_mut().find(|r| r.role == s.role) {
                Some(entry) => entry.questions += asked.len(),
                None => questions_by_role.push(RoleQuestions {
                    role: s.role.clone(),
                    questions: asked.len(),
                }),
            }
        }
    }

    let resolution_time = activity
        .iter()
        .map(|a| ProjectResolutionTime {
            project_id: a.project.id,
            project_name: a.project.name.clone(),
            avg_hours: average_resolution_hours(&a.questions),
        })
        .collect();

    Metrics {
        project_count: activity.len(),
        total_questions,
        resolved_questions,
        resolution_rate,
        meetings_avoided: resolved_questions,
        hours_saved: (resolved_questions as f64 * HOURS_SAVED_PER_RESOLVED_QUESTION).round() as u64,
        questions_by_role,
        resolution_time,
        stakeholders,
    }
}

/// Loads stakeholders and questions for each of the caller's projects.
pub async fn collect_activity(
    store: &dyn Store,
    ctx: &RequestContext,
) -> Result<Vec<ProjectActivity>, AppError> {
    let projects = store.list_projects(ctx.user_id).await?;
    let mut activity = Vec::with_capacity(projects.len());
    for project in projects {
        let (stakeholders, questions) = tokio::try_join!(
            store.list_stakeholders(project.id),
            store.list_questions(project.id),
        )?;
        activity.push(ProjectActivity {
            project,
            stakeholders,
            questions,
        });
    }
    Ok(activity)
}
