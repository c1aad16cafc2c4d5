pub mod project;
pub mod question;
pub mod stakeholder;

pub use project::{NewProject, PrdAttachment, ProjectRow, ProjectUpdate, PDF_DATA_URL_PREFIX};
pub use question::{AnswerRow, NewAnswer, NewQuestion, QuestionRow, QuestionStatus};
pub use stakeholder::{
    NewStakeholder, ReviewStatus, StakeholderRow, StakeholderUpdate, STAKEHOLDER_ROLES,
};
