mod question;
mod session;
mod snapshot;

pub use question::{MIN_OPTIONS, Question, QuestionDraft, QuestionError};
pub use session::{
    AnswerOutcome, CORRECT_POINTS, INCORRECT_POINTS, NextOutcome, QuizSession, ResumePoint,
    SelectOutcome, SessionEnd, SessionError, SessionPhase, SessionProgress, StartOutcome,
};
pub use snapshot::{
    DEFAULT_SNAPSHOT_TTL_MS, HIGH_SCORE_KEY, SNAPSHOT_KEY, SNAPSHOT_VERSION, SessionSnapshot,
    SnapshotError, decode_high_score, default_snapshot_ttl, encode_high_score,
};
