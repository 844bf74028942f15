//! Conversational engine for Hearth.
//!
//! Routes each user turn to one of three handlers (clarifier, property
//! issue analyzer, tenancy advisor), keeps per-session conversation logs,
//! and exposes the deterministic guidance and resource helpers.

pub mod analytics;
pub mod context;
pub mod error;
pub mod generator;
pub mod guidance;
pub mod keywords;
pub mod orchestrator;
pub mod resources;
pub mod router;
pub mod session;

pub use analytics::{
    session_stats, summarize, ConversationFlavor, ConversationSummary, HandlerUsage, SessionStats,
};
pub use context::{ContextTurn, RoutingContext};
pub use error::ChatError;
pub use generator::{Reply, Responder, TurnRequest, APOLOGY};
pub use guidance::{estimate_repair_timeline, follow_up_questions};
pub use keywords::{KeywordScore, KeywordScorer};
pub use orchestrator::{ChatOrchestrator, ChatOutcome, IncomingMessage, SessionSummary};
pub use resources::{document_template, emergency_resources, legal_resources};
pub use router::Router;
pub use session::{ConversationLog, Session};
