//! Domain model: the specification document, review findings, and the merge
//! gate report.

pub mod error;
pub mod merge;
pub mod review;
pub mod spec;

pub use error::{GitcrewError, Result};
pub use merge::MergeReport;
pub use review::{
    render_review_body, verdict_for, FindingSeverity, ReviewFinding, ReviewVerdict, APPROVAL_BODY,
};
pub use spec::{Feature, FeatureStatus, PrStateView, SpecDocument, SPEC_PATH};
