pub mod body;
pub mod duplicate;
pub mod size;
pub mod smart;
pub mod status;

pub use body::{BodyExcludeFilter, BodyMatchFilter};
pub use duplicate::DuplicateFilter;
pub use size::SizeFilter;
pub use smart::SmartFilter;
pub use status::StatusFilter;

use std::sync::Arc;

use crate::scanner::ScanResult;

/// One installed filter. The tagged variants let the controller introspect a
/// chain and rebuild it for a recursed directory, carrying the static
/// filters over while swapping the scope-bound Smart and Duplicate ones.
pub enum ScanFilter {
    Status(StatusFilter),
    Size(SizeFilter),
    Smart(SmartFilter),
    Duplicate(DuplicateFilter),
    BodyMatch(BodyMatchFilter),
    BodyExclude(BodyExcludeFilter),
}

impl ScanFilter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Size(_) => "size",
            Self::Smart(_) => "smart-404",
            Self::Duplicate(_) => "duplicate",
            Self::BodyMatch(_) => "body-match",
            Self::BodyExclude(_) => "body-exclude",
        }
    }

    pub fn should_filter(&self, result: &ScanResult) -> bool {
        match self {
            Self::Status(f) => f.should_filter(result),
            Self::Size(f) => f.should_filter(result),
            Self::Smart(f) => f.should_filter(result),
            Self::Duplicate(f) => f.should_filter(result),
            Self::BodyMatch(f) => f.should_filter(result),
            Self::BodyExclude(f) => f.should_filter(result),
        }
    }

    /// Scope-bound filters are recalibrated per recursed directory instead
    /// of being carried into the child chain.
    fn is_scope_bound(&self) -> bool {
        matches!(self, Self::Smart(_) | Self::Duplicate(_))
    }
}

/// Applies filters in installation order, short-circuiting on the first
/// match.
#[derive(Clone, Default)]
pub struct Chain {
    filters: Vec<Arc<ScanFilter>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: ScanFilter) {
        self.filters.push(Arc::new(filter));
    }

    /// Returns whether the result should be hidden, and the name of the
    /// filter that rejected it.
    pub fn apply(&self, result: &ScanResult) -> (bool, &'static str) {
        for filter in &self.filters {
            if filter.should_filter(result) {
                return (true, filter.name());
            }
        }
        (false, "")
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanFilter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    /// The installed smart filter, if calibration succeeded for this scope.
    pub fn smart(&self) -> Option<&SmartFilter> {
        self.filters.iter().find_map(|f| match f.as_ref() {
            ScanFilter::Smart(sf) => Some(sf),
            _ => None,
        })
    }

    /// Child chain for a recursed directory: every static filter is shared,
    /// Smart and Duplicate are left for the caller to reinstall.
    pub fn rebuild_for_scope(&self) -> Self {
        Self {
            filters: self
                .filters
                .iter()
                .filter(|f| !f.is_scope_bound())
                .cloned()
                .collect(),
        }
    }
}
