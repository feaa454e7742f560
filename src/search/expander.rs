//! "Show more" pagination.
//!
//! The results page only lists the first batch of results. Activating the
//! "show more" control appends the next batch; [`PaginationExpander::expand`]
//! keeps activating it until the control goes away, then waits for the result
//! list to settle.
//!
//! # Stop conditions
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Control absent or disabled | Normal end of expansion |
//! | Scrolling to or clicking the control fails | Logged, treated as the end |
//! | `max_expansions` clicks reached | Logged at warn, expansion stops |
//! | Result list not enabled after the settle wait | [`SearchError::ResultsNotReady`] |

use crate::dom::DomAccessor;
use crate::errors::SearchError;
use crate::selectors::ResultSelectors;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_MAX_EXPANSIONS: usize = 200;
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Successful "show more" activations.
    pub expansions: usize,
    /// The safety ceiling stopped expansion while the control was still live.
    pub hit_ceiling: bool,
}

#[derive(Debug, Clone)]
pub struct PaginationExpander {
    show_more_button: &'static str,
    results_container: &'static str,
    max_expansions: usize,
    settle_timeout: Duration,
}

impl PaginationExpander {
    pub fn new(selectors: &ResultSelectors) -> Self {
        Self {
            show_more_button: selectors.show_more_button,
            results_container: selectors.results_container,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
        }
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_settle_timeout(mut self, settle_timeout: Duration) -> Self {
        self.settle_timeout = settle_timeout;
        self
    }

    /// Expand the result list as far as it goes.
    #[instrument(level = "info", skip_all, fields(max = self.max_expansions))]
    pub fn expand<D: DomAccessor>(&self, dom: &mut D) -> Result<ExpansionReport, SearchError> {
        let mut report = ExpansionReport {
            expansions: 0,
            hit_ceiling: false,
        };

        while dom.is_enabled(self.show_more_button) {
            if report.expansions >= self.max_expansions {
                warn!(
                    expansions = report.expansions,
                    "Show more control still present at expansion ceiling; stopping"
                );
                report.hit_ceiling = true;
                break;
            }

            let activated = dom.find(self.show_more_button, None).and_then(|button| {
                dom.scroll_into_view(&button)?;
                dom.click(&button)
            });
            match activated {
                Ok(()) => {
                    report.expansions += 1;
                    debug!(expansions = report.expansions, "Clicked show more");
                }
                Err(e) => {
                    info!(error = %e, "No more show more button");
                    break;
                }
            }
        }

        dom.wait_until_enabled(self.results_container, self.settle_timeout)
            .map_err(SearchError::ResultsNotReady)?;

        info!(
            expansions = report.expansions,
            hit_ceiling = report.hit_ceiling,
            "Result list expanded"
        );
        Ok(report)
    }
}
