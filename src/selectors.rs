//! Site constants for the New York Times search page.
//!
//! The search logic only relies on the role each selector plays. The literal
//! values match the live markup and must change together with it.

pub const BASE_URL: &str = "https://www.nytimes.com";
pub const SEARCH_URL: &str = "https://www.nytimes.com/search";

/// Selectors for the result list and the fields of one result.
#[derive(Debug, Clone, Copy)]
pub struct ResultSelectors {
    pub show_more_button: &'static str,
    pub results_container: &'static str,
    pub result_item: &'static str,
    /// Link inside a result, searched within the result element.
    pub result_link: &'static str,
    pub date: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

pub const RESULTS: ResultSelectors = ResultSelectors {
    show_more_button: r#"[data-testid="search-show-more-button"]"#,
    results_container: r#"[data-testid="search-results"]"#,
    result_item: r#"[data-testid="search-bodega-result"]"#,
    result_link: r#"[data-testid="search-bodega-result"] a"#,
    date: r#"[data-testid="todays-date"]"#,
    title: "a > h4",
    description: "a p:nth-child(2)",
    image: "img",
};

pub const FILTER_MULTISELECT_BUTTON: &str = r#"button[data-testid="search-multiselect-button"]"#;
pub const FILTER_DROPDOWN_LIST: &str = r#"[data-testid="multi-select-dropdown-list"]"#;
pub const FILTER_CHECKBOX: &str = r#"input[type="checkbox"]"#;
pub const DATE_RANGE_FACET: &str = r#"div.query-facet-date button[facet-name="date"]"#;

/// Form holding the multiselect for one filter type (`type` or `section`).
pub fn filter_form(filter_type: &str) -> String {
    format!(r#"[role="form"][data-testid="{filter_type}"]"#)
}

/// Container of the facet buttons shown for applied filters.
pub fn selected_facet_container(filter_type: &str) -> String {
    format!("div.query-facet-{filter_type}s")
}

pub fn selected_facet_button(filter_type: &str) -> String {
    format!(r#"button[facet-name="{filter_type}s"]"#)
}
