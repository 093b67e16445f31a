//! crates/jobmate_core/src/listing.rs
//!
//! In-memory search, status filtering, sorting and pagination for the
//! applications tracker. Everything here is pure: the visible page is recomputed
//! from the full collection and the current query on every call.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::domain::{Application, ApplicationStatus, ApplicationUpdate};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    AppliedDate,
    LastUpdated,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Everything the user can tweak above the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl ApplicationQuery {
    fn matches(&self, application: &Application, needle: &str) -> bool {
        if !self.status.matches(application.status) {
            return false;
        }
        needle.is_empty()
            || application.job_title.to_lowercase().contains(needle)
            || application.company.to_lowercase().contains(needle)
    }

    fn compare(&self, a: &Application, b: &Application) -> Ordering {
        let ordering = match self.sort_field {
            SortField::AppliedDate => a.applied_date.cmp(&b.applied_date),
            SortField::LastUpdated => a.last_updated.cmp(&b.last_updated),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Filters and sorts `applications`. Ties keep their input order.
pub fn filter_and_sort<'a>(
    applications: &'a [Application],
    query: &ApplicationQuery,
) -> Vec<&'a Application> {
    let needle = query.search.trim().to_lowercase();
    let mut result: Vec<&Application> = applications
        .iter()
        .filter(|application| query.matches(application, &needle))
        .collect();
    // `sort_by` is stable.
    result.sort_by(|a, b| query.compare(a, b));
    result
}

pub fn total_pages(items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    items.div_ceil(page_size)
}

/// One page of an already filtered and sorted list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Slices out page `number` (1-based). Out-of-range pages are empty, not errors.
pub fn paginate<T: Clone>(items: &[T], number: usize, page_size: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let start = number.saturating_sub(1).saturating_mul(page_size);
    let page_items = if number == 0 || start >= total_items {
        Vec::new()
    } else {
        let end = (start + page_size).min(total_items);
        items[start..end].to_vec()
    };
    Page {
        items: page_items,
        number,
        total_pages,
        total_items,
    }
}

//=========================================================================================
// ApplicationListView
//=========================================================================================

/// The applications tracker's state: the fetched collection, the query and the
/// current page.
///
/// Changing the search text, the status filter or the sort resets the page to 1,
/// so narrowing the result set can never strand the user on an empty page past
/// the end.
#[derive(Debug, Clone, Default)]
pub struct ApplicationListView {
    applications: Vec<Application>,
    query: ApplicationQuery,
    page: usize,
}

impl ApplicationListView {
    pub fn new(applications: Vec<Application>) -> Self {
        Self {
            applications,
            query: ApplicationQuery::default(),
            page: 1,
        }
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn query(&self) -> &ApplicationQuery {
        &self.query
    }

    pub fn current_page_number(&self) -> usize {
        self.page
    }

    /// Replaces the collection, e.g. after a refetch.
    pub fn replace_all(&mut self, applications: Vec<Application>) {
        self.applications = applications;
        self.clamp_page();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.page = 1;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.query.status = status;
        self.page = 1;
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.query.sort_field = field;
        self.query.sort_order = order;
        self.page = 1;
    }

    pub fn set_query(&mut self, query: ApplicationQuery) {
        self.query = query;
        self.page = 1;
    }

    /// Moves to `page`, clamped into the valid range for the current results.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    pub fn filtered(&self) -> Vec<&Application> {
        filter_and_sort(&self.applications, &self.query)
    }

    pub fn current_page(&self) -> Page<Application> {
        let filtered: Vec<Application> = self.filtered().into_iter().cloned().collect();
        paginate(&filtered, self.page, PAGE_SIZE)
    }

    /// Adds a newly created application at the front of the list.
    pub fn insert(&mut self, application: Application) {
        self.applications.insert(0, application);
    }

    /// Merges `update` into the application with `id`. Returns whether one matched.
    pub fn apply_update(&mut self, id: &str, update: &ApplicationUpdate, now: DateTime<Utc>) -> bool {
        match self.applications.iter_mut().find(|app| app.id == id) {
            Some(application) => {
                update.apply_to(application, now);
                self.clamp_page();
                true
            }
            None => false,
        }
    }

    /// Replaces the stored copy with the server's version of the record.
    pub fn upsert(&mut self, application: Application) {
        match self.applications.iter_mut().find(|app| app.id == application.id) {
            Some(existing) => {
                *existing = application;
                self.clamp_page();
            }
            None => self.insert(application),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Application> {
        let index = self.applications.iter().position(|app| app.id == id)?;
        let removed = self.applications.remove(index);
        self.clamp_page();
        Some(removed)
    }

    fn clamp_page(&mut self) {
        let pages = total_pages(self.filtered().len(), PAGE_SIZE).max(1);
        self.page = self.page.clamp(1, pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{application, mock_applications};
    use chrono::TimeZone;

    fn ids(apps: &[&Application]) -> Vec<String> {
        apps.iter().map(|app| app.id.clone()).collect()
    }

    #[test]
    fn empty_search_matches_everything() {
        let apps = mock_applications(25);
        let query = ApplicationQuery::default();
        assert_eq!(filter_and_sort(&apps, &query).len(), 25);
    }

    #[test]
    fn search_is_case_insensitive_on_title_or_company() {
        let apps = mock_applications(8);
        let query = ApplicationQuery {
            search: "techCORP".into(),
            ..Default::default()
        };
        let result = filter_and_sort(&apps, &query);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|app| app.company == "TechCorp"));

        let query = ApplicationQuery {
            search: "designer".into(),
            ..Default::default()
        };
        let result = filter_and_sort(&apps, &query);
        assert!(result.iter().all(|app| app.job_title == "Product Designer"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn status_filter_yields_only_that_status() {
        let apps = mock_applications(25);
        for status in ApplicationStatus::ALL {
            let query = ApplicationQuery {
                status: StatusFilter::Only(status),
                ..Default::default()
            };
            assert!(filter_and_sort(&apps, &query)
                .iter()
                .all(|app| app.status == status));
        }
    }

    #[test]
    fn union_over_statuses_reconstructs_the_collection() {
        let apps = mock_applications(25);
        let mut seen: Vec<String> = ApplicationStatus::ALL
            .into_iter()
            .flat_map(|status| {
                let query = ApplicationQuery {
                    status: StatusFilter::Only(status),
                    ..Default::default()
                };
                ids(&filter_and_sort(&apps, &query))
            })
            .collect();
        let mut all = ids(&filter_and_sort(&apps, &ApplicationQuery::default()));
        seen.sort();
        all.sort();
        assert_eq!(seen, all);
        assert_eq!(seen.len(), apps.len());
    }

    #[test]
    fn rejected_filter_counts_every_sixth_record() {
        let apps = mock_applications(25);
        let mut view = ApplicationListView::new(apps);
        view.set_status_filter(StatusFilter::Only(ApplicationStatus::Rejected));
        let expected = 25 / 6;
        assert_eq!(view.filtered().len(), expected);
        let page = view.current_page();
        assert_eq!(page.items.len(), expected.min(PAGE_SIZE));
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn ascending_and_descending_dates_are_exact_reverses() {
        let apps = mock_applications(25);
        let asc = ApplicationQuery {
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let desc = ApplicationQuery {
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let mut forward = ids(&filter_and_sort(&apps, &asc));
        let backward = ids(&filter_and_sort(&apps, &desc));
        forward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn sorting_by_last_updated_orders_by_that_field() {
        let apps = mock_applications(12);
        let query = ApplicationQuery {
            sort_field: SortField::LastUpdated,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let result = filter_and_sort(&apps, &query);
        assert!(result
            .windows(2)
            .all(|pair| pair[0].last_updated <= pair[1].last_updated));
    }

    #[test]
    fn status_sort_is_lexicographic_and_stable() {
        let day = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let apps = vec![
            application("a", ApplicationStatus::Submitted, day),
            application("b", ApplicationStatus::Accepted, day),
            application("c", ApplicationStatus::Submitted, day),
            application("d", ApplicationStatus::InterviewScheduled, day),
            application("e", ApplicationStatus::Accepted, day),
        ];
        let asc = ApplicationQuery {
            sort_field: SortField::Status,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        assert_eq!(ids(&filter_and_sort(&apps, &asc)), ["b", "e", "d", "a", "c"]);

        let desc = ApplicationQuery {
            sort_field: SortField::Status,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        // Ties still keep input order when descending.
        assert_eq!(ids(&filter_and_sort(&apps, &desc)), ["a", "c", "d", "b", "e"]);
    }

    #[test]
    fn concatenated_pages_reconstruct_the_list() {
        let apps = mock_applications(25);
        let filtered: Vec<Application> = filter_and_sort(&apps, &ApplicationQuery::default())
            .into_iter()
            .cloned()
            .collect();
        let pages = total_pages(filtered.len(), PAGE_SIZE);
        assert_eq!(pages, 3);
        let joined: Vec<Application> = (1..=pages)
            .flat_map(|n| paginate(&filtered, n, PAGE_SIZE).items)
            .collect();
        assert_eq!(joined, filtered);
        assert_eq!(paginate(&filtered, 3, PAGE_SIZE).items.len(), 5);
    }

    #[test]
    fn out_of_range_page_is_empty_not_an_error() {
        let apps = mock_applications(5);
        let page = paginate(&apps, 4, PAGE_SIZE);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(paginate::<Application>(&[], 1, PAGE_SIZE).is_empty());
    }

    #[test]
    fn changing_a_filter_resets_to_the_first_page() {
        let mut view = ApplicationListView::new(mock_applications(25));
        view.set_page(3);
        assert_eq!(view.current_page_number(), 3);

        view.set_status_filter(StatusFilter::Only(ApplicationStatus::Submitted));
        assert_eq!(view.current_page_number(), 1);
        assert!(!view.current_page().is_empty());

        view.set_page(2);
        view.set_search("tech");
        assert_eq!(view.current_page_number(), 1);

        view.set_page(2);
        view.set_sort(SortField::Status, SortOrder::Asc);
        assert_eq!(view.current_page_number(), 1);
    }

    #[test]
    fn set_page_clamps_into_range() {
        let mut view = ApplicationListView::new(mock_applications(25));
        view.set_page(99);
        assert_eq!(view.current_page_number(), 3);
        view.set_page(0);
        assert_eq!(view.current_page_number(), 1);

        let mut empty = ApplicationListView::new(Vec::new());
        empty.set_page(5);
        assert_eq!(empty.current_page_number(), 1);
        assert!(empty.current_page().is_empty());
    }

    #[test]
    fn store_operations_mirror_backend_mutations() {
        let mut view = ApplicationListView::new(mock_applications(3));
        let day = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        view.insert(application("fresh", ApplicationStatus::Submitted, day));
        assert_eq!(view.applications()[0].id, "fresh");

        let update = ApplicationUpdate {
            status: Some(ApplicationStatus::Accepted),
            ..Default::default()
        };
        assert!(view.apply_update("fresh", &update, day));
        assert_eq!(view.applications()[0].status, ApplicationStatus::Accepted);
        assert!(!view.apply_update("missing", &update, day));

        assert!(view.remove("fresh").is_some());
        assert!(view.remove("fresh").is_none());
        assert_eq!(view.applications().len(), 3);
    }

    #[test]
    fn removing_the_last_item_of_a_page_pulls_the_page_back() {
        let mut view = ApplicationListView::new(mock_applications(11));
        view.set_page(2);
        let last = view.current_page().items[0].id.clone();
        view.remove(&last);
        assert_eq!(view.current_page_number(), 1);
    }

    #[test]
    fn updating_the_last_item_out_of_the_filter_pulls_the_page_back() {
        let day = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let apps = (0..11)
            .map(|i| application(&format!("app-{}", i), ApplicationStatus::Submitted, day))
            .collect();
        let mut view = ApplicationListView::new(apps);
        view.set_status_filter(StatusFilter::Only(ApplicationStatus::Submitted));
        view.set_page(2);
        let last = view.current_page().items[0].id.clone();

        let update = ApplicationUpdate {
            status: Some(ApplicationStatus::Rejected),
            ..Default::default()
        };
        assert!(view.apply_update(&last, &update, day));

        assert_eq!(view.current_page_number(), 1);
        assert_eq!(view.current_page().items.len(), 10);
    }

    #[test]
    fn upserting_a_record_out_of_the_filter_pulls_the_page_back() {
        let day = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let apps = (0..11)
            .map(|i| application(&format!("app-{}", i), ApplicationStatus::Submitted, day))
            .collect();
        let mut view = ApplicationListView::new(apps);
        view.set_status_filter(StatusFilter::Only(ApplicationStatus::Submitted));
        view.set_page(2);
        let mut last = view.current_page().items[0].clone();
        last.status = ApplicationStatus::Accepted;

        view.upsert(last);

        assert_eq!(view.current_page_number(), 1);
        assert!(!view.current_page().items.is_empty());
    }
}
