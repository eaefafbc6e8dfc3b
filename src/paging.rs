//! Paginated List Controller
//!
//! Fixed-size pages over a list that can be filtered. One controller backs
//! both the players view and the transactions table; the [`PageStrategy`]
//! decides whether page turns slice a fully loaded list or re-query the API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// How page turns are served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageStrategy {
    /// Each page is fetched from the backend; a full-sized page implies more.
    #[default]
    ServerPaged,
    /// The whole list is loaded once and sliced locally.
    ClientPaged,
}

impl fmt::Display for PageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageStrategy::ServerPaged => write!(f, "server-paged"),
            PageStrategy::ClientPaged => write!(f, "client-paged"),
        }
    }
}

impl FromStr for PageStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server-paged" | "server" => Ok(PageStrategy::ServerPaged),
            "client-paged" | "client" => Ok(PageStrategy::ClientPaged),
            other => Err(format!(
                "Unknown page strategy: {}. Use: server-paged, client-paged",
                other
            )),
        }
    }
}

/// Items that can be matched by the name filter
pub trait Named {
    fn name(&self) -> &str;
}

/// What the caller must do after a page turn or filter change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    /// Nothing changed.
    Unchanged,
    /// Re-render from [`PagedList::current_slice`].
    Local,
    /// Fetch this page from the backend, then call [`PagedList::load_page`].
    Fetch(usize),
}

type Predicate<T> = Rc<dyn Fn(&T) -> bool>;

/// Pagination state for one mounted view
pub struct PagedList<T> {
    strategy: PageStrategy,
    page_size: usize,
    current_page: usize,
    full: Vec<T>,
    /// Indices into `full`, in original order.
    filtered: Vec<usize>,
    predicate: Option<Predicate<T>>,
}

impl<T> PagedList<T> {
    /// Create an empty list on page 1
    pub fn new(strategy: PageStrategy, page_size: usize) -> Self {
        Self {
            strategy,
            page_size: page_size.max(1),
            current_page: 1,
            full: Vec::new(),
            filtered: Vec::new(),
            predicate: None,
        }
    }

    pub fn strategy(&self) -> PageStrategy {
        self.strategy
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page (1-indexed)
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of loaded items before filtering
    pub fn total_len(&self) -> usize {
        self.full.len()
    }

    /// Number of items passing the active filter
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Replace the whole list, clear the filter, and return to page 1
    pub fn set_full_list(&mut self, items: Vec<T>) {
        self.full = items;
        self.predicate = None;
        self.filtered = (0..self.full.len()).collect();
        self.current_page = 1;
    }

    /// Install a page fetched from the backend, keeping the page number and
    /// the active filter
    pub fn load_page(&mut self, items: Vec<T>) {
        self.full = items;
        self.refilter();
    }

    /// Filter with an arbitrary predicate and return to page 1
    pub fn filter_with(&mut self, predicate: impl Fn(&T) -> bool + 'static) -> PageTurn {
        self.predicate = Some(Rc::new(predicate));
        self.refilter();
        self.reset_to_first()
    }

    /// Drop the active filter and return to page 1
    pub fn clear_filter(&mut self) -> PageTurn {
        self.predicate = None;
        self.refilter();
        self.reset_to_first()
    }

    fn refilter(&mut self) {
        self.filtered = match &self.predicate {
            Some(predicate) => self
                .full
                .iter()
                .enumerate()
                .filter(|(_, item)| predicate(item))
                .map(|(i, _)| i)
                .collect(),
            None => (0..self.full.len()).collect(),
        };
    }

    fn reset_to_first(&mut self) -> PageTurn {
        match self.strategy {
            PageStrategy::ClientPaged => {
                self.current_page = 1;
                PageTurn::Local
            }
            PageStrategy::ServerPaged if self.current_page != 1 => {
                self.current_page = 1;
                PageTurn::Fetch(1)
            }
            PageStrategy::ServerPaged => PageTurn::Local,
        }
    }

    /// Known page count.
    ///
    /// Client paging: `ceil(filtered / page_size)`, or 1 for an empty list.
    /// Server paging: the highest page known to exist.
    pub fn page_count(&self) -> usize {
        match self.strategy {
            PageStrategy::ClientPaged => self.filtered.len().div_ceil(self.page_size).max(1),
            PageStrategy::ServerPaged => self.current_page + usize::from(self.has_next()),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        match self.strategy {
            PageStrategy::ClientPaged => self.current_page < self.page_count(),
            PageStrategy::ServerPaged => self.full.len() >= self.page_size,
        }
    }

    /// Advance one page; no-op at the last page
    pub fn next_page(&mut self) -> PageTurn {
        if !self.has_next() {
            return PageTurn::Unchanged;
        }
        self.current_page += 1;
        self.turned()
    }

    /// Go back one page; no-op at page 1
    pub fn prev_page(&mut self) -> PageTurn {
        if !self.has_prev() {
            return PageTurn::Unchanged;
        }
        self.current_page -= 1;
        self.turned()
    }

    /// Jump to a page, clamped to the known range
    pub fn go_to(&mut self, page: usize) -> PageTurn {
        let upper = match self.strategy {
            PageStrategy::ClientPaged => self.page_count(),
            PageStrategy::ServerPaged => usize::MAX,
        };
        let target = page.clamp(1, upper);
        if target == self.current_page {
            return PageTurn::Unchanged;
        }
        self.current_page = target;
        self.turned()
    }

    fn turned(&self) -> PageTurn {
        match self.strategy {
            PageStrategy::ClientPaged => PageTurn::Local,
            PageStrategy::ServerPaged => PageTurn::Fetch(self.current_page),
        }
    }

    /// Items on the current page.
    ///
    /// Server paging already holds exactly one page, so every filtered item
    /// is returned.
    pub fn current_slice(&self) -> Vec<&T> {
        let indices: &[usize] = match self.strategy {
            PageStrategy::ClientPaged => {
                let start = (self.current_page - 1) * self.page_size;
                if start >= self.filtered.len() {
                    &[]
                } else {
                    let end = (start + self.page_size).min(self.filtered.len());
                    &self.filtered[start..end]
                }
            }
            PageStrategy::ServerPaged => &self.filtered,
        };
        indices.iter().map(|&i| &self.full[i]).collect()
    }

    /// All items passing the filter, across pages
    pub fn filtered_items(&self) -> impl Iterator<Item = &T> {
        self.filtered.iter().map(move |&i| &self.full[i])
    }

    /// All loaded items, ignoring the filter
    pub fn items(&self) -> &[T] {
        &self.full
    }
}

impl<T: Named + 'static> PagedList<T> {
    /// Keep items whose name contains `query`, ignoring case
    pub fn filter(&mut self, query: &str) -> PageTurn {
        let needle = query.to_lowercase();
        self.filter_with(move |item: &T| item.name().to_lowercase().contains(&needle))
    }
}

impl<T: fmt::Debug> fmt::Debug for PagedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedList")
            .field("strategy", &self.strategy)
            .field("page_size", &self.page_size)
            .field("current_page", &self.current_page)
            .field("total", &self.full.len())
            .field("filtered", &self.filtered.len())
            .field("filter_active", &self.predicate.is_some())
            .finish()
    }
}
