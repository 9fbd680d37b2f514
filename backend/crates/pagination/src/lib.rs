//! Fixed-size page numbering and pagination envelope primitives.
//!
//! Listing endpoints accept a 1-based `page` query parameter and return at
//! most [`DEFAULT_PAGE_SIZE`] items per page. Out-of-range pages are not an
//! error: they produce an empty page, and the caller decides what an empty
//! page means (listing endpoints treat it as "not found").
//!
//! Non-positive page numbers are clamped to the first page.
//!
//! # Examples
//! ```
//! use pagination::{Page, PageNumber, PageRequest};
//!
//! let request = PageRequest::new(PageNumber::clamped(2));
//! let page = Page::from_full((1..=12).collect::<Vec<_>>(), request);
//! assert_eq!(page.items(), &[11, 12]);
//! assert_eq!(page.total(), 12);
//! ```

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of items served per page by every listing endpoint.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors raised while parsing a page number from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageNumberError {
    /// The raw value is not an integer.
    #[error("page must be an integer, got {raw:?}")]
    NotAnInteger {
        /// Offending input.
        raw: String,
    },
}

/// A validated, 1-based page number.
///
/// ## Invariants
/// - The wrapped value is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Build a page number, clamping zero and negative values to page 1.
    ///
    /// Values above `u32::MAX` saturate.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageNumber;
    ///
    /// assert_eq!(PageNumber::clamped(-3), PageNumber::FIRST);
    /// assert_eq!(PageNumber::clamped(4).get(), 4);
    /// ```
    #[must_use]
    pub fn clamped(raw: i64) -> Self {
        let bounded = u32::try_from(raw.max(1)).unwrap_or(u32::MAX);
        NonZeroU32::new(bounded).map_or(Self::FIRST, Self)
    }

    /// Parse a page number from a query-string value.
    ///
    /// Surrounding whitespace is ignored. Integers are clamped as in
    /// [`PageNumber::clamped`].
    ///
    /// # Errors
    /// Returns [`PageNumberError::NotAnInteger`] when the value does not
    /// parse as a signed integer.
    pub fn parse(raw: &str) -> Result<Self, PageNumberError> {
        raw.trim()
            .parse::<i64>()
            .map(Self::clamped)
            .map_err(|_| PageNumberError::NotAnInteger {
                raw: raw.to_owned(),
            })
    }

    /// Return the 1-based page number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page number paired with a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    number: PageNumber,
    size: usize,
}

impl PageRequest {
    /// Request the given page with [`DEFAULT_PAGE_SIZE`] items per page.
    #[must_use]
    pub const fn new(number: PageNumber) -> Self {
        Self {
            number,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size. A size of zero is raised to one.
    #[must_use]
    pub const fn with_size(mut self, size: usize) -> Self {
        self.size = if size == 0 { 1 } else { size };
        self
    }

    /// Requested page number.
    #[must_use]
    pub const fn number(&self) -> PageNumber {
        self.number
    }

    /// Items per page.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Index of the first item on this page: `(page - 1) * size`.
    ///
    /// Saturates rather than overflowing for absurd page numbers, which
    /// simply yields an empty page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let preceding = usize::try_from(self.number.get().saturating_sub(1)).unwrap_or(usize::MAX);
        preceding.saturating_mul(self.size)
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(PageNumber::FIRST)
    }
}

/// Slice one page out of a full, already ordered result set.
///
/// Returns the items in `[(page - 1) * size, page * size)`; an
/// out-of-range page yields an empty vector.
///
/// # Examples
/// ```
/// use pagination::{paginate, PageNumber, PageRequest};
///
/// let first = paginate(0..25, PageRequest::new(PageNumber::FIRST));
/// assert_eq!(first.len(), 10);
/// let beyond = paginate(0..25, PageRequest::new(PageNumber::clamped(9)));
/// assert!(beyond.is_empty());
/// ```
pub fn paginate<I>(items: I, request: PageRequest) -> Vec<I::Item>
where
    I: IntoIterator,
{
    items
        .into_iter()
        .skip(request.offset())
        .take(request.limit())
        .collect()
}

/// One page of results together with the size of the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: PageNumber,
    size: usize,
    total: usize,
}

impl<T> Page<T> {
    /// Wrap items that were already sliced by the data source.
    ///
    /// `total` is the size of the unpaginated result set.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: usize) -> Self {
        Self {
            items,
            number: request.number,
            size: request.size,
            total,
        }
    }

    /// Slice a full result set held in memory.
    #[must_use]
    pub fn from_full(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len();
        Self::new(paginate(items, request), request, total)
    }

    /// Items on this page.
    #[must_use]
    pub const fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Page number this page was requested as.
    #[must_use]
    pub const fn number(&self) -> PageNumber {
        self.number
    }

    /// Size of the full, unpaginated result set.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Whether this page holds no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total: self.total,
        }
    }
}
