//! Fixed-size pages over an ordered collection.
//!
//! Page numbers are 1-based. A page number that isn't an integer resolves to
//! the first page, one that is out of range resolves to the last page, so a
//! listing request never fails because of its `page` parameter.

use serde::Deserialize;

pub const POSTS_PER_PAGE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Where a page sits inside the full collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: i64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl Paginator {
    pub fn new(per_page: i64) -> Self {
        Self { per_page: per_page.max(1) }
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// An empty collection still has one (empty) page.
    pub fn num_pages(&self, count: i64) -> i64 {
        if count <= 0 {
            1
        } else {
            (count + self.per_page - 1) / self.per_page
        }
    }

    pub fn window(&self, count: i64, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = match requested.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 || n > num_pages => num_pages,
            Some(Ok(n)) => n,
        };

        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

/// One page of items plus enough context to render page navigation.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    /// Size of the whole collection, not of this page.
    pub count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, count: i64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            count,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_other_pages(&self) -> bool {
        self.num_pages > 1
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pages() {
        let paginator = Paginator::default();
        assert_eq!(paginator.num_pages(0), 1);
        assert_eq!(paginator.num_pages(1), 1);
        assert_eq!(paginator.num_pages(10), 1);
        assert_eq!(paginator.num_pages(11), 2);
        assert_eq!(paginator.num_pages(25), 3);
    }

    #[test]
    fn first_page_by_default() {
        let window = Paginator::default().window(25, None);
        assert_eq!(
            window,
            PageWindow { number: 1, num_pages: 3, offset: 0, limit: 10 }
        );
    }

    #[test]
    fn garbage_page_is_first_page() {
        let paginator = Paginator::default();
        assert_eq!(paginator.window(25, Some("abc")).number, 1);
        assert_eq!(paginator.window(25, Some("2.5")).number, 1);
        assert_eq!(paginator.window(25, Some("")).number, 1);
    }

    #[test]
    fn out_of_range_page_is_last_page() {
        let paginator = Paginator::default();
        let window = paginator.window(25, Some("99"));
        assert_eq!(window.number, 3);
        assert_eq!(window.offset, 20);

        assert_eq!(paginator.window(25, Some("0")).number, 3);
        assert_eq!(paginator.window(25, Some("-4")).number, 3);
        assert_eq!(paginator.window(0, Some("7")).number, 1);
    }

    #[test]
    fn middle_page_offset() {
        let window = Paginator::default().window(25, Some(" 2 "));
        assert_eq!(window.number, 2);
        assert_eq!(window.offset, 10);
        assert_eq!(window.limit, 10);
    }

    #[test]
    fn page_navigation_flags() {
        let paginator = Paginator::new(3);
        let window = paginator.window(7, Some("2"));
        let page = Page::new(vec![4, 5, 6], window, 7);
        assert!(page.has_previous());
        assert!(page.has_next());
        assert!(page.has_other_pages());
        assert_eq!(page.iter().copied().collect::<Vec<_>>(), vec![4, 5, 6]);

        let last = Page::new(vec![7], paginator.window(7, Some("3")), 7);
        assert!(!last.has_next());
        assert_eq!(last.len(), 1);
    }

    #[test]
    fn zero_per_page_is_clamped() {
        assert_eq!(Paginator::new(0).per_page(), 1);
    }
}
