use crate::ITEMS_PER_PAGE;

/// A 1-based page index over an ordered result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page(i32);

impl Page {
    pub fn first() -> Page {
        Page(1)
    }

    /// Indexes below 1 clamp to the first page.
    pub fn new(number: i32) -> Page {
        if number < 1 {
            Page(1)
        } else {
            Page(number)
        }
    }

    pub fn number(self) -> i32 {
        self.0
    }

    /// Computes the total number of pages needed to display n_items. An
    /// empty set still gets its (empty) first page.
    pub fn total(n_items: i64) -> i32 {
        let per_page = i64::from(ITEMS_PER_PAGE);
        if n_items == 0 {
            1
        } else if n_items % per_page == 0 {
            (n_items / per_page) as i32
        } else {
            (n_items / per_page) as i32 + 1
        }
    }

    /// Indexes beyond the range clamp to the last page.
    pub fn clamp(self, total_pages: i32) -> Page {
        if self.0 > total_pages {
            Page(total_pages)
        } else {
            self
        }
    }

    pub fn limits(self) -> (i32, i32) {
        ((self.0 - 1) * ITEMS_PER_PAGE, self.0 * ITEMS_PER_PAGE)
    }
}

/// One bounded slice of an ordered result set, with its metadata.
#[derive(Clone, Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub total_pages: i32,
    pub page: i32,
}

impl<T> Paginated<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
