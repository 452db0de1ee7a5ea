use std::marker::PhantomData;

use sea_orm::{DatabaseConnection, Paginator, SelectorTrait};

use crate::error::{CacheError, CacheResult};

pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// Lazy, restartable sequence over a query result, fetched one page at a time.
///
/// Nothing is read until the first `next_page`. The underlying query must
/// carry a total order so pages do not overlap.
pub struct Scan<'db, S, T>
where
    S: SelectorTrait + 'db,
{
    pager: Paginator<'db, DatabaseConnection, S>,
    page: u64,
    _into: PhantomData<T>,
}

impl<'db, S, T> Scan<'db, S, T>
where
    S: SelectorTrait + 'db,
    T: TryFrom<S::Item, Error = CacheError>,
{
    pub(crate) fn new(pager: Paginator<'db, DatabaseConnection, S>) -> Self {
        Scan {
            pager,
            page: 0,
            _into: PhantomData,
        }
    }

    /// Fetches the next page, or `None` once the sequence is exhausted.
    pub async fn next_page(&mut self) -> CacheResult<Option<Vec<T>>> {
        let rows = self.pager.fetch_page(self.page).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        self.page += 1;

        rows.into_iter()
            .map(T::try_from)
            .collect::<CacheResult<Vec<T>>>()
            .map(Some)
    }

    /// Starts the sequence over from the first page.
    pub fn rewind(&mut self) {
        self.page = 0;
    }

    /// Drains the remaining pages into one vector.
    pub async fn collect_all(mut self) -> CacheResult<Vec<T>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }
}
