//! Page-number pagination (1-based, fixed page size).

use crate::error::{DomainError, DomainResult};

/// Number of questions returned per page.
pub const QUESTIONS_PER_PAGE: u32 = 10;

/// A validated request for one page of results.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Page `number` (1-based) with the default page size.
    pub fn new(number: i64) -> DomainResult<Self> {
        Self::with_size(number, QUESTIONS_PER_PAGE)
    }

    pub fn with_size(number: i64, size: u32) -> DomainResult<Self> {
        if number < 1 {
            return Err(DomainError::PageOutOfRange(number));
        }
        Ok(Self {
            // Anything past u32::MAX is past the last page anyway.
            number: u32::try_from(number).unwrap_or(u32::MAX),
            size: size.max(1),
        })
    }

    pub fn first() -> Self {
        Self {
            number: 1,
            size: QUESTIONS_PER_PAGE,
        }
    }

    /// Parse the raw `page` query value. Non-numeric input falls back to the first page.
    pub fn from_query(raw: Option<&str>) -> DomainResult<Self> {
        let Some(raw) = raw.map(str::trim) else {
            return Ok(Self::first());
        };
        if !is_integer(raw) {
            return Ok(Self::first());
        }
        match raw.parse::<i64>() {
            Ok(number) => Self::new(number),
            // Integers beyond i64 are still pages, just very far before or after the data.
            Err(_) if raw.starts_with('-') => Err(DomainError::PageOutOfRange(i64::MIN)),
            Err(_) => Self::new(i64::MAX),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn limit(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

/// Optional sign followed by at least one ASCII digit.
fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// One page of results plus the pre-pagination total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Cut a page out of an already filtered and ordered result set.
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = all
            .into_iter()
            .skip(offset)
            .take(request.limit() as usize)
            .collect();
        Self {
            items,
            total,
            request,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_or_garbage_page_defaults_to_first() {
        assert_eq!(PageRequest::from_query(None).unwrap(), PageRequest::first());
        assert_eq!(PageRequest::from_query(Some("two")).unwrap(), PageRequest::first());
        assert_eq!(PageRequest::from_query(Some("3")).unwrap().number(), 3);
    }

    #[test]
    fn oversized_integer_page_is_past_the_end() {
        let request = PageRequest::from_query(Some("99999999999999999999")).unwrap();
        assert_eq!(request.number(), u32::MAX);

        let page = Page::slice((0..19).collect::<Vec<u32>>(), request);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 19);

        assert_eq!(
            PageRequest::from_query(Some("-99999999999999999999")),
            Err(DomainError::PageOutOfRange(i64::MIN))
        );
        assert_eq!(PageRequest::from_query(Some("1.5")).unwrap(), PageRequest::first());
        assert_eq!(PageRequest::from_query(Some("-")).unwrap(), PageRequest::first());
    }

    #[test]
    fn page_zero_is_out_of_range() {
        assert_eq!(PageRequest::new(0), Err(DomainError::PageOutOfRange(0)));
        assert!(PageRequest::from_query(Some("-1")).is_err());
    }

    #[test]
    fn slices_nineteen_items_into_ten_and_nine() {
        let all: Vec<u32> = (0..19).collect();
        let p1 = Page::slice(all.clone(), PageRequest::new(1).unwrap());
        let p2 = Page::slice(all.clone(), PageRequest::new(2).unwrap());
        let p3 = Page::slice(all, PageRequest::new(3).unwrap());
        assert_eq!((p1.items.len(), p1.total), (10, 19));
        assert_eq!((p2.items.len(), p2.total), (9, 19));
        assert_eq!(p2.items.first(), Some(&10));
        assert!(p3.items.is_empty());
        assert_eq!(p3.total, 19);
    }

    proptest! {
        #[test]
        fn pages_partition_the_result_set(len in 0usize..120, size in 1u32..15) {
            let all: Vec<usize> = (0..len).collect();
            let mut seen = Vec::new();
            let mut number = 1i64;
            loop {
                let page = Page::slice(all.clone(), PageRequest::with_size(number, size).unwrap());
                prop_assert!(page.items.len() <= size as usize);
                prop_assert_eq!(page.total, len as u64);
                if page.items.is_empty() {
                    break;
                }
                seen.extend(page.items);
                number += 1;
            }
            prop_assert_eq!(seen, all);
        }
    }
}
