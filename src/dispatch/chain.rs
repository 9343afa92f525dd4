//! Case chain
//!
//! Ordered, first-match-wins list of cases.
//!
//! Ordering invariant: cases are evaluated exactly in list order and the
//! first whose predicate holds handles the request. The standard order is
//! not-found, executable, file, directory-with-index, directory-listing,
//! fallback. The fallback is held outside the list so that it is always
//! evaluated last and always matches; insertions can never displace it.

use super::cases::{
    Case, DirectoryWithIndexCase, DirectoryWithoutIndexCase, ExecutableCase, FallbackCase,
    NotFoundCase, RegularFileCase,
};
use super::request::Request;
use crate::config::SiteConfig;
use crate::error::{DispatchError, DispatchResult, ErrorKind};
use crate::page::Page;

pub struct CaseChain {
    cases: Vec<Box<dyn Case>>,
    fallback: FallbackCase,
}

/// Outcome of running a request through the chain
#[derive(Debug)]
pub struct Dispatched {
    pub page: Page,
    /// Name of the case that handled the request
    pub case: &'static str,
    /// Set when the page is an error page
    pub error: Option<ErrorKind>,
}

impl CaseChain {
    /// Chain holding only the fallback
    pub fn empty() -> Self {
        Self {
            cases: Vec::new(),
            fallback: FallbackCase,
        }
    }

    /// The standard six-case chain for a site
    pub fn standard(site: &SiteConfig) -> Self {
        let mut chain = Self::empty();
        chain.push(NotFoundCase);
        if site.scripts.enabled {
            chain.push(ExecutableCase::new(site.scripts.interpreters.clone()));
        }
        chain.push(RegularFileCase);
        chain.push(DirectoryWithIndexCase::new(&site.index_file));
        chain.push(DirectoryWithoutIndexCase::new(&site.index_file));
        chain
    }

    /// Append a case, still ahead of the fallback
    pub fn push(&mut self, case: impl Case + 'static) {
        self.cases.push(Box::new(case));
    }

    /// Insert a case directly before the case called `anchor`
    pub fn insert_before(&mut self, anchor: &str, case: impl Case + 'static) -> DispatchResult<()> {
        let index = self
            .cases
            .iter()
            .position(|c| c.name() == anchor)
            .ok_or_else(|| DispatchError::UnknownCase {
                name: anchor.to_string(),
            })?;
        self.cases.insert(index, Box::new(case));
        Ok(())
    }

    /// Names in evaluation order, fallback included
    pub fn case_names(&self) -> Vec<&'static str> {
        self.cases
            .iter()
            .map(|c| c.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// First case whose predicate holds
    pub fn classify(&self, request: &Request) -> &dyn Case {
        self.cases
            .iter()
            .map(|case| &**case)
            .find(|case| case.matches(request))
            .unwrap_or(&self.fallback)
    }

    /// Classify and act. Handler errors are rendered into the error page.
    pub fn dispatch(&self, request: &Request, strict_status: bool) -> Dispatched {
        let case = self.classify(request);
        match case.handle(request) {
            Ok(page) => Dispatched {
                page,
                case: case.name(),
                error: None,
            },
            Err(err) => Dispatched {
                page: Page::error(&err, strict_status),
                case: case.name(),
                error: Some(err.kind()),
            },
        }
    }
}
