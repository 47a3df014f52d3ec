//! Plane crawling across the sources of a session.
//!
//! Crawls never cross from one source to another, even where surfaces touch.

use std::fmt;

use glam::Vec3;
use retopokit_core::{Plane, Ray, SourceId};
use tracing::trace;

use crate::query::QueryAggregator;
use crate::sources::SourceSet;

/// One segment of a plane/source intersection, tagged with its source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlSegment {
    pub source: SourceId,
    pub from: Vec3,
    pub to: Vec3,
    pub face: usize,
}

/// A one-shot sequence of crawl segments.
///
/// Sources are crawled as the sequence is consumed; request a new crawl to
/// traverse again.
pub struct Crawl<'a> {
    inner: Box<dyn Iterator<Item = CrawlSegment> + 'a>,
}

impl<'a> Crawl<'a> {
    fn new(inner: impl Iterator<Item = CrawlSegment> + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Iterator for Crawl<'_> {
    type Item = CrawlSegment;

    fn next(&mut self) -> Option<CrawlSegment> {
        self.inner.next()
    }
}

impl fmt::Debug for Crawl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Crawl { .. }")
    }
}

#[derive(Clone, Copy)]
pub struct PlaneCrawler<'a> {
    sources: &'a SourceSet,
}

impl<'a> PlaneCrawler<'a> {
    pub fn new(sources: &'a SourceSet) -> Self {
        Self { sources }
    }

    /// Crawls the source nearest along `ray`.
    ///
    /// With `walk` the curve is followed through connected topology from the
    /// hit face; otherwise every intersection segment of that one source is
    /// returned. Empty when the ray misses every source.
    pub fn single_crawl(&self, ray: &Ray, plane: &Plane, walk: bool) -> Crawl<'a> {
        let Some((id, _)) = QueryAggregator::new(self.sources).raycast_with_source(ray) else {
            return Crawl::empty();
        };
        let Some(source) = self.sources.get(id) else {
            return Crawl::empty();
        };
        trace!(source = id, walk, "single crawl");
        let crossings = if walk {
            source.plane_intersection_walk_crawl(ray, plane)
        } else {
            source.plane_intersection_crawl(ray, plane)
        };
        Crawl::new(crossings.into_iter().map(move |c| CrawlSegment {
            source: id,
            from: c.from,
            to: c.to,
            face: c.face,
        }))
    }

    /// Intersection segments of `plane` with every source, concatenated in
    /// source order
    pub fn all_crawl(&self, plane: &Plane) -> Crawl<'a> {
        let plane = *plane;
        Crawl::new(self.sources.iter().flat_map(move |(id, source)| {
            source
                .plane_intersections_crawl(&plane)
                .into_iter()
                .map(move |c| CrawlSegment {
                    source: id,
                    from: c.from,
                    to: c.to,
                    face: c.face,
                })
        }))
    }
}
