//! Picks one page to inspect, weighted by region size.

use rand::Rng;

use crate::PAGE_SIZE;
use crate::maps::RegionCatalog;

/// Draws a uniform page index in `[0, total_pages)` and maps it back to a
/// byte offset inside the owning region, so every page has selection
/// probability `1 / total_pages` regardless of how regions are sized.
/// Returns `None` for an empty catalog.
pub fn pick_offset<R: Rng>(catalog: &RegionCatalog, rng: &mut R) -> Option<u64> {
    let total = catalog.total_pages();
    if total == 0 {
        return None;
    }
    let r = rng.random_range(0..total);
    let mut pages = 0;
    for region in catalog.regions() {
        if pages + region.page_count > r {
            return Some(region.base_address + (r - pages) * PAGE_SIZE);
        }
        pages += region.page_count;
    }
    None
}
