use std::collections::HashSet;

use crate::models::{domain::present, IdentityField, Listing};

/// Drop duplicate and ineligible listings, preserving input order
///
/// This is the first stage of the pipeline.
pub fn filter_listings(listings: Vec<Listing>) -> Vec<Listing> {
    dedup_by_identity(listings)
        .into_iter()
        .filter(is_eligible)
        .collect()
}

/// Keep the first listing of every identity group
///
/// Two listings are duplicates when they share a value in the same identity
/// field (`listingId`, `detailsUrl` or `uid`). Listings without any identity
/// value cannot be matched and are always kept.
pub fn dedup_by_identity(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashSet<(IdentityField, String)> = HashSet::new();

    listings
        .into_iter()
        .filter(|listing| {
            let ids: Vec<(IdentityField, String)> = listing
                .identities()
                .map(|(field, value)| (field, value.to_string()))
                .collect();

            if ids.iter().any(|id| seen.contains(id)) {
                tracing::debug!("Dropping duplicate listing {:?}", ids);
                return false;
            }

            seen.extend(ids);
            true
        })
        .collect()
}

/// Check the platform-specific eligibility flags
///
/// Each check only applies when the listing carries the field; listings from
/// other platforms pass untouched.
#[inline]
pub fn is_eligible(listing: &Listing) -> bool {
    // WWOOF: must have internet
    if let Some(internet) = present(listing.host_internet_access.as_deref()) {
        if internet != "1" {
            return false;
        }
    }

    // WWOOF: more than one wwoofer
    if present(listing.host_max_wwoofers.as_deref()) == Some("1") {
        return false;
    }

    // WWOOF: winter wwoofing
    if present(listing.host_winter_wwoofing_.as_deref()) == Some("1") {
        return false;
    }

    // HelpX: more than one helper
    if let Some(accommodation) = present(listing.listing_accommodation.as_deref()) {
        let accommodation = accommodation.trim();
        if accommodation == "1" || accommodation == "1 only" {
            return false;
        }
    }

    true
}
