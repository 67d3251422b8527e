use std::cmp::Ordering;

use crate::filter::Where;
use crate::models::{Listing, PublishedStatus};

entity_store!(ListingStore, Listing);

impl ListingStore {
    /// Replace the stored listing with the same id, including the current item
    pub fn update_listing(&mut self, listing: Listing) -> bool {
        self.update_item(&listing.id.clone(), |stored| *stored = listing.clone())
    }

    pub fn increment_likes(&mut self, id: &str) -> bool {
        self.update_item(id, |listing| listing.likes_count += 1)
    }

    /// Fold a new review rating into the running average
    pub fn update_rating(&mut self, id: &str, rating: f64) -> bool {
        self.update_item(id, |listing| {
            let count = f64::from(listing.review_count);
            listing.average_rating = Some(match listing.average_rating {
                Some(average) => (average * count + rating) / (count + 1.0),
                None => rating,
            });
            listing.review_count += 1;
        })
    }

    pub fn published(&self) -> Vec<&Listing> {
        self.items()
            .iter()
            .filter(|l| l.published_status == PublishedStatus::Active && l.enabled)
            .collect()
    }

    pub fn featured(&self) -> Vec<&Listing> {
        self.find(Where::new().eq("featured", true).eq("is_active", true))
    }

    pub fn by_provider(&self, provider_id: &str) -> Vec<&Listing> {
        self.find(Where::new().eq("provider_id", provider_id))
    }

    pub fn by_user(&self, user_id: &str) -> Vec<&Listing> {
        self.find(Where::new().eq("user_id", user_id))
    }

    pub fn by_category(&self, category: &str) -> Vec<&Listing> {
        self.find(Where::new().eq("category", category).eq("is_active", true))
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Listing> {
        self.find(Where::new().eq("slug", slug)).into_iter().next()
    }

    pub fn search_listings(&self, query: &str) -> Vec<&Listing> {
        self.search(query, Some(&["title", "description"]))
    }

    /// Rated, enabled listings, best first
    pub fn top_rated(&self, limit: usize) -> Vec<&Listing> {
        let mut rated: Vec<_> = self
            .items()
            .iter()
            .filter(|l| l.enabled && l.average_rating.is_some())
            .collect();
        rated.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(Ordering::Equal)
        });
        rated.truncate(limit);
        rated
    }

    pub fn most_liked(&self, limit: usize) -> Vec<&Listing> {
        let mut liked: Vec<_> = self.items().iter().filter(|l| l.enabled).collect();
        liked.sort_by(|a, b| b.likes_count.cmp(&a.likes_count));
        liked.truncate(limit);
        liked
    }
}
