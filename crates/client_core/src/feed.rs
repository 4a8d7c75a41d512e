use std::collections::BTreeSet;

use shared::{
    domain::{Category, PostId},
    protocol::PostSummary,
};

pub const POPULAR_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedView {
    #[default]
    Home,
    Popular,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    pub view: FeedView,
    pub category: CategoryFilter,
    pub search: String,
}

impl FeedFilter {
    /// Picking a category always returns to the home view.
    pub fn select_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.view = FeedView::Home;
    }

    /// Leaving home resets the category filter.
    pub fn select_view(&mut self, view: FeedView) {
        self.view = view;
        if view != FeedView::Home {
            self.category = CategoryFilter::All;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SavedPosts {
    ids: BTreeSet<PostId>,
}

impl SavedPosts {
    /// Returns true when the post is saved after the call.
    pub fn toggle(&mut self, post_id: PostId) -> bool {
        if self.ids.remove(&post_id) {
            false
        } else {
            self.ids.insert(post_id);
            true
        }
    }

    pub fn contains(&self, post_id: PostId) -> bool {
        self.ids.contains(&post_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn matches_search(post: &PostSummary, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    post.title.to_lowercase().contains(query) || post.excerpt.to_lowercase().contains(query)
}

pub fn filter_posts<'a>(
    posts: &'a [PostSummary],
    filter: &FeedFilter,
    saved: &SavedPosts,
) -> Vec<&'a PostSummary> {
    let query = filter.search.trim().to_lowercase();
    let mut results: Vec<&PostSummary> = posts
        .iter()
        .filter(|post| matches_search(post, &query))
        .collect();

    match filter.view {
        FeedView::Saved => results.retain(|post| saved.contains(post.id)),
        FeedView::Popular => {
            results.sort_by(|a, b| b.likes.cmp(&a.likes));
            results.truncate(POPULAR_LIMIT);
        }
        FeedView::Home => {
            if let CategoryFilter::Only(category) = filter.category {
                results.retain(|post| post.category() == Some(category));
            }
        }
    }

    results
}

pub fn category_counts(posts: &[PostSummary]) -> Vec<(Category, usize)> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let count = posts
                .iter()
                .filter(|post| post.category() == Some(category))
                .count();
            (category, count)
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
