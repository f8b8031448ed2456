use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ContentItem;

/// the landing page hides anything thinner than this
pub const LANDING_MIN_GENRE_ITEMS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreBucket {
    pub genre: String,
    pub items: Vec<ContentItem>,
}

/// merge lists, drop repeats of the same subject id (first one wins) and keep order
pub fn merge_unique(lists: &[Vec<ContentItem>]) -> Vec<ContentItem> {
    let mut seen = HashSet::new();

    lists
        .iter()
        .flatten()
        .filter(|item| !item.id.is_empty() && seen.insert(item.id.clone()))
        .cloned()
        .collect()
}

/// buckets merged items by genre, a bucket survives with at least `min_items` distinct subjects
///
/// largest buckets first, ties broken by genre name so the output is stable
pub fn group_by_genre(lists: &[Vec<ContentItem>], min_items: usize) -> Vec<GenreBucket> {
    let mut buckets: HashMap<String, Vec<ContentItem>> = HashMap::new();

    for item in merge_unique(lists) {
        // "Drama,Drama" happens upstream, don't put the same item in a bucket twice
        let mut genres: Vec<&String> = item.genres.iter().collect();
        genres.sort();
        genres.dedup();

        for genre in genres {
            buckets
                .entry(genre.clone())
                .or_insert_with(Vec::new)
                .push(item.clone());
        }
    }

    let mut grouped: Vec<GenreBucket> = buckets
        .into_iter()
        .filter(|(_, items)| items.len() >= min_items)
        .map(|(genre, items)| GenreBucket { genre, items })
        .collect();

    grouped.sort_by(|a, b| {
        b.items
            .len()
            .cmp(&a.items.len())
            .then_with(|| a.genre.cmp(&b.genre))
    });

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, genres: &[&str]) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            title: format!("title {}", id),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_drops_genres_under_three_items() {
        let lists = vec![vec![
            item("1", &["Action"]),
            item("2", &["Action", "Comedy"]),
            item("3", &["Action"]),
            item("4", &["Comedy"]),
        ]];

        let grouped = group_by_genre(&lists, LANDING_MIN_GENRE_ITEMS);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].genre, "Action");
        assert_eq!(grouped[0].items.len(), 3);
    }

    #[test]
    fn test_duplicates_across_lists_count_once() {
        // the same two subjects show up in home and trending, that's still only two
        let lists = vec![
            vec![item("1", &["Horror"]), item("2", &["Horror"])],
            vec![item("1", &["Horror"]), item("2", &["Horror"])],
        ];

        let grouped = group_by_genre(&lists, LANDING_MIN_GENRE_ITEMS);

        assert!(grouped.is_empty());
    }

    #[test]
    fn test_first_occurrence_wins_on_merge() {
        let mut later = item("1", &["Drama"]);
        later.title = "later".to_string();
        let lists = vec![vec![item("1", &["Drama"])], vec![later, item("2", &["Drama"])]];

        let merged = merge_unique(&lists);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "title 1");
    }

    #[test]
    fn test_orders_by_size_then_name() {
        let lists = vec![vec![
            item("1", &["Drama", "Crime", "War"]),
            item("2", &["Drama", "Crime", "War"]),
            item("3", &["Drama", "Crime", "War"]),
            item("4", &["Drama"]),
        ]];

        let grouped = group_by_genre(&lists, LANDING_MIN_GENRE_ITEMS);
        let names: Vec<&str> = grouped.iter().map(|b| b.genre.as_str()).collect();

        assert_eq!(names, vec!["Drama", "Crime", "War"]);
    }

    #[test]
    fn test_repeated_genre_on_one_item_counts_once() {
        let lists = vec![vec![
            item("1", &["Drama", "Drama"]),
            item("2", &["Drama"]),
        ]];

        let grouped = group_by_genre(&lists, 2);

        assert_eq!(grouped[0].items.len(), 2);
    }
}
