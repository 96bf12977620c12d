use crate::index::InvertedIndex;
use std::collections::HashMap;
use url::Url;

/// One ranked result of a keyword query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: Url,
    /// Total postings for this URL across all query keywords
    pub hits: usize,
}

/// Ranks pages by how many postings they have across `keywords`
///
/// Postings for each keyword are gathered in keyword order. Each distinct URL
/// scores one point per posting; results are sorted by score, highest first,
/// and ties keep the order in which URLs were first seen.
pub fn search<S: AsRef<str>>(index: &InvertedIndex, keywords: &[S]) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = Vec::new();
    let mut positions: HashMap<Url, usize> = HashMap::new();

    for keyword in keywords {
        for item in index.get_items(keyword.as_ref()) {
            match positions.get(&item.url) {
                Some(&pos) => hits[pos].hits += 1,
                None => {
                    positions.insert(item.url.clone(), hits.len());
                    hits.push(SearchHit {
                        url: item.url,
                        hits: 1,
                    });
                }
            }
        }
    }

    // stable sort keeps first-seen order among equal scores
    hits.sort_by(|a, b| b.hits.cmp(&a.hits));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexItem;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_ranked_by_hit_count() {
        let index = InvertedIndex::new();
        index.add_item("cat", IndexItem::new(url("https://a.example/")));
        index.add_item("cat", IndexItem::new(url("https://a.example/")));
        index.add_item("dog", IndexItem::new(url("https://b.example/")));

        let results = search(&index, &["cat", "dog"]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, url("https://a.example/"));
        assert_eq!(results[0].hits, 2);
        assert_eq!(results[1].url, url("https://b.example/"));
        assert_eq!(results[1].hits, 1);
    }

    #[test]
    fn test_hits_accumulate_across_keywords() {
        let index = InvertedIndex::new();
        index.add_item("cat", IndexItem::new(url("https://b.example/")));
        index.add_item("cat", IndexItem::new(url("https://a.example/")));
        index.add_item("dog", IndexItem::new(url("https://a.example/")));

        let results = search(&index, &["cat", "dog"]);
        assert_eq!(results[0].url, url("https://a.example/"));
        assert_eq!(results[0].hits, 2);
        assert_eq!(results[1].hits, 1);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let index = InvertedIndex::new();
        index.add_item("x", IndexItem::new(url("https://first.example/")));
        index.add_item("x", IndexItem::new(url("https://second.example/")));
        index.add_item("x", IndexItem::new(url("https://third.example/")));

        let order: Vec<String> = search(&index, &["X"])
            .into_iter()
            .map(|h| h.url.to_string())
            .collect();
        assert_eq!(
            order,
            vec![
                "https://first.example/",
                "https://second.example/",
                "https://third.example/"
            ]
        );
    }

    #[test]
    fn test_unknown_keywords() {
        let index = InvertedIndex::new();
        assert!(search(&index, &["nothing"]).is_empty());
        assert!(search::<&str>(&index, &[]).is_empty());
    }
}
