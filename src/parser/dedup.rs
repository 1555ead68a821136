use std::collections::HashSet;

use crate::catalog::Entity;

/// Keep the first entity seen for each URL, then order by case-insensitive name.
///
/// The sort is stable, so equal names keep their first-seen order.
pub fn dedup_and_sort(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Entity> = entities
        .into_iter()
        .filter(|e| seen.insert(e.url.clone()))
        .collect();
    unique.sort_by_cached_key(|e| e.name.to_lowercase());
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(name: &str, url: &str) -> Entity {
        Entity {
            name: name.into(),
            url: url.into(),
        }
    }

    #[test]
    fn first_seen_name_wins() {
        let out = dedup_and_sort(vec![
            e("A-4E Early", "https://w/A-4E_Early"),
            e("a-4e early", "https://w/A-4E_Early"),
        ]);
        assert_eq!(out, vec![e("A-4E Early", "https://w/A-4E_Early")]);
    }

    #[test]
    fn case_insensitive_order() {
        let out = dedup_and_sort(vec![
            e("b-2", "https://w/b"),
            e("A-1", "https://w/a"),
            e("C-3", "https://w/c"),
        ]);
        let names: Vec<_> = out.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["A-1", "b-2", "C-3"]);
    }

    #[test]
    fn equal_names_keep_relative_order() {
        let out = dedup_and_sort(vec![
            e("F-8E", "https://w/F-8E_2"),
            e("A-1", "https://w/a"),
            e("f-8e", "https://w/F-8E_1"),
        ]);
        assert_eq!(out[1].url, "https://w/F-8E_2");
        assert_eq!(out[2].url, "https://w/F-8E_1");
    }
}
