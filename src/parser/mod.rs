pub mod classify;
pub mod dedup;
pub mod filter;
pub mod links;

use tracing::{debug, trace};

use crate::catalog::Entity;
use crate::rules::Rules;
use classify::Verdict;

/// Four-stage pipeline: markup → link pairs → filtered → classified → deduped and sorted.
pub fn process_document(doc: &str, base_url: &str, rules: &Rules) -> Vec<Entity> {
    let pairs = links::extract(doc);
    let found = pairs.len();

    let mut entities = Vec::new();
    for pair in pairs {
        if let Some(why) = filter::exclusion(&pair, rules) {
            debug!(href = %pair.href, title = %pair.title, reason = %why, "excluded link");
            continue;
        }
        match classify::classify(&pair.title, rules) {
            Verdict::Accepted(_) => entities.push(Entity {
                url: format!("{}{}", base_url, pair.href),
                name: pair.title,
            }),
            Verdict::Rejected(why) => {
                trace!(title = %pair.title, reason = ?why, "not an entity");
            }
        }
    }

    let classified = entities.len();
    let out = dedup::dedup_and_sort(entities);
    debug!(links = found, classified, unique = out.len(), "document processed");
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://old-wiki.warthunder.com";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn p51_and_category() {
        let doc = r#"href="/P-51" title="P-51"
href="/Category:USA" title="Category""#;
        let out = process_document(doc, BASE, &Rules::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to_line(), "P-51|https://old-wiki.warthunder.com/P-51");
    }

    #[test]
    fn mariner_url_stays_encoded() {
        let doc = r#"href="/PBM-1_%22Mariner%22" title="PBM-1 \"Mariner\"""#;
        let out = process_document(doc, BASE, &Rules::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, r#"PBM-1 "Mariner""#);
        assert_eq!(out[0].url, format!("{}/PBM-1_%22Mariner%22", BASE));
    }

    #[test]
    fn idempotent() {
        let doc = fixture("usa");
        let rules = Rules::default();
        assert_eq!(
            process_document(&doc, BASE, &rules),
            process_document(&doc, BASE, &rules)
        );
    }

    #[test]
    fn usa_fixture() {
        let out = process_document(&fixture("usa"), BASE, &Rules::default());
        let names: Vec<_> = out.iter().map(|e| e.name.as_str()).collect();

        // Repeated links (SBD-3, A-4E Early, F-8E) appear once.
        assert_eq!(names.iter().filter(|n| **n == "F-8E").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "SBD-3").count(), 1);
        assert!(names.contains(&"PBY-5 Catalina"));
        assert!(names.contains(&"Galer's F3F-2"));

        // Chrome links are gone.
        assert!(names.iter().all(|n| !n.to_lowercase().contains("category")));
        assert!(!names.contains(&"Main Page"));
        assert!(!names.contains(&"Random page"));

        for w in out.windows(2) {
            assert!(w[0].name.to_lowercase() <= w[1].name.to_lowercase());
        }
        let urls: std::collections::HashSet<_> = out.iter().map(|e| &e.url).collect();
        assert_eq!(urls.len(), out.len());
    }

    #[test]
    fn israel_fixture() {
        let out = process_document(&fixture("israel"), BASE, &Rules::default());
        let names: Vec<_> = out.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"Kurnass 2000"));
        assert!(names.contains(&"F-15I Ra'am"));
        assert!(names.contains(&"Meteor F.8 (Israel)"));
        // Pure-alpha names outside the known list are dropped.
        assert!(!names.contains(&"Sakeen"));
        assert!(!names.contains(&"Nesher"));
    }

    #[test]
    fn swapped_rules_retarget_classifier() {
        use crate::rules::RuleSet;
        let rules = RuleSet {
            known_names: vec!["nesher".into(), "sakeen".into()],
            ..RuleSet::default()
        }
        .compile()
        .unwrap();
        let out = process_document(&fixture("israel"), BASE, &rules);
        let names: Vec<_> = out.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"Sakeen"));
        assert!(names.contains(&"Nesher"));
        assert!(!names.contains(&"Netz"));
    }

    #[test]
    fn empty_document() {
        assert!(process_document("", BASE, &Rules::default()).is_empty());
        assert!(process_document("<html>no links</html>", BASE, &Rules::default()).is_empty());
    }
}
