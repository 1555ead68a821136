use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Policy data for the exclusion filter and the name classifier.
///
/// Every list is matched case-insensitively as a substring. Omitted fields in a
/// config file fall back to the wiki aircraft defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Namespace / system path fragments rejected in the href.
    pub href_markers: Vec<String>,
    /// Navigation and UI chrome fragments rejected in the title.
    pub title_phrases: Vec<String>,
    /// Index, guide and policy page fragments rejected by the classifier.
    pub skip_phrases: Vec<String>,
    /// Name fragments that admit a title with no digit or hyphen.
    pub known_names: Vec<String>,
    /// Designation shapes, tried in order, anchored at the start of the title.
    pub designations: Vec<String>,
}

const HREF_MARKERS: &[&str] = &[
    "category:",
    "help:",
    "special:",
    "file:",
    "template:",
    "user:",
    "talk:",
    "index.php",
    "aviation",
    "ground_vehicles",
    "fleet",
    "main_page",
    "recent_changes",
    "random",
    "whatlinkshere",
    "recentchangeslinked",
    "specialpages",
    "printable",
    "images/",
    "resources/",
];

const TITLE_PHRASES: &[&str] = &[
    "category",
    "discussion",
    "view source",
    "view history",
    "aviation",
    "ground vehicles",
    "fleet",
    "helicopters",
    "help",
    "navigation",
    "recent changes",
    "random page",
    "what links here",
    "related changes",
    "special pages",
    "printable version",
    "permanent link",
    "page information",
];

const EXTRA_SKIP_PHRASES: &[&str] = &[
    "tutorial",
    "guide",
    "book of records",
    "climbing the ranks",
    "media",
    "grumman aircraft",
    "american air forces",
    "pages in category",
    "terms and conditions",
    "privacy policy",
    "contribution agreement",
    "heinkel aircraft",
    "german aircraft",
];

const KNOWN_NAMES: &[&str] = &[
    "walrus", "osprey", "catalina", "mariner", "hurricane", "spitfire", "typhoon", "tempest",
    "mustang", "thunderbolt", "lightning", "meteor", "vampire", "venom", "hunter", "harrier",
    "jaguar", "tornado", "phantom", "eagle", "falcon", "hornet", "tomcat", "corsair", "hellcat",
    "wildcat", "bearcat", "skyraider", "skyhawk", "intruder", "prowler", "viking", "hawkeye",
    "greyhound", "seahawk", "super", "sabre", "starfighter", "freedom", "fighting", "crusader",
    "vigilante", "fury", "gladiator", "nimrod", "swordfish", "hampden", "blenheim", "beaufort",
    "wellington", "lancaster", "stirling", "halifax", "mosquito", "beaufighter", "firefly",
    "seafire", "wyvern", "attacker", "scimitar", "buccaneer", "canberra", "javelin", "swift",
    "vixen", "strikemaster", "firecrest", "brigand",
];

const DESIGNATIONS: &[&str] = &[
    r"[A-Z]-\d+",         // F-16, A-10
    r"[A-Z]\d+[A-Z]?",    // P51, F4U
    r"[A-Z]{2,3}-\d+",    // SBD-3, PBY-5
    r"\w+\s+Mk\s+\w+",    // Spitfire Mk IX
    r"[A-Z][a-z]\s+\d+",  // Bf 109, He 111
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        let mut skip_phrases = owned(TITLE_PHRASES);
        skip_phrases.extend(owned(EXTRA_SKIP_PHRASES));
        RuleSet {
            href_markers: owned(HREF_MARKERS),
            title_phrases: owned(TITLE_PHRASES),
            skip_phrases,
            known_names: owned(KNOWN_NAMES),
            designations: owned(DESIGNATIONS),
        }
    }
}

impl RuleSet {
    /// Lower-case the literal lists and compile the designation patterns.
    pub fn compile(&self) -> Result<Rules, CatalogError> {
        let designations = self
            .designations
            .iter()
            .map(|p| {
                Regex::new(&format!("^(?:{})", p)).map_err(|e| CatalogError::Rules {
                    pattern: p.clone(),
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Rules {
            href_markers: lowered(&self.href_markers),
            title_phrases: lowered(&self.title_phrases),
            skip_phrases: lowered(&self.skip_phrases),
            known_names: lowered(&self.known_names),
            designations,
        })
    }
}

fn lowered(list: &[String]) -> Vec<String> {
    list.iter()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A compiled [`RuleSet`], ready for matching.
#[derive(Debug, Clone)]
pub struct Rules {
    pub href_markers: Vec<String>,
    pub title_phrases: Vec<String>,
    pub skip_phrases: Vec<String>,
    pub known_names: Vec<String>,
    pub designations: Vec<Regex>,
}

impl Default for Rules {
    fn default() -> Self {
        RuleSet::default()
            .compile()
            .expect("built-in designation patterns are valid")
    }
}

/// First fragment of `list` found inside `lower`.
pub fn find_fragment<'a>(list: &'a [String], lower: &str) -> Option<&'a str> {
    list.iter().map(String::as_str).find(|f| lower.contains(f))
}
