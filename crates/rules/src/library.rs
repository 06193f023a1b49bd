use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::RulesError;

// ============================================================================
// Table definitions
// ============================================================================

/// Raw lookup tables as stored in `patterns.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternTables {
    pub version: String,
    /// Canonical street type -> accepted abbreviations.
    pub street_types: BTreeMap<String, Vec<String>>,
    pub unit_designators: Vec<String>,
    /// Two-letter abbreviation -> full state name.
    pub states: BTreeMap<String, String>,
    /// Canonical country name -> aliases.
    pub countries: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub prepositions: Vec<String>,
    #[serde(default)]
    pub zip_cues: Vec<String>,
    /// State abbreviations that double as credentials ("MD", "MS"); a bare
    /// `Name, ST` with one of these needs a ZIP to count.
    #[serde(default)]
    pub ambiguous_states: Vec<String>,
}

// Fragments shared by several families.
const STREET_NAME_WORD: &str = r"(?:[A-Z][A-Za-z'-]*\.?|\d+(?:st|nd|rd|th))";
const CITY: &str = r"[A-Z][A-Za-z.'-]*(?:[ \t]+[A-Z][A-Za-z.'-]*){0,3}";
// Lowercase words are allowed so leading prepositions can be stripped afterwards.
const LOOSE_CITY: &str = r"[A-Za-z][A-Za-z.'-]*(?:[ \t]+[A-Za-z][A-Za-z.'-]*){0,2}";
const ZIP: &str = r"\d{5}(?:-\d{4})?";

// ============================================================================
// Compiled library
// ============================================================================

/// Compiled pattern families plus the normalization tables they rely on.
///
/// Every field is immutable after construction; matching is done through
/// fresh iterators so one library can serve any number of concurrent scans.
#[derive(Debug)]
pub struct PatternLibrary {
    version: String,
    street_types: HashMap<String, String>,
    countries: HashMap<String, String>,
    prepositions: HashSet<String>,
    zip_cues: Vec<String>,
    ambiguous_states: HashSet<String>,

    // ===== US addresses =====
    pub full_address: Regex,
    pub po_box: Regex,
    /// Anchored; applied to the text right after a PO box match.
    pub po_box_locality: Regex,
    pub partial_street: Regex,
    pub city_state_abbrev: Regex,
    pub city_state_full: Regex,
    pub zip_code: Regex,
    /// Full state names alone; country mentions inside them are ignored.
    pub state_name: Regex,

    // ===== International =====
    pub country: Regex,
    pub uk_postcode: Regex,
    pub ca_postcode: Regex,
    pub street_number: Regex,
    pub street_type_word: Regex,

    // ===== Traditional PII =====
    pub email: Regex,
    pub phone: Regex,
    pub ssn: Regex,

    // ===== Disambiguation only =====
    pub date: Regex,
    pub local_phone: Regex,
}

impl PatternLibrary {
    /// Parse tables from JSON and compile them.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let tables: PatternTables = serde_json::from_str(json)?;
        Self::from_tables(&tables)
    }

    pub fn from_tables(tables: &PatternTables) -> Result<Self, RulesError> {
        if tables.street_types.is_empty() {
            return Err(RulesError::EmptyTable("street_types"));
        }
        if tables.unit_designators.is_empty() {
            return Err(RulesError::EmptyTable("unit_designators"));
        }
        if tables.states.is_empty() {
            return Err(RulesError::EmptyTable("states"));
        }
        if tables.countries.is_empty() {
            return Err(RulesError::EmptyTable("countries"));
        }

        let mut street_types = HashMap::new();
        let mut street_words = Vec::new();
        for (canonical, abbreviations) in &tables.street_types {
            street_types.insert(canonical.to_lowercase(), canonical.clone());
            street_words.push(canonical.as_str());
            for abbr in abbreviations {
                street_types.insert(abbr.to_lowercase(), canonical.clone());
                street_words.push(abbr.as_str());
            }
        }

        let mut countries = HashMap::new();
        for (canonical, aliases) in &tables.countries {
            countries.insert(canonical.clone(), canonical.clone());
            for alias in aliases {
                countries.insert(alias.clone(), canonical.clone());
            }
        }

        let street = alternation(street_types.keys().map(String::as_str));
        // Capitalized only: "drive" or "way" in prose is not an address hint.
        let street_capitalized = alternation(street_words.into_iter());
        let unit = alternation(tables.unit_designators.iter().map(String::as_str));
        let state_abbrev = alternation(tables.states.keys().map(String::as_str));
        let state_full = alternation(tables.states.values().map(String::as_str));
        let country = alternation(countries.keys().map(String::as_str));

        let street_name = format!("{w}(?:[ \\t]+{w}){{0,3}}", w = STREET_NAME_WORD);
        let unit_group = format!(
            r"(?P<unit>(?i:{unit})\b\.?[ \t]*#?[ \t]*[A-Za-z0-9-]+|#[ \t]*[A-Za-z0-9-]+)"
        );

        let full_address = format!(
            r"\b(?P<number>\d{{1,6}})[ \t]+(?P<name>{street_name})[ \t]+(?P<type>(?i:{street}))\b\.?(?:[ \t]*,?[ \t]*{unit_group})?\s*,\s*(?P<city>{CITY})\s*,\s*(?P<state>{state_abbrev})[ \t]+(?P<zip>{ZIP})\b"
        );
        let partial_street = format!(
            r"\b(?P<number>\d{{1,6}})[ \t]+(?P<name>{street_name})[ \t]+(?P<type>(?i:{street}))\b\.?"
        );
        let po_box = r"\b(?i:P\.?[ \t]?O\.?[ \t]*Box|Post[ \t]+Office[ \t]+Box|PMB)[ \t]*#?[ \t]*(?P<number>\d{1,10})\b".to_string();
        let po_box_locality = format!(
            r"^\s*,?\s*(?P<city>{CITY})\s*,\s*(?P<state>{state_abbrev})\b(?:[ \t]+(?P<zip>{ZIP})\b)?"
        );
        let city_state_abbrev = format!(
            r"\b(?P<city>{LOOSE_CITY})\s*,\s*(?P<state>{state_abbrev})\b(?:[ \t]+(?P<zip>{ZIP})\b)?"
        );
        let city_state_full = format!(
            r"\b(?P<city>{LOOSE_CITY})\s*,\s*(?P<state>{state_full})\b(?:[ \t]+(?P<zip>{ZIP})\b)?"
        );

        log::debug!(
            "[Rules] compiling pattern library v{} ({} street types, {} states, {} countries)",
            tables.version,
            tables.street_types.len(),
            tables.states.len(),
            tables.countries.len()
        );

        Ok(Self {
            version: tables.version.clone(),
            full_address: Regex::new(&full_address)?,
            po_box: Regex::new(&po_box)?,
            po_box_locality: Regex::new(&po_box_locality)?,
            partial_street: Regex::new(&partial_street)?,
            city_state_abbrev: Regex::new(&city_state_abbrev)?,
            city_state_full: Regex::new(&city_state_full)?,
            zip_code: Regex::new(&format!(r"\b(?P<zip>{ZIP})\b"))?,
            state_name: Regex::new(&format!(r"\b(?:{state_full})\b"))?,
            country: Regex::new(&format!(r"\b(?:{country})\b"))?,
            uk_postcode: Regex::new(r"\b[A-Z]{1,2}\d[A-Z\d]?[ \t]*\d[A-Z]{2}\b")?,
            ca_postcode: Regex::new(r"\b[ABCEGHJ-NPRSTVXY]\d[A-Z][ \t]?\d[A-Z]\d\b")?,
            street_number: Regex::new(r"\b\d{1,5}\b")?,
            street_type_word: Regex::new(&format!(r"\b(?:{street_capitalized})\b"))?,
            email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            phone: Regex::new(r"\(\d{3}\)[ \t]?\d{3}-\d{4}\b|\b\d{3}-\d{3}-\d{4}\b|\b\d{10}\b")?,
            ssn: Regex::new(r"\b\d{3}-\d{2}-\d{4}\b")?,
            date: Regex::new(r"\b(?:\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{2}-\d{2})\b")?,
            local_phone: Regex::new(r"\b\d{3}-\d{4}\b")?,
            street_types,
            countries,
            prepositions: tables
                .prepositions
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            zip_cues: tables.zip_cues.iter().map(|c| c.to_lowercase()).collect(),
            ambiguous_states: tables.ambiguous_states.iter().cloned().collect(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Map an abbreviation such as `St.` or `blvd` to its canonical form.
    ///
    /// Unknown words are returned trimmed but otherwise untouched.
    pub fn normalize_street_type(&self, raw: &str) -> String {
        let key = raw.trim().trim_end_matches('.').to_lowercase();
        match self.street_types.get(&key) {
            Some(canonical) => canonical.clone(),
            None => raw.trim().to_string(),
        }
    }

    /// Canonical country for a name or alias exactly as it matched.
    pub fn canonical_country(&self, mention: &str) -> Option<&str> {
        self.countries.get(mention).map(String::as_str)
    }

    pub fn is_preposition(&self, word: &str) -> bool {
        self.prepositions.contains(&word.to_lowercase())
    }

    pub fn is_ambiguous_state(&self, abbreviation: &str) -> bool {
        self.ambiguous_states.contains(abbreviation)
    }

    /// Lowercase phrases that must precede a bare ZIP code.
    pub fn zip_cues(&self) -> &[String] {
        &self.zip_cues
    }
}

/// Build a regex alternation, longest alternative first so that e.g.
/// `Street` is preferred over `St`.
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut escaped: Vec<String> = words
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    escaped.join("|")
}
