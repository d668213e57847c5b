// src/actions/generators.rs

//! Synthetic-data generators, grouped faker-style as `category.function`.

use chrono::{Duration as ChronoDuration, Utc};
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::{Value, json};

/// A single generator function.
pub type GeneratorFn = fn(&mut dyn RngCore) -> Value;

/// A named group of generator functions.
#[derive(Debug)]
pub struct GeneratorGroup {
    pub name: &'static str,
    functions: &'static [(&'static str, GeneratorFn)],
}

impl GeneratorGroup {
    pub fn function(&self, name: &str) -> Option<GeneratorFn> {
        self.functions
            .iter()
            .find(|(fname, _)| *fname == name)
            .map(|(_, f)| *f)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.iter().map(|(name, _)| *name)
    }
}

/// Lookup table of every known generator group.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorCatalog {
    groups: &'static [GeneratorGroup],
}

impl Default for GeneratorCatalog {
    fn default() -> Self {
        Self { groups: GROUPS }
    }
}

impl GeneratorCatalog {
    pub fn group(&self, category: &str) -> Option<&'static GeneratorGroup> {
        self.groups.iter().find(|g| g.name == category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &'static str> {
        self.groups.iter().map(|g| g.name)
    }
}

const FIRST_NAMES: &[&str] = &[
    "Ann", "Ben", "Carla", "Dmitri", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas",
    "Keiko", "Liam", "Maya", "Noor", "Oscar", "Priya",
];
const LAST_NAMES: &[&str] = &[
    "Andersen", "Brown", "Costa", "Dubois", "Evans", "Fischer", "Garcia", "Hansen", "Ito",
    "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura", "Olsen", "Patel",
];
const JOB_TITLES: &[&str] = &[
    "Engineer", "Analyst", "Designer", "Manager", "Consultant", "Architect", "Planner",
];
const DOMAINS: &[&str] = &["example.com", "example.net", "example.org", "test.io"];
const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "labore", "magna", "aliqua",
];
const CITIES: &[&str] = &[
    "Oslo", "Lisbon", "Toronto", "Osaka", "Nairobi", "Lima", "Krakow", "Austin",
];
const COUNTRIES: &[&str] = &[
    "Norway", "Portugal", "Canada", "Japan", "Kenya", "Peru", "Poland", "United States",
];
const STREETS: &[&str] = &["Main St", "Oak Avenue", "Harbor Road", "Mill Lane", "Park Way"];
const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "and Sons", "Labs"];

fn pick(rng: &mut dyn RngCore, items: &[&str]) -> String {
    items.choose(rng).copied().unwrap_or_default().to_string()
}

fn first_name(rng: &mut dyn RngCore) -> Value {
    json!(pick(rng, FIRST_NAMES))
}

fn last_name(rng: &mut dyn RngCore) -> Value {
    json!(pick(rng, LAST_NAMES))
}

fn full_name(rng: &mut dyn RngCore) -> Value {
    json!(format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)))
}

fn job_title(rng: &mut dyn RngCore) -> Value {
    json!(pick(rng, JOB_TITLES))
}

fn user_name(rng: &mut dyn RngCore) -> Value {
    let first = pick(rng, FIRST_NAMES).to_lowercase();
    let n: u16 = rng.gen_range(1..1000);
    json!(format!("{first}{n}"))
}

fn email(rng: &mut dyn RngCore) -> Value {
    let first = pick(rng, FIRST_NAMES).to_lowercase();
    let last = pick(rng, LAST_NAMES).to_lowercase();
    json!(format!("{first}.{last}@{}", pick(rng, DOMAINS)))
}

fn domain_name(rng: &mut dyn RngCore) -> Value {
    json!(pick(rng, DOMAINS))
}

fn url(rng: &mut dyn RngCore) -> Value {
    json!(format!("https://{}/{}", pick(rng, DOMAINS), pick(rng, WORDS)))
}

fn ip(rng: &mut dyn RngCore) -> Value {
    let octets: Vec<String> = (0..4).map(|_| rng.gen_range(1..=254u8).to_string()).collect();
    json!(octets.join("."))
}

fn password(rng: &mut dyn RngCore) -> Value {
    let s: String = (0..15).map(|_| char::from(rng.sample(Alphanumeric))).collect();
    json!(s)
}

fn number(rng: &mut dyn RngCore) -> Value {
    json!(rng.gen_range(0..=99_999u32))
}

fn float(rng: &mut dyn RngCore) -> Value {
    let cents: u32 = rng.gen_range(0..=9_999_999);
    json!(f64::from(cents) / 100.0)
}

fn boolean(rng: &mut dyn RngCore) -> Value {
    json!(rng.gen_bool(0.5))
}

fn uuid_v4(_rng: &mut dyn RngCore) -> Value {
    json!(uuid::Uuid::new_v4().to_string())
}

fn alpha_numeric(rng: &mut dyn RngCore) -> Value {
    let s: String = (0..8).map(|_| char::from(rng.sample(Alphanumeric))).collect();
    json!(s)
}

fn word(rng: &mut dyn RngCore) -> Value {
    json!(pick(rng, WORDS))
}

fn words(rng: &mut dyn RngCore) -> Value {
    let ws: Vec<String> = (0..3).map(|_| pick(rng, WORDS)).collect();
    json!(ws.join(" "))
}

fn sentence(rng: &mut dyn RngCore) -> Value {
    let count = rng.gen_range(4..9);
    let mut ws: Vec<String> = (0..count).map(|_| pick(rng, WORDS)).collect();
    if let Some(first) = ws.first_mut() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            *first = c.to_uppercase().chain(chars).collect();
        }
    }
    json!(format!("{}.", ws.join(" ")))
}

fn city(rng: &mut dyn RngCore) -> Value {
    json!(pick(rng, CITIES))
}

fn country(rng: &mut dyn RngCore) -> Value {
    json!(pick(rng, COUNTRIES))
}

fn zip_code(rng: &mut dyn RngCore) -> Value {
    json!(format!("{:05}", rng.gen_range(0..100_000u32)))
}

fn street_address(rng: &mut dyn RngCore) -> Value {
    json!(format!("{} {}", rng.gen_range(1..2000u32), pick(rng, STREETS)))
}

fn phone_number(rng: &mut dyn RngCore) -> Value {
    json!(format!(
        "{:03}-{:03}-{:04}",
        rng.gen_range(200..1000u32),
        rng.gen_range(0..1000u32),
        rng.gen_range(0..10_000u32)
    ))
}

fn company_name(rng: &mut dyn RngCore) -> Value {
    json!(format!("{} {}", pick(rng, LAST_NAMES), pick(rng, COMPANY_SUFFIXES)))
}

fn date_past(rng: &mut dyn RngCore) -> Value {
    let secs = rng.gen_range(1..365 * 24 * 3600i64);
    json!((Utc::now() - ChronoDuration::seconds(secs)).to_rfc3339())
}

fn date_future(rng: &mut dyn RngCore) -> Value {
    let secs = rng.gen_range(1..365 * 24 * 3600i64);
    json!((Utc::now() + ChronoDuration::seconds(secs)).to_rfc3339())
}

fn date_recent(rng: &mut dyn RngCore) -> Value {
    let secs = rng.gen_range(1..24 * 3600i64);
    json!((Utc::now() - ChronoDuration::seconds(secs)).to_rfc3339())
}

static GROUPS: &[GeneratorGroup] = &[
    GeneratorGroup {
        name: "name",
        functions: &[
            ("firstName", first_name),
            ("lastName", last_name),
            ("findName", full_name),
            ("jobTitle", job_title),
        ],
    },
    GeneratorGroup {
        name: "internet",
        functions: &[
            ("email", email),
            ("userName", user_name),
            ("domainName", domain_name),
            ("url", url),
            ("ip", ip),
            ("password", password),
        ],
    },
    GeneratorGroup {
        name: "datatype",
        functions: &[
            ("number", number),
            ("float", float),
            ("boolean", boolean),
            ("uuid", uuid_v4),
        ],
    },
    GeneratorGroup {
        name: "random",
        functions: &[("alphaNumeric", alpha_numeric), ("word", word)],
    },
    GeneratorGroup {
        name: "lorem",
        functions: &[("word", word), ("words", words), ("sentence", sentence)],
    },
    GeneratorGroup {
        name: "address",
        functions: &[
            ("city", city),
            ("country", country),
            ("zipCode", zip_code),
            ("streetAddress", street_address),
        ],
    },
    GeneratorGroup {
        name: "phone",
        functions: &[("phoneNumber", phone_number)],
    },
    GeneratorGroup {
        name: "company",
        functions: &[("companyName", company_name)],
    },
    GeneratorGroup {
        name: "date",
        functions: &[("past", date_past), ("future", date_future), ("recent", date_recent)],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_function_produces_a_value() {
        let catalog = GeneratorCatalog::default();
        let mut rng = rand::thread_rng();
        for category in catalog.categories() {
            let group = catalog.group(category).unwrap();
            for name in group.function_names() {
                let f = group.function(name).unwrap();
                let value = f(&mut rng);
                assert!(!value.is_null(), "{category}.{name} produced null");
            }
        }
    }

    #[test]
    fn unknown_names_are_not_found() {
        let catalog = GeneratorCatalog::default();
        assert!(catalog.group("planets").is_none());
        assert!(catalog.group("name").unwrap().function("nickname").is_none());
    }

    #[test]
    fn typed_generators_keep_their_json_type() {
        let catalog = GeneratorCatalog::default();
        let mut rng = rand::thread_rng();
        let datatype = catalog.group("datatype").unwrap();
        assert!(datatype.function("number").unwrap()(&mut rng).is_u64());
        assert!(datatype.function("boolean").unwrap()(&mut rng).is_boolean());
        assert!(datatype.function("float").unwrap()(&mut rng).is_f64());
    }
}
