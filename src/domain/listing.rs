// src/domain/listing.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// Persisted field names, as the portal scrapers emit them.
pub const FIELD_SOURCE: &str = "Portail";
pub const FIELD_ADDRESS: &str = "Adresse";
pub const FIELD_ROOMS: &str = "Pieces";
pub const FIELD_AREA: &str = "Surface m²";
pub const FIELD_RENT: &str = "Loyer CHF";

const SOURCE_KEYS: &[&str] = &[FIELD_SOURCE, "source"];
const ADDRESS_KEYS: &[&str] = &[FIELD_ADDRESS, "address"];
const ROOMS_KEYS: &[&str] = &[FIELD_ROOMS, "Pièces", "rooms"];
const AREA_KEYS: &[&str] = &[FIELD_AREA, "Surface", "area"];
const RENT_KEYS: &[&str] = &[FIELD_RENT, "Loyer", "rent"];

/// The portal a listing was observed on.
///
/// The set is open: labels we don't recognise are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    ImmoScout24,
    Homegate,
    Other(String),
}

impl Source {
    pub fn label(&self) -> &str {
        match self {
            Source::ImmoScout24 => "ImmoScout24",
            Source::Homegate => "Homegate.ch",
            Source::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "immoscout24" | "immoscout24.ch" => Source::ImmoScout24,
            "homegate" | "homegate.ch" => Source::Homegate,
            _ => Source::Other(label.to_string()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One observed rental unit.
///
/// `rent`, `rooms` and `area` keep the raw portal text ("1'450.-", "2,5");
/// numbers are re-derived whenever a stage needs them. Everything the core
/// does not interpret lives in `extra`, in its original order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, Value>",
    into = "IndexMap<String, String>"
)]
pub struct Listing {
    pub source: Source,
    pub address: String,
    pub rent: String,
    pub rooms: String,
    pub area: Option<String>,
    pub extra: IndexMap<String, String>,
    layout: Layout,
}

// Core field slots, in the order `core_slot` resolves them.
const SLOT_SOURCE: usize = 0;
const SLOT_ADDRESS: usize = 1;
const SLOT_RENT: usize = 2;
const SLOT_ROOMS: usize = 3;
const SLOT_AREA: usize = 4;

const CANONICAL_KEYS: [&str; 5] = [FIELD_SOURCE, FIELD_ADDRESS, FIELD_RENT, FIELD_ROOMS, FIELD_AREA];

/// Where a loaded record kept its fields, so a save writes it back as read.
#[derive(Debug, Clone, Default)]
struct Layout {
    /// Key each core slot was read under; `None` if absent from the record.
    keys: [Option<String>; 5],
    /// Every key of the loaded record, in file order. Empty for new listings.
    order: Vec<String>,
    /// Portal label exactly as it was stored.
    source_text: Option<String>,
}

impl PartialEq for Listing {
    // Layout is presentation only.
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.address == other.address
            && self.rent == other.rent
            && self.rooms == other.rooms
            && self.area == other.area
            && self.extra == other.extra
    }
}

impl Listing {
    pub fn new(
        source: Source,
        address: impl Into<String>,
        rent: impl Into<String>,
        rooms: impl Into<String>,
    ) -> Self {
        let mut layout = Layout::default();
        for slot in [SLOT_SOURCE, SLOT_ADDRESS, SLOT_RENT, SLOT_ROOMS] {
            layout.keys[slot] = Some(CANONICAL_KEYS[slot].to_string());
        }
        Self {
            source,
            address: address.into(),
            rent: rent.into(),
            rooms: rooms.into(),
            area: None,
            extra: IndexMap::new(),
            layout,
        }
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    fn source_text(&self) -> String {
        match &self.layout.source_text {
            Some(text) if Source::from_label(text) == self.source => text.clone(),
            _ => self.source.label().to_string(),
        }
    }

    /// Core fields as (key, value), in the persisted order of new listings.
    ///
    /// A loaded record keeps the keys it was read under. A field missing from
    /// it is only written once it carries a value.
    fn core_fields(&self) -> Vec<(String, String)> {
        let values = [
            (SLOT_SOURCE, Some(self.source_text())),
            (SLOT_ADDRESS, Some(self.address.clone())),
            (SLOT_ROOMS, Some(self.rooms.clone())),
            (SLOT_AREA, self.area.clone()),
            (SLOT_RENT, Some(self.rent.clone())),
        ];

        values
            .into_iter()
            .filter_map(|(slot, value)| {
                let value = value?;
                match &self.layout.keys[slot] {
                    Some(key) => Some((key.clone(), value)),
                    None if slot == SLOT_AREA || !value.is_empty() => {
                        Some((CANONICAL_KEYS[slot].to_string(), value))
                    }
                    None => None,
                }
            })
            .collect()
    }

    /// Flat field view in persisted order.
    ///
    /// Loaded records come back in their file order under their own keys.
    /// New listings put the core fields first, then extras.
    pub fn to_fields(&self) -> IndexMap<String, String> {
        let core = self.core_fields();
        let mut fields = IndexMap::with_capacity(self.extra.len() + core.len());

        for key in &self.layout.order {
            if let Some((k, v)) = core.iter().find(|(k, _)| k == key) {
                fields.insert(k.clone(), v.clone());
            } else if let Some(v) = self.extra.get(key) {
                fields.insert(key.clone(), v.clone());
            }
        }
        for (k, v) in core {
            fields.entry(k).or_insert(v);
        }
        for (k, v) in &self.extra {
            // Core keys always win over an extra of the same name.
            fields.entry(k.clone()).or_insert_with(|| v.clone());
        }
        fields
    }
}

/// Stored values are meant to be strings, but hand-edited or older corpora
/// may carry numbers. Never fail on shape.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Which core field a persisted key feeds, if any.
fn core_slot(key: &str) -> Option<(usize, bool)> {
    [SOURCE_KEYS, ADDRESS_KEYS, RENT_KEYS, ROOMS_KEYS, AREA_KEYS]
        .iter()
        .enumerate()
        .find_map(|(slot, aliases)| {
            aliases
                .iter()
                .position(|alias| *alias == key)
                .map(|pos| (slot, pos == 0))
        })
}

impl From<IndexMap<String, Value>> for Listing {
    fn from(raw: IndexMap<String, Value>) -> Self {
        let order: Vec<String> = raw.keys().cloned().collect();
        // (key, value) per core field, indexed by slot.
        let mut slots: [Option<(String, String)>; 5] = Default::default();
        let mut extra = IndexMap::new();

        for (key, value) in raw {
            let value = value_to_string(value);
            let Some((slot, canonical)) = core_slot(&key) else {
                extra.insert(key, value);
                continue;
            };

            // Two keys for one field: the canonical name takes the field and
            // the other value is kept as an extra under its own key.
            match slots[slot].take() {
                None => slots[slot] = Some((key, value)),
                Some(previous) if canonical => {
                    extra.insert(previous.0, previous.1);
                    slots[slot] = Some((key, value));
                }
                Some(previous) => {
                    slots[slot] = Some(previous);
                    extra.insert(key, value);
                }
            }
        }

        let mut keys: [Option<String>; 5] = Default::default();
        let mut values: [Option<String>; 5] = Default::default();
        for (slot, entry) in slots.into_iter().enumerate() {
            if let Some((key, value)) = entry {
                keys[slot] = Some(key);
                values[slot] = Some(value);
            }
        }
        let [source, address, rent, rooms, area] = values;

        Listing {
            source: Source::from_label(source.as_deref().unwrap_or("")),
            address: address.unwrap_or_default(),
            rent: rent.unwrap_or_default(),
            rooms: rooms.unwrap_or_default(),
            area,
            extra,
            layout: Layout {
                keys,
                order,
                source_text: source,
            },
        }
    }
}

impl From<Listing> for IndexMap<String, String> {
    fn from(listing: Listing) -> Self {
        listing.to_fields()
    }
}
