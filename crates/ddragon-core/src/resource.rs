//! Resource type descriptors.
//!
//! One generic engine serves every resource type; the differences between
//! types (document filename, root shape, key/name/image fields, icon URL
//! shape, nested rune slots) live in a small descriptor table here instead
//! of per-type subclasses.

use serde::Serialize;

/// Shape of a document's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRoot {
    /// `{"data": {entryKey: entity, ...}}`: champions, summoner spells, items.
    Keyed,
    /// Top-level JSON array: rune trees.
    List,
}

/// How `get` resolves an entity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup {
    /// Direct lookup against the `data` map key (champion, item).
    EntryKey,
    /// Linear scan matching the named entity field (summoner `id`,
    /// rune tree `key`).
    Field(&'static str),
}

/// Where an entity's image filename lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef {
    /// Nested `image.full` field.
    Full,
    /// Flat `icon` field (rune trees and runes).
    Icon,
}

/// Per-type image URL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconUrl {
    /// `{root}/cdn/{version}/img/{segment}/{file}`. The segment usually
    /// matches the type name; summoner spells use `spell`.
    Versioned(&'static str),
    /// `{root}/cdn/img/{file}`; rune icons are published version-less.
    Unversioned,
}

/// Descriptor for one resource type.
///
/// The engine is parameterized entirely by this record; adding a new
/// resource type means adding a descriptor, not code.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    /// Type name used in paths (`upload/{v}/{name}_img`) and metadata.
    pub name: &'static str,
    /// Upstream document filename.
    pub json_filename: &'static str,
    pub data_root: DataRoot,
    pub lookup: KeyLookup,
    /// Display-name field used by search and sorted views.
    pub name_field: &'static str,
    pub image: ImageRef,
    pub icon_url: IconUrl,
    /// Rune trees nest `slots[] -> runes[]`, each with its own icon.
    pub nested_slots: bool,
}

const CHAMPION: ResourceSpec = ResourceSpec {
    name: "champion",
    json_filename: "champion.json",
    data_root: DataRoot::Keyed,
    lookup: KeyLookup::EntryKey,
    name_field: "name",
    image: ImageRef::Full,
    icon_url: IconUrl::Versioned("champion"),
    nested_slots: false,
};

const SUMMONER_SPELL: ResourceSpec = ResourceSpec {
    name: "summoner",
    json_filename: "summoner.json",
    data_root: DataRoot::Keyed,
    lookup: KeyLookup::Field("id"),
    name_field: "name",
    image: ImageRef::Full,
    icon_url: IconUrl::Versioned("spell"),
    nested_slots: false,
};

const ITEM: ResourceSpec = ResourceSpec {
    name: "item",
    json_filename: "item.json",
    data_root: DataRoot::Keyed,
    lookup: KeyLookup::EntryKey,
    name_field: "name",
    image: ImageRef::Full,
    icon_url: IconUrl::Versioned("item"),
    nested_slots: false,
};

const RUNE_TREE: ResourceSpec = ResourceSpec {
    name: "runesReforged",
    json_filename: "runesReforged.json",
    data_root: DataRoot::List,
    lookup: KeyLookup::Field("key"),
    name_field: "name",
    image: ImageRef::Icon,
    icon_url: IconUrl::Unversioned,
    nested_slots: true,
};

/// Built-in resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Champion,
    SummonerSpell,
    Item,
    RuneTree,
}

impl ResourceKind {
    pub fn spec(self) -> &'static ResourceSpec {
        match self {
            ResourceKind::Champion => &CHAMPION,
            ResourceKind::SummonerSpell => &SUMMONER_SPELL,
            ResourceKind::Item => &ITEM,
            ResourceKind::RuneTree => &RUNE_TREE,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.spec().name
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "champion" => Some(ResourceKind::Champion),
            "summoner" => Some(ResourceKind::SummonerSpell),
            "item" => Some(ResourceKind::Item),
            "runesReforged" => Some(ResourceKind::RuneTree),
            _ => None,
        }
    }

    pub fn all() -> [ResourceKind; 4] {
        [
            ResourceKind::Champion,
            ResourceKind::SummonerSpell,
            ResourceKind::Item,
            ResourceKind::RuneTree,
        ]
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
