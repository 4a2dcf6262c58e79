use serde::Deserialize;

/// Namespace prefixes separating vanilla blocks from the add-on's custom logs.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Namespaces {
    #[serde(default = "default_vanilla")]
    pub vanilla: String,
    #[serde(default = "default_custom")]
    pub custom: String,
    #[serde(default = "default_air")]
    pub air: String,
}

fn default_vanilla() -> String {
    "minecraft:".into()
}
fn default_custom() -> String {
    "rtc:".into()
}
fn default_air() -> String {
    "minecraft:air".into()
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            vanilla: default_vanilla(),
            custom: default_custom(),
            air: default_air(),
        }
    }
}

impl Namespaces {
    #[inline]
    pub fn is_air(&self, id: &str) -> bool {
        id == self.air
    }

    #[inline]
    pub fn is_custom(&self, id: &str) -> bool {
        id.starts_with(&self.custom)
    }

    /// A natural trunk block the player can start working on.
    pub fn is_vanilla_loggable(&self, id: &str) -> bool {
        id.starts_with(&self.vanilla) && (id.ends_with("_log") || id.ends_with("_stem"))
    }

    /// A trunk block already converted to the phased representation.
    pub fn is_custom_log(&self, id: &str) -> bool {
        self.is_custom(id) && is_loggable(id)
    }

    /// `minecraft:stripped_oak_log` -> `rtc:oak_log`. Stripping is not
    /// tracked by the custom blocks, so it is dropped here.
    pub fn to_custom(&self, id: &str) -> String {
        let rest = id.strip_prefix(&self.vanilla).unwrap_or(id);
        format!("{}{}", self.custom, rest.replace("stripped_", ""))
    }

    /// `rtc:crimson_stem` -> `minecraft:crimson_stem`. Only the namespace
    /// changes; stems keep their `_stem` suffix.
    pub fn to_vanilla(&self, id: &str) -> String {
        match id.strip_prefix(&self.custom) {
            Some(rest) => format!("{}{}", self.vanilla, rest),
            None => id.to_string(),
        }
    }
}

/// Trunk-type block: any log or stem, stripped variants included.
#[inline]
pub fn is_loggable(id: &str) -> bool {
    id.contains("log") || id.contains("stem")
}

#[inline]
pub fn is_leaf(id: &str) -> bool {
    id.contains("leaves")
}

/// Nether fungi and similar: destroyed without clearing leaves around them.
#[inline]
pub fn is_stem_family(id: &str) -> bool {
    id.contains("stem")
}

/// Type id with any namespace removed (`minecraft:oak_log` -> `oak_log`).
pub fn species_of(id: &str) -> &str {
    match id.split_once(':') {
        Some((_, rest)) => rest,
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_loggable_requires_namespace_and_suffix() {
        let ns = Namespaces::default();
        assert!(ns.is_vanilla_loggable("minecraft:oak_log"));
        assert!(ns.is_vanilla_loggable("minecraft:stripped_birch_log"));
        assert!(ns.is_vanilla_loggable("minecraft:warped_stem"));
        assert!(!ns.is_vanilla_loggable("rtc:oak_log"));
        assert!(!ns.is_vanilla_loggable("minecraft:oak_leaves"));
        assert!(!ns.is_vanilla_loggable("minecraft:oak_wood"));
    }

    #[test]
    fn custom_conversion_strips_stripped_prefix() {
        let ns = Namespaces::default();
        assert_eq!(ns.to_custom("minecraft:stripped_spruce_log"), "rtc:spruce_log");
        assert_eq!(ns.to_custom("minecraft:crimson_stem"), "rtc:crimson_stem");
    }

    #[test]
    fn stems_revert_to_stems() {
        let ns = Namespaces::default();
        assert_eq!(ns.to_vanilla("rtc:crimson_stem"), "minecraft:crimson_stem");
        assert_eq!(ns.to_vanilla("rtc:dark_oak_log"), "minecraft:dark_oak_log");
        assert_eq!(ns.to_vanilla("minecraft:dark_oak_log"), "minecraft:dark_oak_log");
    }

    #[test]
    fn species_drops_namespace() {
        assert_eq!(species_of("minecraft:mangrove_log"), "mangrove_log");
        assert_eq!(species_of("mangrove_log"), "mangrove_log");
    }
}
