use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Font configuration for canvas contexts.
///
/// Describes which fonts should be available using only standard library
/// types; [`FontConfig::resolve`] turns it into a font database once so that
/// many contexts can share the result.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Custom font data to register.
    pub custom_fonts: Vec<CustomFont>,
    /// Mappings from generic CSS family names to concrete font family names.
    pub generic_families: GenericFamilyMap,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// Raw font file data registered in addition to system fonts.
#[derive(Clone, Debug)]
pub struct CustomFont {
    /// Raw font file data (TTF/OTF). Arc-wrapped for cheap cloning.
    pub data: Arc<Vec<u8>>,
}

impl CustomFont {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

/// Concrete families to use for the generic CSS families, in priority order.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub sans_serif: Vec<String>,
    pub serif: Vec<String>,
    pub monospace: Vec<String>,
}

impl GenericFamilyMap {
    /// Default mappings. Sans-serif prefers the faces Discord clients render with.
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec![
                "Segoe UI".into(),
                "Arial".into(),
                "Helvetica".into(),
                "Liberation Sans".into(),
                "DejaVu Sans".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Times".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Courier".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
        }
    }
}

impl FontConfig {
    /// Resolve this configuration into a concrete font database.
    ///
    /// System font scanning happens here, once. Clone the returned value (or
    /// share it behind an `Arc`) to create many contexts without rescanning.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig {
            fontdb: Arc::new(font_config_to_fontdb(self)),
        }
    }
}

/// A [`FontConfig`] that has been resolved into a font database.
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: Arc<fontdb::Database>,
}

impl ResolvedFontConfig {
    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Whether any face declares the given family name (case-insensitive).
    pub fn has_family(&self, family: &str) -> bool {
        self.fontdb.faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family))
        })
    }
}

impl std::fmt::Debug for ResolvedFontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFontConfig")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

/// Build a fontdb database from a [`FontConfig`].
pub(crate) fn font_config_to_fontdb(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();

    if config.load_system_fonts {
        db.load_system_fonts();
    }

    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }

    for font in &config.custom_fonts {
        db.load_font_data(Vec::from(font.data.as_slice()));
    }

    apply_generic_families(&mut db, &config.generic_families);
    log::debug!("resolved font database with {} faces", db.len());

    db
}

/// Point each generic family at the first available concrete family.
fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(fam, _lang)| fam.clone()))
        .collect();

    if let Some(family) = families.sans_serif.iter().find(|f| available.contains(*f)) {
        db.set_sans_serif_family(family);
    }
    if let Some(family) = families.serif.iter().find(|f| available.contains(*f)) {
        db.set_serif_family(family);
    }
    if let Some(family) = families.monospace.iter().find(|f| available.contains(*f)) {
        db.set_monospace_family(family);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_config() {
        let config = FontConfig::default();
        assert!(config.custom_fonts.is_empty());
        assert!(config.load_system_fonts);
        assert!(config.font_dirs.is_empty());
        assert_eq!(config.generic_families.sans_serif[0], "Segoe UI");
    }

    #[test]
    fn test_no_system_fonts_resolves_empty() {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        let resolved = config.resolve();
        assert_eq!(resolved.face_count(), 0);
        assert!(!resolved.has_family("Arial"));
    }

    #[test]
    fn test_resolved_clone_shares_database() {
        let resolved = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
        .resolve();
        let cloned = resolved.clone();
        assert!(Arc::ptr_eq(&resolved.fontdb, &cloned.fontdb));
    }

    #[test]
    fn test_invalid_custom_font_is_ignored() {
        let config = FontConfig {
            load_system_fonts: false,
            custom_fonts: vec![CustomFont::new(vec![0u8; 16])],
            ..FontConfig::default()
        };
        assert_eq!(config.resolve().face_count(), 0);
    }
}
