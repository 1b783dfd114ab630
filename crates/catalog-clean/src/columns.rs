// Column mapping for distributor feeds.
//
// Every distributor names its columns differently ("ISBN", "EAN 13",
// "Código de barras"...). Headers are normalized, then matched against
// each record field's name and synonyms: exact field name first, then an
// exact synonym, then a synonym contained in the header.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use catalog_model::RawRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A record field a source column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Identifier,
    Title,
    Author,
    Description,
    Price,
    SalePrice,
    Stock,
    Category,
    ImageUrl,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Identifier,
        Column::Title,
        Column::Author,
        Column::Description,
        Column::SalePrice,
        Column::Price,
        Column::Stock,
        Column::Category,
        Column::ImageUrl,
    ];

    /// The `RawRecord` field name.
    pub fn key(self) -> &'static str {
        match self {
            Column::Identifier => "identifier",
            Column::Title => "title",
            Column::Author => "author",
            Column::Description => "description",
            Column::Price => "price",
            Column::SalePrice => "sale_price",
            Column::Stock => "stock",
            Column::Category => "category",
            Column::ImageUrl => "image_url",
        }
    }

    /// Normalized header spellings seen in the wild, most specific first.
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Column::Identifier => &[
                "isbn13", "isbn", "ean13", "ean_13", "ean", "codigo_barras", "barcode",
            ],
            Column::Title => &[
                "post_title", "titulo", "nombre_libro", "nombre", "denominacion", "obra",
            ],
            Column::Author => &["autor", "autores", "writer", "escritor", "creador", "firma"],
            Column::Description => &[
                "post_content", "descripcion", "sinopsis", "resumen", "contenido", "texto",
            ],
            Column::Price => &["regular_price", "pvp", "precio_venta", "precio", "coste", "venta"],
            Column::SalePrice => &[
                "precio_oferta", "precio_rebajado", "oferta", "rebaja", "descuento",
            ],
            Column::Stock => &[
                "existencias", "unidades", "cantidad", "disponibles", "qty", "count",
            ],
            Column::Category => &[
                "category_main", "categoria", "materia", "thema", "tema", "genero", "genre",
                "seccion",
            ],
            Column::ImageUrl => &[
                "url_imagen", "img_url", "imagen", "portada", "image", "picture", "foto",
            ],
        }
    }
}

static UNDERSCORE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore regex"));

/// Normalize a header for matching: lowercase, accents removed, spaces as
/// underscores, anything but `[a-z0-9_-]` dropped.
pub fn normalize_header(header: &str) -> String {
    let folded: String = header
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter_map(|c| match c {
            ' ' => Some('_'),
            'a'..='z' | '0'..='9' | '_' | '-' => Some(c),
            _ => None,
        })
        .collect();
    UNDERSCORE_RUN_RE
        .replace_all(&folded, "_")
        .trim_matches('_')
        .to_string()
}

/// Which source header feeds which record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    columns: BTreeMap<Column, String>,
}

impl ColumnMapping {
    /// The header feeding `column`, as it appears in the source.
    pub fn header(&self, column: Column) -> Option<&str> {
        self.columns.get(&column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &str)> {
        self.columns.iter().map(|(c, h)| (*c, h.as_str()))
    }

    /// Fields no header was found for.
    pub fn unmapped(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.columns.contains_key(c))
            .collect()
    }

    /// Build a raw record from one source row keyed by original header.
    /// Unmapped or absent text fields are empty; optional ones are `None`.
    pub fn apply(&self, row: &HashMap<String, String>) -> RawRecord {
        let get = |column: Column| -> Option<String> {
            self.header(column).and_then(|h| row.get(h)).cloned()
        };
        RawRecord {
            identifier: get(Column::Identifier).unwrap_or_default(),
            title: get(Column::Title).unwrap_or_default(),
            author: get(Column::Author).unwrap_or_default(),
            description: get(Column::Description).unwrap_or_default(),
            price: get(Column::Price).unwrap_or_default(),
            stock: get(Column::Stock).unwrap_or_default(),
            category: get(Column::Category),
            sale_price: get(Column::SalePrice),
            image_url: get(Column::ImageUrl),
        }
    }
}

/// Suggest a header for each record field.
///
/// A header is assigned to at most one field. Matching runs in three
/// rounds over all fields (field name, exact synonym, synonym substring),
/// so an exact hit elsewhere is never stolen by a looser match.
pub fn suggest_mapping<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let normalized: Vec<(String, &str)> = headers
        .iter()
        .map(|h| (normalize_header(h.as_ref()), h.as_ref()))
        .filter(|(n, _)| !n.is_empty())
        .collect();

    let mut mapping = ColumnMapping::default();
    let mut claimed: HashSet<&str> = HashSet::new();

    let rounds: [&dyn Fn(Column, &str) -> bool; 3] = [
        &|column, header| header == column.key(),
        &|column, header| column.synonyms().iter().any(|syn| *syn == header),
        &|column, header| {
            header.contains(column.key())
                || column.synonyms().iter().any(|syn| header.contains(syn))
        },
    ];

    for is_match in rounds {
        for column in Column::ALL {
            if mapping.columns.contains_key(&column) {
                continue;
            }
            let hit = normalized
                .iter()
                .find(|(norm, original)| !claimed.contains(original) && is_match(column, norm));
            if let Some((_, original)) = hit {
                claimed.insert(*original);
                mapping.columns.insert(column, (*original).to_string());
            }
        }
    }

    mapping
}
