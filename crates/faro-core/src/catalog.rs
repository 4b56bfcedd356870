//! Bundled category taxonomy metadata.
//!
//! The catalog is presentation data — labels, colors and icons for the two
//! top-level report families. Submissions are NOT validated against it;
//! unknown categories fall back to [`format_label`] and a neutral color
//! wherever styling is needed.

use serde_json::{Value, json};

pub struct CategoryInfo {
  pub key:           &'static str,
  pub label:         &'static str,
  pub color:         &'static str,
  pub subcategories: &'static [SubcategoryInfo],
}

pub struct SubcategoryInfo {
  pub key:   &'static str,
  pub label: &'static str,
  pub color: &'static str,
  pub icon:  &'static str,
}

pub const CATALOG: &[CategoryInfo] = &[
  CategoryInfo {
    key:   "incidencias",
    label: "Incidencias y Emergencias",
    color: "#cc0000",
    subcategories: &[
      SubcategoryInfo {
        key:   "zona_inundada",
        label: "Zona Inundada",
        color: "#1e88e5",
        icon:  "water",
      },
      SubcategoryInfo {
        key:   "corte_servicios",
        label: "Corte de Luz, Agua o Gas",
        color: "#ffc107",
        icon:  "bolt",
      },
      SubcategoryInfo {
        key:   "camino_puente_cortado",
        label: "Camino o Puente Cortado",
        color: "#e53935",
        icon:  "road",
      },
      SubcategoryInfo {
        key:   "persona_atrapada",
        label: "Persona Atrapada o Incomunicada",
        color: "#9c27b0",
        icon:  "user-injured",
      },
    ],
  },
  CategoryInfo {
    key:   "servicios",
    label: "Servicios y Recursos Disponibles",
    color: "#0066cc",
    subcategories: &[
      SubcategoryInfo {
        key:   "centro_salud",
        label: "Centro de Salud Operativo",
        color: "#4caf50",
        icon:  "hospital",
      },
      SubcategoryInfo {
        key:   "refugio_evac",
        label: "Refugio o Centro de Evacuación",
        color: "#673ab7",
        icon:  "house-user",
      },
      SubcategoryInfo {
        key:   "punto_carga",
        label: "Punto de Carga de Celular",
        color: "#ff9800",
        icon:  "charging-station",
      },
      SubcategoryInfo {
        key:   "punto_abastecimiento",
        label: "Punto de Distribución de Agua/Comida",
        color: "#2196f3",
        icon:  "utensils",
      },
      SubcategoryInfo {
        key:   "comercio_abierto",
        label: "Comercio/Farmacia con Insumos Básicos",
        color: "#4caf50",
        icon:  "store",
      },
      SubcategoryInfo {
        key:   "transporte_disponible",
        label: "Transporte o Evacuación Disponible",
        color: "#607d8b",
        icon:  "shuttle-van",
      },
    ],
  },
];

/// Neutral color used for categories not present in the catalog.
pub const FALLBACK_COLOR: &str = "#777777";

pub fn category(key: &str) -> Option<&'static CategoryInfo> {
  CATALOG.iter().find(|c| c.key == key)
}

pub fn subcategory(
  category_key: &str,
  subcategory_key: &str,
) -> Option<&'static SubcategoryInfo> {
  category(category_key)?
    .subcategories
    .iter()
    .find(|s| s.key == subcategory_key)
}

/// Human-readable fallback for taxonomy keys not in the catalog:
/// `"camino_puente_cortado"` becomes `"Camino Puente Cortado"`.
pub fn format_label(key: &str) -> String {
  key
    .split('_')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// The catalog rendered in the shape clients consume:
/// `{ "<category>": { label, color, subcategories: { "<sub>": { … } } } }`.
pub fn catalog_json() -> Value {
  let mut categories = serde_json::Map::new();
  for cat in CATALOG {
    let mut subs = serde_json::Map::new();
    for sub in cat.subcategories {
      subs.insert(
        sub.key.to_owned(),
        json!({ "label": sub.label, "color": sub.color, "icon": sub.icon }),
      );
    }
    categories.insert(
      cat.key.to_owned(),
      json!({ "label": cat.label, "color": cat.color, "subcategories": subs }),
    );
  }
  Value::Object(categories)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_subcategory_resolves() {
    let sub = subcategory("servicios", "centro_salud").unwrap();
    assert_eq!(sub.label, "Centro de Salud Operativo");
    assert_eq!(sub.icon, "hospital");
  }

  #[test]
  fn unknown_keys_resolve_to_none() {
    assert!(category("desconocida").is_none());
    assert!(subcategory("incidencias", "desconocida").is_none());
  }

  #[test]
  fn format_label_capitalizes_words() {
    assert_eq!(format_label("camino_puente_cortado"), "Camino Puente Cortado");
    assert_eq!(format_label("agua"), "Agua");
  }

  #[test]
  fn catalog_json_shape() {
    let value = catalog_json();
    let servicios = &value["servicios"];
    assert_eq!(servicios["label"], "Servicios y Recursos Disponibles");
    assert_eq!(
      servicios["subcategories"]["centro_salud"]["icon"],
      "hospital"
    );
  }
}
