//! KML document generation with `quick-xml`'s writer API.

use std::io::Cursor;

use chrono::{DateTime, Datelike, Timelike, Utc};
use faro_core::{catalog, incident::Incident};
use quick_xml::{
  Writer,
  events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Render `incidents` as a complete KML document.
///
/// Grouping preserves first-seen order of categories and subcategories, so
/// a newest-first input keeps its most recent groups on top.
pub fn render(incidents: &[Incident]) -> String {
  let cursor = Cursor::new(Vec::new());
  let mut w = Writer::new_with_indent(cursor, b' ', 2);

  w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .unwrap();

  let mut kml = BytesStart::new("kml");
  kml.push_attribute(("xmlns", "http://www.opengis.net/kml/2.2"));
  w.write_event(Event::Start(kml)).unwrap();
  write_start(&mut w, "Document");

  write_text_elem(&mut w, "name", "Incidencias y Servicios");
  write_text_elem(
    &mut w,
    "description",
    "Mapa de incidencias y servicios disponibles",
  );

  write_styles(&mut w);

  for (category_key, subgroups) in grouped(incidents) {
    let category_label = catalog::category(category_key)
      .map(|c| c.label.to_owned())
      .unwrap_or_else(|| catalog::format_label(category_key));

    write_start(&mut w, "Folder");
    write_text_elem(&mut w, "name", &category_label);

    for (subcategory_key, members) in subgroups {
      let subcategory_label = catalog::subcategory(category_key, subcategory_key)
        .map(|s| s.label.to_owned())
        .unwrap_or_else(|| catalog::format_label(subcategory_key));

      write_start(&mut w, "Folder");
      write_text_elem(&mut w, "name", &subcategory_label);

      for incident in members {
        write_placemark(&mut w, incident, &category_label, &subcategory_label);
      }

      write_end(&mut w, "Folder");
    }

    write_end(&mut w, "Folder");
  }

  write_end(&mut w, "Document");
  w.write_event(Event::End(BytesEnd::new("kml"))).unwrap();

  String::from_utf8(w.into_inner().into_inner()).expect("writer emits UTF-8")
}

// ─── Grouping ────────────────────────────────────────────────────────────────

fn grouped(incidents: &[Incident]) -> Vec<(&str, Vec<(&str, Vec<&Incident>)>)> {
  let mut categories: Vec<(&str, Vec<(&str, Vec<&Incident>)>)> = Vec::new();

  for incident in incidents {
    let cat_idx = match categories
      .iter()
      .position(|(key, _)| *key == incident.category)
    {
      Some(idx) => idx,
      None => {
        categories.push((incident.category.as_str(), Vec::new()));
        categories.len() - 1
      }
    };

    let subgroups = &mut categories[cat_idx].1;
    let sub_idx = match subgroups
      .iter()
      .position(|(key, _)| *key == incident.subcategory)
    {
      Some(idx) => idx,
      None => {
        subgroups.push((incident.subcategory.as_str(), Vec::new()));
        subgroups.len() - 1
      }
    };

    subgroups[sub_idx].1.push(incident);
  }

  categories
}

// ─── Styles ──────────────────────────────────────────────────────────────────

fn write_styles(w: &mut XmlWriter) {
  for category in catalog::CATALOG {
    for sub in category.subcategories {
      let style_id = format!("{}_{}", category.key, sub.key);
      let href = icon_href(category.key, sub.icon);
      let color = kml_color(sub.color);

      write_style(w, &style_id, &color, href, "1.0", "0.8", None);
      write_style(
        w,
        &format!("{style_id}_urgent"),
        &color,
        href,
        "1.2",
        "1.0",
        Some("ff0000ff"),
      );
    }
  }
}

fn write_style(
  w: &mut XmlWriter,
  id: &str,
  color: &str,
  icon_href: &str,
  icon_scale: &str,
  label_scale: &str,
  label_color: Option<&str>,
) {
  let mut style = BytesStart::new("Style");
  style.push_attribute(("id", id));
  w.write_event(Event::Start(style)).unwrap();

  write_start(w, "IconStyle");
  write_text_elem(w, "color", color);
  write_text_elem(w, "scale", icon_scale);
  write_start(w, "Icon");
  write_text_elem(w, "href", icon_href);
  write_end(w, "Icon");
  write_end(w, "IconStyle");

  write_start(w, "LabelStyle");
  write_text_elem(w, "scale", label_scale);
  if let Some(label_color) = label_color {
    write_text_elem(w, "color", label_color);
  }
  write_end(w, "LabelStyle");

  write_end(w, "Style");
}

/// Google mapfiles icon for a catalog icon name, with per-category defaults.
fn icon_href(category_key: &str, icon: &str) -> &'static str {
  match icon {
    "water" => "http://maps.google.com/mapfiles/kml/shapes/water.png",
    "bolt" => "http://maps.google.com/mapfiles/kml/shapes/thunderstorm.png",
    "road" => "http://maps.google.com/mapfiles/kml/shapes/caution.png",
    "user-injured" => "http://maps.google.com/mapfiles/kml/shapes/man.png",
    "hospital" => "http://maps.google.com/mapfiles/kml/shapes/hospitals.png",
    "house-user" => {
      "http://maps.google.com/mapfiles/kml/shapes/homegardenbusiness.png"
    }
    "charging-station" => {
      "http://maps.google.com/mapfiles/kml/shapes/electronics.png"
    }
    "utensils" => "http://maps.google.com/mapfiles/kml/shapes/dining.png",
    "store" => "http://maps.google.com/mapfiles/kml/shapes/shopping.png",
    "shuttle-van" => "http://maps.google.com/mapfiles/kml/shapes/bus.png",
    _ => match category_key {
      "incidencias" => "http://maps.google.com/mapfiles/kml/paddle/red-circle.png",
      "servicios" => "http://maps.google.com/mapfiles/kml/paddle/blu-circle.png",
      _ => "http://maps.google.com/mapfiles/kml/paddle/wht-blank.png",
    },
  }
}

/// `#rrggbb` to KML's `aabbggrr`, full opacity.
fn kml_color(hex: &str) -> String {
  let hex = hex.trim_start_matches('#');
  if hex.len() != 6 {
    return "ff777777".to_string();
  }
  format!("ff{}{}{}", &hex[4..6], &hex[2..4], &hex[0..2])
}

// ─── Placemarks ──────────────────────────────────────────────────────────────

fn write_placemark(
  w: &mut XmlWriter,
  incident: &Incident,
  category_label: &str,
  subcategory_label: &str,
) {
  let style_id = format!("{}_{}", incident.category, incident.subcategory);
  let urgent_suffix = if incident.urgent { "_urgent" } else { "" };

  write_start(w, "Placemark");
  write_text_elem(w, "name", &format!("ID: {}", incident.id));
  write_text_elem(w, "styleUrl", &format!("#{style_id}{urgent_suffix}"));

  let html = description_html(incident, category_label, subcategory_label);
  write_start(w, "description");
  w.write_event(Event::CData(BytesCData::new(html))).unwrap();
  write_end(w, "description");

  write_start(w, "Point");
  write_text_elem(
    w,
    "coordinates",
    &format!("{},{},0", incident.location.lng, incident.location.lat),
  );
  write_end(w, "Point");

  write_end(w, "Placemark");
}

/// Balloon body. Lives inside CDATA, so the free-text description is escaped
/// by hand here rather than by the XML writer.
fn description_html(
  incident: &Incident,
  category_label: &str,
  subcategory_label: &str,
) -> String {
  let urgent = if incident.urgent {
    "<span style=\"color: red;\">Sí</span>"
  } else {
    "No"
  };

  format!(
    "<div style=\"font-family: Arial, sans-serif; max-width: 300px;\">\
       <h3 style=\"margin-top: 0; color: #333;\">{subcategory_label}</h3>\
       <p style=\"margin-bottom: 10px;\"><strong>Descripción:</strong> {}</p>\
       <p style=\"margin-bottom: 5px;\"><strong>Categoría:</strong> {category_label}</p>\
       <p style=\"margin-bottom: 5px;\"><strong>Urgente:</strong> {urgent}</p>\
       <p style=\"margin-bottom: 5px;\"><strong>Fecha:</strong> {}</p>\
       <p style=\"margin-bottom: 5px;\"><strong>Coordenadas:</strong> {:.6}, {:.6}</p>\
     </div>",
    escape_html(&incident.description),
    format_date_es(incident.timestamp),
    incident.location.lat,
    incident.location.lng,
  )
}

const MONTHS_ES: [&str; 12] = [
  "enero",
  "febrero",
  "marzo",
  "abril",
  "mayo",
  "junio",
  "julio",
  "agosto",
  "septiembre",
  "octubre",
  "noviembre",
  "diciembre",
];

fn format_date_es(dt: DateTime<Utc>) -> String {
  format!(
    "{} de {} de {}, {:02}:{:02}",
    dt.day(),
    MONTHS_ES[dt.month0() as usize],
    dt.year(),
    dt.hour(),
    dt.minute(),
  )
}

fn escape_html(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&apos;"),
      other => out.push(other),
    }
  }
  out
}

// ─── Low-level write helpers ─────────────────────────────────────────────────

fn write_start(w: &mut XmlWriter, tag: &str) {
  w.write_event(Event::Start(BytesStart::new(tag))).unwrap();
}

fn write_end(w: &mut XmlWriter, tag: &str) {
  w.write_event(Event::End(BytesEnd::new(tag))).unwrap();
}

fn write_text_elem(w: &mut XmlWriter, tag: &str, text: &str) {
  write_start(w, tag);
  w.write_event(Event::Text(BytesText::new(text))).unwrap();
  write_end(w, tag);
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use faro_core::incident::Location;

  use super::*;

  fn incident(
    id: i64,
    category: &str,
    subcategory: &str,
    description: &str,
    urgent: bool,
  ) -> Incident {
    Incident {
      id,
      category: category.into(),
      subcategory: subcategory.into(),
      description: description.into(),
      urgent,
      location: Location { lat: -38.7183, lng: -62.2661 },
      timestamp: Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap(),
      visibility: true,
      deletion_votes: 0,
    }
  }

  #[test]
  fn renders_document_skeleton() {
    let kml = render(&[]);
    assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(kml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\">"));
    assert!(kml.contains("<name>Incidencias y Servicios</name>"));
    // Styles are emitted for the whole catalog even with no incidents.
    assert!(kml.contains("<Style id=\"servicios_centro_salud\">"));
    assert!(kml.contains("<Style id=\"servicios_centro_salud_urgent\">"));
  }

  #[test]
  fn groups_by_category_then_subcategory() {
    let incidents = [
      incident(1, "incidencias", "zona_inundada", "a", false),
      incident(2, "servicios", "centro_salud", "b", false),
      incident(3, "incidencias", "zona_inundada", "c", false),
    ];
    let kml = render(&incidents);

    assert!(kml.contains("<name>Incidencias y Emergencias</name>"));
    assert!(kml.contains("<name>Servicios y Recursos Disponibles</name>"));
    assert!(kml.contains("<name>Zona Inundada</name>"));
    // Both zona_inundada placemarks land in one folder; three placemarks total.
    assert_eq!(kml.matches("<Placemark>").count(), 3);
    assert_eq!(kml.matches("<name>Zona Inundada</name>").count(), 1);
  }

  #[test]
  fn urgent_placemark_uses_urgent_style() {
    let incidents = [incident(7, "incidencias", "persona_atrapada", "x", true)];
    let kml = render(&incidents);
    assert!(kml.contains("<styleUrl>#incidencias_persona_atrapada_urgent</styleUrl>"));
  }

  #[test]
  fn unknown_category_falls_back_to_formatted_label() {
    let incidents = [incident(9, "otros_reportes", "sin_clasificar", "x", false)];
    let kml = render(&incidents);
    assert!(kml.contains("<name>Otros Reportes</name>"));
    assert!(kml.contains("<name>Sin Clasificar</name>"));
  }

  #[test]
  fn description_markup_is_escaped() {
    let incidents =
      [incident(4, "servicios", "centro_salud", "<script>alert(1)</script>", false)];
    let kml = render(&incidents);
    assert!(kml.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!kml.contains("<script>"));
  }

  #[test]
  fn coordinates_are_lng_lat() {
    let incidents = [incident(5, "servicios", "punto_carga", "x", false)];
    let kml = render(&incidents);
    assert!(kml.contains("<coordinates>-62.2661,-38.7183,0</coordinates>"));
  }

  #[test]
  fn kml_color_swaps_channels() {
    assert_eq!(kml_color("#1e88e5"), "ffe5881e");
    assert_eq!(kml_color("bogus"), "ff777777");
  }

  #[test]
  fn date_is_rendered_in_spanish() {
    let dt = Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap();
    assert_eq!(format_date_es(dt), "8 de marzo de 2025, 14:30");
  }
}
