//! Definitions of the service (envelope) segments UNB, UNZ, UNH and UNT
//!
//! Each definition fixes the positions its envelope view reads. Elements
//! beyond those are not modelled, since matching is exactly positional.

use crate::model::{ElementDefinition as E, SegmentDefinition};
use crate::registry::SegmentRegistry;
use tracing::debug;

/// Interchange header
pub fn unb() -> SegmentDefinition {
    SegmentDefinition::new("UNB")
        .with_name("Nutzdaten-Kopfsegment")
        .with_element(E::composite(
            "S001",
            "Syntax-Bezeichner",
            vec![
                E::simple("DE0001", "Syntax-Kennung"),
                E::simple("DE0002", "Syntax-Versionsnummer"),
            ],
        ))
        .with_element(E::composite(
            "S002",
            "Absender der Übertragungsdatei",
            vec![
                E::simple("DE0004", "Absenderbezeichnung"),
                E::simple("DE0007", "Teilnehmerbezeichnung, Qualifier"),
            ],
        ))
        .with_element(E::composite(
            "S003",
            "Empfänger der Übertragungsdatei",
            vec![
                E::simple("DE0010", "Empfängerbezeichnung"),
                E::simple("DE0007", "Teilnehmerbezeichnung, Qualifier"),
            ],
        ))
        .with_element(E::composite(
            "S004",
            "Datum/Uhrzeit der Erstellung",
            vec![E::simple("DE0017", "Datum"), E::simple("DE0019", "Uhrzeit")],
        ))
        .with_element(E::simple("DE0020", "Datenaustauschreferenz"))
}

/// Interchange trailer
pub fn unz() -> SegmentDefinition {
    SegmentDefinition::new("UNZ")
        .with_name("Nutzdaten-Endsegment")
        .with_element(E::simple("DE0036", "Datenaustauschzähler"))
        .with_element(E::simple("DE0020", "Datenaustauschreferenz"))
}

/// Message header
pub fn unh() -> SegmentDefinition {
    SegmentDefinition::new("UNH")
        .with_name("Nachrichten-Kopfsegment")
        .with_element(E::simple("DE0062", "Nachrichten-Referenznummer"))
        .with_element(E::composite(
            "S009",
            "Nachrichten-Kennung",
            vec![
                E::simple("DE0065", "Nachrichtentyp"),
                E::simple("DE0052", "Versionsnummer des Nachrichtentyps"),
                E::simple("DE0054", "Freigabenummer des Nachrichtentyps"),
                E::simple("DE0051", "Verwaltende Organisation"),
                E::simple("DE0057", "Anwendungscode der zuständigen Organisation"),
            ],
        ))
        .with_element(E::composite(
            "C0068",
            "Allgemeine Zuordnungs-Referenz",
            vec![E::simple("DE0068", "Allgemeine Zuordnungs-Referenz")],
        ))
        .with_element(E::composite(
            "S010",
            "Status der Übermittlung",
            vec![
                E::simple("DE0070", "Übermittlungsfolgenummer"),
                E::simple("DE0073", "Erste und letzte Übermittlung"),
            ],
        ))
}

/// Message trailer
pub fn unt() -> SegmentDefinition {
    SegmentDefinition::new("UNT")
        .with_name("Nachrichten-Endesegment")
        .with_element(E::simple("DE0074", "Anzahl der Segmente in einer Nachricht"))
        .with_element(E::simple("DE0062", "Nachrichten-Referenznummer"))
}

/// All four service segment definitions
pub fn service_segments() -> Vec<SegmentDefinition> {
    vec![unb(), unz(), unh(), unt()]
}

/// Register the service segments into `registry`
pub fn register_service_segments(registry: &SegmentRegistry) {
    for definition in service_segments() {
        registry.register_definition(definition);
    }
    debug!("Registered service segments UNB, UNZ, UNH, UNT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use edi_ir::{Component, Value};

    #[test]
    fn test_register_service_segments() {
        let registry = SegmentRegistry::new();
        register_service_segments(&registry);

        assert_eq!(registry.tags(), vec!["UNB", "UNH", "UNT", "UNZ"]);
    }

    #[test]
    fn test_unh_parses_message_identifier() {
        let mut node = unh().build();
        node.parse(&Value::list([
            Value::from("1"),
            Value::from(vec!["UTILMD", "D", "11A", "UN", "5.2e"]),
            Value::from(vec!["ref1"]),
            Value::from(vec!["1", "C"]),
        ]))
        .unwrap();

        let export = node.export();
        let children = export.children().unwrap();
        assert_eq!(children[1].description, "S009");
        assert_eq!(children[1].children().unwrap()[0].text(), Some("UTILMD"));
        assert_eq!(children[3].description, "S010");
        assert_eq!(children[3].children().unwrap()[1].text(), Some("C"));
    }

    #[test]
    fn test_unh_arity() {
        assert_eq!(unh().arity(), 4);
    }

    #[test]
    fn test_unb_arity() {
        assert_eq!(unb().arity(), 5);
        assert_eq!(unb().build().len(), 5);
    }
}
