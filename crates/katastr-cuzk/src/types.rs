//! Resource types returned by the CUZK REST API.
//!
//! Field names follow the registry's JSON (Czech) so the gateway passes them
//! through unchanged.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Cadastral territory (katastrální území).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadastralArea {
    #[serde(rename = "kod")]
    pub code: u32,
    #[serde(rename = "nazev")]
    pub name: String,
}

/// Definition point in registry S-JTSK (positive values).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    #[serde(rename = "souradniceX")]
    pub x: f64,
    #[serde(rename = "souradniceY")]
    pub y: f64,
}

/// Cadastral parcel (parcela).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: i64,
    #[serde(rename = "kmenoveCislo")]
    pub base_number: i32,
    #[serde(rename = "poddeleni", default, skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<i32>,
    #[serde(rename = "druhCislovani")]
    pub numbering_type: String,
    #[serde(rename = "katastralniUzemi")]
    pub cadastral_area: CadastralArea,
    #[serde(rename = "vymera")]
    pub area: i64,
    #[serde(rename = "druhPozemku", default, skip_serializing_if = "Option::is_none")]
    pub land_type: Option<String>,
    #[serde(rename = "zpusobVyuziti", default, skip_serializing_if = "Option::is_none")]
    pub usage_type: Option<String>,
    #[serde(rename = "cisloLV", default, skip_serializing_if = "Option::is_none")]
    pub ownership_sheet: Option<String>,
    #[serde(rename = "definicniBod", default, skip_serializing_if = "Option::is_none")]
    pub reference_point: Option<ReferencePoint>,
}

/// Building (stavba).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: i64,
    #[serde(rename = "cisloPopisne", default, skip_serializing_if = "Option::is_none")]
    pub descriptive_no: Option<i32>,
    #[serde(rename = "cisloEvidencni", default, skip_serializing_if = "Option::is_none")]
    pub evidence_no: Option<i32>,
    #[serde(rename = "typStavby")]
    pub building_type: String,
    #[serde(rename = "castObce", default, skip_serializing_if = "Option::is_none")]
    pub municipal_part: Option<String>,
    #[serde(rename = "katastralniUzemi")]
    pub cadastral_area: CadastralArea,
    #[serde(rename = "zpusobVyuziti", default, skip_serializing_if = "Option::is_none")]
    pub usage_type: Option<String>,
    #[serde(rename = "parcelneCislo", default, skip_serializing_if = "Option::is_none")]
    pub parcel_number: Option<String>,
}

/// Property unit such as an apartment (jednotka).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    #[serde(rename = "cisloJednotky")]
    pub unit_number: String,
    #[serde(rename = "typJednotky")]
    pub unit_type: String,
    #[serde(rename = "podilNaSpolecnychCastech")]
    pub common_parts_share: String,
    #[serde(rename = "stavbaId", default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<i64>,
}

/// Cadastral proceeding (řízení).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proceeding {
    pub id: i64,
    #[serde(rename = "poradoveCislo")]
    pub sequence_number: i32,
    #[serde(rename = "rok")]
    pub year: i32,
    #[serde(rename = "pracoviste")]
    pub office: String,
    #[serde(rename = "stavRizeni")]
    pub status: String,
    #[serde(rename = "typRizeni")]
    pub kind: String,
    #[serde(rename = "datumPodani", default, skip_serializing_if = "Option::is_none")]
    pub filing_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelSearchResponse {
    #[serde(rename = "parcely", default)]
    pub parcels: Vec<Parcel>,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSearchResponse {
    #[serde(rename = "stavby", default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSearchResponse {
    #[serde(rename = "jednotky", default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborParcelsResponse {
    #[serde(rename = "parcelaId")]
    pub parcel_id: i64,
    #[serde(rename = "sousedniParcely", default)]
    pub neighbors: Vec<Parcel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel_json() -> serde_json::Value {
        serde_json::json!({
            "id": 123456,
            "kmenoveCislo": 1024,
            "poddeleni": 3,
            "druhCislovani": "parcela katastru nemovitostí",
            "katastralniUzemi": {"kod": 730955, "nazev": "Dejvice"},
            "vymera": 812,
            "druhPozemku": "zastavěná plocha a nádvoří",
            "definicniBod": {"souradniceX": 1041334.23, "souradniceY": 744840.86}
        })
    }

    #[test]
    fn test_parcel_deserialization() {
        let parcel: Parcel = serde_json::from_value(parcel_json()).unwrap();

        assert_eq!(parcel.id, 123456);
        assert_eq!(parcel.subdivision, Some(3));
        assert_eq!(parcel.cadastral_area.name, "Dejvice");
        assert!(parcel.usage_type.is_none());
    }

    #[test]
    fn test_parcel_serialization_omits_missing_fields() {
        let parcel: Parcel = serde_json::from_value(parcel_json()).unwrap();
        let json = serde_json::to_string(&parcel).unwrap();

        assert!(json.contains("\"kmenoveCislo\":1024"));
        assert!(!json.contains("zpusobVyuziti"));
        assert!(!json.contains("cisloLV"));
    }

    #[test]
    fn test_proceeding_filing_date() {
        let proceeding: Proceeding = serde_json::from_value(serde_json::json!({
            "id": 77,
            "poradoveCislo": 1520,
            "rok": 2024,
            "pracoviste": "Praha",
            "stavRizeni": "zapsáno",
            "typRizeni": "V",
            "datumPodani": "2024-03-01T09:30:00+01:00"
        }))
        .unwrap();

        let date = proceeding.filing_date.unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T09:30:00+01:00");
    }

    #[test]
    fn test_search_response_defaults() {
        let resp: BuildingSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.buildings.is_empty());
        assert_eq!(resp.total, 0);
    }
}
