use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::codes::{
    Agravante, Baciloscopia, CulturaEscarro, FormaTuberculose, RadiografiaTorax, Raca, Sexo,
    TipoEntrada, Zona,
};

/// Wire names of the 13 required patient fields, in declared order.
///
/// The order matters: when several fields are missing, the first one in this
/// list is the one reported.
pub const REQUIRED_FIELDS: [&str; 13] = [
    "idade",
    "sexo",
    "raca",
    "zona",
    "tipoEntrada",
    "radiografiaTorax",
    "formaTuberculose",
    "agravanteAIDS",
    "agravanteAlcoolismo",
    "agravanteDiabetes",
    "agravanteDoencaMental",
    "baciloscopia",
    "culturaEscarro",
];

/// One complete intake submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    #[schema(example = 45)]
    pub idade: u32,
    #[schema(value_type = String, example = "1")]
    pub sexo: Sexo,
    #[schema(value_type = u8, example = 1)]
    pub raca: Raca,
    #[schema(value_type = u8, example = 1)]
    pub zona: Zona,
    #[serde(rename = "tipoEntrada")]
    #[schema(value_type = u8, example = 1)]
    pub tipo_entrada: TipoEntrada,
    #[serde(rename = "radiografiaTorax")]
    #[schema(value_type = u8, example = 2)]
    pub radiografia_torax: RadiografiaTorax,
    #[serde(rename = "formaTuberculose")]
    #[schema(value_type = u8, example = 1)]
    pub forma_tuberculose: FormaTuberculose,
    #[serde(rename = "agravanteAIDS")]
    #[schema(value_type = u8, example = 2)]
    pub agravante_aids: Agravante,
    #[serde(rename = "agravanteAlcoolismo")]
    #[schema(value_type = u8, example = 2)]
    pub agravante_alcoolismo: Agravante,
    #[serde(rename = "agravanteDiabetes")]
    #[schema(value_type = u8, example = 2)]
    pub agravante_diabetes: Agravante,
    #[serde(rename = "agravanteDoencaMental")]
    #[schema(value_type = u8, example = 2)]
    pub agravante_doenca_mental: Agravante,
    #[schema(value_type = u8, example = 1)]
    pub baciloscopia: Baciloscopia,
    #[serde(rename = "culturaEscarro")]
    #[schema(value_type = u8, example = 1)]
    pub cultura_escarro: CulturaEscarro,
}

impl PatientRecord {
    /// Placeholder record used to probe whether the backend has a trained model.
    ///
    /// The values only need to be present and non-blank; the probe never
    /// looks at the prediction itself.
    pub fn probe_payload() -> Value {
        serde_json::json!({
            "idade": 1,
            "sexo": "M",
            "raca": 1,
            "zona": 1,
            "tipoEntrada": 1,
            "radiografiaTorax": 1,
            "formaTuberculose": 1,
            "agravanteAIDS": 1,
            "agravanteAlcoolismo": 1,
            "agravanteDiabetes": 1,
            "agravanteDoencaMental": 1,
            "baciloscopia": 1,
            "culturaEscarro": 1,
        })
    }
}

/// Presence check with browser semantics: absent, `null`, `""`, `false`
/// and the number zero all count as "not filled in".
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f == 0.0 || f.is_nan()),
        Some(Value::Array(_) | Value::Object(_)) => false,
    }
}

/// First required field that is blank in `payload`, scanned in declared order
pub fn first_missing_field(payload: &Value) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|field| is_blank(payload.get(field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_payload() -> Value {
        json!({
            "idade": 45,
            "sexo": "1",
            "raca": 4,
            "zona": 1,
            "tipoEntrada": 1,
            "radiografiaTorax": 2,
            "formaTuberculose": 1,
            "agravanteAIDS": 2,
            "agravanteAlcoolismo": 1,
            "agravanteDiabetes": 2,
            "agravanteDoencaMental": 9,
            "baciloscopia": 1,
            "culturaEscarro": 9
        })
    }

    #[test]
    fn test_complete_payload_has_no_missing_field() {
        assert_eq!(first_missing_field(&complete_payload()), None);
    }

    #[test]
    fn test_each_blank_form_is_reported() {
        for blank in [Value::Null, json!(""), json!(0), json!(false)] {
            let mut payload = complete_payload();
            payload["zona"] = blank;
            assert_eq!(first_missing_field(&payload), Some("zona"));
        }
    }

    #[test]
    fn test_first_missing_in_declared_order_wins() {
        let mut payload = complete_payload();
        if let Some(obj) = payload.as_object_mut() {
            obj.remove("culturaEscarro");
            obj.remove("tipoEntrada");
            obj.remove("raca");
        }
        assert_eq!(first_missing_field(&payload), Some("raca"));
    }

    #[test]
    fn test_non_object_payload_reports_idade() {
        assert_eq!(first_missing_field(&json!([1, 2, 3])), Some("idade"));
    }

    #[test]
    fn test_record_round_trips_wire_names() {
        let record: PatientRecord = serde_json::from_value(complete_payload()).unwrap();
        assert_eq!(record.agravante_alcoolismo, Agravante::Sim);
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, complete_payload());
    }

    #[test]
    fn test_probe_payload_is_complete() {
        assert_eq!(first_missing_field(&PatientRecord::probe_payload()), None);
    }
}
