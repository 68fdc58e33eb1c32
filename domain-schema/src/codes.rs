//! Closed categorical domains of the patient record
//!
//! Every categorical field uses the SINAN numeric coding where `9` means
//! "Ignorado". Codes outside a domain are rejected at deserialization, so a
//! `PatientRecord` can never hold an illegal value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A categorical field with a finite set of legal wire codes
pub trait CodedDomain: Sized + Copy + PartialEq + 'static {
    /// Wire name of the field this domain belongs to
    const FIELD: &'static str;

    /// Every legal value, in display order
    fn all() -> &'static [Self];

    /// Code as sent to the backend, rendered as text
    fn wire_code(self) -> String;

    /// Human-readable label (Portuguese)
    fn description(self) -> &'static str;

    /// Parse a wire code typed or selected by the user
    fn parse_code(code: &str) -> Option<Self>;
}

/// Label for an optional coded value, `"-"` when unset
pub fn describe<T: CodedDomain>(value: Option<T>) -> &'static str {
    value.map_or("-", CodedDomain::description)
}

/// Declares an integer-coded domain with serde and [`CodedDomain`] support
macro_rules! coded_domain {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $( $variant:ident = $code:literal => $descr:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const fn code(self) -> u8 {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl CodedDomain for $name {
            const FIELD: &'static str = $field;

            fn all() -> &'static [Self] {
                &[ $( $name::$variant ),+ ]
            }

            fn wire_code(self) -> String {
                self.code().to_string()
            }

            fn description(self) -> &'static str {
                match self {
                    $( $name::$variant => $descr ),+
                }
            }

            fn parse_code(code: &str) -> Option<Self> {
                code.trim().parse::<u8>().ok().and_then(Self::from_code)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(CodedDomain::description(*self))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = u8::deserialize(deserializer)?;
                Self::from_code(code).ok_or_else(|| {
                    <D::Error as serde::de::Error>::custom(format!(
                        "invalid {} code: {}",
                        $field, code
                    ))
                })
            }
        }
    };
}

/// Sexo is the one field the backend takes as a string code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sexo {
    Masculino,
    Feminino,
    Ignorado,
}

impl CodedDomain for Sexo {
    const FIELD: &'static str = "sexo";

    fn all() -> &'static [Self] {
        &[Sexo::Masculino, Sexo::Feminino, Sexo::Ignorado]
    }

    fn wire_code(self) -> String {
        match self {
            Sexo::Masculino => "1",
            Sexo::Feminino => "2",
            Sexo::Ignorado => "9",
        }
        .to_string()
    }

    fn description(self) -> &'static str {
        match self {
            Sexo::Masculino => "Masculino",
            Sexo::Feminino => "Feminino",
            Sexo::Ignorado => "Ignorado",
        }
    }

    fn parse_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Sexo::Masculino),
            "2" => Some(Sexo::Feminino),
            "9" => Some(Sexo::Ignorado),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sexo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl Serialize for Sexo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.wire_code())
    }
}

impl<'de> Deserialize<'de> for Sexo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Sexo::parse_code(&code).ok_or_else(|| {
            <D::Error as serde::de::Error>::custom(format!("invalid sexo code: {code}"))
        })
    }
}

coded_domain! {
    /// Raça/cor
    Raca ("raca") {
        Branca = 1 => "Branca",
        Preta = 2 => "Preta",
        Amarela = 3 => "Amarela",
        Parda = 4 => "Parda",
        Ignorado = 9 => "Ignorado",
    }
}

coded_domain! {
    /// Zona de residência
    Zona ("zona") {
        Urbana = 1 => "Urbana",
        Rural = 2 => "Rural",
        Ignorado = 9 => "Ignorado",
    }
}

coded_domain! {
    /// Tipo de entrada (where the case was admitted)
    TipoEntrada ("tipoEntrada") {
        Hospital = 1 => "Hospital",
        Clinica = 2 => "Clínica",
        Residencia = 3 => "Residência",
        Ignorado = 9 => "Ignorado",
    }
}

coded_domain! {
    /// Radiografia de tórax
    RadiografiaTorax ("radiografiaTorax") {
        Normal = 1 => "Normal",
        Anormal = 2 => "Anormal",
        Ignorado = 9 => "Ignorado",
    }
}

coded_domain! {
    /// Forma clínica da tuberculose
    FormaTuberculose ("formaTuberculose") {
        Pulmonar = 1 => "Pulmonar",
        ExtraPulmonar = 2 => "Extra Pulmonar",
        Ignorado = 9 => "Ignorado",
    }
}

coded_domain! {
    /// Agravante (AIDS, alcoolismo, diabetes, doença mental)
    Agravante ("agravante") {
        Sim = 1 => "Sim",
        Nao = 2 => "Não",
        Ignorado = 9 => "Ignorado",
    }
}

coded_domain! {
    /// Baciloscopia de escarro
    Baciloscopia ("baciloscopia") {
        Positivo = 1 => "Positivo",
        Negativo = 2 => "Negativo",
        Ignorado = 9 => "Ignorado",
    }
}

coded_domain! {
    /// Cultura de escarro
    CulturaEscarro ("culturaEscarro") {
        Positivo = 1 => "Positivo",
        Negativo = 2 => "Negativo",
        Ignorado = 9 => "Ignorado",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&Raca::Parda).unwrap(), "4");
        assert_eq!(serde_json::to_string(&Agravante::Ignorado).unwrap(), "9");
    }

    #[test]
    fn test_sexo_serializes_as_string_code() {
        assert_eq!(serde_json::to_string(&Sexo::Feminino).unwrap(), "\"2\"");
        let parsed: Sexo = serde_json::from_str("\"9\"").unwrap();
        assert_eq!(parsed, Sexo::Ignorado);
    }

    #[test]
    fn test_out_of_domain_code_is_rejected() {
        let err = serde_json::from_str::<Zona>("3").unwrap_err();
        assert!(err.to_string().contains("invalid zona code: 3"));
        assert!(serde_json::from_str::<Sexo>("\"M\"").is_err());
    }

    #[test]
    fn test_parse_code_accepts_whitespace() {
        assert_eq!(TipoEntrada::parse_code(" 3 "), Some(TipoEntrada::Residencia));
        assert_eq!(TipoEntrada::parse_code("4"), None);
        assert_eq!(TipoEntrada::parse_code("abc"), None);
    }

    #[test]
    fn test_describe_unset_value() {
        assert_eq!(describe::<Baciloscopia>(None), "-");
        assert_eq!(describe(Some(FormaTuberculose::ExtraPulmonar)), "Extra Pulmonar");
    }

    #[test]
    fn test_every_domain_ends_with_ignorado() {
        assert_eq!(Raca::all().last().map(|r| r.code()), Some(9));
        assert_eq!(CulturaEscarro::all().len(), 3);
        assert_eq!(Sexo::all().last().map(|s| s.wire_code()), Some("9".to_string()));
    }
}
