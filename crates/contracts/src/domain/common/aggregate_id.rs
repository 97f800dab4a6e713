use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Трейт для типов идентификаторов агрегатов
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Преобразовать ID в строку
    fn as_string(&self) -> String;

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String>;
}

impl AggregateId for uuid::Uuid {
    fn as_string(&self) -> String {
        ToString::to_string(self)
    }

    fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s).map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Declares a UUID-backed aggregate id newtype with the usual constructors.
#[macro_export]
macro_rules! uuid_aggregate_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new(value: uuid::Uuid) -> Self {
                Self(value)
            }

            pub fn new_v4() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn value(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl $crate::domain::common::AggregateId for $name {
            fn as_string(&self) -> String {
                self.0.to_string()
            }

            fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map($name::new)
                    .map_err(|e| format!("Invalid UUID: {}", e))
            }
        }
    };
}

/// Приводит ссылку на родителя к каноническому виду.
///
/// Empty strings and the nil UUID mean "no reference".
pub fn normalize_ref(reference: Option<&str>) -> Option<String> {
    match reference.map(str::trim) {
        None | Some("") => None,
        Some(s) if s == uuid::Uuid::nil().to_string() => None,
        Some(s) => Some(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ref() {
        assert_eq!(normalize_ref(None), None);
        assert_eq!(normalize_ref(Some("")), None);
        assert_eq!(normalize_ref(Some("  ")), None);
        assert_eq!(
            normalize_ref(Some("00000000-0000-0000-0000-000000000000")),
            None
        );
        assert_eq!(normalize_ref(Some(" abc ")), Some("abc".to_string()));
    }

    #[test]
    fn test_uuid_round_trip_through_string() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(uuid::Uuid::from_string(&id.as_string()), Ok(id));
        assert!(uuid::Uuid::from_string("not-a-uuid").is_err());
    }
}
