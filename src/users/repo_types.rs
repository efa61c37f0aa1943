use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // stored as given, never exposed in JSON
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "fecha_subscripcion", with = "time::serde::rfc3339")]
    pub subscribed_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn into_user(self, id: i32, subscribed_at: OffsetDateTime) -> User {
        User {
            id,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            subscribed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn user_serialization_hides_password() {
        let user = NewUser {
            email: "leia@alderaan.gov".into(),
            password: "help-me-obi-wan".into(),
            first_name: "Leia".into(),
            last_name: "Organa".into(),
        }
        .into_user(1, datetime!(2024-05-04 12:00 UTC));

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "leia@alderaan.gov");
        assert_eq!(json["nombre"], "Leia");
        assert_eq!(json["apellido"], "Organa");
        assert_eq!(json["fecha_subscripcion"], "2024-05-04T12:00:00Z");
        assert!(json.get("password").is_none());
    }
}
