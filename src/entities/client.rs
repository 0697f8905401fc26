//! Client entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{set, Entity, Update};
use crate::core::identity::{EntityId, EntityPrefix};

/// A client (customer) of the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique identifier
    pub id: EntityId,

    /// Full name
    pub name: String,

    /// Contact phone
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Creation timestamp (assigned by the store)
    pub created_at: DateTime<Utc>,
}

impl Entity for Client {
    const PREFIX: EntityPrefix = EntityPrefix::Cli;
    const KIND: &'static str = "client";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fields supplied when creating a client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

impl NewClient {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Build the stored record
    pub(crate) fn into_client(self, id: EntityId, created_at: DateTime<Utc>) -> Client {
        Client {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            created_at,
        }
    }
}

/// Partial update for a client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the address
    pub address: Option<Option<String>>,
}

impl ClientUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn address(mut self, address: Option<String>) -> Self {
        self.address = Some(address);
        self
    }
}

impl Update<Client> for ClientUpdate {
    fn apply(self, target: &mut Client) {
        set(&mut target.name, self.name);
        set(&mut target.phone, self.phone);
        set(&mut target.email, self.email);
        set(&mut target.address, self.address);
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none() && self.address.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Client {
        NewClient::new("Maria", "(11) 1", "maria@email.com")
            .with_address("Rua das Flores, 123")
            .into_client(EntityId::from("1"), Utc::now())
    }

    #[test]
    fn test_update_touches_only_present_fields() {
        let mut client = sample();
        let before = client.clone();

        ClientUpdate::default().phone("(11) 2").apply(&mut client);

        assert_eq!(client.phone, "(11) 2");
        assert_eq!(client.name, before.name);
        assert_eq!(client.email, before.email);
        assert_eq!(client.address, before.address);
        assert_eq!(client.created_at, before.created_at);
    }

    #[test]
    fn test_update_clears_address() {
        let mut client = sample();
        ClientUpdate::default().address(None).apply(&mut client);
        assert_eq!(client.address, None);
    }

    #[test]
    fn test_serializes_camel_case_without_empty_address() {
        let mut client = sample();
        client.address = None;
        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("address").is_none());
    }
}
